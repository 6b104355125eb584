// crates/gb_physics/src/lib.rs

//! 砾石-基岩河道侵蚀物理层
//!
//! 在受水网络上逐步演变每个内部节点的地表高程、泥沙厚度与基岩高程，
//! 驱动过程为砾石推移质输运、泥沙磨蚀，以及基岩的磨蚀与拔蚀。
//! 泥沙覆盖通过基岩出露比例 α 同时限制输沙与基岩侵蚀。
//!
//! # 模块
//!
//! - [`network`]: 受水网络（拓扑与几何），构造时验证无环
//! - [`fields`]: 命名节点字段存储
//! - [`flux`]: 通量计算器（输沙能力、出流、磨蚀、拔蚀）
//! - [`accumulator`]: 入流散射累加（固定顺序串行）
//! - [`integrator`]: 质量平衡显式积分
//! - [`eroder`]: 侵蚀器组件，对外提供 `run_one_step`
//! - [`stats`]: 单步统计
//!
//! # 范围
//!
//! 汇流（受水节点、坡度、流量）、网格构造与边界分类由外部提供。
//! 每次调用只做一次显式更新，稳定步长由调用方选择。

pub mod accumulator;
pub mod eroder;
pub mod error;
pub mod fields;
pub mod flux;
pub mod integrator;
pub mod network;
pub mod stats;

// 重导出常用类型
pub use accumulator::InfluxAccumulator;
pub use eroder::{FluxOutputs, GravelBedrockEroder, StepInput};
pub use error::{EroderError, EroderResult};
pub use fields::{names, FieldError, FieldRole, FieldSpec, NodeFields, GRAVEL_BEDROCK_FIELDS};
pub use flux::{FluxEvaluator, NodeAbrasion, NodeTransport};
pub use integrator::{IntegrationSummary, MassBalanceIntegrator, TopographyMut};
pub use network::{DrainageNetwork, NodeStatus};
pub use stats::StepStats;

pub use gb_config::{EroderParams, ParallelConfig};
