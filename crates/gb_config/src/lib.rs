// crates/gb_config/src/lib.rs

//! Gravel-Bedrock Config Layer (Layer 2)
//!
//! 配置层，提供侵蚀器参数记录和完整运行配置。本层只含纯数据与验证，
//! 不依赖物理层。
//!
//! # 模块概览
//!
//! - [`eroder_params`]: 侵蚀器物理参数 `EroderParams`
//! - [`model_config`]: 运行配置 `ModelConfig`（网络、初始条件、强迫、输出）
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: gb_cli        ─> uses ModelConfig
//! Layer 3: gb_physics    ─> consumes EroderParams, ParallelConfig
//! Layer 2: gb_config     ─> (本层)
//! Layer 1: gb_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod eroder_params;
pub mod error;
pub mod model_config;

// 重导出核心类型
pub use eroder_params::EroderParams;
pub use error::ConfigError;
pub use model_config::{
    ForcingConfig, InitialConfig, ModelConfig, NetworkConfig, NetworkKind, OutputConfig,
    ParallelConfig, RunControl,
};
