// crates/gb_config/src/model_config.rs

//! ModelConfig - 完整运行配置
//!
//! 侵蚀器参数之外，还包含演示网络、初始条件、外部强迫、
//! 时间推进与输出设置。全部字段带默认值，JSON 中可以只写需要覆盖的部分。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::eroder_params::EroderParams;
use crate::error::ConfigError;

/// 完整运行配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// 侵蚀器物理参数
    #[serde(default)]
    pub eroder: EroderParams,

    /// 并行设置
    #[serde(default)]
    pub parallel: ParallelConfig,

    /// 网络设置
    #[serde(default)]
    pub network: NetworkConfig,

    /// 初始条件
    #[serde(default)]
    pub initial: InitialConfig,

    /// 外部强迫
    #[serde(default)]
    pub forcing: ForcingConfig,

    /// 时间推进
    #[serde(default)]
    pub run: RunControl,

    /// 输出设置
    #[serde(default)]
    pub output: OutputConfig,
}

/// 并行设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// 是否启用并行计算
    #[serde(default = "default_parallel_enabled")]
    pub enabled: bool,
    /// 并行阈值（节点数超过此值时使用并行）
    #[serde(default = "default_parallel_threshold")]
    pub threshold: usize,
}

fn default_parallel_enabled() -> bool { true }
fn default_parallel_threshold() -> usize { 10_000 }

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_parallel_enabled(),
            threshold: default_parallel_threshold(),
        }
    }
}

impl ParallelConfig {
    /// 串行配置
    pub fn serial() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// 给定节点数时是否走并行路径
    #[inline]
    pub fn use_parallel(&self, n_nodes: usize) -> bool {
        self.enabled && n_nodes >= self.threshold
    }
}

/// 演示网络类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// 单线河道：出口 + n 个内部节点首尾相连
    #[default]
    Chain,
    /// 三节点汇流：两个上游节点汇入一个下游节点
    Converging,
}

/// 网络设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// 网络类型
    #[serde(default)]
    pub kind: NetworkKind,
    /// 内部节点数（仅 Chain）
    #[serde(default = "default_n_nodes")]
    pub n_core_nodes: usize,
    /// 流路长度 [m]
    #[serde(default = "default_spacing")]
    pub node_spacing: f64,
    /// 单元面积 [m²]，缺省为同间距六边形单元面积
    #[serde(default)]
    pub cell_area: Option<f64>,
}

fn default_n_nodes() -> usize { 20 }
fn default_spacing() -> f64 { 1000.0 }

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            kind: NetworkKind::default(),
            n_core_nodes: default_n_nodes(),
            node_spacing: default_spacing(),
            cell_area: None,
        }
    }
}

impl NetworkConfig {
    /// 实际使用的单元面积
    pub fn resolved_cell_area(&self) -> f64 {
        self.cell_area
            .unwrap_or_else(|| 0.5 * 3.0_f64.sqrt() * self.node_spacing * self.node_spacing)
    }
}

/// 初始条件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialConfig {
    /// 初始纵剖面坡度
    #[serde(default = "default_initial_slope")]
    pub slope: f64,
    /// 初始泥沙厚度 [m]
    #[serde(default = "default_initial_sediment")]
    pub sediment_thickness: f64,
}

fn default_initial_slope() -> f64 { 0.01 }
fn default_initial_sediment() -> f64 { 1.0 }

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            slope: default_initial_slope(),
            sediment_thickness: default_initial_sediment(),
        }
    }
}

/// 外部强迫
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForcingConfig {
    /// 构造抬升速率 [m/yr]
    #[serde(default = "default_uplift")]
    pub uplift_rate: f64,
    /// 径流率 [m/yr]，流量 = 径流率 × 汇水面积
    #[serde(default = "default_runoff")]
    pub runoff_rate: f64,
}

fn default_uplift() -> f64 { 1.0e-4 }
fn default_runoff() -> f64 { 10.0 }

impl Default for ForcingConfig {
    fn default() -> Self {
        Self {
            uplift_rate: default_uplift(),
            runoff_rate: default_runoff(),
        }
    }
}

/// 时间推进
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunControl {
    /// 时间步长 [yr]
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// 步数
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,
    /// 日志汇报间隔（步）
    #[serde(default = "default_report_interval")]
    pub report_interval: usize,
}

fn default_dt() -> f64 { 100.0 }
fn default_n_steps() -> usize { 1000 }
fn default_report_interval() -> usize { 100 }

impl Default for RunControl {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            n_steps: default_n_steps(),
            report_interval: default_report_interval(),
        }
    }
}

/// 输出设置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 结束时写出的纵剖面 CSV 路径
    #[serde(default)]
    pub profile_csv: Option<PathBuf>,
}

impl ModelConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        Ok(config)
    }

    /// 从 JSON 字符串解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.eroder.validate()?;

        if self.network.kind == NetworkKind::Chain && self.network.n_core_nodes == 0 {
            return Err(ConfigError::invalid(
                "network.n_core_nodes",
                self.network.n_core_nodes,
                "至少需要一个内部节点",
            ));
        }
        check_positive("network.node_spacing", self.network.node_spacing)?;
        check_positive("network.cell_area", self.network.resolved_cell_area())?;

        check_non_negative("initial.slope", self.initial.slope)?;
        check_non_negative("initial.sediment_thickness", self.initial.sediment_thickness)?;
        check_non_negative("forcing.runoff_rate", self.forcing.runoff_rate)?;
        if !self.forcing.uplift_rate.is_finite() {
            return Err(ConfigError::invalid(
                "forcing.uplift_rate",
                self.forcing.uplift_rate,
                "抬升速率必须为有限值",
            ));
        }

        check_non_negative("run.dt", self.run.dt)?;
        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn check_positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, value, "必须为正"))
    }
}

fn check_non_negative(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, value, "不能为负"))
    }
}
