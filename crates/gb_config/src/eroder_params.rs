// crates/gb_config/src/eroder_params.rs

//! 砾石-基岩侵蚀器参数
//!
//! 七个物理参数构成一条不可变记录：侵蚀器构造时验证一次，
//! 之后仅在重新配置时再次验证。
//!
//! | 参数 | 符号 | 单位 | 默认值 |
//! |---|---|---|---|
//! | `intermittency_factor` | I | - | 0.02 |
//! | `transport_coefficient` | k_Q | - | 0.041 |
//! | `abrasion_coefficient` | β | 1/L | 0.0 |
//! | `sediment_porosity` | φ | - | 0.35 |
//! | `depth_decay_scale` | H* | L | 1.0 |
//! | `plucking_coefficient` | k_p | 1/L | 1.0e-4 |
//! | `coarse_fraction_from_plucking` | γ | - | 1.0 |

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 侵蚀器物理参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EroderParams {
    /// 间歇因子：造床流量出现的时间比例
    #[serde(default = "default_intermittency")]
    pub intermittency_factor: f64,

    /// 推移质输沙系数
    #[serde(default = "default_transport_coefficient")]
    pub transport_coefficient: f64,

    /// 泥沙磨蚀系数 [1/m]
    #[serde(default)]
    pub abrasion_coefficient: f64,

    /// 泥沙孔隙率
    #[serde(default = "default_porosity")]
    pub sediment_porosity: f64,

    /// 覆盖衰减深度尺度 H* [m]
    #[serde(default = "default_depth_decay_scale")]
    pub depth_decay_scale: f64,

    /// 基岩拔蚀系数 [1/m]
    #[serde(default = "default_plucking_coefficient")]
    pub plucking_coefficient: f64,

    /// 拔蚀产物中粗颗粒比例
    #[serde(default = "default_coarse_fraction")]
    pub coarse_fraction_from_plucking: f64,
}

fn default_intermittency() -> f64 { 0.02 }
fn default_transport_coefficient() -> f64 { 0.041 }
fn default_porosity() -> f64 { 0.35 }
fn default_depth_decay_scale() -> f64 { 1.0 }
fn default_plucking_coefficient() -> f64 { 1.0e-4 }
fn default_coarse_fraction() -> f64 { 1.0 }

impl Default for EroderParams {
    fn default() -> Self {
        Self {
            intermittency_factor: default_intermittency(),
            transport_coefficient: default_transport_coefficient(),
            abrasion_coefficient: 0.0,
            sediment_porosity: default_porosity(),
            depth_decay_scale: default_depth_decay_scale(),
            plucking_coefficient: default_plucking_coefficient(),
            coarse_fraction_from_plucking: default_coarse_fraction(),
        }
    }
}

impl EroderParams {
    /// 仅输运：关闭磨蚀与拔蚀，用于质量守恒检验
    pub fn transport_only() -> Self {
        Self {
            abrasion_coefficient: 0.0,
            plucking_coefficient: 0.0,
            ..Default::default()
        }
    }

    /// 设置磨蚀系数
    pub fn with_abrasion(mut self, beta: f64) -> Self {
        self.abrasion_coefficient = beta;
        self
    }

    /// 设置拔蚀系数
    pub fn with_plucking(mut self, k_p: f64) -> Self {
        self.plucking_coefficient = k_p;
        self
    }

    /// 设置覆盖衰减深度尺度
    pub fn with_depth_decay_scale(mut self, h_star: f64) -> Self {
        self.depth_decay_scale = h_star;
        self
    }

    /// 设置间歇因子
    pub fn with_intermittency(mut self, factor: f64) -> Self {
        self.intermittency_factor = factor;
        self
    }

    /// 验证参数
    ///
    /// - H* 必须 > 0
    /// - I、φ、γ 必须在 [0, 1] 内
    /// - k_Q、β、k_p 必须 ≥ 0
    ///
    /// 所有值都必须有限。
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("intermittency_factor", self.intermittency_factor)?;
        check_fraction("sediment_porosity", self.sediment_porosity)?;
        check_fraction("coarse_fraction_from_plucking", self.coarse_fraction_from_plucking)?;

        check_coefficient("transport_coefficient", self.transport_coefficient)?;
        check_coefficient("abrasion_coefficient", self.abrasion_coefficient)?;
        check_coefficient("plucking_coefficient", self.plucking_coefficient)?;

        let h_star = self.depth_decay_scale;
        if !(h_star.is_finite() && h_star > 0.0) {
            return Err(ConfigError::invalid(
                "depth_decay_scale",
                h_star,
                "覆盖衰减深度尺度必须为正的有限值",
            ));
        }
        Ok(())
    }
}

fn check_fraction(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, value, "比例必须在 [0, 1] 范围内"))
    }
}

fn check_coefficient(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, value, "系数必须为非负有限值"))
    }
}
