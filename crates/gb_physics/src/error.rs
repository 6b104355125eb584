// crates/gb_physics/src/error.rs

//! 侵蚀器错误类型
//!
//! - 配置错误：构造或重新配置时参数越界
//! - 前置条件错误：单步调用时字段缺失、长度不符、数值非法或 dt 非法
//!
//! 零坡度、零流量不是错误，只产生零通量。

use gb_config::ConfigError;
use gb_foundation::{GbError, ValidationReport};

/// 侵蚀器结果类型
pub type EroderResult<T> = Result<T, EroderError>;

/// 侵蚀器错误
#[derive(Debug, thiserror::Error)]
pub enum EroderError {
    /// 参数配置错误
    #[error("参数配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 时间步长无效
    #[error("时间步长无效: dt={0}，必须为非负有限值")]
    InvalidTimeStep(f64),

    /// 缺少必需字段
    #[error("缺少必需字段: {0}")]
    MissingField(&'static str),

    /// 字段与网络不一致
    #[error("字段 {name} 长度为 {actual}，网络节点数为 {expected}")]
    FieldSize {
        /// 字段名
        name: &'static str,
        /// 网络节点数
        expected: usize,
        /// 字段长度
        actual: usize,
    },

    /// 输入数据非法
    #[error("输入数据非法:\n{0}")]
    InvalidState(ValidationReport),

    /// 基础层错误
    #[error(transparent)]
    Foundation(#[from] GbError),
}

impl EroderError {
    /// 是否为配置错误
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// 是否为前置条件错误
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeStep(_)
                | Self::MissingField(_)
                | Self::FieldSize { .. }
                | Self::InvalidState(_)
        )
    }
}
