// crates/gb_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `GbError` 枚举和 `GbResult` 类型别名。物理计算相关的错误在
//! `gb_physics` 中扩展，配置文件相关的错误在 `gb_config` 中定义。
//!
//! # 示例
//!
//! ```
//! use gb_foundation::error::{GbError, GbResult};
//!
//! fn check_areas(areas: &[f64], n_nodes: usize) -> GbResult<()> {
//!     GbError::check_size("cell_areas", n_nodes, areas.len())
//! }
//!
//! assert!(check_areas(&[1.0, 2.0], 2).is_ok());
//! assert!(check_areas(&[1.0], 2).is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type GbResult<T> = Result<T, GbError>;

/// 基础错误类型
#[derive(Error, Debug)]
pub enum GbError {
    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: String,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 无效拓扑（受水网络）
    #[error("无效的网络拓扑: {message}")]
    InvalidTopology {
        /// 具体错误信息
        message: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl GbError {
    /// 数组大小不匹配
    pub fn size_mismatch(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// 无效拓扑
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &str, expected: usize, actual: usize) -> GbResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_size() {
        assert!(GbError::check_size("soil__depth", 10, 10).is_ok());
        let err = GbError::check_size("soil__depth", 10, 5).unwrap_err();
        assert!(matches!(err, GbError::SizeMismatch { expected: 10, actual: 5, .. }));
        assert!(err.to_string().contains("soil__depth"));
    }

    #[test]
    fn test_topology_display() {
        let err = GbError::invalid_topology("受水关系存在环路");
        assert!(err.to_string().contains("网络拓扑"));
        assert!(err.to_string().contains("环路"));
    }
}
