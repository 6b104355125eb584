// crates/gb_foundation/src/validation.rs

//! 运行时验证工具
//!
//! 提供验证报告和错误/警告类型，用于一次性收集节点数据的全部问题，
//! 而不是在第一个错误处中断。
//!
//! # 示例
//!
//! ```
//! use gb_foundation::validation::{check_range, ValidationReport};
//!
//! let soil_depth = [0.5, -1.0];
//! let mut report = ValidationReport::new();
//! for (i, &h) in soil_depth.iter().enumerate() {
//!     check_range(&mut report, "soil__depth", i, h, 0.0, f64::INFINITY);
//! }
//! assert_eq!(report.error_count(), 1);
//! ```

use std::fmt;

/// 验证报告
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// 错误列表
    pub errors: Vec<ValidationError>,
    /// 警告列表
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// 创建空的验证报告
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加错误
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 错误数量
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 警告数量
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// 是否通过（无错误）
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// 有错误时转为 `Err`，否则返回警告列表
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ValidationReport> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(self.warnings)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "验证报告:")?;
        writeln!(f, "  错误: {} 个", self.error_count())?;
        writeln!(f, "  警告: {} 个", self.warning_count())?;

        if self.has_errors() {
            writeln!(f, "\n错误详情:")?;
            for (i, err) in self.errors.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, err)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\n警告详情:")?;
            for (i, warn) in self.warnings.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, warn)?;
            }
        }

        Ok(())
    }
}

/// 验证错误类型
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// 非有限值
    NonFinite {
        /// 字段名称
        field: &'static str,
        /// 所在节点 ID
        node_id: usize,
        /// 非有限的数值
        value: f64,
    },
    /// 数据超出范围
    OutOfRange {
        /// 字段名称
        field: &'static str,
        /// 所在节点 ID
        node_id: usize,
        /// 实际值
        value: f64,
        /// 下界
        min: f64,
        /// 上界
        max: f64,
    },
    /// 拓扑错误
    TopologyError {
        /// 错误描述
        message: String,
        /// 可选的节点 ID
        node_id: Option<usize>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite {
                field,
                node_id,
                value,
            } => {
                write!(f, "节点{}: 字段{}={} (非有限值)", node_id, field, value)
            }
            Self::OutOfRange {
                field,
                node_id,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "节点{}: 字段{}={} 超出范围[{}, {}]",
                    node_id, field, value, min, max
                )
            }
            Self::TopologyError { message, node_id } => {
                if let Some(id) = node_id {
                    write!(f, "节点{}: 拓扑错误: {}", id, message)
                } else {
                    write!(f, "拓扑错误: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 验证警告类型
#[derive(Debug, Clone)]
pub enum ValidationWarning {
    /// 拓扑可疑但可计算（如内部节点无受水节点）
    Topology {
        /// 警告描述
        message: String,
        /// 节点 ID
        node_id: usize,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topology { message, node_id } => {
                write!(f, "节点{}: {}", node_id, message)
            }
        }
    }
}

// ============================================================================
// 验证辅助函数
// ============================================================================

/// 检查值是否有限
pub fn check_finite(
    report: &mut ValidationReport,
    field: &'static str,
    node_id: usize,
    value: f64,
) -> bool {
    if !value.is_finite() {
        report.add_error(ValidationError::NonFinite {
            field,
            node_id,
            value,
        });
        false
    } else {
        true
    }
}

/// 检查值是否在范围内
///
/// NaN 不满足任何比较，按越界处理。
pub fn check_range(
    report: &mut ValidationReport,
    field: &'static str,
    node_id: usize,
    value: f64,
    min: f64,
    max: f64,
) -> bool {
    if value >= min && value <= max {
        true
    } else {
        report.add_error(ValidationError::OutOfRange {
            field,
            node_id,
            value,
            min,
            max,
        });
        false
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_report_new() {
        let report = ValidationReport::new();
        assert!(!report.has_errors());
        assert_eq!(report.warning_count(), 0);
        assert!(report.is_valid());
    }

    #[test]
    fn test_warning_keeps_report_valid() {
        let mut report = ValidationReport::new();
        report.add_warning(ValidationWarning::Topology {
            message: "内部节点没有受水节点".into(),
            node_id: 3,
        });
        assert_eq!(report.warning_count(), 1);
        assert!(report.is_valid());
        let warnings = report.into_result().unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_errors_fail_report() {
        let mut report = ValidationReport::new();
        report.add_error(ValidationError::TopologyError {
            message: "环路".into(),
            node_id: Some(1),
        });
        report.add_warning(ValidationWarning::Topology {
            message: "内部节点没有受水节点".into(),
            node_id: 0,
        });
        assert_eq!(report.error_count(), 1);
        let report = report.into_result().unwrap_err();
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_check_finite() {
        let mut report = ValidationReport::new();

        assert!(check_finite(&mut report, "h", 0, 1.0));
        assert!(!report.has_errors());

        assert!(!check_finite(&mut report, "h", 0, f64::NAN));
        assert!(report.has_errors());
    }

    #[test]
    fn test_check_range() {
        let mut report = ValidationReport::new();

        assert!(check_range(&mut report, "h", 0, 5.0, 0.0, 10.0));
        assert!(!report.has_errors());

        assert!(!check_range(&mut report, "h", 0, -1.0, 0.0, 10.0));
        assert!(!check_range(&mut report, "h", 1, f64::NAN, 0.0, 10.0));
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::NonFinite {
            field: "soil__depth",
            node_id: 42,
            value: f64::NAN,
        };
        let s = format!("{}", err);
        assert!(s.contains("42"));
        assert!(s.contains("soil__depth"));
    }

    #[test]
    fn test_report_display() {
        let mut report = ValidationReport::new();
        report.add_error(ValidationError::TopologyError {
            message: "test error".into(),
            node_id: None,
        });
        report.add_warning(ValidationWarning::Topology {
            message: "test warning".into(),
            node_id: 2,
        });

        let s = format!("{}", report);
        assert!(s.contains("错误: 1 个"));
        assert!(s.contains("警告: 1 个"));
    }
}
