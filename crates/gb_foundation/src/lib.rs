// crates/gb_foundation/src/lib.rs

//! Gravel-Bedrock Foundation Layer
//!
//! 基础层，提供整个工作区共享的错误类型与验证工具。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`validation`]: 运行时验证报告
//!
//! # 示例
//!
//! ```
//! use gb_foundation::error::{GbError, GbResult};
//!
//! fn check_receivers(receivers: &[Option<usize>], n_nodes: usize) -> GbResult<()> {
//!     GbError::check_size("receivers", n_nodes, receivers.len())
//! }
//!
//! assert!(check_receivers(&[None, Some(0)], 2).is_ok());
//! assert!(check_receivers(&[None], 2).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod validation;

// 重导出常用类型
pub use error::{GbError, GbResult};
pub use validation::{ValidationError, ValidationReport, ValidationWarning};

