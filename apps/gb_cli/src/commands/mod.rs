// apps/gb_cli/src/commands/mod.rs

//! 子命令

pub mod info;
pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use gb_config::ModelConfig;

/// 读取配置文件，未给出时使用默认配置
pub(crate) fn load_config(path: Option<&Path>) -> Result<ModelConfig> {
    match path {
        Some(p) => ModelConfig::from_file(p)
            .with_context(|| format!("无法加载配置文件: {}", p.display())),
        None => Ok(ModelConfig::default()),
    }
}
