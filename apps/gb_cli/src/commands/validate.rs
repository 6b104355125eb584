// apps/gb_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 解析并验证配置文件，构造演示网络检查拓扑，并对可运行但
//! 可能不符合预期的设置给出警告。

use anyhow::{bail, Result};
use clap::Args;
use gb_config::{ModelConfig, NetworkKind};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::scenario::Scenario;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== 配置验证 ===");
    println!("检查配置文件: {}", args.config.display());

    let mut result = ValidationResult::default();
    match ModelConfig::from_file(&args.config) {
        Ok(config) => {
            println!("  ✓ 解析与取值范围检查通过");
            check_settings(&config, &mut result);
            check_network(&config, &mut result);
        }
        Err(e) => result.add_error(e.to_string()),
    }

    print_validation_result(&result, args.strict)
}

fn check_settings(config: &ModelConfig, result: &mut ValidationResult) {
    let p = &config.eroder;
    if p.intermittency_factor == 0.0 || p.transport_coefficient == 0.0 {
        result.add_warning("I 或 k_Q 为 0，不会发生推移质输运");
    }
    if config.initial.sediment_thickness == 0.0 && p.plucking_coefficient == 0.0 {
        result.add_warning("初始无泥沙且拔蚀关闭，河床不会演化");
    }
    if config.forcing.runoff_rate == 0.0 {
        result.add_warning("径流率为 0，所有通量为零");
    }
    if config.run.dt == 0.0 {
        result.add_warning("dt = 0，状态不会改变");
    }
    if config.run.report_interval == 0 {
        result.add_warning("report_interval = 0，运行过程中不输出进度");
    }
    if config.network.kind == NetworkKind::Converging
        && config.network.n_core_nodes != gb_config::NetworkConfig::default().n_core_nodes
    {
        result.add_warning("汇流网络固定为 3 个内部节点，n_core_nodes 被忽略");
    }
}

fn check_network(config: &ModelConfig, result: &mut ValidationResult) {
    match Scenario::build(config) {
        Ok(scenario) => {
            let net = scenario.network();
            println!(
                "  ✓ 网络有效: {} 节点 ({} 内部)",
                net.n_nodes(),
                net.core_nodes().len()
            );
            for w in net.warnings() {
                result.add_warning(w.to_string());
            }
        }
        Err(e) => result.add_error(format!("{:#}", e)),
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        let mut result = ValidationResult::default();
        let config = ModelConfig::default();
        check_settings(&config, &mut result);
        check_network(&config, &mut result);
        assert!(result.is_ok_strict(), "{:?}", result.warnings);
    }

    #[test]
    fn test_zero_runoff_warns() {
        let mut config = ModelConfig::default();
        config.forcing.runoff_rate = 0.0;
        let mut result = ValidationResult::default();
        check_settings(&config, &mut result);
        assert!(result.is_ok());
        assert!(!result.is_ok_strict());
    }

    #[test]
    fn test_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "eroder": { "sediment_porosity": 1.5 } }"#).unwrap();
        let args = ValidateArgs {
            config: path,
            strict: false,
        };
        assert!(execute(args).is_err());
    }
}
