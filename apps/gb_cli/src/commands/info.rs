// apps/gb_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示默认参数、字段约定，或写出默认配置文件。

use anyhow::{Context, Result};
use clap::Args;
use gb_config::ModelConfig;
use gb_physics::fields::FieldRole;
use gb_physics::GRAVEL_BEDROCK_FIELDS;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示该配置文件的实际取值（缺省为默认配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 显示字段约定
    #[arg(long)]
    pub fields: bool,

    /// 将默认配置写入文件
    #[arg(long, value_name = "PATH")]
    pub write_default: Option<PathBuf>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== 砾石-基岩侵蚀器信息 ===");

    if let Some(path) = &args.write_default {
        ModelConfig::default()
            .save_to_file(path)
            .with_context(|| format!("无法写出默认配置: {}", path.display()))?;
        println!("默认配置已写出: {}", path.display());
        return Ok(());
    }

    let config = super::load_config(args.config.as_deref())?;
    print_config(&config)?;

    if args.fields {
        println!();
        print_fields();
    }

    Ok(())
}

fn print_config(config: &ModelConfig) -> Result<()> {
    println!("=== 侵蚀器参数 ===");
    let p = &config.eroder;
    println!("间歇因子 I:              {}", p.intermittency_factor);
    println!("输沙系数 k_Q:            {}", p.transport_coefficient);
    println!("磨蚀系数 β:              {} 1/m", p.abrasion_coefficient);
    println!("泥沙孔隙率 φ:            {}", p.sediment_porosity);
    println!("覆盖衰减深度 H*:         {} m", p.depth_decay_scale);
    println!("拔蚀系数 k_p:            {} 1/m", p.plucking_coefficient);
    println!("拔蚀粗颗粒比例 γ:        {}", p.coarse_fraction_from_plucking);
    println!(
        "并行: {} (阈值 {} 节点)",
        if config.parallel.enabled { "启用" } else { "禁用" },
        config.parallel.threshold
    );

    println!("\n=== 完整配置 (JSON) ===");
    let json = serde_json::to_string_pretty(config).context("序列化配置失败")?;
    println!("{}", json);
    Ok(())
}

fn print_fields() {
    println!("=== 字段约定 ===");
    for spec in GRAVEL_BEDROCK_FIELDS {
        let role = match spec.role {
            FieldRole::Input => "输入",
            FieldRole::State => "状态",
            FieldRole::Output => "输出",
        };
        println!(
            "  [{}] {:<45} {:<5} {}",
            role, spec.name, spec.unit, spec.description
        );
    }
}
