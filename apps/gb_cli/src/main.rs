// apps/gb_cli/src/main.rs

//! 砾石-基岩侵蚀器命令行界面
//!
//! 在演示网络上驱动侵蚀器，并提供配置验证与默认值查看。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 只通过 `ModelConfig` 读取设置
//! - 汇流驱动（坡度、流量、抬升）在 `scenario` 中完成，侵蚀器本身不做汇流

mod commands;
mod scenario;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// 砾石-基岩河道侵蚀模拟命令行工具
#[derive(Parser)]
#[command(name = "gb_cli")]
#[command(author = "MariHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gravel-bedrock river eroder driver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行演示模拟
    Run(commands::run::RunArgs),
    /// 显示默认参数与字段
    Info(commands::info::InfoArgs),
    /// 验证配置文件
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
