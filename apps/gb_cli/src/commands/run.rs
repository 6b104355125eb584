// apps/gb_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 在演示网络上逐步推进侵蚀器：每步先抬升内部节点，再沿固定受水关系
//! 刷新坡度，然后调用 `run_one_step`。

use anyhow::{Context, Result};
use clap::Args;
use gb_config::ParallelConfig;
use gb_physics::GravelBedrockEroder;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::scenario::Scenario;

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 时间步长 [yr]，覆盖配置文件
    #[arg(long)]
    pub dt: Option<f64>,

    /// 步数，覆盖配置文件
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// 纵剖面 CSV 输出路径，覆盖配置文件
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// 强制串行计算
    #[arg(long)]
    pub serial: bool,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== 砾石-基岩侵蚀模拟启动 ===");

    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(dt) = args.dt {
        config.run.dt = dt;
    }
    if let Some(steps) = args.steps {
        config.run.n_steps = steps;
    }
    if args.profile.is_some() {
        config.output.profile_csv = args.profile;
    }
    if args.serial {
        config.parallel = ParallelConfig::serial();
    }
    config.validate().context("配置无效")?;

    let eroder = GravelBedrockEroder::new(config.eroder)
        .context("构造侵蚀器失败")?
        .with_parallel(config.parallel);
    let mut scenario = Scenario::build(&config)?;

    for warning in scenario.network().warnings() {
        warn!("网络: {}", warning);
    }
    info!(
        "网络: {:?}, {} 节点 ({} 内部), λ={} m, Λ={:.1} m²",
        config.network.kind,
        scenario.network().n_nodes(),
        scenario.network().core_nodes().len(),
        config.network.node_spacing,
        config.network.resolved_cell_area(),
    );
    info!(
        "参数: I={}, k_Q={}, β={}, H*={}, k_p={}, 抬升={} m/yr, 径流={} m/yr",
        config.eroder.intermittency_factor,
        config.eroder.transport_coefficient,
        config.eroder.abrasion_coefficient,
        config.eroder.depth_decay_scale,
        config.eroder.plucking_coefficient,
        config.forcing.uplift_rate,
        config.forcing.runoff_rate,
    );

    let dt = config.run.dt;
    let report_interval = config.run.report_interval;
    let start = Instant::now();
    let mut total_clamped = 0usize;
    let mut total_discarded = 0.0;
    let mut total_exported = 0.0;

    info!("开始模拟: {} 步, dt={} yr", config.run.n_steps, dt);

    for step in 1..=config.run.n_steps {
        let stats = scenario.step(&eroder, dt)?;
        total_clamped += stats.n_clamped;
        total_discarded += stats.discarded_volume;
        total_exported += stats.boundary_outflux * dt;

        if report_interval > 0 && step % report_interval == 0 {
            info!(
                "step={} t={:.1} yr: 平均 H={:.4} m, 最高 η={:.3} m, 出口通量={:.4e} m³/yr, 截断={}",
                step,
                scenario.time(),
                scenario.mean_sediment_thickness(),
                scenario.max_elevation(),
                stats.boundary_outflux,
                stats.n_clamped,
            );
        }
    }

    let elapsed = start.elapsed();

    info!("=== 模拟完成 ===");
    info!("模拟时间: {:.1} yr", scenario.time());
    info!("计算时间: {:.3} s", elapsed.as_secs_f64());
    info!("出口输出泥沙: {:.4e} m³", total_exported);
    if total_clamped > 0 {
        warn!(
            "累计 {} 次泥沙厚度截断，丢弃 {:.4e} m³，可考虑减小 dt",
            total_clamped, total_discarded
        );
    }

    if let Some(path) = &config.output.profile_csv {
        scenario.write_profile(path)?;
        info!("纵剖面已写出: {}", path.display());
    }

    Ok(())
}
