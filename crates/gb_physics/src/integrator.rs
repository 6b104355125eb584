// crates/gb_physics/src/integrator.rs

//! 质量平衡积分器
//!
//! 对内部节点执行一次显式前向 Euler 更新：
//!
//! ```text
//! dH/dt  = (Qin - Qout + Qpluck - A) / Λ
//! H      ← max(0, H + dt · dH/dt)
//! dηb/dt = -(P + Rabr)
//! ηb     ← ηb + dt · dηb/dt
//! η      ← ηb + H
//! ```
//!
//! H 被截断为零时，不足部分直接丢弃，不从基岩中扣除。
//! dt = 0 时状态保持逐位不变。

use tracing::trace;

use crate::network::DrainageNetwork;

/// 可变地形状态视图
pub struct TopographyMut<'a> {
    /// 地表高程 η
    pub elevation: &'a mut [f64],
    /// 泥沙厚度 H
    pub sediment_thickness: &'a mut [f64],
    /// 基岩高程 ηb
    pub bedrock_elevation: &'a mut [f64],
}

/// 单次积分汇总
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegrationSummary {
    /// 被截断为零的节点数
    pub n_clamped: usize,
    /// 截断丢弃的泥沙体积 [m³]
    pub discarded_volume: f64,
    /// 泥沙体积净变化 [m³]
    pub sediment_volume_change: f64,
    /// 基岩侵蚀体积 [m³]
    pub bedrock_eroded_volume: f64,
}

/// 泥沙厚度变化率
#[inline]
pub fn sediment_rate(
    influx: f64,
    outflux: f64,
    pluck_supply: f64,
    abrasion_loss: f64,
    cell_area: f64,
) -> f64 {
    (influx - outflux + pluck_supply - abrasion_loss) / cell_area
}

/// 基岩高程变化率
#[inline]
pub fn bedrock_rate(plucking_rate: f64, abrasion_rate: f64) -> f64 {
    -(plucking_rate + abrasion_rate)
}

/// 质量平衡积分器
#[derive(Debug, Clone, Copy, Default)]
pub struct MassBalanceIntegrator;

impl MassBalanceIntegrator {
    /// 应用一个显式时间步
    ///
    /// `sediment_rates` 与 `bedrock_rates` 按节点索引排列，只读取内部节点。
    pub fn apply(
        &self,
        network: &DrainageNetwork,
        sediment_rates: &[f64],
        bedrock_rates: &[f64],
        topo: &mut TopographyMut<'_>,
        dt: f64,
    ) -> IntegrationSummary {
        let mut summary = IntegrationSummary::default();
        if dt == 0.0 {
            return summary;
        }

        let areas = network.cell_areas();
        for &i in network.core_nodes() {
            let h_old = topo.sediment_thickness[i];
            let h_trial = h_old + dt * sediment_rates[i];
            let h_new = if h_trial < 0.0 {
                summary.n_clamped += 1;
                summary.discarded_volume += -h_trial * areas[i];
                trace!(node = i, h_trial, "泥沙厚度截断为零");
                0.0
            } else {
                h_trial
            };
            let db = dt * bedrock_rates[i];

            topo.sediment_thickness[i] = h_new;
            topo.bedrock_elevation[i] += db;
            topo.elevation[i] = topo.bedrock_elevation[i] + h_new;

            summary.sediment_volume_change += (h_new - h_old) * areas[i];
            summary.bedrock_eroded_volume -= db * areas[i];
        }
        summary
    }
}
