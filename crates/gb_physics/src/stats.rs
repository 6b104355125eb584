// crates/gb_physics/src/stats.rs

//! 单步统计

use std::fmt;

/// 单步统计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// 时间步长
    pub dt: f64,
    /// 内部节点数
    pub n_core: usize,
    /// 泥沙厚度被截断为零的节点数
    pub n_clamped: usize,
    /// 截断丢弃的泥沙体积 [m³]
    pub discarded_volume: f64,
    /// 泥沙（松散堆积）体积净变化 [m³]
    pub sediment_volume_change: f64,
    /// 泥沙颗粒（实体）体积净变化 [m³]，= (1 - φ) × 堆积体积变化
    pub solid_volume_change: f64,
    /// 离开内部区域的推移质通量 [m³/yr]（排入边界或无受水节点）
    pub boundary_outflux: f64,
    /// 基岩侵蚀体积 [m³]
    pub bedrock_eroded_volume: f64,
    /// 最大 |dH/dt| [m/yr]
    pub max_sediment_rate: f64,
    /// 最大基岩下切速率 [m/yr]
    pub max_bedrock_lowering: f64,
}

impl StepStats {
    /// 是否发生截断
    #[inline]
    pub fn clamped(&self) -> bool {
        self.n_clamped > 0
    }
}

impl fmt::Display for StepStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dt={:.3e} 内部节点={} 截断={} ΔV泥沙={:.4e} m³ 基岩侵蚀={:.4e} m³ 出口通量={:.4e} m³/yr max|dH/dt|={:.3e}",
            self.dt,
            self.n_core,
            self.n_clamped,
            self.sediment_volume_change,
            self.bedrock_eroded_volume,
            self.boundary_outflux,
            self.max_sediment_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_counts() {
        let stats = StepStats {
            dt: 1.0,
            n_core: 3,
            n_clamped: 1,
            ..Default::default()
        };
        let s = stats.to_string();
        assert!(s.contains("内部节点=3"));
        assert!(s.contains("截断=1"));
        assert!(stats.clamped());
    }
}
