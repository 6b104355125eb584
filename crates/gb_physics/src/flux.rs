// crates/gb_physics/src/flux.rs

//! 通量计算器
//!
//! 对每个内部节点，由当前状态和外部给定的流量、坡度计算：
//! 输沙能力、受覆盖限制的实际出流、泥沙磨蚀损失、基岩磨蚀与拔蚀速率。
//! 节点之间没有数据依赖，可直接并行映射。
//!
//! # 通量公式
//!
//! ```text
//! α      = exp(-H / H*)
//! T      = k_Q · I · Q · S^(7/6)
//! Qout   = (1 - α) · T
//! A      = β · λ · (Qin + Qout) / 2
//! Rabr   = (A / Λ) · α
//! P      = k_p · I · Q · S^(7/6) · α · (λ / Λ)
//! Qpluck = γ · P · Λ
//! ```
//!
//! 输入非负时所有量非负。S^(7/6) 只在 S ≥ 0 的实数分支上求值。

use gb_config::EroderParams;
use rayon::prelude::*;

/// 坡度指数
pub const SLOPE_EXPONENT: f64 = 7.0 / 6.0;

/// 流量-坡度剪切代理量 Q · S^(7/6)
///
/// 零坡度或零流量时为 0。
#[inline]
pub fn shear_proxy(discharge: f64, slope: f64) -> f64 {
    if discharge <= 0.0 || slope <= 0.0 {
        0.0
    } else {
        discharge * slope.powf(SLOPE_EXPONENT)
    }
}

/// 单节点输运量（与上游入流无关的部分）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeTransport {
    /// 基岩出露比例 α
    pub exposure_fraction: f64,
    /// 输沙能力 T
    pub capacity: f64,
    /// 实际出流 Qout
    pub outflux: f64,
    /// 拔蚀下切速率 P
    pub plucking_rate: f64,
}

/// 单节点磨蚀量（依赖上游入流）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeAbrasion {
    /// 泥沙磨蚀损失 A
    pub sediment_loss: f64,
    /// 基岩磨蚀下切速率 Rabr
    pub bedrock_rate: f64,
}

/// 通量计算器
///
/// 持有参数记录的副本，所有方法为纯函数。
#[derive(Debug, Clone, Copy)]
pub struct FluxEvaluator {
    params: EroderParams,
}

impl FluxEvaluator {
    /// 创建计算器，参数应已通过验证
    pub fn new(params: EroderParams) -> Self {
        Self { params }
    }

    /// 参数记录
    #[inline]
    pub fn params(&self) -> &EroderParams {
        &self.params
    }

    /// 基岩出露比例 α = exp(-H / H*)
    #[inline]
    pub fn exposure_fraction(&self, sediment_thickness: f64) -> f64 {
        (-sediment_thickness / self.params.depth_decay_scale).exp()
    }

    /// 无覆盖限制的输沙能力 T
    #[inline]
    pub fn transport_capacity(&self, discharge: f64, slope: f64) -> f64 {
        self.params.transport_coefficient
            * self.params.intermittency_factor
            * shear_proxy(discharge, slope)
    }

    /// 拔蚀下切速率 P
    #[inline]
    pub fn plucking_rate(
        &self,
        discharge: f64,
        slope: f64,
        exposure_fraction: f64,
        link_length: f64,
        cell_area: f64,
    ) -> f64 {
        self.params.plucking_coefficient
            * self.params.intermittency_factor
            * shear_proxy(discharge, slope)
            * exposure_fraction
            * (link_length / cell_area)
    }

    /// 拔蚀产生的粗颗粒体积 Qpluck = γ · P · Λ
    #[inline]
    pub fn pluck_supply(&self, plucking_rate: f64, cell_area: f64) -> f64 {
        self.params.coarse_fraction_from_plucking * plucking_rate * cell_area
    }

    /// 单节点输运量
    #[inline]
    pub fn node_transport(
        &self,
        discharge: f64,
        slope: f64,
        sediment_thickness: f64,
        link_length: f64,
        cell_area: f64,
    ) -> NodeTransport {
        let alpha = self.exposure_fraction(sediment_thickness);
        let capacity = self.transport_capacity(discharge, slope);
        NodeTransport {
            exposure_fraction: alpha,
            capacity,
            outflux: (1.0 - alpha) * capacity,
            plucking_rate: self.plucking_rate(discharge, slope, alpha, link_length, cell_area),
        }
    }

    /// 单节点磨蚀量，入流与出流在流路上取平均
    #[inline]
    pub fn node_abrasion(
        &self,
        influx: f64,
        outflux: f64,
        exposure_fraction: f64,
        link_length: f64,
        cell_area: f64,
    ) -> NodeAbrasion {
        let sediment_loss =
            self.params.abrasion_coefficient * link_length * 0.5 * (influx + outflux);
        NodeAbrasion {
            sediment_loss,
            bedrock_rate: sediment_loss / cell_area * exposure_fraction,
        }
    }

    /// 批量计算内部节点输运量
    ///
    /// 返回值与 `core_nodes` 一一对应。
    pub fn transport_batch(
        &self,
        core_nodes: &[usize],
        discharge: &[f64],
        slope: &[f64],
        sediment_thickness: &[f64],
        link_lengths: &[f64],
        cell_areas: &[f64],
        parallel: bool,
    ) -> Vec<NodeTransport> {
        let eval = |&i: &usize| {
            self.node_transport(
                discharge[i],
                slope[i],
                sediment_thickness[i],
                link_lengths[i],
                cell_areas[i],
            )
        };
        if parallel {
            core_nodes.par_iter().map(eval).collect()
        } else {
            core_nodes.iter().map(eval).collect()
        }
    }

    /// 批量计算内部节点磨蚀量
    pub fn abrasion_batch(
        &self,
        core_nodes: &[usize],
        transport: &[NodeTransport],
        influx: &[f64],
        link_lengths: &[f64],
        cell_areas: &[f64],
        parallel: bool,
    ) -> Vec<NodeAbrasion> {
        let eval = |(&i, t): (&usize, &NodeTransport)| {
            self.node_abrasion(
                influx[i],
                t.outflux,
                t.exposure_fraction,
                link_lengths[i],
                cell_areas[i],
            )
        };
        if parallel {
            core_nodes.par_iter().zip(transport.par_iter()).map(eval).collect()
        } else {
            core_nodes.iter().zip(transport.iter()).map(eval).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1e-300)
    }

    #[test]
    fn test_exposure_limits() {
        let eval = FluxEvaluator::new(EroderParams::default());
        assert_eq!(eval.exposure_fraction(0.0), 1.0);
        assert!(eval.exposure_fraction(50.0) < 1e-20);
        assert!(approx_eq(eval.exposure_fraction(1.0), (-1.0f64).exp()));
    }

    #[test]
    fn test_zero_slope_and_discharge() {
        let eval = FluxEvaluator::new(EroderParams::default());
        assert_eq!(eval.transport_capacity(1.0e6, 0.0), 0.0);
        assert_eq!(eval.transport_capacity(0.0, 0.1), 0.0);
        assert_eq!(eval.plucking_rate(1.0e6, 0.0, 1.0, 1000.0, 1.0e6), 0.0);
    }

    #[test]
    fn test_capacity_formula() {
        let eval = FluxEvaluator::new(EroderParams::default());
        let t = eval.transport_capacity(1.0e7, 0.01);
        let expected = 0.041 * 0.02 * 1.0e7 * 0.01f64.powf(7.0 / 6.0);
        assert!(approx_eq(t, expected));
    }

    #[test]
    fn test_bare_bed_has_no_outflux() {
        let eval = FluxEvaluator::new(EroderParams::default());
        let t = eval.node_transport(1.0e7, 0.01, 0.0, 1000.0, 866_025.4);
        assert_eq!(t.exposure_fraction, 1.0);
        assert_eq!(t.outflux, 0.0);
        assert!(t.capacity > 0.0);
        assert!(t.plucking_rate > 0.0);
    }

    #[test]
    fn test_thick_cover_saturates() {
        let eval = FluxEvaluator::new(EroderParams::default());
        let t = eval.node_transport(1.0e7, 0.01, 100.0, 1000.0, 866_025.4);
        assert!(approx_eq(t.outflux, t.capacity));
        assert!(t.plucking_rate < 1e-40);
    }

    #[test]
    fn test_outflux_monotone_in_cover() {
        let eval = FluxEvaluator::new(EroderParams::default());
        let mut previous = 0.0;
        for k in 0..50 {
            let h = 0.1 * k as f64;
            let q = eval.node_transport(5.0e6, 0.02, h, 1000.0, 1.0e6).outflux;
            assert!(q >= previous);
            previous = q;
        }
    }

    #[test]
    fn test_abrasion_formula() {
        let params = EroderParams::default().with_abrasion(1.0e-4);
        let eval = FluxEvaluator::new(params);
        let a = eval.node_abrasion(2.0, 4.0, 0.5, 1000.0, 1.0e6);
        assert!(approx_eq(a.sediment_loss, 1.0e-4 * 1000.0 * 3.0));
        assert!(approx_eq(a.bedrock_rate, a.sediment_loss / 1.0e6 * 0.5));
    }

    #[test]
    fn test_pluck_supply() {
        let params = EroderParams {
            coarse_fraction_from_plucking: 0.25,
            ..Default::default()
        };
        let eval = FluxEvaluator::new(params);
        assert!(approx_eq(eval.pluck_supply(2.0e-4, 1.0e6), 0.25 * 2.0e-4 * 1.0e6));
    }

    #[test]
    fn test_batch_parallel_matches_serial() {
        let eval = FluxEvaluator::new(EroderParams::default().with_abrasion(1.0e-4));
        let n = 64;
        let core: Vec<usize> = (1..n).collect();
        let q: Vec<f64> = (0..n).map(|i| 1.0e5 * i as f64).collect();
        let s: Vec<f64> = (0..n).map(|i| 0.001 * (i % 7) as f64).collect();
        let h: Vec<f64> = (0..n).map(|i| 0.05 * (i % 11) as f64).collect();
        let len = vec![1000.0; n];
        let area = vec![1.0e6; n];

        let serial = eval.transport_batch(&core, &q, &s, &h, &len, &area, false);
        let parallel = eval.transport_batch(&core, &q, &s, &h, &len, &area, true);
        assert_eq!(serial, parallel);

        let qin = vec![1.0; n];
        let a_serial = eval.abrasion_batch(&core, &serial, &qin, &len, &area, false);
        let a_parallel = eval.abrasion_batch(&core, &serial, &qin, &len, &area, true);
        assert_eq!(a_serial, a_parallel);
    }
}
