// crates/gb_physics/tests/cover_feedback.rs

//! 泥沙覆盖反馈测试
//!
//! 三节点汇流网络：两个上游单元（面积 ≈ 866 025 m²）汇入一个下游单元，
//! 流量与汇水面积成正比，坡度均为 0.01。
//!
//! # 测试覆盖
//!
//! - 充足覆盖时出流比等于流量比 3:1
//! - H = H* 时出流为充足覆盖值的 (1 - e⁻¹) 倍
//! - H = 0 时出流为零
//! - 覆盖加厚时出流不减、出露比例与拔蚀不增

use gb_physics::fields::names;
use gb_physics::{DrainageNetwork, EroderParams, GravelBedrockEroder, NodeFields};

// ============================================================================
// 测试辅助函数
// ============================================================================

const CELL_AREA: f64 = 866_025.403_784_438_6;
const SPACING: f64 = 1000.0;
const SLOPE: f64 = 0.01;

fn rel_close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs())
}

/// 节点 0 为出口；节点 1 汇集节点 2、3
fn converging_state(h: f64) -> (DrainageNetwork, NodeFields) {
    let net = DrainageNetwork::converging(SPACING, CELL_AREA).unwrap();
    let mut fields = NodeFields::new(net.n_nodes());
    fields
        .add_field(
            names::TOPOGRAPHIC_ELEVATION,
            vec![0.0, 10.0 + h, 20.0 + h, 20.0 + h],
        )
        .unwrap();
    fields.add_field(names::SOIL_DEPTH, vec![0.0, h, h, h]).unwrap();
    // 径流率 1 m/yr：流量 = 汇水面积
    fields
        .add_field(
            names::DISCHARGE,
            vec![0.0, 3.0 * CELL_AREA, CELL_AREA, CELL_AREA],
        )
        .unwrap();
    fields.add_constant(names::STEEPEST_SLOPE, SLOPE).unwrap();
    (net, fields)
}

fn outflux_at(h: f64) -> Vec<f64> {
    let (net, mut fields) = converging_state(h);
    let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
    eroder.run_one_step(&net, &mut fields, 0.0).unwrap();
    fields.get(names::SEDIMENT_OUTFLUX).unwrap().to_vec()
}

// ============================================================================
// 测试
// ============================================================================

/// 充足覆盖：出流比等于流量比
#[test]
fn test_ample_cover_outflux_ratio() {
    let qout = outflux_at(100.0);
    assert!(qout[2] > 0.0);
    assert!(rel_close(qout[1] / qout[2], 3.0, 1e-12));
    assert!(rel_close(qout[1] / qout[3], 3.0, 1e-12));
}

/// 充足覆盖：出流达到输沙能力
#[test]
fn test_ample_cover_reaches_capacity() {
    let (net, mut fields) = converging_state(100.0);
    let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
    eroder.run_one_step(&net, &mut fields, 0.0).unwrap();

    let qout = fields.get(names::SEDIMENT_OUTFLUX).unwrap();
    let cap = fields.get(names::TRANSPORT_CAPACITY).unwrap();
    for i in 1..4 {
        assert!(rel_close(qout[i], cap[i], 1e-15));
    }
    let expected = 0.041 * 0.02 * CELL_AREA * SLOPE.powf(7.0 / 6.0);
    assert!(rel_close(cap[2], expected, 1e-12));
}

/// H = H*：出流为 (1 - e⁻¹) 倍
#[test]
fn test_cover_at_decay_scale() {
    let ample = outflux_at(100.0);
    let partial = outflux_at(1.0);
    let factor = 1.0 - (-1.0f64).exp();
    for i in 1..4 {
        assert!(rel_close(partial[i], factor * ample[i], 1e-12));
    }
}

/// 裸床：出流严格为零，拔蚀仍然进行
#[test]
fn test_bare_bed_zero_outflux() {
    let (net, mut fields) = converging_state(0.0);
    let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
    eroder.run_one_step(&net, &mut fields, 0.0).unwrap();

    assert!(fields
        .get(names::SEDIMENT_OUTFLUX)
        .unwrap()
        .iter()
        .all(|&q| q == 0.0));
    assert!(fields
        .get(names::SEDIMENT_INFLUX)
        .unwrap()
        .iter()
        .all(|&q| q == 0.0));
    assert_eq!(fields.get(names::EXPOSURE_FRACTION).unwrap()[1], 1.0);
    assert!(fields.get(names::PLUCKING_RATE).unwrap()[1] > 0.0);
}

/// 覆盖加厚：出流不减，出露比例与拔蚀不增
#[test]
fn test_cover_monotonicity() {
    let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
    let mut last_qout = 0.0;
    let mut last_alpha = 1.0;
    let mut last_pluck = f64::INFINITY;
    for k in 0..40 {
        let h = 0.25 * k as f64;
        let (net, mut fields) = converging_state(h);
        eroder.run_one_step(&net, &mut fields, 0.0).unwrap();

        let qout = fields.get(names::SEDIMENT_OUTFLUX).unwrap()[1];
        let alpha = fields.get(names::EXPOSURE_FRACTION).unwrap()[1];
        let pluck = fields.get(names::PLUCKING_RATE).unwrap()[1];
        assert!(qout >= last_qout);
        assert!(alpha <= last_alpha);
        assert!(pluck <= last_pluck);
        (last_qout, last_alpha, last_pluck) = (qout, alpha, pluck);
    }
}

/// 零坡度：所有通量与速率为零，不报错
#[test]
fn test_zero_slope_is_not_an_error() {
    let (net, mut fields) = converging_state(1.0);
    fields.get_mut(names::STEEPEST_SLOPE).unwrap().fill(0.0);
    let eroder = GravelBedrockEroder::new(EroderParams::default().with_abrasion(1.0e-3)).unwrap();
    let stats = eroder.run_one_step(&net, &mut fields, 100.0).unwrap();

    for name in [
        names::SEDIMENT_OUTFLUX,
        names::PLUCKING_RATE,
        names::ABRASION_LOSS,
        names::SEDIMENT_RATE_OF_CHANGE,
    ] {
        assert!(fields.get(name).unwrap().iter().all(|&x| x == 0.0), "{}", name);
    }
    assert_eq!(stats.sediment_volume_change, 0.0);
}
