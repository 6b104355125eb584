// crates/gb_physics/tests/preconditions.rs

//! 前置条件与错误分类测试
//!
//! 覆盖网络构造错误、单步调用的前置条件错误，以及失败时字段保持不变。

use gb_foundation::GbError;
use gb_physics::fields::names;
use gb_physics::{
    DrainageNetwork, EroderError, EroderParams, GravelBedrockEroder, NodeFields, NodeStatus,
};

fn ready_fields(n: usize) -> NodeFields {
    let mut fields = NodeFields::new(n);
    let eta: Vec<f64> = (0..n).map(|i| 10.0 * i as f64 + 1.0).collect();
    fields.add_field(names::TOPOGRAPHIC_ELEVATION, eta).unwrap();
    fields.add_constant(names::SOIL_DEPTH, 1.0).unwrap();
    fields.add_constant(names::DISCHARGE, 1.0e6).unwrap();
    fields.add_constant(names::STEEPEST_SLOPE, 0.01).unwrap();
    fields
}

fn snapshot(fields: &NodeFields) -> Vec<(String, Vec<u64>)> {
    fields
        .names()
        .into_iter()
        .map(|name| {
            let bits = fields.get(name).unwrap().iter().map(|x| x.to_bits()).collect();
            (name.to_string(), bits)
        })
        .collect()
}

// ============================================================================
// 网络构造
// ============================================================================

#[test]
fn test_cycle_rejected() {
    let status = vec![NodeStatus::FixedValue, NodeStatus::Core, NodeStatus::Core, NodeStatus::Core];
    let receivers = vec![None, Some(2), Some(3), Some(1)];
    let err = DrainageNetwork::new(status, receivers, vec![1.0; 4], vec![1.0; 4]).unwrap_err();
    assert!(matches!(err, GbError::InvalidTopology { .. }));
    assert!(err.to_string().contains("环路"));
}

#[test]
fn test_self_loop_from_receiver_array_is_outlet() {
    let status = vec![NodeStatus::FixedValue, NodeStatus::Core, NodeStatus::Core];
    let net = DrainageNetwork::from_receiver_array(status, &[0, 0, 1], vec![1.0; 3], vec![1.0; 3])
        .unwrap();
    assert_eq!(net.receiver(0), None);
    assert_eq!(net.receiver(2), Some(1));
    assert_eq!(net.donors_count(), vec![1, 1, 0]);
}

// ============================================================================
// 单步前置条件
// ============================================================================

#[test]
fn test_non_finite_dt_rejected() {
    let net = DrainageNetwork::chain(3, 10.0, 100.0).unwrap();
    let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
    for dt in [-1.0e-9, f64::NAN, f64::INFINITY] {
        let mut fields = ready_fields(net.n_nodes());
        let before = snapshot(&fields);
        let err = eroder.run_one_step(&net, &mut fields, dt).unwrap_err();
        assert!(matches!(err, EroderError::InvalidTimeStep(_)));
        assert_eq!(snapshot(&fields), before);
    }
}

#[test]
fn test_each_required_field_missing() {
    let net = DrainageNetwork::chain(3, 10.0, 100.0).unwrap();
    let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
    for missing in [
        names::TOPOGRAPHIC_ELEVATION,
        names::SOIL_DEPTH,
        names::DISCHARGE,
        names::STEEPEST_SLOPE,
    ] {
        let full = ready_fields(net.n_nodes());
        let mut fields = NodeFields::new(net.n_nodes());
        for name in full.names() {
            if name != missing {
                fields.add_field(name, full.get(name).unwrap().to_vec()).unwrap();
            }
        }
        let err = eroder.run_one_step(&net, &mut fields, 1.0).unwrap_err();
        assert!(err.is_precondition());
        assert!(matches!(err, EroderError::MissingField(name) if name == missing));
        assert!(!fields.contains(names::BEDROCK_ELEVATION));
    }
}

#[test]
fn test_nan_slope_is_all_or_nothing() {
    let net = DrainageNetwork::chain(4, 10.0, 100.0).unwrap();
    let mut fields = ready_fields(net.n_nodes());
    fields.get_mut(names::STEEPEST_SLOPE).unwrap()[2] = f64::NAN;
    let before = snapshot(&fields);

    let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
    let err = eroder.run_one_step(&net, &mut fields, 10.0).unwrap_err();
    match &err {
        EroderError::InvalidState(report) => assert_eq!(report.error_count(), 1),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(snapshot(&fields), before);
}

#[test]
fn test_negative_sediment_rejected() {
    let net = DrainageNetwork::chain(2, 10.0, 100.0).unwrap();
    let mut fields = ready_fields(net.n_nodes());
    fields.get_mut(names::SOIL_DEPTH).unwrap()[1] = -0.1;
    let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
    let err = eroder.run_one_step(&net, &mut fields, 1.0).unwrap_err();
    assert!(err.to_string().contains(names::SOIL_DEPTH));
}

#[test]
fn test_zero_discharge_is_not_an_error() {
    let net = DrainageNetwork::chain(3, 10.0, 100.0).unwrap();
    let mut fields = ready_fields(net.n_nodes());
    fields.get_mut(names::DISCHARGE).unwrap().fill(0.0);
    let eroder = GravelBedrockEroder::new(EroderParams::default().with_abrasion(1.0e-3)).unwrap();
    let stats = eroder.run_one_step(&net, &mut fields, 50.0).unwrap();
    assert_eq!(stats.n_clamped, 0);
    assert_eq!(stats.bedrock_eroded_volume, 0.0);
    assert_eq!(&fields.get(names::SOIL_DEPTH).unwrap()[1..], &[1.0, 1.0, 1.0][..]);
}

#[test]
fn test_configuration_errors() {
    let bad = [
        EroderParams::default().with_depth_decay_scale(0.0),
        EroderParams::default().with_depth_decay_scale(f64::NAN),
        EroderParams::default().with_intermittency(1.5),
        EroderParams::default().with_plucking(-1.0e-4),
        EroderParams {
            sediment_porosity: -0.1,
            ..Default::default()
        },
        EroderParams {
            coarse_fraction_from_plucking: 2.0,
            ..Default::default()
        },
    ];
    for params in bad {
        let err = GravelBedrockEroder::new(params).unwrap_err();
        assert!(err.is_config(), "{params:?}");
    }
}
