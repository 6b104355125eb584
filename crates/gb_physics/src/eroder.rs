// crates/gb_physics/src/eroder.rs

//! 砾石-基岩侵蚀器
//!
//! 每次调用执行一个确定性的显式时间步：
//!
//! 1. 通量计算：内部节点的 α、T、Qout、P（无节点间依赖，可并行）
//! 2. 入流散射：Qin[r(i)] += Qout[i]，单次遍历
//! 3. 磨蚀计算：A、Rabr（依赖本步 Qin）
//! 4. 质量平衡：更新 H、ηb，重算 η
//! 5. 写出 Qin、Qout、α、A、Rabr、P 等诊断字段
//!
//! 所有前置条件在写任何字段之前检查完毕：要么全部内部节点一致更新，
//! 要么不做任何修改。侵蚀器不保存步间状态。
//!
//! # 使用示例
//!
//! ```
//! use gb_config::EroderParams;
//! use gb_physics::fields::{names, NodeFields};
//! use gb_physics::{DrainageNetwork, GravelBedrockEroder};
//!
//! let network = DrainageNetwork::converging(1000.0, 866_025.4).unwrap();
//! let mut fields = NodeFields::new(network.n_nodes());
//! fields.add_field(names::TOPOGRAPHIC_ELEVATION, vec![0.0, 10.0, 20.0, 20.0]).unwrap();
//! fields.add_constant(names::SOIL_DEPTH, 1.0).unwrap();
//! fields.add_field(names::DISCHARGE, vec![0.0, 3.0e6, 1.0e6, 1.0e6]).unwrap();
//! fields.add_constant(names::STEEPEST_SLOPE, 0.01).unwrap();
//!
//! let eroder = GravelBedrockEroder::new(EroderParams::default()).unwrap();
//! let stats = eroder.run_one_step(&network, &mut fields, 100.0).unwrap();
//! assert_eq!(stats.n_core, 3);
//! assert!(fields.contains(names::SEDIMENT_OUTFLUX));
//! ```

use gb_config::{EroderParams, ParallelConfig};
use gb_foundation::validation::{check_finite, check_range, ValidationError, ValidationReport};
use gb_foundation::GbError;
use tracing::debug;

use crate::accumulator::InfluxAccumulator;
use crate::error::{EroderError, EroderResult};
use crate::fields::{names, NodeFields};
use crate::flux::FluxEvaluator;
use crate::integrator::{self, MassBalanceIntegrator, TopographyMut};
use crate::network::DrainageNetwork;
use crate::stats::StepStats;

/// 单步外部输入视图
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    /// 造床流量 Q
    pub discharge: &'a [f64],
    /// 最陡下坡坡度 S
    pub slope: &'a [f64],
}

/// 单步诊断输出，按节点索引排列
///
/// 边界节点的出流、速率均为 0；入流记录排入该节点的总量。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxOutputs {
    /// 推移质入流 Qin
    pub influx: Vec<f64>,
    /// 推移质出流 Qout
    pub outflux: Vec<f64>,
    /// 基岩出露比例 α（全部节点）
    pub exposure_fraction: Vec<f64>,
    /// 输沙能力 T
    pub transport_capacity: Vec<f64>,
    /// 泥沙磨蚀损失 A
    pub abrasion_loss: Vec<f64>,
    /// 基岩磨蚀速率 Rabr
    pub bedrock_abrasion_rate: Vec<f64>,
    /// 基岩拔蚀速率 P
    pub plucking_rate: Vec<f64>,
    /// 拔蚀粗颗粒供给 Qpluck
    pub pluck_supply: Vec<f64>,
    /// dH/dt（截断前）
    pub sediment_rate: Vec<f64>,
    /// dηb/dt
    pub bedrock_rate: Vec<f64>,
}

impl FluxOutputs {
    fn zeros(n: usize) -> Self {
        Self {
            influx: vec![0.0; n],
            outflux: vec![0.0; n],
            exposure_fraction: vec![0.0; n],
            transport_capacity: vec![0.0; n],
            abrasion_loss: vec![0.0; n],
            bedrock_abrasion_rate: vec![0.0; n],
            plucking_rate: vec![0.0; n],
            pluck_supply: vec![0.0; n],
            sediment_rate: vec![0.0; n],
            bedrock_rate: vec![0.0; n],
        }
    }

    /// 写入命名字段（覆盖）
    fn write_to(self, fields: &mut NodeFields) {
        fields.restore(names::SEDIMENT_INFLUX, self.influx);
        fields.restore(names::SEDIMENT_OUTFLUX, self.outflux);
        fields.restore(names::EXPOSURE_FRACTION, self.exposure_fraction);
        fields.restore(names::TRANSPORT_CAPACITY, self.transport_capacity);
        fields.restore(names::ABRASION_LOSS, self.abrasion_loss);
        fields.restore(names::BEDROCK_ABRASION_RATE, self.bedrock_abrasion_rate);
        fields.restore(names::PLUCKING_RATE, self.plucking_rate);
        fields.restore(names::SEDIMENT_RATE_OF_CHANGE, self.sediment_rate);
        fields.restore(names::BEDROCK_RATE_OF_CHANGE, self.bedrock_rate);
    }
}

/// 砾石-基岩侵蚀器
#[derive(Debug, Clone)]
pub struct GravelBedrockEroder {
    evaluator: FluxEvaluator,
    parallel: ParallelConfig,
}

impl GravelBedrockEroder {
    /// 创建侵蚀器，参数在此验证
    pub fn new(params: EroderParams) -> EroderResult<Self> {
        params.validate()?;
        Ok(Self {
            evaluator: FluxEvaluator::new(params),
            parallel: ParallelConfig::default(),
        })
    }

    /// 设置并行策略
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// 参数记录
    #[inline]
    pub fn params(&self) -> &EroderParams {
        self.evaluator.params()
    }

    /// 通量计算器
    #[inline]
    pub fn evaluator(&self) -> &FluxEvaluator {
        &self.evaluator
    }

    /// 重新配置；新参数无效时保留原参数
    pub fn reconfigure(&mut self, params: EroderParams) -> EroderResult<()> {
        params.validate()?;
        debug!(?params, "侵蚀器重新配置");
        self.evaluator = FluxEvaluator::new(params);
        Ok(())
    }

    /// 计算全部通量与速率，不修改状态
    ///
    /// 只检查输入长度，不检查取值；取值验证由 [`advance`](Self::advance)
    /// 与 [`run_one_step`](Self::run_one_step) 完成。
    pub fn compute_fluxes(
        &self,
        network: &DrainageNetwork,
        input: &StepInput<'_>,
        sediment_thickness: &[f64],
    ) -> EroderResult<FluxOutputs> {
        let n = network.n_nodes();
        check_len(names::DISCHARGE, n, input.discharge.len())?;
        check_len(names::STEEPEST_SLOPE, n, input.slope.len())?;
        check_len(names::SOIL_DEPTH, n, sediment_thickness.len())?;
        Ok(self.evaluate_fluxes(network, input, sediment_thickness))
    }

    /// 输入长度已检查
    fn evaluate_fluxes(
        &self,
        network: &DrainageNetwork,
        input: &StepInput<'_>,
        sediment_thickness: &[f64],
    ) -> FluxOutputs {
        let n = network.n_nodes();
        let core = network.core_nodes();
        let lengths = network.link_lengths();
        let areas = network.cell_areas();
        let parallel = self.parallel.use_parallel(core.len());
        let eval = &self.evaluator;

        let mut out = FluxOutputs::zeros(n);
        for (alpha, &h) in out.exposure_fraction.iter_mut().zip(sediment_thickness) {
            *alpha = eval.exposure_fraction(h);
        }

        let transport = eval.transport_batch(
            core,
            input.discharge,
            input.slope,
            sediment_thickness,
            lengths,
            areas,
            parallel,
        );
        let core_outflux: Vec<f64> = transport.iter().map(|t| t.outflux).collect();

        // 散射始终串行，保证多供水节点的求和顺序固定
        let mut acc = InfluxAccumulator::new(n);
        acc.scatter(core, &core_outflux, network.receivers());
        out.influx = acc.into_influx();

        let abrasion = eval.abrasion_batch(core, &transport, &out.influx, lengths, areas, parallel);

        for ((&i, t), a) in core.iter().zip(&transport).zip(&abrasion) {
            let supply = eval.pluck_supply(t.plucking_rate, areas[i]);
            out.outflux[i] = t.outflux;
            out.transport_capacity[i] = t.capacity;
            out.plucking_rate[i] = t.plucking_rate;
            out.pluck_supply[i] = supply;
            out.abrasion_loss[i] = a.sediment_loss;
            out.bedrock_abrasion_rate[i] = a.bedrock_rate;
            out.sediment_rate[i] = integrator::sediment_rate(
                out.influx[i],
                t.outflux,
                supply,
                a.sediment_loss,
                areas[i],
            );
            out.bedrock_rate[i] = integrator::bedrock_rate(t.plucking_rate, a.bedrock_rate);
        }
        out
    }

    /// 显式视图接口：验证、计算并推进一步
    pub fn advance(
        &self,
        network: &DrainageNetwork,
        input: &StepInput<'_>,
        topo: &mut TopographyMut<'_>,
        dt: f64,
    ) -> EroderResult<(FluxOutputs, StepStats)> {
        check_time_step(dt)?;
        let n = network.n_nodes();
        check_len(names::DISCHARGE, n, input.discharge.len())?;
        check_len(names::STEEPEST_SLOPE, n, input.slope.len())?;
        check_len(names::TOPOGRAPHIC_ELEVATION, n, topo.elevation.len())?;
        check_len(names::SOIL_DEPTH, n, topo.sediment_thickness.len())?;
        check_len(names::BEDROCK_ELEVATION, n, topo.bedrock_elevation.len())?;
        validate_state(
            network,
            input,
            topo.elevation,
            topo.sediment_thickness,
            topo.bedrock_elevation,
        )?;

        let outputs = self.evaluate_fluxes(network, input, topo.sediment_thickness);
        let stats = self.integrate(network, &outputs, topo, dt);
        Ok((outputs, stats))
    }

    /// 命名字段接口：执行一个时间步
    ///
    /// 读取 `topographic__elevation`、`soil__depth`、`surface_water__discharge`、
    /// `topographic__steepest_slope`；`bedrock__elevation` 缺失时以 η - H 初始化。
    /// 诊断字段每步覆盖写出。
    pub fn run_one_step(
        &self,
        network: &DrainageNetwork,
        fields: &mut NodeFields,
        dt: f64,
    ) -> EroderResult<StepStats> {
        check_time_step(dt)?;
        let n = network.n_nodes();
        check_len("fields", n, fields.n_nodes())?;

        // 只读阶段：完成全部检查与通量计算
        let (bedrock_init, outputs) = {
            let elevation = required(fields, names::TOPOGRAPHIC_ELEVATION, n)?;
            let sediment = required(fields, names::SOIL_DEPTH, n)?;
            let input = StepInput {
                discharge: required(fields, names::DISCHARGE, n)?,
                slope: required(fields, names::STEEPEST_SLOPE, n)?,
            };

            let bedrock_init: Option<Vec<f64>> = if fields.contains(names::BEDROCK_ELEVATION) {
                None
            } else {
                Some(elevation.iter().zip(sediment).map(|(e, h)| e - h).collect())
            };
            let bedrock = match &bedrock_init {
                Some(b) => b.as_slice(),
                None => required(fields, names::BEDROCK_ELEVATION, n)?,
            };

            validate_state(network, &input, elevation, sediment, bedrock)?;
            (bedrock_init, self.evaluate_fluxes(network, &input, sediment))
        };

        // 写阶段：以下不再返回错误
        if let Some(b) = bedrock_init {
            debug!("以 η - H 初始化 {}", names::BEDROCK_ELEVATION);
            fields.restore(names::BEDROCK_ELEVATION, b);
        }
        let (Some(mut elevation), Some(mut sediment), Some(mut bedrock)) = (
            fields.take(names::TOPOGRAPHIC_ELEVATION),
            fields.take(names::SOIL_DEPTH),
            fields.take(names::BEDROCK_ELEVATION),
        ) else {
            return Err(GbError::internal("状态字段在验证后缺失").into());
        };

        let stats = {
            let mut topo = TopographyMut {
                elevation: &mut elevation,
                sediment_thickness: &mut sediment,
                bedrock_elevation: &mut bedrock,
            };
            self.integrate(network, &outputs, &mut topo, dt)
        };

        fields.restore(names::TOPOGRAPHIC_ELEVATION, elevation);
        fields.restore(names::SOIL_DEPTH, sediment);
        fields.restore(names::BEDROCK_ELEVATION, bedrock);
        outputs.write_to(fields);
        Ok(stats)
    }

    fn integrate(
        &self,
        network: &DrainageNetwork,
        outputs: &FluxOutputs,
        topo: &mut TopographyMut<'_>,
        dt: f64,
    ) -> StepStats {
        let summary = MassBalanceIntegrator.apply(
            network,
            &outputs.sediment_rate,
            &outputs.bedrock_rate,
            topo,
            dt,
        );

        let mut stats = StepStats {
            dt,
            n_core: network.core_nodes().len(),
            n_clamped: summary.n_clamped,
            discarded_volume: summary.discarded_volume,
            sediment_volume_change: summary.sediment_volume_change,
            solid_volume_change: (1.0 - self.params().sediment_porosity)
                * summary.sediment_volume_change,
            bedrock_eroded_volume: summary.bedrock_eroded_volume,
            ..Default::default()
        };
        for &i in network.core_nodes() {
            stats.max_sediment_rate = stats.max_sediment_rate.max(outputs.sediment_rate[i].abs());
            stats.max_bedrock_lowering = stats.max_bedrock_lowering.max(-outputs.bedrock_rate[i]);
            let leaves = match network.receiver(i) {
                Some(r) => !network.is_core(r),
                None => true,
            };
            if leaves {
                stats.boundary_outflux += outputs.outflux[i];
            }
        }

        if stats.clamped() {
            debug!(
                n_clamped = stats.n_clamped,
                discarded_volume = stats.discarded_volume,
                "泥沙厚度截断为零，不足部分已丢弃"
            );
        }
        debug!(%stats, "侵蚀器完成一步");
        stats
    }
}

fn check_time_step(dt: f64) -> EroderResult<()> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(EroderError::InvalidTimeStep(dt))
    }
}

fn check_len(name: &'static str, expected: usize, actual: usize) -> EroderResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(EroderError::FieldSize {
            name,
            expected,
            actual,
        })
    }
}

fn required<'a>(fields: &'a NodeFields, name: &'static str, n: usize) -> EroderResult<&'a [f64]> {
    let values = fields.get(name).ok_or(EroderError::MissingField(name))?;
    check_len(name, n, values.len())?;
    Ok(values)
}

/// 检查全部节点的输入值
///
/// H、Q、S 必须为非负有限值，η、ηb 必须有限；内部节点要求 ηb ≤ η。
fn validate_state(
    network: &DrainageNetwork,
    input: &StepInput<'_>,
    elevation: &[f64],
    sediment: &[f64],
    bedrock: &[f64],
) -> EroderResult<()> {
    let mut report = ValidationReport::new();
    for i in 0..network.n_nodes() {
        check_finite(&mut report, names::TOPOGRAPHIC_ELEVATION, i, elevation[i]);
        check_finite(&mut report, names::BEDROCK_ELEVATION, i, bedrock[i]);
        check_range(&mut report, names::SOIL_DEPTH, i, sediment[i], 0.0, f64::MAX);
        check_range(&mut report, names::DISCHARGE, i, input.discharge[i], 0.0, f64::MAX);
        check_range(&mut report, names::STEEPEST_SLOPE, i, input.slope[i], 0.0, f64::MAX);
    }
    for &i in network.core_nodes() {
        if bedrock[i] > elevation[i] {
            report.add_error(ValidationError::OutOfRange {
                field: names::BEDROCK_ELEVATION,
                node_id: i,
                value: bedrock[i],
                min: f64::NEG_INFINITY,
                max: elevation[i],
            });
        }
    }
    if report.has_errors() {
        return Err(EroderError::InvalidState(report));
    }
    Ok(())
}
