// apps/gb_cli/src/scenario.rs

//! 演示场景
//!
//! 从 `ModelConfig` 构造受水网络与初始字段，并在每步调用侵蚀器前
//! 完成外部驱动：抬升、沿固定受水关系刷新坡度、按汇水面积给定流量。
//! 汇流本身不属于侵蚀器，这里只做演示所需的最小实现。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use gb_config::{ModelConfig, NetworkKind};
use gb_physics::fields::names;
use gb_physics::{DrainageNetwork, GravelBedrockEroder, NodeFields, StepStats};

/// 演示场景
pub struct Scenario {
    network: DrainageNetwork,
    fields: NodeFields,
    /// 到出口的流路距离 [m]
    distance: Vec<f64>,
    uplift_rate: f64,
    time: f64,
}

impl Scenario {
    /// 按配置构造网络与初始状态
    pub fn build(config: &ModelConfig) -> Result<Self> {
        let net_cfg = &config.network;
        let spacing = net_cfg.node_spacing;
        let area = net_cfg.resolved_cell_area();
        let network = match net_cfg.kind {
            NetworkKind::Chain => DrainageNetwork::chain(net_cfg.n_core_nodes, spacing, area),
            NetworkKind::Converging => DrainageNetwork::converging(spacing, area),
        }
        .context("构造受水网络失败")?;

        let n = network.n_nodes();
        let distance = distance_to_outlet(&network);
        let drainage = drainage_area(&network);

        let sediment: Vec<f64> = (0..n)
            .map(|i| {
                if network.is_core(i) {
                    config.initial.sediment_thickness
                } else {
                    0.0
                }
            })
            .collect();
        let bedrock: Vec<f64> = distance.iter().map(|d| config.initial.slope * d).collect();
        let elevation: Vec<f64> = bedrock.iter().zip(&sediment).map(|(b, h)| b + h).collect();
        let discharge: Vec<f64> = drainage
            .iter()
            .map(|a| config.forcing.runoff_rate * a)
            .collect();

        let mut fields = NodeFields::new(n);
        fields.add_field(names::TOPOGRAPHIC_ELEVATION, elevation)?;
        fields.add_field(names::SOIL_DEPTH, sediment)?;
        fields.add_field(names::BEDROCK_ELEVATION, bedrock)?;
        fields.add_field(names::DISCHARGE, discharge)?;
        fields.add_constant(names::STEEPEST_SLOPE, 0.0)?;

        let mut scenario = Self {
            network,
            fields,
            distance,
            uplift_rate: config.forcing.uplift_rate,
            time: 0.0,
        };
        scenario.refresh_slopes();
        Ok(scenario)
    }

    /// 受水网络
    pub fn network(&self) -> &DrainageNetwork {
        &self.network
    }

    /// 已模拟时间 [yr]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 推进一步：抬升、刷新坡度、侵蚀
    pub fn step(&mut self, eroder: &GravelBedrockEroder, dt: f64) -> Result<StepStats> {
        self.apply_uplift(self.uplift_rate * dt);
        self.refresh_slopes();
        let stats = eroder
            .run_one_step(&self.network, &mut self.fields, dt)
            .with_context(|| format!("t={} yr 侵蚀步失败", self.time))?;
        self.time += dt;
        Ok(stats)
    }

    /// 内部节点平均泥沙厚度
    pub fn mean_sediment_thickness(&self) -> f64 {
        let core = self.network.core_nodes();
        let Some(h) = self.fields.get(names::SOIL_DEPTH) else {
            return 0.0;
        };
        if core.is_empty() {
            return 0.0;
        }
        core.iter().map(|&i| h[i]).sum::<f64>() / core.len() as f64
    }

    /// 最大地表高程
    pub fn max_elevation(&self) -> f64 {
        self.fields
            .get(names::TOPOGRAPHIC_ELEVATION)
            .map(|eta| eta.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .unwrap_or(0.0)
    }

    fn apply_uplift(&mut self, amount: f64) {
        if amount == 0.0 {
            return;
        }
        for name in [names::TOPOGRAPHIC_ELEVATION, names::BEDROCK_ELEVATION] {
            if let Some(values) = self.fields.get_mut(name) {
                for &i in self.network.core_nodes() {
                    values[i] += amount;
                }
            }
        }
    }

    /// S = max(0, (η_i - η_r) / λ_i)，无受水节点时为 0
    fn refresh_slopes(&mut self) {
        let Some(eta) = self.fields.get(names::TOPOGRAPHIC_ELEVATION).map(<[f64]>::to_vec) else {
            return;
        };
        let lengths = self.network.link_lengths();
        let Some(slope) = self.fields.get_mut(names::STEEPEST_SLOPE) else {
            return;
        };
        for (i, s) in slope.iter_mut().enumerate() {
            *s = match self.network.receiver(i) {
                Some(r) => ((eta[i] - eta[r]) / lengths[i]).max(0.0),
                None => 0.0,
            };
        }
    }

    /// 写出纵剖面 CSV
    pub fn write_profile(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("无法创建剖面文件: {}", path.display()))?;
        let mut w = BufWriter::new(file);
        writeln!(
            w,
            "node,distance,{},{},{},{},{},{}",
            names::TOPOGRAPHIC_ELEVATION,
            names::BEDROCK_ELEVATION,
            names::SOIL_DEPTH,
            names::DISCHARGE,
            names::STEEPEST_SLOPE,
            names::SEDIMENT_OUTFLUX,
        )?;

        let column = |name: &str| -> Vec<f64> {
            self.fields
                .get(name)
                .map(<[f64]>::to_vec)
                .unwrap_or_else(|| vec![0.0; self.network.n_nodes()])
        };
        let columns = [
            column(names::TOPOGRAPHIC_ELEVATION),
            column(names::BEDROCK_ELEVATION),
            column(names::SOIL_DEPTH),
            column(names::DISCHARGE),
            column(names::STEEPEST_SLOPE),
            column(names::SEDIMENT_OUTFLUX),
        ];
        for i in 0..self.network.n_nodes() {
            write!(w, "{},{}", i, self.distance[i])?;
            for col in &columns {
                write!(w, ",{:.6e}", col[i])?;
            }
            writeln!(w)?;
        }
        w.flush()?;
        Ok(())
    }
}

/// 沿受水链累加流路长度
fn distance_to_outlet(network: &DrainageNetwork) -> Vec<f64> {
    let n = network.n_nodes();
    let lengths = network.link_lengths();
    (0..n)
        .map(|start| {
            let mut d = 0.0;
            let mut node = start;
            // 网络已验证无环，路径长度不超过 n
            for _ in 0..n {
                match network.receiver(node) {
                    Some(r) => {
                        d += lengths[node];
                        node = r;
                    }
                    None => break,
                }
            }
            d
        })
        .collect()
}

/// 汇水面积：每个节点的单元面积沿受水链向下游累加
fn drainage_area(network: &DrainageNetwork) -> Vec<f64> {
    let n = network.n_nodes();
    let areas = network.cell_areas();
    let mut drainage = vec![0.0; n];
    for start in network.core_nodes().iter().copied() {
        let mut node = start;
        for _ in 0..n {
            drainage[node] += areas[start];
            match network.receiver(node) {
                Some(r) if network.is_core(r) => node = r,
                _ => break,
            }
        }
    }
    drainage
}
