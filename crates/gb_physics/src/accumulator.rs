// crates/gb_physics/src/accumulator.rs

//! 入流累加器
//!
//! 将每个节点的出流散射累加到其下游受水节点的入流上。
//! 出流完全由步初状态决定，因此单次遍历即可，无需拓扑排序。
//!
//! 累加始终按内部节点索引顺序串行进行：同一受水节点的多个供水项
//! 以固定顺序求和，重复调用结果逐位相同。散射是 O(n) 的单次遍历，
//! 并行只用于通量映射。

/// 入流累加器
#[derive(Debug, Clone)]
pub struct InfluxAccumulator {
    influx: Vec<f64>,
}

impl InfluxAccumulator {
    /// 创建新的累加器
    ///
    /// # 参数
    /// - `n_nodes`: 节点数量
    pub fn new(n_nodes: usize) -> Self {
        Self {
            influx: vec![0.0; n_nodes],
        }
    }

    /// 散射累加：`givers[k]` 的出流为 `outflux[k]`
    ///
    /// 无受水节点的供水项直接离开网络。
    pub fn scatter(&mut self, givers: &[usize], outflux: &[f64], receivers: &[Option<usize>]) {
        for (&i, &q) in givers.iter().zip(outflux) {
            if let Some(r) = receivers[i] {
                self.influx[r] += q;
            }
        }
    }

    /// 取出累加结果
    pub fn into_influx(self) -> Vec<f64> {
        self.influx
    }
}
