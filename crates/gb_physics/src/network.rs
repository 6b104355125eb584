// crates/gb_physics/src/network.rs

//! 受水网络（汇流拓扑）
//!
//! 由外部汇流子系统每步计算一次，本模块只负责承载与验证：
//! - 节点状态（内部 / 固定值边界 / 封闭边界）
//! - 每个节点的下游受水节点
//! - 流路长度 λ 与单元面积 Λ
//!
//! 受水关系必须构成森林（无环），边界节点可以作为终端受水节点。
//! 网络在构造时完成全部验证，之后不可变，侵蚀器无需再次检查拓扑。

use gb_foundation::validation::{ValidationError, ValidationReport, ValidationWarning};
use gb_foundation::{GbError, GbResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 节点状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum NodeStatus {
    /// 内部节点：状态随时间演变
    #[default]
    Core = 0,
    /// 固定值边界：提供固定高程，可作为汇
    FixedValue = 1,
    /// 封闭边界：不参与计算
    Closed = 4,
}

impl NodeStatus {
    /// 是否为内部节点
    #[inline]
    pub fn is_core(&self) -> bool {
        matches!(self, Self::Core)
    }

    /// 是否为边界节点
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.is_core()
    }
}

/// 受水网络
#[derive(Debug, Clone)]
pub struct DrainageNetwork {
    status: Vec<NodeStatus>,
    receivers: Vec<Option<usize>>,
    link_lengths: Vec<f64>,
    cell_areas: Vec<f64>,
    core_nodes: Vec<usize>,
    warnings: Vec<ValidationWarning>,
}

impl DrainageNetwork {
    /// 创建并验证受水网络
    ///
    /// # 参数
    ///
    /// - `status`: 节点状态
    /// - `receivers`: 下游受水节点，`None` 表示无出流
    /// - `link_lengths`: 到受水节点的流路长度 λ
    /// - `cell_areas`: 单元面积 Λ
    ///
    /// # 错误
    ///
    /// 数组长度不一致、受水索引越界、存在环路，或内部节点的 λ、Λ 非正。
    pub fn new(
        status: Vec<NodeStatus>,
        receivers: Vec<Option<usize>>,
        link_lengths: Vec<f64>,
        cell_areas: Vec<f64>,
    ) -> GbResult<Self> {
        let n = status.len();
        GbError::check_size("receivers", n, receivers.len())?;
        GbError::check_size("link_lengths", n, link_lengths.len())?;
        GbError::check_size("cell_areas", n, cell_areas.len())?;

        let mut report = ValidationReport::new();

        for (i, r) in receivers.iter().enumerate() {
            if let Some(r) = *r {
                if r >= n {
                    report.add_error(ValidationError::TopologyError {
                        message: format!("受水节点 {} 超出范围 0..{}", r, n),
                        node_id: Some(i),
                    });
                }
            }
        }
        // 越界时跳过环路检测，避免越界访问
        if report.is_valid() {
            if let Some(node) = find_cycle(&receivers) {
                report.add_error(ValidationError::TopologyError {
                    message: "受水关系存在环路".into(),
                    node_id: Some(node),
                });
            }
        }

        let core_nodes: Vec<usize> = (0..n).filter(|&i| status[i].is_core()).collect();
        for &i in &core_nodes {
            gb_foundation::validation::check_range(
                &mut report,
                "link_length",
                i,
                link_lengths[i],
                f64::MIN_POSITIVE,
                f64::MAX,
            );
            gb_foundation::validation::check_range(
                &mut report,
                "cell_area",
                i,
                cell_areas[i],
                f64::MIN_POSITIVE,
                f64::MAX,
            );
            if receivers[i].is_none() {
                report.add_warning(ValidationWarning::Topology {
                    message: "内部节点没有受水节点，出流将离开网络".into(),
                    node_id: i,
                });
            }
        }

        let warnings = report
            .into_result()
            .map_err(|report| GbError::invalid_topology(report.to_string()))?;

        debug!(
            n_nodes = n,
            n_core = core_nodes.len(),
            n_warnings = warnings.len(),
            "受水网络验证通过"
        );

        Ok(Self {
            status,
            receivers,
            link_lengths,
            cell_areas,
            core_nodes,
            warnings,
        })
    }

    /// 从自指受水数组创建
    ///
    /// 汇流程序常以 `receiver[i] == i` 表示无出流，此处转换为 `None`。
    pub fn from_receiver_array(
        status: Vec<NodeStatus>,
        receivers: &[usize],
        link_lengths: Vec<f64>,
        cell_areas: Vec<f64>,
    ) -> GbResult<Self> {
        let receivers = receivers
            .iter()
            .enumerate()
            .map(|(i, &r)| if r == i { None } else { Some(r) })
            .collect();
        Self::new(status, receivers, link_lengths, cell_areas)
    }

    /// 单线河道：节点 0 为固定值出口，节点 1..=n 依次向下游排水
    pub fn chain(n_core: usize, spacing: f64, cell_area: f64) -> GbResult<Self> {
        let n = n_core + 1;
        let mut status = vec![NodeStatus::Core; n];
        status[0] = NodeStatus::FixedValue;
        let receivers = (0..n).map(|i| i.checked_sub(1)).collect();
        Self::new(status, receivers, vec![spacing; n], vec![cell_area; n])
    }

    /// 三节点汇流：节点 2、3 汇入节点 1，节点 1 排向固定值出口 0
    pub fn converging(spacing: f64, cell_area: f64) -> GbResult<Self> {
        let status = vec![
            NodeStatus::FixedValue,
            NodeStatus::Core,
            NodeStatus::Core,
            NodeStatus::Core,
        ];
        let receivers = vec![None, Some(0), Some(1), Some(1)];
        Self::new(status, receivers, vec![spacing; 4], vec![cell_area; 4])
    }

    /// 节点总数
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.status.len()
    }

    /// 内部节点索引
    #[inline]
    pub fn core_nodes(&self) -> &[usize] {
        &self.core_nodes
    }

    /// 节点状态
    #[inline]
    pub fn status(&self) -> &[NodeStatus] {
        &self.status
    }

    /// 是否为内部节点
    #[inline]
    pub fn is_core(&self, node: usize) -> bool {
        self.status[node].is_core()
    }

    /// 下游受水节点
    #[inline]
    pub fn receiver(&self, node: usize) -> Option<usize> {
        self.receivers[node]
    }

    /// 全部受水关系
    #[inline]
    pub fn receivers(&self) -> &[Option<usize>] {
        &self.receivers
    }

    /// 流路长度 λ
    #[inline]
    pub fn link_lengths(&self) -> &[f64] {
        &self.link_lengths
    }

    /// 单元面积 Λ
    #[inline]
    pub fn cell_areas(&self) -> &[f64] {
        &self.cell_areas
    }

    /// 每个节点的直接上游（供水）节点数
    pub fn donors_count(&self) -> Vec<usize> {
        let mut count = vec![0; self.n_nodes()];
        for r in self.receivers.iter().flatten() {
            count[*r] += 1;
        }
        count
    }

    /// 构造时收集的拓扑警告
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }
}

/// 查找受水环路，返回环上任一节点
///
/// 三色标记：0 未访问，1 当前路径上，2 已确认通向出口。
/// 每个节点至多入栈一次，总代价 O(n)。
fn find_cycle(receivers: &[Option<usize>]) -> Option<usize> {
    let n = receivers.len();
    let mut mark = vec![0u8; n];
    let mut path = Vec::new();

    for start in 0..n {
        if mark[start] != 0 {
            continue;
        }
        let mut node = Some(start);
        while let Some(i) = node {
            match mark[i] {
                0 => {
                    mark[i] = 1;
                    path.push(i);
                    node = receivers[i];
                }
                1 => return Some(i),
                _ => break,
            }
        }
        for &i in &path {
            mark[i] = 2;
        }
        path.clear();
    }
    None
}
