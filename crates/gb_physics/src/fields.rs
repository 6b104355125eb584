// crates/gb_physics/src/fields.rs

//! 节点字段存储
//!
//! 按名称存取、按节点索引排列的实数字段，保留与外部网格一致的
//! 命名字段约定。侵蚀器只在单步调用期间借用本存储，不持有引用。
//!
//! # 命名规范
//!
//! 采用 `对象__物理量` 形式（如 `topographic__elevation`）：
//! - 仅允许小写字母、数字和下划线
//! - 必须以字母开头，不能以下划线结尾
//! - 下划线最多连续两个
//!
//! # 示例
//!
//! ```
//! use gb_physics::fields::{names, NodeFields};
//!
//! let mut fields = NodeFields::new(3);
//! fields.add_field(names::SOIL_DEPTH, vec![1.0, 0.5, 0.0]).unwrap();
//! assert_eq!(fields.get(names::SOIL_DEPTH).unwrap()[1], 0.5);
//! ```

use std::collections::HashMap;

/// 字段名常量
pub mod names {
    /// 地表高程 η [m]
    pub const TOPOGRAPHIC_ELEVATION: &str = "topographic__elevation";
    /// 泥沙厚度 H [m]
    pub const SOIL_DEPTH: &str = "soil__depth";
    /// 造床流量 Q [m³/yr]
    pub const DISCHARGE: &str = "surface_water__discharge";
    /// 最陡下坡坡度 S [-]
    pub const STEEPEST_SLOPE: &str = "topographic__steepest_slope";
    /// 基岩高程 ηb [m]
    pub const BEDROCK_ELEVATION: &str = "bedrock__elevation";
    /// 推移质入流 Qin [m³/yr]
    pub const SEDIMENT_INFLUX: &str = "bedload_sediment__volume_influx";
    /// 推移质出流 Qout [m³/yr]
    pub const SEDIMENT_OUTFLUX: &str = "bedload_sediment__volume_outflux";
    /// 基岩出露比例 α [-]
    pub const EXPOSURE_FRACTION: &str = "bedrock__exposure_fraction";
    /// 输沙能力 T [m³/yr]
    pub const TRANSPORT_CAPACITY: &str = "bedload_sediment__transport_capacity";
    /// 泥沙磨蚀损失 A [m³/yr]
    pub const ABRASION_LOSS: &str = "bedload_sediment__rate_of_loss_to_abrasion";
    /// 基岩磨蚀下切速率 [m/yr]
    pub const BEDROCK_ABRASION_RATE: &str = "bedrock__abrasion_rate";
    /// 基岩拔蚀下切速率 P [m/yr]
    pub const PLUCKING_RATE: &str = "bedrock__plucking_rate";
    /// 泥沙厚度变化率 dH/dt [m/yr]
    pub const SEDIMENT_RATE_OF_CHANGE: &str = "sediment__rate_of_change";
    /// 基岩高程变化率 dηb/dt [m/yr]
    pub const BEDROCK_RATE_OF_CHANGE: &str = "bedrock__rate_of_change";
}

/// 字段在单步中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// 调用前必须存在
    Input,
    /// 读取并就地修改
    State,
    /// 每步覆盖写出
    Output,
}

/// 字段描述
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// 字段名
    pub name: &'static str,
    /// 单位
    pub unit: &'static str,
    /// 角色
    pub role: FieldRole,
    /// 描述
    pub description: &'static str,
}

/// 侵蚀器读写的全部字段
pub const GRAVEL_BEDROCK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: names::TOPOGRAPHIC_ELEVATION,
        unit: "m",
        role: FieldRole::State,
        description: "地表高程",
    },
    FieldSpec {
        name: names::SOIL_DEPTH,
        unit: "m",
        role: FieldRole::State,
        description: "泥沙覆盖厚度",
    },
    FieldSpec {
        name: names::DISCHARGE,
        unit: "m3/y",
        role: FieldRole::Input,
        description: "造床流量",
    },
    FieldSpec {
        name: names::STEEPEST_SLOPE,
        unit: "-",
        role: FieldRole::Input,
        description: "最陡下坡坡度",
    },
    FieldSpec {
        name: names::BEDROCK_ELEVATION,
        unit: "m",
        role: FieldRole::State,
        description: "基岩高程（缺省为 η - H）",
    },
    FieldSpec {
        name: names::SEDIMENT_INFLUX,
        unit: "m3/y",
        role: FieldRole::Output,
        description: "推移质入流",
    },
    FieldSpec {
        name: names::SEDIMENT_OUTFLUX,
        unit: "m3/y",
        role: FieldRole::Output,
        description: "推移质出流",
    },
    FieldSpec {
        name: names::EXPOSURE_FRACTION,
        unit: "-",
        role: FieldRole::Output,
        description: "基岩出露比例",
    },
    FieldSpec {
        name: names::TRANSPORT_CAPACITY,
        unit: "m3/y",
        role: FieldRole::Output,
        description: "输沙能力",
    },
    FieldSpec {
        name: names::ABRASION_LOSS,
        unit: "m3/y",
        role: FieldRole::Output,
        description: "泥沙磨蚀损失",
    },
    FieldSpec {
        name: names::BEDROCK_ABRASION_RATE,
        unit: "m/y",
        role: FieldRole::Output,
        description: "基岩磨蚀速率",
    },
    FieldSpec {
        name: names::PLUCKING_RATE,
        unit: "m/y",
        role: FieldRole::Output,
        description: "基岩拔蚀速率",
    },
    FieldSpec {
        name: names::SEDIMENT_RATE_OF_CHANGE,
        unit: "m/y",
        role: FieldRole::Output,
        description: "泥沙厚度变化率（截断前）",
    },
    FieldSpec {
        name: names::BEDROCK_RATE_OF_CHANGE,
        unit: "m/y",
        role: FieldRole::Output,
        description: "基岩高程变化率",
    },
];

/// 字段错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// 无效字段名
    #[error("Invalid field name '{0}': expected lowercase words joined by '_' or '__'")]
    InvalidName(String),

    /// 字段已存在
    #[error("Field '{0}' already exists")]
    DuplicateField(String),

    /// 长度与节点数不一致
    #[error("Field '{name}' has {actual} values, grid has {expected} nodes")]
    SizeMismatch {
        /// 字段名
        name: String,
        /// 节点数
        expected: usize,
        /// 实际长度
        actual: usize,
    },
}

/// 验证字段名
fn is_valid_field_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_lowercase() => {}
        _ => return false,
    }
    if name.ends_with('_') || name.contains("___") {
        return false;
    }
    bytes
        .iter()
        .all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// 节点字段存储
#[derive(Debug, Clone, Default)]
pub struct NodeFields {
    n_nodes: usize,
    fields: HashMap<String, Vec<f64>>,
}

impl NodeFields {
    /// 创建空存储
    pub fn new(n_nodes: usize) -> Self {
        Self {
            n_nodes,
            fields: HashMap::new(),
        }
    }

    /// 节点数
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// 添加新字段，同名字段已存在时报错
    pub fn add_field(&mut self, name: &str, values: Vec<f64>) -> Result<(), FieldError> {
        if self.fields.contains_key(name) {
            return Err(FieldError::DuplicateField(name.to_string()));
        }
        self.set_field(name, values)
    }

    /// 写入字段，已存在时覆盖
    pub fn set_field(&mut self, name: &str, values: Vec<f64>) -> Result<(), FieldError> {
        if !is_valid_field_name(name) {
            return Err(FieldError::InvalidName(name.to_string()));
        }
        if values.len() != self.n_nodes {
            return Err(FieldError::SizeMismatch {
                name: name.to_string(),
                expected: self.n_nodes,
                actual: values.len(),
            });
        }
        self.fields.insert(name.to_string(), values);
        Ok(())
    }

    /// 添加常数值字段
    pub fn add_constant(&mut self, name: &str, value: f64) -> Result<(), FieldError> {
        self.add_field(name, vec![value; self.n_nodes])
    }

    /// 是否存在字段
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// 只读访问
    #[inline]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// 可变访问
    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        self.fields.get_mut(name).map(Vec::as_mut_slice)
    }

    /// 取出字段（用于同时可变借用多个字段），须配合 [`Self::restore`] 放回
    pub(crate) fn take(&mut self, name: &str) -> Option<Vec<f64>> {
        self.fields.remove(name)
    }

    /// 放回由 [`Self::take`] 取出或由侵蚀器生成的字段
    pub(crate) fn restore(&mut self, name: &str, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.n_nodes);
        self.fields.insert(name.to_string(), values);
    }

    /// 已有字段名（排序后）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
