//! Per-expression TTL aggregates persisted with a part
//! 随数据块持久化的按表达式 TTL 聚合
//!
//! Computed once at part creation or merge, so rule evaluation never
//! rescans rows; the map travels with the part during replication.
//! 在数据块创建或合并时计算一次，规则评估无需重扫行；
//! 复制时该映射随数据块一起传输。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Time;

/// Min/max of one TTL expression over all rows of a part
/// 一个 TTL 表达式在数据块全部行上的最小/最大值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlInfo {
  pub min: Time,
  pub max: Time,
}

impl TtlInfo {
  /// Aggregate of a single value / 单个值的聚合
  #[inline]
  pub fn new(t: Time) -> Self {
    Self { min: t, max: t }
  }

  /// Fold in another value / 并入另一个值
  pub fn update(&mut self, t: Time) {
    if t < self.min {
      self.min = t;
    }
    if t > self.max {
      self.max = t;
    }
  }

  /// Merge another aggregate / 合并另一个聚合
  pub fn merge(&mut self, o: &TtlInfo) {
    self.update(o.min);
    self.update(o.max);
  }
}

/// Aggregates keyed by expression canonical key
/// 以表达式规范键为键的聚合
pub type TtlInfos = BTreeMap<String, TtlInfo>;
