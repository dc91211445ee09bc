//! Row: named timestamp columns plus opaque payload
//! 行：命名时间戳列加不透明负载

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::Time;

/// One stored row. TTL expressions read the timestamp columns.
/// 一条存储行。TTL 表达式读取时间戳列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
  /// Timestamp columns by name / 按名索引的时间戳列
  pub cols: BTreeMap<String, Time>,
  /// Opaque payload / 不透明负载
  pub val: Bytes,
}

impl Row {
  /// Single-column row / 单列行
  pub fn new(col: impl Into<String>, ts: Time, val: impl Into<Bytes>) -> Self {
    let mut cols = BTreeMap::new();
    cols.insert(col.into(), ts);
    Self {
      cols,
      val: val.into(),
    }
  }

  /// Add another column / 增加一列
  pub fn with(mut self, col: impl Into<String>, ts: Time) -> Self {
    self.cols.insert(col.into(), ts);
    self
  }

  /// Column value / 列值
  #[inline]
  pub fn col(&self, name: &str) -> Option<Time> {
    self.cols.get(name).copied()
  }
}
