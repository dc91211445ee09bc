//! TTL expression language: a timestamp column plus a constant delay
//! TTL 表达式语言：时间戳列加常量延迟
//!
//! The canonical key indexes part aggregates, so an expression keeps its
//! aggregates across rule-set replacement.
//! 规范键用于索引数据块聚合，规则集整体替换后表达式仍能命中原聚合。

use tier_base::{Row, Time};

/// `col` or `col ± delay` (seconds) / `col` 或 `col ± 延迟`（秒）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlExpr {
  col: String,
  delay: i64,
}

impl TtlExpr {
  /// Bare column / 裸列
  pub fn col(name: impl Into<String>) -> Self {
    Self {
      col: name.into(),
      delay: 0,
    }
  }

  /// Column plus delay seconds / 列加延迟秒
  pub fn plus(name: impl Into<String>, delay: i64) -> Self {
    Self {
      col: name.into(),
      delay,
    }
  }

  #[inline]
  pub fn col_name(&self) -> &str {
    &self.col
  }

  #[inline]
  pub fn delay(&self) -> i64 {
    self.delay
  }

  /// Canonical key for aggregate lookup / 聚合查找的规范键
  pub fn key(&self) -> String {
    if self.delay == 0 {
      self.col.clone()
    } else if self.delay > 0 {
      format!("{}+{}", self.col, self.delay)
    } else {
      format!("{}{}", self.col, self.delay)
    }
  }

  /// Expression value for one row; None when the column is absent
  /// 单行的表达式值；列缺失时为 None
  #[inline]
  pub fn row_value(&self, row: &Row) -> Option<Time> {
    row.col(&self.col).map(|t| t + self.delay)
  }
}
