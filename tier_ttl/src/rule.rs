//! TTL rule: expression, target, existence mode
//! TTL 规则：表达式、目标、存在模式

use crate::TtlExpr;

/// Relocation target / 迁移目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
  Disk(String),
  Volume(String),
  /// Rows are dropped during compaction, never by the mover
  /// 行在合并时删除，移动器不处理
  Delete,
}

impl Target {
  #[inline]
  pub fn is_delete(&self) -> bool {
    matches!(self, Self::Delete)
  }

  /// Destination name; None for DELETE / 目标名；DELETE 为 None
  pub fn name(&self) -> Option<&str> {
    match self {
      Self::Disk(n) | Self::Volume(n) => Some(n),
      Self::Delete => None,
    }
  }
}

/// REQUIRED targets must resolve at validation time; IF_EXISTS rules stay
/// silently inert wherever the target is absent.
/// REQUIRED 目标须在校验时可解析；IF_EXISTS 规则在目标缺失处静默不生效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
  #[default]
  Required,
  IfExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub expr: TtlExpr,
  pub target: Target,
  pub mode: Mode,
}

impl Rule {
  /// `TTL <expr> TO DISK '<name>'`
  pub fn to_disk(expr: TtlExpr, name: impl Into<String>) -> Self {
    Self {
      expr,
      target: Target::Disk(name.into()),
      mode: Mode::Required,
    }
  }

  /// `TTL <expr> TO VOLUME '<name>'`
  pub fn to_volume(expr: TtlExpr, name: impl Into<String>) -> Self {
    Self {
      expr,
      target: Target::Volume(name.into()),
      mode: Mode::Required,
    }
  }

  /// `TTL <expr> DELETE`
  pub fn delete(expr: TtlExpr) -> Self {
    Self {
      expr,
      target: Target::Delete,
      mode: Mode::Required,
    }
  }

  /// `... IF EXISTS` variant / `... IF EXISTS` 形式
  pub fn if_exists(mut self) -> Self {
    self.mode = Mode::IfExists;
    self
  }
}
