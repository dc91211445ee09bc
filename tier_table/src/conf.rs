//! Table configuration
//! 表配置

/// Default configuration values / 默认配置值
pub mod default {
  /// Scan interval in seconds / 扫描间隔（秒）
  pub const SCAN_SECS: u64 = 1;
  /// 0 = unthrottled / 0 为不限速
  pub const BYTES_PER_SEC: u64 = 0;
  pub const MATERIALIZE_ON_ALTER: bool = false;
  pub const MOVE_ON_INSERT: bool = true;
}

/// Table configuration knobs / 表配置项
#[derive(Debug, Clone, Copy)]
pub enum Conf {
  /// Periodic scan interval / 周期扫描间隔
  ScanSecs(u64),
  /// Per-copy bandwidth limit / 单拷贝带宽限制
  BytesPerSec(u64),
  /// Re-materialize aggregates after every rule change
  /// 每次规则变更后重算聚合
  MaterializeOnAlter(bool),
  /// Place inserts directly on the due rule's target
  /// 插入时直接落到到期规则的目标
  MoveOnInsert(bool),
}

/// Parsed configuration / 解析后的配置
#[derive(Debug, Clone, Copy)]
pub struct ParsedConf {
  pub scan_secs: u64,
  pub bytes_per_sec: u64,
  pub materialize_on_alter: bool,
  pub move_on_insert: bool,
}

impl Default for ParsedConf {
  fn default() -> Self {
    Self {
      scan_secs: default::SCAN_SECS,
      bytes_per_sec: default::BYTES_PER_SEC,
      materialize_on_alter: default::MATERIALIZE_ON_ALTER,
      move_on_insert: default::MOVE_ON_INSERT,
    }
  }
}

impl ParsedConf {
  pub fn new(conf: &[Conf]) -> Self {
    let mut c = Self::default();
    for item in conf {
      match *item {
        Conf::ScanSecs(v) => c.scan_secs = v.max(1),
        Conf::BytesPerSec(v) => c.bytes_per_sec = v,
        Conf::MaterializeOnAlter(v) => c.materialize_on_alter = v,
        Conf::MoveOnInsert(v) => c.move_on_insert = v,
      }
    }
    c
  }
}
