//! Table errors / 表错误

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("ttl: {0}")]
  Ttl(#[from] tier_ttl::Error),

  #[error("topology: {0}")]
  Topo(#[from] tier_topo::Error),

  /// No disk in the policy has room / 策略内没有磁盘有空间
  #[error("no space for {bytes} bytes in policy {policy}")]
  NoSpace { policy: String, bytes: u64 },

  /// Distinguishable, safely retryable no-op
  /// 可区分、可安全重试的空操作
  #[error("nothing to do")]
  NothingToDo,

  /// STOP MERGES is in effect / 合并已停止
  #[error("merges are stopped")]
  MergesStopped,

  #[error("unknown disk: {0}")]
  UnknownDisk(String),
}
