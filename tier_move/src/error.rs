//! Move errors / 移动错误

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  /// Destination re-check failed; the scan retries later
  /// 目标再检查失败；扫描稍后重试
  #[error("no space on disk {0}")]
  NoSpace(String),

  /// Staged copy does not match the source / 暂存副本与源不一致
  #[error("verify failed for part {0}")]
  Verify(u64),
}
