//! TTL errors / TTL 错误

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  /// REQUIRED destination missing from the policy; rejected atomically
  /// REQUIRED 目标在策略中不存在；整体拒绝
  #[error("unknown move destination: {0}")]
  BadTarget(String),
}
