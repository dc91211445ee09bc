//! Topology errors / 拓扑错误

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("duplicate disk in policy: {0}")]
  DupDisk(String),

  #[error("volume has no disks: {0}")]
  EmptyVolume(String),

  #[error("policy has no volumes: {0}")]
  EmptyPolicy(String),
}
