//! Part metadata document
//! 数据块元数据文档
//!
//! Persisted next to the data file and carried along during moves and
//! replication, so TTL aggregates never require rescanning rows.
//! 与数据文件一同持久化，并随移动与复制传输，
//! TTL 聚合因此无需重扫行。

use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{TtlInfos, fs};

/// Metadata file name inside a part directory / 数据块目录内的元数据文件名
pub const META_FILE: &str = "meta.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartMeta {
  pub id: u64,
  /// Partition key / 分区键
  pub partition: String,
  /// Row count / 行数
  pub rows: u64,
  /// Data file size / 数据文件大小
  pub bytes: u64,
  /// Per-expression aggregates / 按表达式聚合
  pub ttl: TtlInfos,
}

impl PartMeta {
  /// Save atomically into a part directory / 原子保存到数据块目录
  pub async fn save(&self, dir: &Path) -> io::Result<()> {
    let data = serde_json::to_vec(self)?;
    fs::save_atomic(&dir.join(META_FILE), data).await
  }

  /// Load from a part directory / 从数据块目录加载
  pub async fn load(dir: &Path) -> io::Result<Self> {
    let buf = fs::read_file(dir.join(META_FILE)).await?;
    Ok(serde_json::from_slice(&buf)?)
  }
}
