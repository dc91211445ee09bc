//! In-memory part state and on-disk layout
//! 内存中的数据块状态与磁盘布局
//!
//! Layout on a disk: <root>/<table>/<base32 id>/{data, meta.json};
//! in-flight copies stage under <root>/<table>/moving/<base32 id>.
//! 磁盘布局：<root>/<表>/<base32 id>/{data, meta.json}；
//! 进行中的拷贝暂存于 <root>/<表>/moving/<base32 id>。

use std::path::{Path, PathBuf};

use fast32::base32::CROCKFORD_LOWER;

use crate::{PartMeta, TtlInfos};

/// Immutable unit of stored rows; only the disk pointer and the active
/// flag change after creation.
/// 不可变的行存储单元；创建后仅磁盘指针与活跃标记可变。
#[derive(Debug, Clone)]
pub struct Part {
  pub id: u64,
  pub partition: String,
  /// Current disk name / 当前磁盘名
  pub disk: String,
  pub rows: u64,
  pub bytes: u64,
  pub ttl: TtlInfos,
  /// Cleared when the part is merged away / 被合并后清除
  pub active: bool,
}

impl Part {
  /// Build from persisted metadata / 由持久化元数据构建
  pub fn from_meta(meta: PartMeta, disk: impl Into<String>) -> Self {
    Self {
      id: meta.id,
      partition: meta.partition,
      disk: disk.into(),
      rows: meta.rows,
      bytes: meta.bytes,
      ttl: meta.ttl,
      active: true,
    }
  }

  /// Metadata document for persistence / 用于持久化的元数据文档
  pub fn meta(&self) -> PartMeta {
    PartMeta {
      id: self.id,
      partition: self.partition.clone(),
      rows: self.rows,
      bytes: self.bytes,
      ttl: self.ttl.clone(),
    }
  }
}

/// Encode id as directory name / 将 id 编码为目录名
#[inline]
pub fn encode_id(id: u64) -> String {
  CROCKFORD_LOWER.encode_u64(id)
}

/// Table directory on a disk / 磁盘上的表目录
#[inline]
pub fn table_dir(root: &Path, table: &str) -> PathBuf {
  root.join(table)
}

/// Part directory on a disk / 磁盘上的数据块目录
#[inline]
pub fn part_dir(root: &Path, table: &str, id: u64) -> PathBuf {
  root.join(table).join(encode_id(id))
}

/// Staging directory for an in-flight copy / 进行中拷贝的暂存目录
#[inline]
pub fn staging_dir(root: &Path, table: &str, id: u64) -> PathBuf {
  root.join(table).join("moving").join(encode_id(id))
}
