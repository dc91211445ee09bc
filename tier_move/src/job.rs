//! In-flight move record
//! 进行中的移动记录

use std::cell::Cell;

use tier_base::Time;

use crate::{Cancel, Error};

/// Ephemeral job state, visible via introspection while in flight,
/// destroyed on completion or cancellation.
/// 临时任务状态，进行中可自省，完成或取消后销毁。
#[derive(Debug)]
pub struct MoveJob {
  pub table: String,
  pub part: u64,
  pub from: String,
  pub to: String,
  pub bytes: u64,
  pub started: Time,
  bytes_done: Cell<u64>,
  cancel: Cancel,
}

impl MoveJob {
  pub fn new(
    table: impl Into<String>,
    part: u64,
    from: impl Into<String>,
    to: impl Into<String>,
    bytes: u64,
    started: Time,
  ) -> Self {
    Self {
      table: table.into(),
      part,
      from: from.into(),
      to: to.into(),
      bytes,
      started,
      bytes_done: Cell::new(0),
      cancel: Cancel::new(),
    }
  }

  /// Request cooperative cancellation / 请求协作取消
  #[inline]
  pub fn cancel(&self) {
    self.cancel.cancel();
  }

  #[inline]
  pub fn is_cancelled(&self) -> bool {
    self.cancel.is_cancelled()
  }

  #[inline]
  pub fn bytes_done(&self) -> u64 {
    self.bytes_done.get()
  }

  #[inline]
  pub(crate) fn add_done(&self, n: u64) {
    self.bytes_done.set(self.bytes_done.get() + n);
  }
}

/// Move result / 移动结果
#[derive(Debug)]
pub enum Outcome {
  /// Part now lives on the destination / 数据块已在目标磁盘
  Completed,
  /// Source untouched, staging discarded / 源完好，暂存已丢弃
  Cancelled,
  /// Non-fatal; rediscovered by the next scan / 非致命；下次扫描重试
  Failed(Error),
}

impl Outcome {
  #[inline]
  pub fn is_completed(&self) -> bool {
    matches!(self, Self::Completed)
  }

  #[inline]
  pub fn is_cancelled(&self) -> bool {
    matches!(self, Self::Cancelled)
  }
}
