//! Introspection views over parts and in-flight moves
//! 数据块与进行中移动的自省视图

use std::collections::BTreeSet;

use tier_base::Time;

use crate::Table;

/// One row of the parts view / 数据块视图的一行
#[derive(Debug, Clone)]
pub struct PartView {
  pub part: u64,
  pub partition: String,
  /// Current disk name / 当前磁盘名
  pub disk: String,
  pub rows: u64,
  pub bytes: u64,
}

/// One row of the moves view / 移动视图的一行
#[derive(Debug, Clone)]
pub struct MoveView {
  pub part: u64,
  pub from: String,
  pub to: String,
  /// Seconds since the job started / 任务开始以来的秒数
  pub elapsed: Time,
  pub bytes: u64,
  pub bytes_done: u64,
}

impl Table {
  /// Active parts with their current placement / 活跃数据块及其当前落点
  pub fn parts_view(&self) -> Vec<PartView> {
    self
      .active_parts(None)
      .iter()
      .map(|part| {
        let p = part.borrow();
        PartView {
          part: p.id,
          partition: p.partition.clone(),
          disk: p.disk.clone(),
          rows: p.rows,
          bytes: p.bytes,
        }
      })
      .collect()
  }

  /// In-flight moves of this table / 本表进行中的移动
  pub fn moves_view(&self, now: Time) -> Vec<MoveView> {
    self
      .sched
      .pool()
      .jobs()
      .into_iter()
      .filter(|job| job.table == self.name())
      .map(|job| MoveView {
        part: job.part,
        from: job.from.clone(),
        to: job.to.clone(),
        elapsed: now.saturating_sub(job.started),
        bytes: job.bytes,
        bytes_done: job.bytes_done(),
      })
      .collect()
  }

  /// Distinct disks holding active parts / 持有活跃数据块的磁盘集合
  pub fn used_disks(&self) -> BTreeSet<String> {
    self
      .active_parts(None)
      .iter()
      .map(|part| part.borrow().disk.clone())
      .collect()
  }
}
