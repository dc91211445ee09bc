//! Merge and materialize: compaction with expired-row drops, aggregate
//! recomputation after rule changes
//! 合并与物化：合并时删除到期行，规则变更后重算聚合

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use tier_base::{Part, PartMeta, Row, Time, encode_rows, part_dir};
use tier_move::Op;

use crate::{Error, Result, Table};

impl Table {
  /// Compact a partition's active parts into one. Rows whose DELETE rule
  /// is due are dropped. Parts under a move or another merge are skipped;
  /// fewer than two free inputs is `NothingToDo`. All inputs dropping
  /// their rows yields `Ok(None)` and no output part.
  /// 将分区的活跃数据块合并为一个。DELETE 规则到期的行被删除。
  /// 移动或合并中的数据块跳过；可用输入不足两个返回 `NothingToDo`。
  /// 所有行均被删除时返回 `Ok(None)`，不产生输出。
  pub async fn merge(
    &self,
    partition: &str,
    now: Time,
  ) -> Result<Option<Rc<RefCell<Part>>>> {
    if !self.merges_enabled() {
      return Err(Error::MergesStopped);
    }

    // lock inputs for the whole merge; moves hold the same lock
    // 整个合并期间锁定输入；移动持同一把锁
    let mut inputs = Vec::new();
    let mut guards = Vec::new();
    for part in self.active_parts(Some(partition)) {
      let id = part.borrow().id;
      if let Some(guard) = self.sched.ops().try_lock(id, Op::Merge) {
        inputs.push(part);
        guards.push(guard);
      }
    }
    if inputs.len() < 2 {
      return Err(Error::NothingToDo);
    }

    let rules = self.rules();
    let mut rows: Vec<Row> = Vec::new();
    for part in &inputs {
      for row in self.load_rows(part).await? {
        if !rules.row_expired(&row, now) {
          rows.push(row);
        }
      }
    }

    // everything expired: the partition shrinks to nothing
    // 全部到期：分区收缩为空
    if rows.is_empty() {
      for part in &inputs {
        self.retire(part)?;
      }
      return Ok(None);
    }

    let data = encode_rows(&rows);
    let bytes = data.len() as u64;
    let major = majority_disk(&inputs);
    let disk = self.disk(&major)?;
    let policy = self.policy();
    // output lands where most input bytes already live, spilling to the
    // rest of that disk's volume
    // 输出落在多数输入字节所在的磁盘，不足时溢出到同卷其余磁盘
    let res = disk
      .reserve(bytes)
      .or_else(|| policy.volume_of(&major).and_then(|v| v.reserve(bytes)))
      .ok_or_else(|| Error::NoSpace {
        policy: policy.name().to_owned(),
        bytes,
      })?;

    let meta = PartMeta {
      id: ider::id(),
      partition: partition.to_owned(),
      rows: rows.len() as u64,
      bytes,
      ttl: rules.compute(&rows),
    };
    let part = self.install(meta, data, res).await?;

    for input in &inputs {
      self.retire(input)?;
    }
    drop(guards);

    // the merged part may itself be due for a move already
    // 合并产物可能立即到期需要移动
    self.scan_parts(std::slice::from_ref(&part), now);
    Ok(Some(part))
  }

  /// MATERIALIZE TTL: rescan rows of active parts (optionally one
  /// partition) and rewrite stale aggregates, then re-evaluate placement.
  /// Returns how many parts changed.
  /// MATERIALIZE TTL：重扫活跃数据块的行（可限定分区），
  /// 重写过期聚合并再评估放置。返回变更的数据块数。
  pub async fn materialize(&self, partition: Option<&str>, now: Time) -> Result<usize> {
    let rules = self.rules();
    let parts = self.active_parts(partition);
    let mut changed = 0;
    for part in &parts {
      let rows = self.load_rows(part).await?;
      let infos = rules.compute(&rows);
      let stale = {
        let mut p = part.borrow_mut();
        if p.ttl == infos {
          None
        } else {
          p.ttl = infos;
          Some((p.meta(), p.disk.clone()))
        }
      };
      if let Some((meta, disk_name)) = stale {
        let disk = self.disk(&disk_name)?;
        meta.save(&part_dir(disk.root(), self.name(), meta.id)).await?;
        changed += 1;
      }
    }
    self.scan_parts(&parts, now);
    Ok(changed)
  }
}

/// Disk holding the most input bytes / 输入字节最多的磁盘
fn majority_disk(parts: &[Rc<RefCell<Part>>]) -> String {
  let mut by_disk: BTreeMap<String, u64> = BTreeMap::new();
  for part in parts {
    let p = part.borrow();
    *by_disk.entry(p.disk.clone()).or_default() += p.bytes;
  }
  by_disk
    .into_iter()
    .max_by_key(|(_, bytes)| *bytes)
    .map(|(disk, _)| disk)
    .unwrap_or_default()
}
