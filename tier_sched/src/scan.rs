//! Placement scan: evaluate parts, enqueue due moves
//! 放置扫描：评估数据块，排队到期移动

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use tier_base::{Part, Time};
use tier_move::{MoveJob, Op, OpMap, Throttle, execute};
use tier_topo::{Disk, Policy};
use tier_ttl::{RuleSet, Target};

use crate::{MoveCtl, Pool};

/// Everything a scan needs from the owning table
/// 扫描所需的表上下文
pub struct ScanCtx<'a> {
  pub table: &'a str,
  pub policy: &'a Rc<Policy>,
  pub rules: &'a Rc<RuleSet>,
  /// Every disk the table has ever seen, for source resolution after a
  /// policy change / 表见过的所有磁盘，策略更换后仍可解析源
  pub disks: &'a BTreeMap<String, Rc<Disk>>,
  pub throttle: Throttle,
  pub now: Time,
}

/// Per-table scheduler: state machine plus scan pass
/// 每表调度器：状态机加扫描过程
#[derive(Debug)]
pub struct Sched {
  ctl: MoveCtl,
  ops: OpMap,
  pool: Rc<Pool>,
}

impl Sched {
  pub fn new(pool: Rc<Pool>, ops: OpMap) -> Self {
    Self {
      ctl: MoveCtl::new(),
      ops,
      pool,
    }
  }

  #[inline]
  pub fn ctl(&self) -> &MoveCtl {
    &self.ctl
  }

  #[inline]
  pub fn ops(&self) -> &OpMap {
    &self.ops
  }

  #[inline]
  pub fn pool(&self) -> &Rc<Pool> {
    &self.pool
  }

  /// One scan over the given parts; read-only, merges and inserts may run
  /// concurrently. Returns the number of jobs enqueued.
  /// 对给定数据块扫描一轮；只读，可与合并、插入并发。返回排队任务数。
  pub fn scan<'a>(
    &self,
    ctx: &ScanCtx,
    parts: impl Iterator<Item = &'a Rc<RefCell<Part>>>,
  ) -> usize {
    if !self.ctl.begin_scan() {
      return 0;
    }
    let n = parts.filter(|part| self.try_part(ctx, part)).count();
    self.ctl.end_scan();
    n
  }

  /// Evaluate one part; enqueue its move when one is due. Used by scans
  /// and by merge/materialize for immediate re-evaluation.
  /// 评估单个数据块，到期则排队移动。供扫描及合并/物化的即时再评估使用。
  pub fn try_part(&self, ctx: &ScanCtx, part: &Rc<RefCell<Part>>) -> bool {
    if !self.ctl.is_enabled() {
      return false;
    }

    let (id, bytes, src_name, dst) = {
      let p = part.borrow();
      if !p.active {
        return false;
      }
      let Some(rule) = ctx.rules.evaluate(&p.ttl, ctx.now) else {
        return false;
      };
      let Some(dst) = resolve(&rule.target, &p, ctx) else {
        return false;
      };
      (p.id, p.bytes, p.disk.clone(), dst)
    };

    // one concurrent operation per part / 每数据块同时只有一个操作
    if self.pool.has(id) {
      return false;
    }
    let Some(src) = ctx.disks.get(&src_name) else {
      log::warn!("part {id}: unknown source disk {src_name}");
      return false;
    };
    let Some(guard) = self.ops.try_lock(id, Op::Move) else {
      return false;
    };

    let job = Rc::new(MoveJob::new(
      ctx.table,
      id,
      src_name,
      dst.name(),
      bytes,
      ctx.now,
    ));
    let fut = {
      let (job, part, src, dst) = (job.clone(), part.clone(), src.clone(), dst.clone());
      let throttle = ctx.throttle;
      async move {
        let _op = guard;
        execute(&job, &part, &src, &dst, throttle).await
      }
    };
    self.pool.submit(job, fut)
  }
}

/// Map a due rule to a destination disk, or None for "stay put".
/// 将到期规则映射为目标磁盘；None 表示原地不动。
fn resolve(target: &Target, part: &Part, ctx: &ScanCtx) -> Option<Rc<Disk>> {
  match target {
    // deletion is executed during compaction, not by the mover
    // 删除在合并时执行，移动器不处理
    Target::Delete => None,
    Target::Disk(name) => {
      // unknown name: IF_EXISTS rule or stale REQUIRED target, inert
      // 未知名：IF_EXISTS 规则或过期的 REQUIRED 目标，不生效
      let disk = ctx.policy.disk(name)?;
      if disk.name() == part.disk {
        return None;
      }
      if !disk.has_capacity(part.bytes) {
        log::debug!("part {}: move to {name} deferred, no space", part.id);
        return None;
      }
      Some(disk)
    }
    Target::Volume(name) => {
      let vol = ctx.policy.volume(name)?;
      // a different disk inside the target volume already satisfies it
      // 已在目标卷内的其他磁盘即视为满足
      if vol.contains(&part.disk) {
        return None;
      }
      if vol.max_part_bytes().is_some_and(|max| part.bytes > max) {
        return None;
      }
      match vol.disks().find(|d| d.has_capacity(part.bytes)) {
        Some(d) => Some(d.clone()),
        None => {
          log::debug!("part {}: move to volume {name} deferred, no space", part.id);
          None
        }
      }
    }
  }
}
