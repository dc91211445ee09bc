//! Process-wide move worker pool
//! 进程级移动工作池
//!
//! One pool is shared across tables; at most one job per part, a bounded
//! number of jobs overall. Jobs run as detached tasks on the runtime.
//! 一个池供所有表共享；每数据块最多一个任务，总量有上限。
//! 任务作为分离任务在运行时上执行。

use std::{cell::RefCell, collections::HashMap, future::Future, rc::Rc, time::Duration};

use tier_move::{MoveJob, Outcome};

/// Default concurrent move slots / 默认并发移动槽位
pub const DEFAULT_SLOTS: usize = 8;

/// Poll interval while draining / 排空时的轮询间隔
const DRAIN_MS: u64 = 10;

#[derive(Debug)]
pub struct Pool {
  jobs: RefCell<HashMap<u64, Rc<MoveJob>>>,
  slots: usize,
}

impl Pool {
  pub fn new(slots: usize) -> Rc<Self> {
    Rc::new(Self {
      jobs: RefCell::new(HashMap::new()),
      slots: slots.max(1),
    })
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.jobs.borrow().len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.jobs.borrow().is_empty()
  }

  /// Whether a part has a job in flight / 数据块是否有进行中的任务
  #[inline]
  pub fn has(&self, part: u64) -> bool {
    self.jobs.borrow().contains_key(&part)
  }

  /// In-flight jobs of one table / 一个表的进行中任务数
  pub fn table_len(&self, table: &str) -> usize {
    self
      .jobs
      .borrow()
      .values()
      .filter(|j| j.table == table)
      .count()
  }

  /// Snapshot for introspection / 自省快照
  pub fn jobs(&self) -> Vec<Rc<MoveJob>> {
    self.jobs.borrow().values().cloned().collect()
  }

  /// Run a move job as a detached task. Refused (false) when the part
  /// already has a job or all slots are busy; the next scan retries.
  /// 以分离任务执行移动。数据块已有任务或槽位占满时拒绝（返回 false），
  /// 由下次扫描重试。
  pub fn submit<F>(self: &Rc<Self>, job: Rc<MoveJob>, fut: F) -> bool
  where
    F: Future<Output = Outcome> + 'static,
  {
    {
      let mut jobs = self.jobs.borrow_mut();
      if jobs.len() >= self.slots || jobs.contains_key(&job.part) {
        return false;
      }
      jobs.insert(job.part, job.clone());
    }

    let weak = Rc::downgrade(self);
    let part = job.part;
    compio::runtime::spawn(async move {
      let outcome = fut.await;
      if let Some(pool) = weak.upgrade() {
        pool.jobs.borrow_mut().remove(&part);
      }
      log::debug!("part {part}: job finished: {outcome:?}");
    })
    .detach();
    true
  }

  /// Cancel every in-flight job of a table / 取消一个表的全部进行中任务
  pub fn cancel_table(&self, table: &str) {
    for job in self.jobs.borrow().values() {
      if job.table == table {
        job.cancel();
      }
    }
  }

  /// Block until a table has no jobs left / 等待一个表的任务清零
  pub async fn wait_table(&self, table: &str) {
    while self.table_len(table) > 0 {
      compio::time::sleep(Duration::from_millis(DRAIN_MS)).await;
    }
  }
}
