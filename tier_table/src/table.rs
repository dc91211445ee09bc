//! Table: parts, policy, rules and scheduler wiring
//! 表：数据块、策略、规则与调度器装配

use std::{
  cell::{Cell, RefCell},
  collections::BTreeMap,
  rc::{Rc, Weak},
  time::Duration,
};

use tier_base::{DATA_FILE, Part, PartMeta, Row, Time, decode_rows, encode_rows, fs, now, part_dir};
use tier_move::{OpMap, Throttle};
use tier_sched::{Pool, ScanCtx, Sched};
use tier_topo::{Disk, Policy, Reservation};
use tier_ttl::{RuleSet, Target};

use crate::{Conf, Error, ParsedConf, Result};

/// One table instance (one replica). Replicas evaluate placement
/// independently against their own local topology.
/// 一个表实例（一个副本）。各副本基于本地拓扑独立评估放置。
pub struct Table {
  name: String,
  conf: ParsedConf,
  policy: RefCell<Rc<Policy>>,
  /// Every disk ever attached, so sources still resolve after a policy swap
  /// 挂载过的全部磁盘，策略更换后源磁盘仍可解析
  disks: RefCell<BTreeMap<String, Rc<Disk>>>,
  rules: RefCell<Rc<RuleSet>>,
  parts: RefCell<BTreeMap<u64, Rc<RefCell<Part>>>>,
  pub(crate) sched: Sched,
  merges_on: Cell<bool>,
  /// Bumped on every START MOVES; stale scan loops see a newer epoch and exit
  /// 每次 START MOVES 递增；过期扫描循环看到更新的纪元即退出
  scan_epoch: Cell<u64>,
}

impl Table {
  /// Create a table. An invalid REQUIRED destination in the first rule
  /// set fails creation itself.
  /// 创建表。首个规则集的 REQUIRED 目标无效时建表本身失败。
  pub fn new(
    name: impl Into<String>,
    policy: Rc<Policy>,
    rules: RuleSet,
    pool: Rc<Pool>,
    conf: &[Conf],
  ) -> Result<Rc<Self>> {
    rules.validate(&policy)?;
    let disks = policy
      .disks()
      .map(|d| (d.name().to_owned(), d.clone()))
      .collect();
    Ok(Rc::new(Self {
      name: name.into(),
      conf: ParsedConf::new(conf),
      policy: RefCell::new(policy),
      disks: RefCell::new(disks),
      rules: RefCell::new(Rc::new(rules)),
      parts: RefCell::new(BTreeMap::new()),
      sched: Sched::new(pool, OpMap::new()),
      merges_on: Cell::new(true),
      scan_epoch: Cell::new(0),
    }))
  }

  #[inline]
  pub fn name(&self) -> &str {
    &self.name
  }

  #[inline]
  pub fn conf(&self) -> &ParsedConf {
    &self.conf
  }

  /// Current rule-set snapshot / 当前规则集快照
  #[inline]
  pub fn rules(&self) -> Rc<RuleSet> {
    self.rules.borrow().clone()
  }

  #[inline]
  pub fn policy(&self) -> Rc<Policy> {
    self.policy.borrow().clone()
  }

  pub fn part(&self, id: u64) -> Option<Rc<RefCell<Part>>> {
    self.parts.borrow().get(&id).cloned()
  }

  pub(crate) fn active_parts(&self, partition: Option<&str>) -> Vec<Rc<RefCell<Part>>> {
    self
      .parts
      .borrow()
      .values()
      .filter(|part| {
        let p = part.borrow();
        p.active && partition.is_none_or(|key| key == p.partition)
      })
      .cloned()
      .collect()
  }

  /// Total active rows; constant across moves / 活跃总行数；移动前后不变
  pub fn count(&self) -> u64 {
    self
      .parts
      .borrow()
      .values()
      .filter(|p| p.borrow().active)
      .map(|p| p.borrow().rows)
      .sum()
  }

  pub(crate) fn disk(&self, name: &str) -> Result<Rc<Disk>> {
    self
      .disks
      .borrow()
      .get(name)
      .cloned()
      .ok_or_else(|| Error::UnknownDisk(name.to_owned()))
  }

  fn throttle(&self) -> Throttle {
    Throttle::new(self.conf.bytes_per_sec)
  }

  /// Insert rows as a new part / 插入行生成新数据块
  pub async fn insert(
    &self,
    partition: &str,
    rows: Vec<Row>,
    now: Time,
  ) -> Result<Rc<RefCell<Part>>> {
    if rows.is_empty() {
      return Err(Error::NothingToDo);
    }
    let rules = self.rules();
    let infos = rules.compute(&rows);
    let data = encode_rows(&rows);
    let bytes = data.len() as u64;
    let res = self.place(&infos, bytes, now)?;
    let meta = PartMeta {
      id: ider::id(),
      partition: partition.to_owned(),
      rows: rows.len() as u64,
      bytes,
      ttl: infos,
    };
    self.install(meta, data, res).await
  }

  /// Attach a replicated part. Its aggregates were computed elsewhere and
  /// travel in `meta`; rows are never rescanned, yet placement follows the
  /// local topology, which may differ from the peer's.
  /// 挂载副本数据块。聚合在别处计算并随 `meta` 传输；不重扫行，
  /// 放置依照本地拓扑，可与对端不同。
  pub async fn attach(
    &self,
    meta: PartMeta,
    data: Vec<u8>,
    now: Time,
  ) -> Result<Rc<RefCell<Part>>> {
    let res = self.place(&meta.ttl, meta.bytes, now)?;
    self.install(meta, data, res).await
  }

  /// Destination for a new part: a due rule's target first (when insert
  /// placement is on and moves are enabled), else first fit in the policy.
  /// 新数据块的落点：到期规则目标优先（插入放置开启且移动启用时），
  /// 否则按策略顺序首个可用。
  fn place(
    &self,
    infos: &tier_base::TtlInfos,
    bytes: u64,
    now: Time,
  ) -> Result<Reservation> {
    let policy = self.policy();
    if self.conf.move_on_insert && self.sched.ctl().is_enabled() {
      let rules = self.rules();
      if let Some(rule) = rules.evaluate(infos, now) {
        match &rule.target {
          Target::Disk(name) => {
            if let Some(disk) = policy.disk(name)
              && let Some(res) = disk.reserve(bytes)
            {
              return Ok(res);
            }
          }
          Target::Volume(name) => {
            if let Some(vol) = policy.volume(name)
              && let Some(res) = vol.reserve(bytes)
            {
              return Ok(res);
            }
          }
          // expired rows still insert; compaction drops them later
          // 过期行照常插入；合并时再删除
          Target::Delete => {}
        }
      }
    }
    policy.pick(bytes).ok_or_else(|| Error::NoSpace {
      policy: policy.name().to_owned(),
      bytes,
    })
  }

  /// Write part files, commit the reservation, register the part
  /// 写出数据块文件，提交预留，登记数据块
  pub(crate) async fn install(
    &self,
    meta: PartMeta,
    data: Vec<u8>,
    res: Reservation,
  ) -> Result<Rc<RefCell<Part>>> {
    let disk = res.disk().clone();
    let dir = part_dir(disk.root(), &self.name, meta.id);
    std::fs::create_dir_all(&dir)?;
    fs::write_file(dir.join(DATA_FILE), data).await?;
    meta.save(&dir).await?;
    res.commit();
    let id = meta.id;
    let part = Rc::new(RefCell::new(Part::from_meta(meta, disk.name())));
    self.parts.borrow_mut().insert(id, part.clone());
    Ok(part)
  }

  /// Load a part's rows from its current disk / 从当前磁盘加载数据块行
  pub async fn load_rows(&self, part: &Rc<RefCell<Part>>) -> Result<Vec<Row>> {
    let (disk_name, id) = {
      let p = part.borrow();
      (p.disk.clone(), p.id)
    };
    let disk = self.disk(&disk_name)?;
    let buf = fs::read_file(part_dir(disk.root(), &self.name, id).join(DATA_FILE)).await?;
    Ok(decode_rows(&buf)?)
  }

  /// ALTER MODIFY TTL: atomic wholesale snapshot swap. In-flight moves
  /// scheduled under the old set run to completion.
  /// ALTER MODIFY TTL：原子整体快照替换。旧规则集下的移动照常完成。
  pub async fn set_rules(&self, rules: RuleSet, now: Time) -> Result<()> {
    rules.validate(&self.policy.borrow())?;
    *self.rules.borrow_mut() = Rc::new(rules);
    if self.conf.materialize_on_alter {
      self.materialize(None, now).await?;
    }
    Ok(())
  }

  /// Attach a new policy; existing parts are not retroactively moved and
  /// the rule set is not re-validated.
  /// 更换策略；已有数据块不回溯移动，规则集不重新校验。
  pub fn set_policy(&self, policy: Rc<Policy>) {
    let mut disks = self.disks.borrow_mut();
    for d in policy.disks() {
      disks.insert(d.name().to_owned(), d.clone());
    }
    drop(disks);
    *self.policy.borrow_mut() = policy;
  }

  /// One scan over active parts, optionally one partition
  /// 对活跃数据块扫描一轮，可限定分区
  pub fn scan_in(&self, partition: Option<&str>, now: Time) -> usize {
    let parts = self.active_parts(partition);
    let policy = self.policy();
    let rules = self.rules();
    let disks = self.disks.borrow();
    let ctx = ScanCtx {
      table: &self.name,
      policy: &policy,
      rules: &rules,
      disks: &disks,
      throttle: self.throttle(),
      now,
    };
    self.sched.scan(&ctx, parts.iter())
  }

  /// Explicit full scan trigger / 显式全量扫描触发
  #[inline]
  pub fn scan(&self, now: Time) -> usize {
    self.scan_in(None, now)
  }

  /// Immediate re-evaluation of specific parts, bypassing the scan cadence
  /// 绕过扫描节奏，对指定数据块即时再评估
  pub(crate) fn scan_parts(&self, parts: &[Rc<RefCell<Part>>], now: Time) -> usize {
    let policy = self.policy();
    let rules = self.rules();
    let disks = self.disks.borrow();
    let ctx = ScanCtx {
      table: &self.name,
      policy: &policy,
      rules: &rules,
      disks: &disks,
      throttle: self.throttle(),
      now,
    };
    parts
      .iter()
      .filter(|part| self.sched.try_part(&ctx, part))
      .count()
  }

  /// START MOVES: enable and spawn the periodic scan loop
  /// START MOVES：启用并启动周期扫描循环
  pub fn start_moves(self: &Rc<Self>) {
    if self.sched.ctl().is_enabled() {
      return;
    }
    self.sched.ctl().enable();
    let epoch = self.scan_epoch.get() + 1;
    self.scan_epoch.set(epoch);
    let weak = Rc::downgrade(self);
    let secs = self.conf.scan_secs;
    compio::runtime::spawn(scan_loop(weak, secs, epoch)).detach();
  }

  /// STOP MOVES: cancel in-flight jobs and wait until none remain
  /// STOP MOVES：取消进行中的任务并等待清零
  pub async fn stop_moves(&self) {
    self.sched.ctl().disable();
    self.sched.pool().cancel_table(&self.name);
    self.sched.pool().wait_table(&self.name).await;
  }

  /// Detach the table: moves drain before the table goes away
  /// 卸载表：移动先排空再离开
  pub async fn detach(&self) {
    self.stop_moves().await;
  }

  #[inline]
  pub fn moves_enabled(&self) -> bool {
    self.sched.ctl().is_enabled()
  }

  /// START MERGES / 启用合并
  pub fn start_merges(&self) {
    self.merges_on.set(true);
  }

  /// STOP MERGES / 停止合并
  pub fn stop_merges(&self) {
    self.merges_on.set(false);
  }

  #[inline]
  pub fn merges_enabled(&self) -> bool {
    self.merges_on.get()
  }

  /// Retire a part: free its space and remove its files
  /// 淘汰数据块：释放空间并删除文件
  pub(crate) fn retire(&self, part: &Rc<RefCell<Part>>) -> Result<()> {
    let mut p = part.borrow_mut();
    p.active = false;
    let disk = self.disk(&p.disk)?;
    disk.free(p.bytes);
    fs::rm_dir(&part_dir(disk.root(), &self.name, p.id));
    drop(p);
    self
      .parts
      .borrow_mut()
      .retain(|_, part| part.borrow().active);
    Ok(())
  }
}

/// Periodic scan driver; exits when the table is gone, moves are disabled,
/// or a later START MOVES spawned a replacement loop
/// 周期扫描驱动；表消失、移动停用或更晚的 START MOVES 启动替代循环时退出
async fn scan_loop(weak: Weak<Table>, secs: u64, epoch: u64) {
  let dur = Duration::from_secs(secs);
  loop {
    compio::time::sleep(dur).await;
    let Some(table) = weak.upgrade() else {
      break;
    };
    if table.scan_epoch.get() != epoch || !table.sched.ctl().is_enabled() {
      break;
    }
    let n = table.scan(now());
    if n > 0 {
      log::debug!("{}: scan enqueued {n} moves", table.name());
    }
  }
}
