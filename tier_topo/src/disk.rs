//! Disk with capacity accounting
//! 带容量核算的磁盘

use std::{
  cell::Cell,
  path::{Path, PathBuf},
  rc::Rc,
};

/// Named disk; capacity is fixed at configuration time.
/// 命名磁盘；容量在配置时固定。
#[derive(Debug)]
pub struct Disk {
  name: String,
  root: PathBuf,
  capacity: u64,
  used: Cell<u64>,
  reserved: Cell<u64>,
}

impl Disk {
  pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, capacity: u64) -> Rc<Self> {
    Rc::new(Self {
      name: name.into(),
      root: root.into(),
      capacity,
      used: Cell::new(0),
      reserved: Cell::new(0),
    })
  }

  #[inline]
  pub fn name(&self) -> &str {
    &self.name
  }

  #[inline]
  pub fn root(&self) -> &Path {
    &self.root
  }

  #[inline]
  pub fn capacity(&self) -> u64 {
    self.capacity
  }

  #[inline]
  pub fn used(&self) -> u64 {
    self.used.get()
  }

  #[inline]
  pub fn reserved(&self) -> u64 {
    self.reserved.get()
  }

  /// Advisory check; redone by `reserve` before a move commits
  /// 仅供参考的检查；移动提交前由 `reserve` 再次执行
  #[inline]
  pub fn has_capacity(&self, bytes: u64) -> bool {
    self.used.get() + self.reserved.get() + bytes <= self.capacity
  }

  /// Reserve space; released on drop unless committed
  /// 预留空间；未提交则随 drop 释放
  pub fn reserve(self: &Rc<Self>, bytes: u64) -> Option<Reservation> {
    if !self.has_capacity(bytes) {
      return None;
    }
    self.reserved.set(self.reserved.get() + bytes);
    Some(Reservation {
      disk: Rc::clone(self),
      bytes,
      done: false,
    })
  }

  /// Release committed space / 释放已提交空间
  pub fn free(&self, bytes: u64) {
    self.used.set(self.used.get().saturating_sub(bytes));
  }
}

/// RAII space reservation / RAII 空间预留
#[derive(Debug)]
pub struct Reservation {
  disk: Rc<Disk>,
  bytes: u64,
  done: bool,
}

impl Reservation {
  #[inline]
  pub fn disk(&self) -> &Rc<Disk> {
    &self.disk
  }

  #[inline]
  pub fn bytes(&self) -> u64 {
    self.bytes
  }

  /// Turn reserved space into used space / 将预留空间转为已用空间
  pub fn commit(mut self) {
    self.disk.reserved.set(self.disk.reserved.get() - self.bytes);
    self.disk.used.set(self.disk.used.get() + self.bytes);
    self.done = true;
  }
}

impl Drop for Reservation {
  fn drop(&mut self) {
    if !self.done {
      self.disk.reserved.set(self.disk.reserved.get() - self.bytes);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reserve_commit_free() {
    let disk = Disk::new("a", "/a", 100);
    let res = disk.reserve(60).unwrap();
    assert!(!disk.has_capacity(50));
    assert!(disk.reserve(50).is_none());
    res.commit();
    assert_eq!(disk.used(), 60);
    assert_eq!(disk.reserved(), 0);
    disk.free(60);
    assert!(disk.has_capacity(100));
  }

  #[test]
  fn dropped_reservation_releases() {
    let disk = Disk::new("a", "/a", 100);
    {
      let _res = disk.reserve(100).unwrap();
      assert!(disk.reserve(1).is_none());
    }
    assert!(disk.has_capacity(100));
    assert_eq!(disk.used(), 0);
  }
}
