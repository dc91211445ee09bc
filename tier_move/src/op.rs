//! Part-level exclusive operations shared by move and merge
//! 移动与合并共享的数据块级独占操作
//!
//! A part being merged cannot simultaneously be moved and vice versa;
//! the second operation to arrive defers.
//! 正在合并的数据块不能同时移动，反之亦然；后到的操作让步。

use std::{cell::RefCell, collections::HashMap, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Move,
  Merge,
}

/// Part-id-keyed registry of in-progress operations
/// 以数据块 id 为键的进行中操作注册表
#[derive(Debug, Clone, Default)]
pub struct OpMap(Rc<RefCell<HashMap<u64, Op>>>);

impl OpMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Acquire the part's exclusive op, or defer
  /// 获取数据块独占操作，失败则让步
  pub fn try_lock(&self, part: u64, op: Op) -> Option<OpGuard> {
    let mut map = self.0.borrow_mut();
    if map.contains_key(&part) {
      return None;
    }
    map.insert(part, op);
    Some(OpGuard {
      map: self.clone(),
      part,
    })
  }

  /// Current op on a part / 数据块当前操作
  pub fn op(&self, part: u64) -> Option<Op> {
    self.0.borrow().get(&part).copied()
  }

  #[inline]
  pub fn is_locked(&self, part: u64) -> bool {
    self.0.borrow().contains_key(&part)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.0.borrow().len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.0.borrow().is_empty()
  }
}

/// Released on drop / 随 drop 释放
#[derive(Debug)]
pub struct OpGuard {
  map: OpMap,
  part: u64,
}

impl Drop for OpGuard {
  fn drop(&mut self) {
    self.map.0.borrow_mut().remove(&self.part);
  }
}
