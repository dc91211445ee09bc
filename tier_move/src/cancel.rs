//! Cooperative cancellation token
//! 协作取消令牌

use std::{
  rc::Rc,
  sync::atomic::{AtomicBool, Ordering::Relaxed},
};

/// Shared flag checked by the copy loop at bounded intervals
/// 拷贝循环在有界间隔内检查的共享标记
#[derive(Debug, Clone, Default)]
pub struct Cancel(Rc<AtomicBool>);

impl Cancel {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub fn cancel(&self) {
    self.0.store(true, Relaxed);
  }

  #[inline]
  pub fn is_cancelled(&self) -> bool {
    self.0.load(Relaxed)
  }
}
