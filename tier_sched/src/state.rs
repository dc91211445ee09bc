//! Per-table move scheduling state machine
//! 每表移动调度状态机

use std::cell::Cell;

/// `Disabled → Enabled ⇄ Scanning`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveState {
  /// Moves stopped / 移动已停止
  #[default]
  Disabled,
  /// Waiting for the next scan / 等待下次扫描
  Enabled,
  /// Scan in progress / 扫描进行中
  Scanning,
}

/// Explicit state object, not ambient global mutable state
/// 显式状态对象，而非环境全局可变状态
#[derive(Debug, Default)]
pub struct MoveCtl {
  state: Cell<MoveState>,
}

impl MoveCtl {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub fn state(&self) -> MoveState {
    self.state.get()
  }

  /// START MOVES / 启动移动
  pub fn enable(&self) {
    if self.state.get() == MoveState::Disabled {
      self.state.set(MoveState::Enabled);
    }
  }

  /// STOP MOVES; the owner cancels in-flight jobs after this
  /// 停止移动；调用方随后取消进行中的任务
  pub fn disable(&self) {
    self.state.set(MoveState::Disabled);
  }

  /// Begin a scan; only possible while Enabled / 仅在 Enabled 时可开始扫描
  pub fn begin_scan(&self) -> bool {
    if self.state.get() == MoveState::Enabled {
      self.state.set(MoveState::Scanning);
      true
    } else {
      false
    }
  }

  /// Finish a scan; a concurrent disable sticks / 结束扫描；并发停止优先
  pub fn end_scan(&self) {
    if self.state.get() == MoveState::Scanning {
      self.state.set(MoveState::Enabled);
    }
  }

  #[inline]
  pub fn is_enabled(&self) -> bool {
    self.state.get() != MoveState::Disabled
  }
}
