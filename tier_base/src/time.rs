//! Coarse wall clock / 粗粒度墙钟

/// Unix seconds / Unix 秒
pub type Time = i64;

/// Current wall clock in unix seconds
/// 当前墙钟（Unix 秒）
#[inline]
pub fn now() -> Time {
  coarsetime::Clock::now_since_epoch().as_secs() as Time
}
