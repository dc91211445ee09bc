//! Copy throttle; also bounds cancel-check latency
//! 拷贝限速；同时限定取消检查延迟
//!
//! The chunk size tracks the configured throughput, so a slow throttled
//! copy still observes its cancel flag within a bounded delay.
//! 块大小跟随配置吞吐量，慢速限流拷贝仍能在有界延迟内观察到取消标记。

use std::time::Duration;

/// Cancel checks per second at full throttle / 满速时每秒取消检查次数
const CHECKS_PER_SEC: u64 = 10;

const MIN_CHUNK: u64 = 4 << 10;
const MAX_CHUNK: u64 = 1 << 20;

/// Chunk when unthrottled / 不限速时的块大小
const FREE_CHUNK: u64 = 256 << 10;

/// Per-copy bandwidth limit; 0 means unthrottled
/// 单拷贝带宽限制；0 表示不限速
#[derive(Debug, Clone, Copy, Default)]
pub struct Throttle {
  bytes_per_sec: u64,
}

impl Throttle {
  pub fn new(bytes_per_sec: u64) -> Self {
    Self { bytes_per_sec }
  }

  #[inline]
  pub fn bytes_per_sec(&self) -> u64 {
    self.bytes_per_sec
  }

  /// Copy chunk size / 拷贝块大小
  pub fn chunk(&self) -> usize {
    if self.bytes_per_sec == 0 {
      return FREE_CHUNK as usize;
    }
    (self.bytes_per_sec / CHECKS_PER_SEC).clamp(MIN_CHUNK, MAX_CHUNK) as usize
  }

  /// Pause after writing n bytes / 写入 n 字节后的停顿
  pub async fn pause(&self, n: usize) {
    if self.bytes_per_sec == 0 {
      return;
    }
    let secs = n as f64 / self.bytes_per_sec as f64;
    compio::time::sleep(Duration::from_secs_f64(secs)).await;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn chunk_tracks_throughput() {
    assert_eq!(Throttle::default().chunk(), FREE_CHUNK as usize);
    assert_eq!(Throttle::new(1).chunk(), MIN_CHUNK as usize);
    assert_eq!(Throttle::new(100 << 20).chunk(), MAX_CHUNK as usize);
    let t = Throttle::new(640 << 10);
    assert_eq!(t.chunk() as u64, 64 << 10);
  }
}
