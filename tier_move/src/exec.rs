//! Move execution: reserve, staged copy, verify, swap, cleanup
//! 移动执行：预留、暂存拷贝、校验、切换、清理

use std::{cell::RefCell, path::Path, rc::Rc};

use compio::io::{AsyncReadAt, AsyncWriteAtExt};
use compio_fs::OpenOptions;
use tier_base::{DATA_FILE, META_FILE, Part, fs, part_dir, staging_dir};
use tier_topo::Disk;

use crate::{Error, MoveJob, Outcome, Result, Throttle};

/// Run a move job end to end. Failure is non-fatal: the source stays
/// untouched and the next scan rediscovers the discrepancy.
/// 端到端执行移动任务。失败非致命：源保持原样，下次扫描重新发现差异。
pub async fn execute(
  job: &MoveJob,
  part: &Rc<RefCell<Part>>,
  src: &Rc<Disk>,
  dst: &Rc<Disk>,
  throttle: Throttle,
) -> Outcome {
  let staging = staging_dir(dst.root(), &job.table, job.part);
  match run(job, part, src, dst, &staging, throttle).await {
    Ok(outcome) => outcome,
    Err(e) => {
      fs::rm_dir(&staging);
      log::warn!("move part {} to {}: {e}", job.part, dst.name());
      Outcome::Failed(e)
    }
  }
}

async fn run(
  job: &MoveJob,
  part: &Rc<RefCell<Part>>,
  src: &Rc<Disk>,
  dst: &Rc<Disk>,
  staging: &Path,
  throttle: Throttle,
) -> Result<Outcome> {
  // Capacity was advisory at scan time; this reservation is the real check
  // 扫描时的容量检查仅供参考；此处预留才是真正的检查
  let Some(res) = dst.reserve(job.bytes) else {
    return Err(Error::NoSpace(dst.name().to_owned()));
  };

  let src_dir = part_dir(src.root(), &job.table, job.part);
  std::fs::create_dir_all(staging)?;

  let Some(crc) = copy_data(job, &src_dir, staging, throttle).await? else {
    fs::rm_dir(staging);
    log::info!("part {}: move to {} cancelled", job.part, job.to);
    return Ok(Outcome::Cancelled);
  };

  // Verify the staged copy before it can ever become visible
  // 暂存副本可见之前先校验
  let copied = fs::read_file(staging.join(DATA_FILE)).await?;
  if crc32fast::hash(&copied) != crc {
    return Err(Error::Verify(job.part));
  }

  // Aggregates travel with the part / 聚合随数据块传输
  let meta = fs::read_file(src_dir.join(META_FILE)).await?;
  fs::write_file(staging.join(META_FILE), meta).await?;

  // Last cancel window; after the swap the job runs to completion
  // 最后的取消窗口；切换后任务直达完成
  if job.is_cancelled() {
    fs::rm_dir(staging);
    log::info!("part {}: move to {} cancelled", job.part, job.to);
    return Ok(Outcome::Cancelled);
  }

  // Atomic swap: readers see the old or the new location, never both
  // 原子切换：读者只能看到旧位置或新位置，不会是中间态
  let final_dir = part_dir(dst.root(), &job.table, job.part);
  std::fs::rename(staging, &final_dir)?;
  part.borrow_mut().disk = dst.name().to_owned();
  res.commit();
  src.free(job.bytes);

  // Old location is now eligible for removal / 旧位置此时可移除
  fs::rm_dir(&src_dir);
  log::info!(
    "part {}: moved {} -> {} ({} bytes)",
    job.part,
    job.from,
    job.to,
    job.bytes
  );
  Ok(Outcome::Completed)
}

/// Chunked copy; returns the source crc32, or None when cancelled
/// 分块拷贝；返回源 crc32，取消时返回 None
async fn copy_data(
  job: &MoveJob,
  src_dir: &Path,
  staging: &Path,
  throttle: Throttle,
) -> Result<Option<u32>> {
  let src = OpenOptions::new()
    .read(true)
    .open(src_dir.join(DATA_FILE))
    .await?;
  let mut dst = OpenOptions::new()
    .write(true)
    .create(true)
    .truncate(true)
    .open(staging.join(DATA_FILE))
    .await?;

  let chunk = throttle.chunk();
  let mut hasher = crc32fast::Hasher::new();
  let mut pos = 0u64;
  loop {
    if job.is_cancelled() {
      return Ok(None);
    }
    let res = src.read_at(Vec::with_capacity(chunk), pos).await;
    let n = res.0?;
    if n == 0 {
      break;
    }
    let buf = res.1;
    hasher.update(&buf);
    dst.write_all_at(buf, pos).await.0?;
    pos += n as u64;
    job.add_done(n as u64);
    throttle.pause(n).await;
  }
  dst.sync_all().await?;
  Ok(Some(hasher.finalize()))
}
