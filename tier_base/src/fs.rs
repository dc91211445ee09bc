//! Async file helpers
//! 异步文件辅助

use std::{io, path::Path};

use compio::io::{AsyncReadAtExt, AsyncWriteAtExt};
use compio_fs::OpenOptions;

/// Read entire file / 读取整个文件
pub async fn read_file(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
  let file = OpenOptions::new().read(true).open(path).await?;
  let res = file.read_to_end_at(Vec::new(), 0).await;
  res.0?;
  Ok(res.1)
}

/// Write and sync a whole file / 写入并同步整个文件
pub async fn write_file(path: impl AsRef<Path>, data: Vec<u8>) -> io::Result<()> {
  let mut file = OpenOptions::new()
    .write(true)
    .create(true)
    .truncate(true)
    .open(path)
    .await?;
  file.write_all_at(data, 0).await.0?;
  file.sync_all().await
}

/// Write to temp file, rename to target on success
/// 写入临时文件，成功后重命名到目标
pub async fn save_atomic(path: &Path, data: Vec<u8>) -> io::Result<()> {
  let tmp = path.with_extension("tmp");
  write_file(&tmp, data).await?;
  std::fs::rename(&tmp, path)
}

/// Remove a directory tree, ignoring absence
/// 删除目录树，忽略不存在
pub fn rm_dir(path: &Path) {
  if let Err(e) = std::fs::remove_dir_all(path)
    && e.kind() != io::ErrorKind::NotFound
  {
    log::warn!("rm {}: {e}", path.display());
  }
}
