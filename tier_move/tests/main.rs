//! Move executor tests / 移动执行器测试

use std::{cell::RefCell, rc::Rc, time::Duration};

use aok::{OK, Void};
use tier_base::{DATA_FILE, Part, PartMeta, Row, encode_rows, fs, part_dir, staging_dir};
use tier_move::{Error, MoveJob, Outcome, Throttle, execute};
use tier_topo::Disk;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

const TABLE: &str = "t";

/// Write a part onto a disk and account its space
/// 在磁盘上写出数据块并计入空间
async fn seed_part(disk: &Rc<Disk>, id: u64, rows: usize) -> Void {
  let rows: Vec<Row> = (0..rows)
    .map(|i| Row::new("d", 1000 + i as i64, vec![b'x'; 100]))
    .collect();
  let data = encode_rows(&rows);
  let bytes = data.len() as u64;

  let dir = part_dir(disk.root(), TABLE, id);
  std::fs::create_dir_all(&dir)?;
  fs::write_file(dir.join(DATA_FILE), data).await?;
  let meta = PartMeta {
    id,
    partition: "all".to_owned(),
    rows: rows.len() as u64,
    bytes,
    ttl: Default::default(),
  };
  meta.save(&dir).await?;
  disk.reserve(bytes).unwrap().commit();
  OK
}

fn part_on(disk: &Rc<Disk>, id: u64, bytes: u64) -> Rc<RefCell<Part>> {
  Rc::new(RefCell::new(Part {
    id,
    partition: "all".to_owned(),
    disk: disk.name().to_owned(),
    rows: 10,
    bytes,
    ttl: Default::default(),
    active: true,
  }))
}

#[compio::test]
async fn move_completes_and_cleans_source() -> Void {
  let tmp = tempfile::tempdir()?;
  let a = Disk::new("a", tmp.path().join("a"), 1 << 20);
  let b = Disk::new("b", tmp.path().join("b"), 1 << 20);
  let id = fastrand::u64(1..u64::MAX);
  seed_part(&a, id, 10).await?;
  let bytes = a.used();
  let src_data = fs::read_file(part_dir(a.root(), TABLE, id).join(DATA_FILE)).await?;

  let part = part_on(&a, id, bytes);
  let job = MoveJob::new(TABLE, id, "a", "b", bytes, 0);
  let outcome = execute(&job, &part, &a, &b, Throttle::default()).await;
  assert!(outcome.is_completed());

  assert_eq!(part.borrow().disk, "b");
  assert_eq!(a.used(), 0);
  assert_eq!(b.used(), bytes);
  assert!(!part_dir(a.root(), TABLE, id).exists());
  let dst_data = fs::read_file(part_dir(b.root(), TABLE, id).join(DATA_FILE)).await?;
  assert_eq!(src_data, dst_data);
  assert_eq!(job.bytes_done(), bytes);
  OK
}

#[compio::test]
async fn cancel_leaves_source_intact() -> Void {
  let tmp = tempfile::tempdir()?;
  let a = Disk::new("a", tmp.path().join("a"), 1 << 20);
  let b = Disk::new("b", tmp.path().join("b"), 1 << 20);
  let id = fastrand::u64(1..u64::MAX);
  seed_part(&a, id, 10).await?;
  let bytes = a.used();

  let part = part_on(&a, id, bytes);
  let job = MoveJob::new(TABLE, id, "a", "b", bytes, 0);
  job.cancel();
  let outcome = execute(&job, &part, &a, &b, Throttle::default()).await;
  assert!(outcome.is_cancelled());

  assert_eq!(part.borrow().disk, "a");
  assert_eq!(a.used(), bytes);
  assert_eq!(b.used(), 0);
  assert_eq!(b.reserved(), 0);
  assert!(part_dir(a.root(), TABLE, id).exists());
  assert!(!staging_dir(b.root(), TABLE, id).exists());
  assert!(!part_dir(b.root(), TABLE, id).exists());
  OK
}

#[compio::test]
async fn cancel_mid_copy() -> Void {
  let tmp = tempfile::tempdir()?;
  let a = Disk::new("a", tmp.path().join("a"), 1 << 22);
  let b = Disk::new("b", tmp.path().join("b"), 1 << 22);
  let id = fastrand::u64(1..u64::MAX);
  // ~128 KiB of data, throttled to 32 KiB/s: seconds of copy time
  // 约 128 KiB 数据，限速 32 KiB/s：拷贝需数秒
  seed_part(&a, id, 1200).await?;
  let bytes = a.used();

  let part = part_on(&a, id, bytes);
  let job = Rc::new(MoveJob::new(TABLE, id, "a", "b", bytes, 0));
  let handle = {
    let (job, part, a, b) = (job.clone(), part.clone(), a.clone(), b.clone());
    compio::runtime::spawn(async move {
      execute(&job, &part, &a, &b, Throttle::new(32 << 10)).await
    })
  };
  compio::time::sleep(Duration::from_millis(100)).await;
  job.cancel();
  let outcome = handle.await.unwrap();
  assert!(outcome.is_cancelled());
  assert!(job.bytes_done() < bytes);

  assert_eq!(part.borrow().disk, "a");
  assert_eq!(a.used(), bytes);
  assert_eq!(b.used() + b.reserved(), 0);
  assert!(part_dir(a.root(), TABLE, id).exists());
  assert!(!staging_dir(b.root(), TABLE, id).exists());
  OK
}

#[compio::test]
async fn full_destination_fails_softly() -> Void {
  let tmp = tempfile::tempdir()?;
  let a = Disk::new("a", tmp.path().join("a"), 1 << 20);
  let b = Disk::new("b", tmp.path().join("b"), 16);
  let id = fastrand::u64(1..u64::MAX);
  seed_part(&a, id, 10).await?;
  let bytes = a.used();

  let part = part_on(&a, id, bytes);
  let job = MoveJob::new(TABLE, id, "a", "b", bytes, 0);
  let outcome = execute(&job, &part, &a, &b, Throttle::default()).await;
  assert!(matches!(outcome, Outcome::Failed(Error::NoSpace(_))));

  assert_eq!(part.borrow().disk, "a");
  assert_eq!(a.used(), bytes);
  assert!(part_dir(a.root(), TABLE, id).exists());
  OK
}
