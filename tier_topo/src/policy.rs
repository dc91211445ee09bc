//! Storage policy: ordered volumes attached to a table
//! 存储策略：挂载到表的有序卷

use std::{collections::HashSet, rc::Rc};

use crate::{Disk, Error, Reservation, Result, Volume};

/// Named ordered set of volumes. Validation happens at attach time and
/// is never retroactively re-checked when a table swaps policies.
/// 命名的有序卷集合。校验在挂载时进行，表更换策略时不回溯重查。
#[derive(Debug)]
pub struct Policy {
  name: String,
  volumes: Vec<Rc<Volume>>,
}

impl Policy {
  /// Rejects duplicate disk names across volumes
  /// 拒绝跨卷重复的磁盘名
  pub fn new(name: impl Into<String>, volumes: Vec<Rc<Volume>>) -> Result<Rc<Self>> {
    let name = name.into();
    if volumes.is_empty() {
      return Err(Error::EmptyPolicy(name));
    }
    let mut seen = HashSet::new();
    for vol in &volumes {
      for disk in vol.disks() {
        if !seen.insert(disk.name().to_owned()) {
          return Err(Error::DupDisk(disk.name().to_owned()));
        }
      }
    }
    Ok(Rc::new(Self { name, volumes }))
  }

  #[inline]
  pub fn name(&self) -> &str {
    &self.name
  }

  #[inline]
  pub fn volumes(&self) -> impl Iterator<Item = &Rc<Volume>> {
    self.volumes.iter()
  }

  /// All disks in volume order / 按卷顺序的全部磁盘
  pub fn disks(&self) -> impl Iterator<Item = &Rc<Disk>> {
    self.volumes.iter().flat_map(|v| v.disks())
  }

  /// Resolve a disk by name / 按名解析磁盘
  pub fn disk(&self, name: &str) -> Option<Rc<Disk>> {
    self.disks().find(|d| d.name() == name).cloned()
  }

  /// Resolve a volume by name / 按名解析卷
  pub fn volume(&self, name: &str) -> Option<&Rc<Volume>> {
    self.volumes.iter().find(|v| v.name() == name)
  }

  /// Volume holding a disk / 持有某磁盘的卷
  pub fn volume_of(&self, disk: &str) -> Option<&Rc<Volume>> {
    self.volumes.iter().find(|v| v.contains(disk))
  }

  /// Insert-time allocation: walk volumes, then disks, in order
  /// 插入时分配：按顺序遍历卷与磁盘
  pub fn pick(&self, bytes: u64) -> Option<Reservation> {
    self.volumes.iter().find_map(|v| v.reserve(bytes))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn two_tier() -> Rc<Policy> {
    let a = Disk::new("jbod1", "/jbod1", 40);
    let b = Disk::new("external", "/external", 200);
    let hot = Volume::new("hot", vec![a]).unwrap();
    let cold = Volume::new("cold", vec![b]).unwrap();
    Policy::new("tiered", vec![hot, cold]).unwrap()
  }

  #[test]
  fn resolve() {
    let policy = two_tier();
    assert!(policy.disk("jbod1").is_some());
    assert!(policy.disk("nope").is_none());
    assert!(policy.volume("cold").is_some());
    assert_eq!(policy.volume_of("external").unwrap().name(), "cold");
  }

  #[test]
  fn dup_disk_rejected() {
    let a = Disk::new("a", "/a", 10);
    let v1 = Volume::new("v1", vec![a.clone()]).unwrap();
    let v2 = Volume::new("v2", vec![a]).unwrap();
    assert!(matches!(
      Policy::new("p", vec![v1, v2]),
      Err(Error::DupDisk(_))
    ));
  }

  #[test]
  fn pick_walks_volumes() {
    let policy = two_tier();
    let r1 = policy.pick(30).unwrap();
    assert_eq!(r1.disk().name(), "jbod1");
    // first volume full, falls through to the second
    // 第一个卷已满，落到第二个卷
    let r2 = policy.pick(30).unwrap();
    assert_eq!(r2.disk().name(), "external");
  }
}
