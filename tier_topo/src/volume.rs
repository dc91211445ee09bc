//! Volume: ordered disks with fallback allocation
//! 卷：按序磁盘与回退分配

use std::rc::Rc;

use crate::{Disk, Error, Reservation, Result};

/// Ordered group of disks used as a single allocation target.
/// 作为单一分配目标的有序磁盘组。
#[derive(Debug)]
pub struct Volume {
  name: String,
  disks: Vec<Rc<Disk>>,
  /// Parts above this size never land here / 超过此大小的数据块不落在此卷
  max_part_bytes: Option<u64>,
}

impl Volume {
  pub fn new(name: impl Into<String>, disks: Vec<Rc<Disk>>) -> Result<Rc<Self>> {
    let name = name.into();
    if disks.is_empty() {
      return Err(Error::EmptyVolume(name));
    }
    Ok(Rc::new(Self {
      name,
      disks,
      max_part_bytes: None,
    }))
  }

  pub fn with_max(
    name: impl Into<String>,
    disks: Vec<Rc<Disk>>,
    max_part_bytes: u64,
  ) -> Result<Rc<Self>> {
    let name = name.into();
    if disks.is_empty() {
      return Err(Error::EmptyVolume(name));
    }
    Ok(Rc::new(Self {
      name,
      disks,
      max_part_bytes: Some(max_part_bytes),
    }))
  }

  #[inline]
  pub fn name(&self) -> &str {
    &self.name
  }

  #[inline]
  pub fn disks(&self) -> impl Iterator<Item = &Rc<Disk>> {
    self.disks.iter()
  }

  #[inline]
  pub fn max_part_bytes(&self) -> Option<u64> {
    self.max_part_bytes
  }

  /// Whether a disk belongs to this volume / 磁盘是否属于此卷
  #[inline]
  pub fn contains(&self, disk: &str) -> bool {
    self.disks.iter().any(|d| d.name() == disk)
  }

  /// Reserve on the first disk with room, in fallback order
  /// 按回退顺序在首个有空间的磁盘上预留
  pub fn reserve(&self, bytes: u64) -> Option<Reservation> {
    if self.max_part_bytes.is_some_and(|max| bytes > max) {
      return None;
    }
    self.disks.iter().find_map(|d| d.reserve(bytes))
  }
}
