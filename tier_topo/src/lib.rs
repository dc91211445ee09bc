#![cfg_attr(docsrs, feature(doc_cfg))]

//! tier_topo - Storage topology
//! 存储拓扑
//!
//! Named disks grouped into ordered volumes, forming a storage policy.
//! Capacity checks are advisory; reservations hold space until committed.
//! 命名磁盘按序组成卷，卷组成存储策略。
//! 容量检查仅供参考；预留在提交前占住空间。

mod disk;
mod error;
mod policy;
mod volume;

pub use disk::{Disk, Reservation};
pub use error::{Error, Result};
pub use policy::Policy;
pub use volume::Volume;
