#![cfg_attr(docsrs, feature(doc_cfg))]

//! tier_sched - Placement scheduler
//! 放置调度器
//!
//! Scans parts, asks the rule set for each part's required target and
//! enqueues at most one move job per part on the shared pool.
//! 扫描数据块，向规则集询问每块的目标位置，
//! 在共享工作池上为每块最多排队一个移动任务。

mod pool;
mod scan;
mod state;

pub use pool::{DEFAULT_SLOTS, Pool};
pub use scan::{ScanCtx, Sched};
pub use state::{MoveCtl, MoveState};
