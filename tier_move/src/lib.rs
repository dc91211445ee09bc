#![cfg_attr(docsrs, feature(doc_cfg))]

//! tier_move - Part move executor
//! 数据块移动执行器
//!
//! Copy, verify, swap, cleanup; cancellable at bounded intervals before
//! the swap, fire-and-forget to completion after it.
//! 拷贝、校验、切换、清理；切换前可在有界间隔内取消，切换后直达完成。

mod cancel;
mod error;
mod exec;
mod job;
mod op;
mod throttle;

pub use cancel::Cancel;
pub use error::{Error, Result};
pub use exec::execute;
pub use job::{MoveJob, Outcome};
pub use op::{Op, OpGuard, OpMap};
pub use throttle::Throttle;
