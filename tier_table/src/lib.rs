#![cfg_attr(docsrs, feature(doc_cfg))]

//! tier_table - Table facade
//! 表门面
//!
//! Ties topology, rules, scheduler and mover together: inserts, merges,
//! rule changes, materialization, control commands and introspection.
//! 将拓扑、规则、调度器与移动器组合起来：插入、合并、规则变更、
//! 物化、控制命令与自省。

mod conf;
mod error;
mod merge;
mod table;
mod view;

pub use conf::{Conf, ParsedConf};
pub use error::{Error, Result};
pub use table::Table;
pub use view::{MoveView, PartView};
