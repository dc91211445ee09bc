#![cfg_attr(docsrs, feature(doc_cfg))]

//! tier_base - Shared types for the tier placement engine
//! tier 放置引擎共享类型
//!
//! Rows, parts, TTL aggregates and the part files they persist to.
//! 行、数据块、TTL 聚合及其持久化的数据块文件。

mod data;
pub mod fs;
mod meta;
mod part;
mod row;
mod time;
mod ttl_info;

pub use data::{DATA_FILE, decode_rows, encode_rows};
pub use meta::{META_FILE, PartMeta};
pub use part::{Part, encode_id, part_dir, staging_dir, table_dir};
pub use row::Row;
pub use time::{Time, now};
pub use ttl_info::{TtlInfo, TtlInfos};
