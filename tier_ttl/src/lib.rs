#![cfg_attr(docsrs, feature(doc_cfg))]

//! tier_ttl - TTL rules and evaluator
//! TTL 规则与评估器

mod error;
mod expr;
mod rule;
mod set;

pub use error::{Error, Result};
pub use expr::TtlExpr;
pub use rule::{Mode, Rule, Target};
pub use set::RuleSet;
