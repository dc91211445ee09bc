//! Rule set: ordered rules, validation, aggregates, evaluation
//! 规则集：有序规则、校验、聚合、评估

use tier_base::{Row, Time, TtlInfo, TtlInfos};
use tier_topo::Policy;

use crate::{Error, Mode, Result, Rule, Target};

/// Ordered rule list, replaced wholesale by ALTER.
/// 有序规则列表，由 ALTER 整体替换。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
  rules: Vec<Rule>,
}

impl RuleSet {
  pub fn new(rules: Vec<Rule>) -> Self {
    Self { rules }
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.rules.len()
  }

  #[inline]
  pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
    self.rules.iter()
  }

  /// Validate REQUIRED destinations against a policy. Atomic: the first
  /// unknown destination rejects the whole set. IF_EXISTS rules bypass.
  /// 按策略校验 REQUIRED 目标。原子性：任一未知目标即整体拒绝。
  /// IF_EXISTS 规则跳过校验。
  pub fn validate(&self, policy: &Policy) -> Result<()> {
    for rule in &self.rules {
      if rule.mode == Mode::IfExists {
        continue;
      }
      match &rule.target {
        Target::Disk(name) if policy.disk(name).is_none() => {
          return Err(Error::BadTarget(name.clone()));
        }
        Target::Volume(name) if policy.volume(name).is_none() => {
          return Err(Error::BadTarget(name.clone()));
        }
        _ => {}
      }
    }
    Ok(())
  }

  /// Compute per-expression aggregates over rows. Rows missing a column
  /// contribute nothing; an expression no row carries yields no aggregate,
  /// which keeps its rules inert until a materialize.
  /// 计算行上的按表达式聚合。缺列的行不参与；
  /// 无任何行携带的表达式不产生聚合，其规则在 materialize 前不生效。
  pub fn compute(&self, rows: &[Row]) -> TtlInfos {
    let mut infos = TtlInfos::new();
    for rule in &self.rules {
      let key = rule.expr.key();
      if infos.contains_key(&key) {
        continue;
      }
      let mut agg: Option<TtlInfo> = None;
      for row in rows {
        if let Some(t) = rule.expr.row_value(row) {
          match &mut agg {
            Some(info) => info.update(t),
            None => agg = Some(TtlInfo::new(t)),
          }
        }
      }
      if let Some(info) = agg {
        infos.insert(key, info);
      }
    }
    infos
  }

  /// Pick the winning due rule, if any.
  /// 选出获胜的到期规则（若有）。
  ///
  /// A rule's trigger instant is the max aggregate of its expression: every
  /// row must qualify before the part as a whole moves or is deleted.
  /// Among rules due at `now`, the latest instant wins; a due DELETE beats
  /// any DISK/VOLUME rule whose instant is not strictly later; ties go to
  /// the later-declared rule. Parts lacking an expression's aggregate
  /// cannot qualify for that rule.
  /// 规则的触发时刻取其表达式的最大聚合：所有行到期后数据块才整体移动或删除。
  /// 在到期规则中最晚时刻获胜；到期的 DELETE 胜过任何时刻不严格更晚的
  /// DISK/VOLUME 规则；时刻相同时后声明者获胜；缺少聚合的表达式不参与。
  pub fn evaluate(&self, infos: &TtlInfos, now: Time) -> Option<&Rule> {
    let mut best: Option<(&Rule, Time)> = None;
    for rule in &self.rules {
      let Some(info) = infos.get(&rule.expr.key()) else {
        continue;
      };
      let instant = info.max;
      if instant > now {
        continue;
      }
      best = match best {
        None => Some((rule, instant)),
        Some((best_rule, best_instant)) => {
          // A non-delete challenger must be strictly later to beat a delete
          // 非删除规则须严格更晚才能胜过删除规则
          let wins = if !rule.target.is_delete() && best_rule.target.is_delete() {
            instant > best_instant
          } else {
            instant >= best_instant
          };
          if wins {
            Some((rule, instant))
          } else {
            Some((best_rule, best_instant))
          }
        }
      };
    }
    best.map(|(rule, _)| rule)
  }

  /// Whether a merge's row-copy pass must drop this row: some DELETE
  /// rule's expression value has passed for the row itself.
  /// 合并行拷贝是否应丢弃该行：某 DELETE 规则的表达式值对该行已到期。
  pub fn row_expired(&self, row: &Row, now: Time) -> bool {
    self.rules.iter().any(|r| {
      r.target.is_delete() && r.expr.row_value(row).is_some_and(|t| t <= now)
    })
  }
}

#[cfg(test)]
mod tests {
  use tier_base::Row;

  use super::*;
  use crate::TtlExpr;

  fn infos_at(ts: Time, set: &RuleSet) -> TtlInfos {
    set.compute(&[Row::new("d", ts, &b"x"[..])])
  }

  #[test]
  fn empty_set_no_op() {
    let set = RuleSet::default();
    assert_eq!(set.evaluate(&TtlInfos::new(), 1000), None);
  }

  #[test]
  fn latest_instant_wins() {
    let set = RuleSet::new(vec![
      Rule::to_disk(TtlExpr::plus("d", 10), "warm"),
      Rule::to_disk(TtlExpr::plus("d", 20), "cold"),
    ]);
    let infos = infos_at(100, &set);
    // only the first rule is due / 仅第一条规则到期
    let rule = set.evaluate(&infos, 115).unwrap();
    assert_eq!(rule.target, Target::Disk("warm".into()));
    // both due, later instant wins / 两条都到期，较晚时刻获胜
    let rule = set.evaluate(&infos, 125).unwrap();
    assert_eq!(rule.target, Target::Disk("cold".into()));
  }

  #[test]
  fn delete_beats_not_strictly_later() {
    let set = RuleSet::new(vec![
      Rule::delete(TtlExpr::plus("d", 20)),
      Rule::to_disk(TtlExpr::plus("d", 20), "cold"),
    ]);
    let infos = infos_at(100, &set);
    assert!(set.evaluate(&infos, 200).unwrap().target.is_delete());

    // strictly later disk rule still wins / 严格更晚的磁盘规则仍获胜
    let set = RuleSet::new(vec![
      Rule::delete(TtlExpr::plus("d", 10)),
      Rule::to_disk(TtlExpr::plus("d", 20), "cold"),
    ]);
    let infos = infos_at(100, &set);
    assert!(!set.evaluate(&infos, 200).unwrap().target.is_delete());
  }

  #[test]
  fn tie_later_declared_wins() {
    let set = RuleSet::new(vec![
      Rule::to_disk(TtlExpr::plus("d", 10), "first"),
      Rule::to_disk(TtlExpr::plus("d", 10), "second"),
    ]);
    let infos = infos_at(100, &set);
    let rule = set.evaluate(&infos, 150).unwrap();
    assert_eq!(rule.target, Target::Disk("second".into()));
  }

  #[test]
  fn all_rows_must_qualify() {
    let set = RuleSet::new(vec![Rule::to_disk(TtlExpr::col("d"), "cold")]);
    let infos = set.compute(&[
      Row::new("d", 100, &b"a"[..]),
      Row::new("d", 900, &b"b"[..]),
    ]);
    // slowest row not due yet / 最慢的行尚未到期
    assert_eq!(set.evaluate(&infos, 500), None);
    assert!(set.evaluate(&infos, 900).is_some());
  }

  #[test]
  fn missing_aggregate_inert() {
    let set = RuleSet::new(vec![Rule::to_disk(TtlExpr::col("e"), "cold")]);
    // aggregates computed under an older rule set lack "e"
    // 旧规则集下计算的聚合缺少 "e"
    let old = RuleSet::new(vec![Rule::to_disk(TtlExpr::col("d"), "cold")]);
    let infos = old.compute(&[Row::new("d", 100, &b"a"[..])]);
    assert_eq!(set.evaluate(&infos, 10_000), None);
  }

  #[test]
  fn row_expired_per_row() {
    let set = RuleSet::new(vec![
      Rule::delete(TtlExpr::plus("d", 100)),
      Rule::to_disk(TtlExpr::col("d"), "cold"),
    ]);
    assert!(set.row_expired(&Row::new("d", 50, &b""[..]), 200));
    assert!(!set.row_expired(&Row::new("d", 150, &b""[..]), 200));
  }
}
