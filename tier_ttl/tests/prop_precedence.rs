//! Property tests for rule precedence / 规则优先级属性测试

use proptest::prelude::*;
use tier_base::Row;
use tier_ttl::{Rule, RuleSet, TtlExpr};

/// Build a rule with the given delay; even indices move, odd delete
/// 按延迟构造规则；偶数下标移动，奇数删除
fn rule(idx: usize, delay: i64) -> Rule {
  if idx % 2 == 0 {
    Rule::to_disk(TtlExpr::plus("d", delay), format!("disk{idx}"))
  } else {
    Rule::delete(TtlExpr::plus("d", delay))
  }
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(200))]

  /// The winner is always a due rule, and no due rule has a strictly
  /// later instant than the winner.
  /// 获胜者必然到期，且没有到期规则的时刻严格晚于获胜者。
  #[test]
  fn winner_has_latest_due_instant(
    delays in prop::collection::vec(-100i64..100, 1..8),
    ts in 0i64..50,
    now in 0i64..100,
  ) {
    let rules: Vec<Rule> = delays.iter().enumerate().map(|(i, d)| rule(i, *d)).collect();
    let set = RuleSet::new(rules);
    let infos = set.compute(&[Row::new("d", ts, &b""[..])]);

    let due: Vec<i64> = delays.iter().map(|d| ts + d).filter(|t| *t <= now).collect();
    match set.evaluate(&infos, now) {
      None => prop_assert!(due.is_empty()),
      Some(winner) => {
        let instant = ts + winner.expr.delay();
        prop_assert!(instant <= now);
        let latest = due.iter().copied().max().unwrap();
        prop_assert_eq!(instant, latest);
      }
    }
  }

  /// With a delete rule due at the latest instant, the winner is a delete.
  /// 删除规则在最晚时刻到期时，获胜者必为删除。
  #[test]
  fn due_delete_at_latest_wins(
    move_delay in -50i64..50,
    delete_delay in -50i64..50,
    ts in 0i64..50,
  ) {
    let set = RuleSet::new(vec![
      Rule::delete(TtlExpr::plus("d", delete_delay)),
      Rule::to_disk(TtlExpr::plus("d", move_delay), "cold"),
    ]);
    let infos = set.compute(&[Row::new("d", ts, &b""[..])]);
    let now = ts + move_delay.max(delete_delay);
    let winner = set.evaluate(&infos, now).unwrap();
    if delete_delay >= move_delay {
      prop_assert!(winner.target.is_delete());
    } else {
      prop_assert!(!winner.target.is_delete());
    }
  }
}
