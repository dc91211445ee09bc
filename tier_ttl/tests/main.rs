//! Rule set validation tests / 规则集校验测试

use tier_topo::{Disk, Policy, Volume};
use tier_ttl::{Error, Rule, RuleSet, TtlExpr};

fn policy() -> std::rc::Rc<Policy> {
  let a = Disk::new("jbod1", "/jbod1", 100);
  let b = Disk::new("external", "/external", 1000);
  let main = Volume::new("main", vec![a]).unwrap();
  let ext = Volume::new("ext", vec![b]).unwrap();
  Policy::new("tiered", vec![main, ext]).unwrap()
}

#[test]
fn required_unknown_disk_rejected() {
  let set = RuleSet::new(vec![
    Rule::to_disk(TtlExpr::col("d"), "external"),
    Rule::to_disk(TtlExpr::plus("d", 60), "unknown"),
  ]);
  assert!(matches!(
    set.validate(&policy()),
    Err(Error::BadTarget(name)) if name == "unknown"
  ));
}

#[test]
fn required_unknown_volume_rejected() {
  let set = RuleSet::new(vec![Rule::to_volume(TtlExpr::col("d"), "nowhere")]);
  assert!(set.validate(&policy()).is_err());
}

#[test]
fn if_exists_unknown_accepted() {
  let set = RuleSet::new(vec![
    Rule::to_disk(TtlExpr::col("d"), "unknown").if_exists(),
    Rule::to_volume(TtlExpr::plus("d", 60), "nowhere").if_exists(),
  ]);
  set.validate(&policy()).unwrap();
}

#[test]
fn delete_needs_no_destination() {
  let set = RuleSet::new(vec![Rule::delete(TtlExpr::col("d"))]);
  set.validate(&policy()).unwrap();
}

#[test]
fn valid_set_accepted() {
  let set = RuleSet::new(vec![
    Rule::to_disk(TtlExpr::col("d"), "external"),
    Rule::to_volume(TtlExpr::plus("d", 3600), "main"),
    Rule::delete(TtlExpr::plus("d", 86400)),
  ]);
  set.validate(&policy()).unwrap();
}
