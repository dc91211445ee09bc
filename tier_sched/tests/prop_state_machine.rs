//! Property tests for the move state machine / 移动状态机属性测试

use proptest::prelude::*;
use tier_sched::{MoveCtl, MoveState};

/// Actions that can be performed on MoveCtl / 可在 MoveCtl 上执行的操作
#[derive(Debug, Clone, Copy)]
enum Action {
  Enable,
  Disable,
  BeginScan,
  EndScan,
}

fn arb_action() -> impl Strategy<Value = Action> {
  prop_oneof![
    Just(Action::Enable),
    Just(Action::Disable),
    Just(Action::BeginScan),
    Just(Action::EndScan),
  ]
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(200))]

  /// Scanning is only ever entered from Enabled, and Disabled is only
  /// left through an explicit enable.
  /// 只能从 Enabled 进入 Scanning；只有显式 enable 才能离开 Disabled。
  #[test]
  fn transitions_are_legal(actions in prop::collection::vec(arb_action(), 0..60)) {
    let ctl = MoveCtl::new();
    prop_assert_eq!(ctl.state(), MoveState::Disabled);

    for action in actions {
      let before = ctl.state();
      match action {
        Action::Enable => {
          ctl.enable();
          match before {
            MoveState::Disabled => prop_assert_eq!(ctl.state(), MoveState::Enabled),
            _ => prop_assert_eq!(ctl.state(), before),
          }
        }
        Action::Disable => {
          ctl.disable();
          prop_assert_eq!(ctl.state(), MoveState::Disabled);
        }
        Action::BeginScan => {
          let started = ctl.begin_scan();
          if started {
            prop_assert_eq!(before, MoveState::Enabled);
            prop_assert_eq!(ctl.state(), MoveState::Scanning);
          } else {
            prop_assert_eq!(ctl.state(), before);
          }
        }
        Action::EndScan => {
          ctl.end_scan();
          match before {
            MoveState::Scanning => prop_assert_eq!(ctl.state(), MoveState::Enabled),
            _ => prop_assert_eq!(ctl.state(), before),
          }
        }
      }
    }
  }
}
