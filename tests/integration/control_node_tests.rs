//! Control node against a scripted link.
//!
//! Each test queues what the HMI would send, runs the node until the
//! script is exhausted (link reports closed), then inspects the bytes it
//! answered with and what it did to storage and actuators.

use doorlock::app::events::{DoorEvent, Node};
use doorlock::app::ports::MotorDirection;
use doorlock::config::LockConfig;
use doorlock::control::{ControlNode, ControlState};
use doorlock::error::{Error, LinkError};
use doorlock::protocol::{CMD_CHANGE, CMD_OPEN, Credential, TRY_AGAIN, WAIT_MSG};

use crate::mock_hw::{ActuatorCall, MockControlBoard, RecordingSink, frame};

const PIN: [u8; 5] = [1, 2, 3, 4, 5];
const WRONG: [u8; 5] = [9, 9, 9, 9, 9];

fn run(board: MockControlBoard) -> (MockControlBoard, RecordingSink, ControlState) {
    let mut node = ControlNode::new(board, RecordingSink::new(), LockConfig::default());
    node.start();
    let Err(e) = node.run();
    assert_eq!(e, Error::Link(LinkError::Closed));
    let state = node.state();
    let (hw, sink) = node.into_parts();
    (hw, sink, state)
}

/// Script that provisions `PIN` and then sends `rest`.
fn provisioned_then(rest: &[u8]) -> Vec<u8> {
    let mut rx = frame(PIN);
    rx.extend(frame(PIN));
    rx.extend_from_slice(rest);
    rx
}

fn attempt(command: u8, symbols: [u8; 5]) -> Vec<u8> {
    let mut v = vec![command];
    v.extend(frame(symbols));
    v
}

// ── Provisioning ──────────────────────────────────────────────

#[test]
fn mismatch_then_retry_provisions_second_pair() {
    let mut rx = frame(PIN);
    rx.extend(frame(WRONG));
    rx.push(TRY_AGAIN);
    rx.extend(frame(WRONG));
    rx.extend(frame(WRONG));

    let (hw, sink, state) = run(MockControlBoard::with_rx(rx));

    assert_eq!(hw.tx, [0, 1]);
    assert_eq!(hw.stored, Some(Credential::new(WRONG)));
    assert_eq!(hw.persist_calls, 1);
    assert_eq!(state, ControlState::AwaitCommand);
    assert_eq!(sink.count(|e| *e == DoorEvent::ProvisionRejected), 1);
    assert_eq!(sink.count(|e| *e == DoorEvent::Provisioned), 1);
}

#[test]
fn repeated_mismatches_never_touch_storage() {
    let mut rx = Vec::new();
    for _ in 0..4 {
        rx.extend(frame(PIN));
        rx.extend(frame(WRONG));
        rx.push(TRY_AGAIN);
    }
    let (hw, _, state) = run(MockControlBoard::with_rx(rx));

    assert_eq!(hw.tx, [0, 0, 0, 0]);
    assert_eq!(hw.persist_calls, 0);
    assert_eq!(hw.stored, None);
    assert_eq!(state, ControlState::AwaitProvision);
}

#[test]
fn noise_before_start_is_discarded() {
    let mut rx = vec![0xAA, b'+', 0x00];
    rx.extend(frame(PIN));
    rx.push(0x42);
    rx.extend(frame(PIN));

    let (hw, _, _) = run(MockControlBoard::with_rx(rx));

    assert_eq!(hw.tx, [1]);
    assert_eq!(hw.stored, Some(Credential::new(PIN)));
}

#[test]
fn persist_failure_answers_failure_and_stays() {
    let mut board = MockControlBoard::with_rx(provisioned_then(&[]));
    board.fail_persist = true;

    let (hw, _, state) = run(board);

    assert_eq!(hw.tx, [0]);
    assert_eq!(state, ControlState::AwaitProvision);
}

// ── Verification and lockout ──────────────────────────────────

#[test]
fn third_consecutive_failure_triggers_lockout() {
    let mut rest = attempt(CMD_OPEN, WRONG);
    rest.extend(attempt(CMD_CHANGE, WRONG));
    rest.extend(attempt(CMD_OPEN, WRONG));

    let (hw, sink, state) = run(MockControlBoard::with_rx(provisioned_then(&rest)));

    assert_eq!(hw.tx, [1, 0, 0, 0]);
    assert_eq!(hw.ticks, [60]);
    let buzzer: Vec<_> = hw
        .calls
        .iter()
        .filter(|c| matches!(c, ActuatorCall::Buzzer(_)))
        .cloned()
        .collect();
    assert_eq!(buzzer, [ActuatorCall::Buzzer(true), ActuatorCall::Buzzer(false)]);
    assert!(!hw.buzzer_on());
    assert!(hw.motor_calls().is_empty());
    assert_eq!(state, ControlState::AwaitCommand);
    assert_eq!(
        sink.count(|e| matches!(e, DoorEvent::LockoutStarted { node: Node::Control })),
        1
    );
    assert!(sink.events.contains(&DoorEvent::AccessDenied {
        node: Node::Control,
        attempts: 3
    }));
}

#[test]
fn counter_resets_after_lockout() {
    let mut rest = Vec::new();
    for _ in 0..3 {
        rest.extend(attempt(CMD_OPEN, WRONG));
    }
    // Two more failures after the lockout must not re-trigger it.
    rest.extend(attempt(CMD_OPEN, WRONG));
    rest.extend(attempt(CMD_OPEN, WRONG));

    let (hw, sink, _) = run(MockControlBoard::with_rx(provisioned_then(&rest)));

    assert_eq!(hw.ticks, [60]);
    assert_eq!(
        sink.count(|e| matches!(e, DoorEvent::AccessDenied { attempts: 3, .. })),
        1
    );
    assert_eq!(
        sink.count(|e| matches!(e, DoorEvent::AccessDenied { attempts: 2, .. })),
        2
    );
}

#[test]
fn success_resets_counter() {
    let mut rest = attempt(CMD_OPEN, WRONG);
    rest.extend(attempt(CMD_OPEN, WRONG));
    rest.extend(attempt(CMD_OPEN, PIN));
    rest.extend(attempt(CMD_OPEN, WRONG));
    rest.extend(attempt(CMD_OPEN, WRONG));

    let mut board = MockControlBoard::with_rx(provisioned_then(&rest));
    board.occupancy = [false].into();
    let (hw, _, state) = run(board);

    // provision, 2 denials, grant, clear, 2 denials, no lockout
    assert_eq!(hw.tx, [1, 0, 0, 1, 0, 0, 0]);
    assert!(!hw.calls.contains(&ActuatorCall::Buzzer(true)));
    assert_eq!(state, ControlState::AwaitCommand);
}

#[test]
fn load_failure_counts_as_mismatch() {
    let mut board = MockControlBoard::with_rx(provisioned_then(&attempt(CMD_OPEN, PIN)));
    board.fail_load = true;

    let (hw, sink, state) = run(board);

    assert_eq!(hw.tx, [1, 0]);
    assert!(hw.motor_calls().is_empty());
    assert_eq!(state, ControlState::AwaitCommand);
    assert!(sink.events.contains(&DoorEvent::AccessDenied {
        node: Node::Control,
        attempts: 1
    }));
}

#[test]
fn stray_bytes_while_awaiting_command_are_ignored() {
    let mut rest = vec![0x00, 0x01, WAIT_MSG, 0x7F];
    rest.extend(attempt(CMD_CHANGE, PIN));
    let (hw, _, state) = run(MockControlBoard::with_rx(provisioned_then(&rest)));

    assert_eq!(hw.tx, [1, 1]);
    assert_eq!(state, ControlState::AwaitProvision);
}

// ── Door cycle ────────────────────────────────────────────────

#[test]
fn open_polls_occupancy_until_clear_then_locks() {
    let mut board = MockControlBoard::with_rx(provisioned_then(&attempt(CMD_OPEN, PIN)));
    board.occupancy = [true, true, true, false].into();

    let (hw, sink, state) = run(board);

    assert_eq!(hw.tx, [1, 1, WAIT_MSG, WAIT_MSG, WAIT_MSG, 0]);
    assert_eq!(
        hw.motor_calls(),
        [
            MotorDirection::Unlock,
            MotorDirection::Stop,
            MotorDirection::Lock,
            MotorDirection::Stop
        ]
    );
    assert_eq!(hw.ticks, [15, 15]);
    assert_eq!(state, ControlState::AwaitCommand);
    assert!(sink.events.contains(&DoorEvent::StillOccupied { polls: 3 }));
    assert!(sink.events.contains(&DoorEvent::DoorLocked));
}

#[test]
fn change_password_reprovisions() {
    let mut rest = attempt(CMD_CHANGE, PIN);
    rest.extend(frame(WRONG));
    rest.extend(frame(WRONG));

    let (hw, _, state) = run(MockControlBoard::with_rx(provisioned_then(&rest)));

    assert_eq!(hw.tx, [1, 1, 1]);
    assert_eq!(hw.stored, Some(Credential::new(WRONG)));
    assert_eq!(state, ControlState::AwaitCommand);
    assert!(hw.motor_calls().is_empty());
}

#[test]
fn try_again_in_command_state_restarts_provisioning_without_check() {
    let mut rest = vec![TRY_AGAIN];
    rest.extend(frame(WRONG));
    rest.extend(frame(WRONG));

    let (hw, _, _) = run(MockControlBoard::with_rx(provisioned_then(&rest)));

    assert_eq!(hw.tx, [1, 1]);
    assert_eq!(hw.stored, Some(Credential::new(WRONG)));
}

#[test]
fn emits_start_and_transitions() {
    let (_, sink, _) = run(MockControlBoard::with_rx(provisioned_then(&[])));

    assert_eq!(
        sink.events.first(),
        Some(&DoorEvent::Started {
            node: Node::Control,
            state: "AwaitProvision"
        })
    );
    assert!(sink.events.contains(&DoorEvent::StateChanged {
        node: Node::Control,
        from: "AwaitProvision",
        to: "AwaitCommand"
    }));
}
