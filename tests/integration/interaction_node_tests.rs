//! Interaction node against a scripted keypad and link.

use doorlock::app::events::{DoorEvent, Node};
use doorlock::config::LockConfig;
use doorlock::error::{Error, LinkError, OperatorError};
use doorlock::interaction::{InteractionNode, InteractionState};
use doorlock::protocol::{CMD_CHANGE, CMD_OPEN, Command, TRY_AGAIN, WAIT_MSG};

use crate::mock_hw::{MockInteractionBoard, RecordingSink, frame, keys};

const PIN: [u8; 5] = [1, 2, 3, 4, 5];
const WRONG: [u8; 5] = [9, 9, 9, 9, 9];

struct Outcome {
    hw: MockInteractionBoard,
    sink: RecordingSink,
    state: InteractionState,
    attempts: u8,
    provisioned: bool,
    exit: Error,
}

fn run(board: MockInteractionBoard) -> Outcome {
    let mut node = InteractionNode::new(board, RecordingSink::new(), LockConfig::default());
    node.start();
    let Err(exit) = node.run();
    let state = node.state();
    let attempts = node.attempts();
    let provisioned = node.is_provisioned();
    let (hw, sink) = node.into_parts();
    Outcome {
        hw,
        sink,
        state,
        attempts,
        provisioned,
        exit,
    }
}

/// Keys that provision `PIN` on the first try.
fn provision_keys() -> Vec<u8> {
    let mut k = keys(PIN);
    k.extend(keys(PIN));
    k
}

fn provision_tx() -> Vec<u8> {
    let mut tx = frame(PIN);
    tx.extend(frame(PIN));
    tx
}

#[test]
fn first_boot_provisions_then_shows_menu() {
    let out = run(MockInteractionBoard::script(provision_keys(), [1]));

    assert_eq!(out.exit, Error::Operator(OperatorError::InputClosed));
    assert_eq!(out.state, InteractionState::Menu);
    assert!(out.provisioned);
    assert_eq!(out.hw.tx, provision_tx());
    assert_eq!(out.hw.masked, 10);

    let order: Vec<&str> = out.hw.screens.iter().map(|(_, t)| t.as_str()).collect();
    let pos = |text: &str| order.iter().position(|t| *t == text);
    assert!(pos("Smart Door") < pos("Create pass :)"));
    assert!(pos("Plz enter pass:") < pos("Plz re-enter"));
    assert!(pos("Password Set!") < pos("(+) Open Door"));
}

#[test]
fn mismatch_sends_try_again_and_reprompts() {
    let mut k = keys(PIN);
    k.extend(keys(WRONG));
    k.extend(provision_keys());

    let out = run(MockInteractionBoard::script(k, [0, 1]));

    let mut expected = frame(PIN);
    expected.extend(frame(WRONG));
    expected.push(TRY_AGAIN);
    expected.extend(provision_tx());
    assert_eq!(out.hw.tx, expected);
    assert_eq!(out.hw.count_shown("Mismatch!"), 1);
    assert_eq!(out.hw.count_shown("Create pass :)"), 2);
    assert!(out.provisioned);
    assert_eq!(out.sink.count(|e| *e == DoorEvent::ProvisionRejected), 1);
}

#[test]
fn keys_after_fifth_symbol_are_dropped_until_confirm() {
    let mut k = vec![1, 2, 3, 4, 5, 7, 8, 13];
    k.extend(keys(PIN));

    let out = run(MockInteractionBoard::script(k, [1]));

    assert_eq!(out.hw.tx, provision_tx());
    assert_eq!(out.hw.masked, 10);
}

#[test]
fn invalid_menu_key_stays_in_menu() {
    let mut k = provision_keys();
    k.extend([b'x', 7]);

    let out = run(MockInteractionBoard::script(k, [1]));

    assert_eq!(out.state, InteractionState::Menu);
    assert_eq!(out.hw.count_shown("Invalid Option"), 2);
    assert!(out.sink.events.contains(&DoorEvent::InvalidMenuKey(b'x')));
    assert_eq!(out.hw.tx, provision_tx(), "nothing sent for a bad option");
}

#[test]
fn open_door_follows_occupancy_until_clear() {
    let mut k = provision_keys();
    k.push(CMD_OPEN);
    k.extend(keys(PIN));

    let out = run(MockInteractionBoard::script(k, [1, 1, WAIT_MSG, WAIT_MSG, 0]));

    let mut expected = provision_tx();
    expected.push(CMD_OPEN);
    expected.extend(frame(PIN));
    assert_eq!(out.hw.tx, expected);
    assert_eq!(out.hw.ticks, [15, 15]);
    assert_eq!(out.state, InteractionState::Menu);
    assert_eq!(out.hw.count_shown("Wait for people"), 1);
    assert!(out.hw.shown("locking..."));
    assert!(out.sink.events.contains(&DoorEvent::AccessGranted {
        node: Node::Interaction,
        command: Command::OpenDoor
    }));
}

#[test]
fn third_failure_locks_out_then_returns_to_menu() {
    let mut k = provision_keys();
    k.push(CMD_OPEN);
    for _ in 0..3 {
        k.extend(keys(WRONG));
    }

    let out = run(MockInteractionBoard::script(k, [1, 0, 0, 0]));

    assert_eq!(out.hw.count_shown("Incorrect Pass!"), 3);
    assert_eq!(out.hw.count_shown("System Locked!"), 1);
    assert_eq!(out.hw.ticks, [60]);
    assert_eq!(out.state, InteractionState::Menu);
    assert_eq!(out.attempts, 0);
    assert_eq!(
        out.sink
            .count(|e| matches!(e, DoorEvent::LockoutEnded { node: Node::Interaction })),
        1
    );
    // The command byte goes out once per attempt.
    assert_eq!(out.hw.tx.iter().filter(|b| **b == CMD_OPEN).count(), 3);
}

#[test]
fn two_failures_then_success_does_not_lock_out() {
    let mut k = provision_keys();
    k.push(CMD_OPEN);
    k.extend(keys(WRONG));
    k.extend(keys(WRONG));
    k.extend(keys(PIN));

    let out = run(MockInteractionBoard::script(k, [1, 0, 0, 1, 0]));

    assert!(!out.hw.shown("System Locked!"));
    assert_eq!(out.attempts, 0);
    assert_eq!(out.state, InteractionState::Menu);
}

#[test]
fn change_password_returns_to_provisioning() {
    let mut k = provision_keys();
    k.push(CMD_CHANGE);
    k.extend(keys(PIN));
    k.extend(keys(WRONG));
    k.extend(keys(WRONG));

    let out = run(MockInteractionBoard::script(k, [1, 1, 1]));

    let mut expected = provision_tx();
    expected.push(CMD_CHANGE);
    expected.extend(frame(PIN));
    expected.extend(frame(WRONG));
    expected.extend(frame(WRONG));
    assert_eq!(out.hw.tx, expected);
    assert_eq!(out.hw.count_shown("Password Set!"), 2);
    assert_eq!(out.state, InteractionState::Menu);
}

#[test]
fn silent_peer_ends_run_with_link_closed() {
    let out = run(MockInteractionBoard::script(provision_keys(), []));

    assert_eq!(out.exit, Error::Link(LinkError::Closed));
    assert_eq!(out.state, InteractionState::Provision);
    assert!(!out.provisioned);
}
