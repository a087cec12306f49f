//! Both nodes wired together over an in-memory link.
//!
//! The control node runs on its own thread with the host stand-ins the
//! simulator uses; the interaction node runs on the test thread with a
//! console operator fed from a string.  When the keypad script ends the
//! HMI stops, its end of the link drops, and the control node follows.

use std::io::Cursor;
use std::thread;
use std::time::Duration;

use doorlock::adapters::board::{ControlBoard, DoorActuators, InteractionBoard};
use doorlock::adapters::console::ConsoleOperator;
use doorlock::adapters::credential_store::EepromCredentialStore;
use doorlock::adapters::link::ChannelLink;
use doorlock::adapters::presence::PresenceSimulator;
use doorlock::adapters::time::SystemClock;
use doorlock::app::events::{DoorEvent, Node};
use doorlock::app::ports::{EepromPort, Transport};
use doorlock::config::LockConfig;
use doorlock::control::{ControlNode, ControlState};
use doorlock::drivers::buzzer::BuzzerDriver;
use doorlock::drivers::eeprom::MemoryEeprom;
use doorlock::drivers::motor::MotorDriver;
use doorlock::drivers::sim::{SimPin, SimPwm};
use doorlock::error::{Error, LinkError, OperatorError};
use doorlock::interaction::{InteractionNode, InteractionState};
use doorlock::protocol::{CMD_OPEN, START, WAIT_MSG};

use crate::mock_hw::RecordingSink;

type Actuators = DoorActuators<SimPin, SimPin, SimPwm, SimPin>;
type Board = ControlBoard<
    ChannelLink,
    EepromCredentialStore<MemoryEeprom>,
    Actuators,
    PresenceSimulator,
    SystemClock,
>;

/// One byte on the wire, seen from the HMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wire {
    Sent(u8),
    Got(u8),
}

/// Records every byte crossing the HMI end of the link.
struct Tap {
    link: ChannelLink,
    trace: Vec<Wire>,
}

impl Transport for Tap {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        self.link.send_byte(byte)?;
        self.trace.push(Wire::Sent(byte));
        Ok(())
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        let byte = self.link.receive_byte()?;
        self.trace.push(Wire::Got(byte));
        Ok(byte)
    }
}

/// Millisecond ticks and no UI pauses.
fn fast_config() -> LockConfig {
    LockConfig {
        tick_period_ms: 1,
        occupancy_poll_ms: 0,
        message_ms: 0,
        key_settle_ms: 0,
        confirm_poll_ms: 0,
        command_settle_ms: 0,
        ..LockConfig::default()
    }
}

/// Observation handles on the control node's simulated outputs.
struct Lines {
    in1: SimPin,
    in2: SimPin,
    buzzer: SimPin,
}

struct ControlOutcome {
    exit: Error,
    state: ControlState,
    attempts: u8,
    board: Board,
    sink: RecordingSink,
}

struct HmiOutcome {
    exit: Error,
    state: InteractionState,
    attempts: u8,
    sink: RecordingSink,
    screen: String,
    trace: Vec<Wire>,
}

fn session(keypad: &str, occupied_polls: u32) -> (HmiOutcome, ControlOutcome, Lines) {
    let config = fast_config();
    let (hmi_link, control_link) = ChannelLink::pair();

    let lines = Lines {
        in1: SimPin::new(),
        in2: SimPin::new(),
        buzzer: SimPin::new(),
    };
    let actuators = DoorActuators::new(
        MotorDriver::new(lines.in1.clone(), lines.in2.clone(), SimPwm::new()),
        BuzzerDriver::new(lines.buzzer.clone()),
    );

    let control_config = config.clone();
    let control = thread::spawn(move || {
        let board = ControlBoard::new(
            control_link,
            EepromCredentialStore::new(MemoryEeprom::new(), control_config.credential_address),
            actuators,
            PresenceSimulator::new(occupied_polls),
            SystemClock::new(Duration::from_millis(1)),
        );
        let mut node = ControlNode::new(board, RecordingSink::new(), control_config);
        node.start();
        let Err(exit) = node.run();
        let state = node.state();
        let attempts = node.attempts();
        let (board, sink) = node.into_parts();
        ControlOutcome {
            exit,
            state,
            attempts,
            board,
            sink,
        }
    });

    let operator = ConsoleOperator::new(
        Cursor::new(keypad.as_bytes().to_vec()),
        Vec::new(),
        config.confirm_key,
    );
    let tap = Tap {
        link: hmi_link,
        trace: Vec::new(),
    };
    let board = InteractionBoard::new(
        tap,
        operator,
        SystemClock::new(Duration::from_millis(1)),
    );
    let mut hmi = InteractionNode::new(board, RecordingSink::new(), config);
    hmi.start();
    let Err(exit) = hmi.run();
    let state = hmi.state();
    let attempts = hmi.attempts();
    let (board, sink) = hmi.into_parts();
    let InteractionBoard { link, operator, .. } = board;
    let Tap { link, trace } = link;
    // The control node sees Closed only once the HMI end is gone.
    drop(link);
    let screen = String::from_utf8(operator.into_output()).unwrap();

    let control = control.join().expect("control thread panicked");
    (
        HmiOutcome {
            exit,
            state,
            attempts,
            sink,
            screen,
            trace,
        },
        control,
        lines,
    )
}

fn stored_credential(board: Board) -> [u8; 5] {
    let base = board.store.base_address();
    let mut eeprom = board.store.into_inner();
    let mut out = [0u8; 5];
    for (i, b) in out.iter_mut().enumerate() {
        *b = eeprom.read_byte(base + i as u16).unwrap();
    }
    out
}

#[test]
fn provision_open_and_relock() {
    let (hmi, control, lines) = session("12345\n12345\n+\n12345\n", 2);

    assert_eq!(hmi.exit, Error::Operator(OperatorError::InputClosed));
    assert_eq!(hmi.state, InteractionState::Menu);
    assert_eq!(control.exit, Error::Link(LinkError::Closed));
    assert_eq!(control.state, ControlState::AwaitCommand);

    assert!(hmi.screen.contains("|Password Set!   |"));
    assert!(hmi.screen.contains("|Wait for people |"));
    assert!(hmi.screen.contains("|locking...      |"));

    assert_eq!(
        control
            .sink
            .count(|e| matches!(e, DoorEvent::StillOccupied { .. })),
        2
    );
    assert_eq!(control.sink.count(|e| *e == DoorEvent::DoorLocked), 1);
    assert!(!lines.in1.is_high() && !lines.in2.is_high());
    assert_eq!(stored_credential(control.board), [1, 2, 3, 4, 5]);
}

#[test]
fn open_exchange_alternates_strictly() {
    let (hmi, _, _) = session("12345\n12345\n+\n12345\n", 3);

    use Wire::{Got, Sent};
    let frame = [Sent(START), Sent(1), Sent(2), Sent(3), Sent(4), Sent(5)];
    let mut expected = Vec::new();
    expected.extend(frame);
    expected.extend(frame);
    expected.push(Got(1));
    expected.push(Sent(CMD_OPEN));
    expected.extend(frame);
    expected.push(Got(1));
    expected.extend([Got(WAIT_MSG), Got(WAIT_MSG), Got(WAIT_MSG), Got(0)]);
    assert_eq!(hmi.trace, expected);
}

#[test]
fn provisioning_mismatch_is_retried() {
    let (hmi, control, _) = session("11111\n22222\n12345\n12345\n", 0);

    assert_eq!(hmi.sink.count(|e| *e == DoorEvent::ProvisionRejected), 1);
    assert_eq!(control.sink.count(|e| *e == DoorEvent::ProvisionRejected), 1);
    assert_eq!(control.sink.count(|e| *e == DoorEvent::Provisioned), 1);
    assert!(hmi.screen.contains("|Mismatch!       |"));
    assert_eq!(stored_credential(control.board), [1, 2, 3, 4, 5]);
}

#[test]
fn both_nodes_lock_out_on_third_failure() {
    let (hmi, control, lines) = session("12345\n12345\n+\n00000\n00000\n00000\n", 0);

    let lockouts = |sink: &RecordingSink, node: Node| {
        sink.count(|e| *e == DoorEvent::LockoutStarted { node })
    };
    assert_eq!(lockouts(&hmi.sink, Node::Interaction), 1);
    assert_eq!(lockouts(&control.sink, Node::Control), 1);
    assert_eq!(hmi.attempts, 0);
    assert_eq!(control.attempts, 0);
    assert!(hmi.screen.contains("|System Locked!  |"));
    assert!(!lines.buzzer.is_high());
    assert_eq!(control.sink.count(|e| *e == DoorEvent::DoorUnlocked), 0);
}

fn denied_counts(sink: &RecordingSink) -> Vec<u8> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            DoorEvent::AccessDenied { attempts, .. } => Some(*attempts),
            _ => None,
        })
        .collect()
}

#[test]
fn attempt_counters_agree_after_every_verdict() {
    let (hmi, control, _) = session("12345\n12345\n+\n00000\n00000\n12345\n", 0);

    assert_eq!(denied_counts(&hmi.sink), [1, 2]);
    assert_eq!(denied_counts(&control.sink), [1, 2]);
    let granted = |sink: &RecordingSink| sink.count(|e| matches!(e, DoorEvent::AccessGranted { .. }));
    assert_eq!(granted(&hmi.sink), 1);
    assert_eq!(granted(&control.sink), 1);
    assert_eq!(hmi.attempts, 0);
    assert_eq!(control.attempts, 0);
    assert_eq!(control.sink.count(|e| *e == DoorEvent::DoorLocked), 1);
}

#[test]
fn change_password_then_open_with_new_one() {
    let (hmi, control, _) = session(
        // After a refusal the HMI re-prompts without going back to the menu.
        "12345\n12345\n-\n12345\n54321\n54321\n+\n12345\n54321\n",
        1,
    );

    assert_eq!(hmi.sink.count(|e| *e == DoorEvent::Provisioned), 2);
    assert_eq!(control.sink.count(|e| *e == DoorEvent::Provisioned), 2);
    // The old password is refused, the new one opens.
    assert!(control.sink.events.contains(&DoorEvent::AccessDenied {
        node: Node::Control,
        attempts: 1
    }));
    assert_eq!(control.sink.count(|e| *e == DoorEvent::DoorLocked), 1);
    assert_eq!(stored_credential(control.board), [5, 4, 3, 2, 1]);
}
