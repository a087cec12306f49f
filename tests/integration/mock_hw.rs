//! Scripted boards for integration tests.
//!
//! Incoming link bytes, keypad presses and PIR samples are queued up
//! front; everything the node does (bytes sent, motor and buzzer commands,
//! waits, screens) is recorded for assertions.  An exhausted link or
//! keypad script reports closed, which ends the node's run loop.

use std::collections::VecDeque;

use doorlock::app::events::DoorEvent;
use doorlock::app::ports::{
    ActuatorPort, ClockPort, CredentialStore, EventSink, MotorDirection, OccupancySensor,
    OperatorPort, SensorError, StorageError, Transport,
};
use doorlock::error::{LinkError, OperatorError};
use doorlock::protocol::{Credential, START};

/// Wire frame for `symbols`.
pub fn frame(symbols: [u8; 5]) -> Vec<u8> {
    let mut v = vec![START];
    v.extend_from_slice(&symbols);
    v
}

/// Keypad presses for one credential entry, confirmed with Enter (13).
pub fn keys(symbols: [u8; 5]) -> Vec<u8> {
    let mut v = symbols.to_vec();
    v.push(13);
    v
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Motor(MotorDirection),
    Buzzer(bool),
    AllOff,
}

// ── Control board ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockControlBoard {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub stored: Option<Credential>,
    pub persist_calls: usize,
    pub fail_persist: bool,
    pub fail_load: bool,
    pub calls: Vec<ActuatorCall>,
    /// PIR samples; an empty script reads as a GPIO fault.
    pub occupancy: VecDeque<bool>,
    pub ticks: Vec<u16>,
}

#[allow(dead_code)]
impl MockControlBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rx(bytes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            rx: bytes.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn provisioned(mut self, credential: [u8; 5]) -> Self {
        self.stored = Some(Credential::new(credential));
        self
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Buzzer(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::Motor(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn motor_calls(&self) -> Vec<MotorDirection> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Motor(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl Transport for MockControlBoard {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        self.tx.push(byte);
        Ok(())
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        self.rx.pop_front().ok_or(LinkError::Closed)
    }
}

impl CredentialStore for MockControlBoard {
    fn persist_credential(&mut self, credential: &Credential) -> Result<(), StorageError> {
        self.persist_calls += 1;
        if self.fail_persist {
            return Err(StorageError::IoError);
        }
        self.stored = Some(*credential);
        Ok(())
    }

    fn load_credential(&mut self) -> Result<Credential, StorageError> {
        if self.fail_load {
            return Err(StorageError::IoError);
        }
        self.stored.ok_or(StorageError::NotFound)
    }
}

impl ActuatorPort for MockControlBoard {
    fn rotate_motor(&mut self, direction: MotorDirection, _speed: u8) {
        self.calls.push(ActuatorCall::Motor(direction));
    }

    fn set_buzzer(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Buzzer(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

impl OccupancySensor for MockControlBoard {
    fn is_occupied(&mut self) -> Result<bool, SensorError> {
        self.occupancy
            .pop_front()
            .ok_or(SensorError::GpioReadFailed)
    }
}

impl ClockPort for MockControlBoard {
    fn wait_ticks(&mut self, ticks: u16) {
        self.ticks.push(ticks);
    }

    fn pause_ms(&mut self, _ms: u32) {}
}

// ── Interaction board ─────────────────────────────────────────

#[derive(Default)]
pub struct MockInteractionBoard {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub keys: VecDeque<u8>,
    /// Every `display` call as (row, text).
    pub screens: Vec<(u8, String)>,
    pub masked: usize,
    pub ticks: Vec<u16>,
}

#[allow(dead_code)]
impl MockInteractionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(keys: impl IntoIterator<Item = u8>, rx: impl IntoIterator<Item = u8>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            rx: rx.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn shown(&self, text: &str) -> bool {
        self.screens.iter().any(|(_, t)| t == text)
    }

    pub fn count_shown(&self, text: &str) -> usize {
        self.screens.iter().filter(|(_, t)| t == text).count()
    }
}

impl Transport for MockInteractionBoard {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        self.tx.push(byte);
        Ok(())
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        self.rx.pop_front().ok_or(LinkError::Closed)
    }
}

impl OperatorPort for MockInteractionBoard {
    fn get_pressed_key(&mut self) -> Result<u8, OperatorError> {
        self.keys.pop_front().ok_or(OperatorError::InputClosed)
    }

    fn display(&mut self, row: u8, text: &str) {
        self.screens.push((row, text.to_string()));
    }

    fn put_char(&mut self, _ch: char) {
        self.masked += 1;
    }

    fn clear_screen(&mut self) {}
}

impl ClockPort for MockInteractionBoard {
    fn wait_ticks(&mut self, ticks: u16) {
        self.ticks.push(ticks);
    }

    fn pause_ms(&mut self, _ms: u32) {}
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<DoorEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&DoorEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &DoorEvent) {
        self.events.push(event.clone());
    }
}
