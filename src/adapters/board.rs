//! Board adapters: bundle the drivers of one ECU behind the port traits.
//!
//! The node state machines take a single hardware value
//! ([`ControlHardware`](crate::app::ports::ControlHardware) /
//! [`InteractionHardware`](crate::app::ports::InteractionHardware)).  These
//! structs build that value out of independent parts, each of which can be
//! a real driver, a host stand-in, or a test double.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{
    ActuatorPort, ClockPort, CredentialStore, MotorDirection, OccupancySensor, OperatorPort,
    SensorError, StorageError, Transport,
};
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::motor::MotorDriver;
use crate::error::{LinkError, OperatorError};
use crate::protocol::Credential;

// ── Actuators ─────────────────────────────────────────────────

/// Lock motor and alarm buzzer as one [`ActuatorPort`].
pub struct DoorActuators<A, B, P, Z> {
    pub motor: MotorDriver<A, B, P>,
    pub buzzer: BuzzerDriver<Z>,
}

impl<A, B, P, Z> DoorActuators<A, B, P, Z>
where
    A: OutputPin,
    B: OutputPin,
    P: SetDutyCycle,
    Z: OutputPin,
{
    pub fn new(motor: MotorDriver<A, B, P>, buzzer: BuzzerDriver<Z>) -> Self {
        Self { motor, buzzer }
    }
}

impl<A, B, P, Z> ActuatorPort for DoorActuators<A, B, P, Z>
where
    A: OutputPin,
    B: OutputPin,
    P: SetDutyCycle,
    Z: OutputPin,
{
    fn rotate_motor(&mut self, direction: MotorDirection, speed: u8) {
        self.motor.rotate(direction, speed);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer.set(on);
    }

    fn all_off(&mut self) {
        self.motor.stop();
        self.buzzer.set(false);
    }
}

// ── Control ECU ───────────────────────────────────────────────

/// Everything the control node touches.
pub struct ControlBoard<L, S, X, O, C> {
    pub link: L,
    pub store: S,
    pub actuators: X,
    pub sensor: O,
    pub clock: C,
}

impl<L, S, X, O, C> ControlBoard<L, S, X, O, C>
where
    L: Transport,
    S: CredentialStore,
    X: ActuatorPort,
    O: OccupancySensor,
    C: ClockPort,
{
    pub fn new(link: L, store: S, actuators: X, sensor: O, clock: C) -> Self {
        Self {
            link,
            store,
            actuators,
            sensor,
            clock,
        }
    }
}

impl<L: Transport, S, X, O, C> Transport for ControlBoard<L, S, X, O, C> {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        self.link.send_byte(byte)
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        self.link.receive_byte()
    }
}

impl<L, S: CredentialStore, X, O, C> CredentialStore for ControlBoard<L, S, X, O, C> {
    fn persist_credential(&mut self, credential: &Credential) -> Result<(), StorageError> {
        self.store.persist_credential(credential)
    }

    fn load_credential(&mut self) -> Result<Credential, StorageError> {
        self.store.load_credential()
    }
}

impl<L, S, X: ActuatorPort, O, C> ActuatorPort for ControlBoard<L, S, X, O, C> {
    fn rotate_motor(&mut self, direction: MotorDirection, speed: u8) {
        self.actuators.rotate_motor(direction, speed);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.actuators.set_buzzer(on);
    }

    fn all_off(&mut self) {
        self.actuators.all_off();
    }
}

impl<L, S, X, O: OccupancySensor, C> OccupancySensor for ControlBoard<L, S, X, O, C> {
    fn is_occupied(&mut self) -> Result<bool, SensorError> {
        self.sensor.is_occupied()
    }
}

impl<L, S, X, O, C: ClockPort> ClockPort for ControlBoard<L, S, X, O, C> {
    fn wait_ticks(&mut self, ticks: u16) {
        self.clock.wait_ticks(ticks);
    }

    fn pause_ms(&mut self, ms: u32) {
        self.clock.pause_ms(ms);
    }
}

// ── HMI ECU ───────────────────────────────────────────────────

/// Everything the interaction node touches.
pub struct InteractionBoard<L, O, C> {
    pub link: L,
    pub operator: O,
    pub clock: C,
}

impl<L: Transport, O: OperatorPort, C: ClockPort> InteractionBoard<L, O, C> {
    pub fn new(link: L, operator: O, clock: C) -> Self {
        Self {
            link,
            operator,
            clock,
        }
    }
}

impl<L: Transport, O, C> Transport for InteractionBoard<L, O, C> {
    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        self.link.send_byte(byte)
    }

    fn receive_byte(&mut self) -> Result<u8, LinkError> {
        self.link.receive_byte()
    }
}

impl<L, O: OperatorPort, C> OperatorPort for InteractionBoard<L, O, C> {
    fn get_pressed_key(&mut self) -> Result<u8, OperatorError> {
        self.operator.get_pressed_key()
    }

    fn display(&mut self, row: u8, text: &str) {
        self.operator.display(row, text);
    }

    fn put_char(&mut self, ch: char) {
        self.operator.put_char(ch);
    }

    fn clear_screen(&mut self) {
        self.operator.clear_screen();
    }
}

impl<L, O, C: ClockPort> ClockPort for InteractionBoard<L, O, C> {
    fn wait_ticks(&mut self, ticks: u16) {
        self.clock.wait_ticks(ticks);
    }

    fn pause_ms(&mut self, ms: u32) {
        self.clock.pause_ms(ms);
    }
}
