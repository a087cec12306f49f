//! Per-node blackboard threaded through every control state handler.
//!
//! The hardware bundle, the attempt counter and the command under
//! verification all live here, owned by the control node's single thread.

use crate::app::events::DoorEvent;
use crate::app::ports::{ControlHardware, EventSink};
use crate::config::LockConfig;
use crate::protocol::Command;

pub struct ControlContext<H, E> {
    /// Link, credential store, actuators, PIR and clock.
    pub hw: H,
    /// Where domain events go.
    pub sink: E,
    pub config: LockConfig,

    /// Consecutive verification failures.  Process lifetime only.
    pub attempts: u8,
    /// The privileged command received in `AwaitCommand`, consumed by
    /// `Verifying`.
    pub pending: Option<Command>,
    /// `WAIT_MSG` bytes sent during the current occupancy poll.
    pub occupied_polls: u32,
}

impl<H: ControlHardware, E: EventSink> ControlContext<H, E> {
    pub fn new(hw: H, sink: E, config: LockConfig) -> Self {
        Self {
            hw,
            sink,
            config,
            attempts: 0,
            pending: None,
            occupied_polls: 0,
        }
    }

    pub(crate) fn emit(&mut self, event: DoorEvent) {
        self.sink.emit(&event);
    }

    /// True once the failure counter has reached the configured limit.
    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= self.config.max_attempts
    }
}
