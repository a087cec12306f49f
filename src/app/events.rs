//! Outbound domain events.
//!
//! Both node state machines emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, count them in a
//! test, etc.

use crate::protocol::Command;

/// Which ECU produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Control,
    Interaction,
}

/// Structured events emitted by the node state machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorEvent {
    /// A node's state machine started (carries initial state name).
    Started { node: Node, state: &'static str },

    /// A node's state machine moved between states.
    StateChanged {
        node: Node,
        from: &'static str,
        to: &'static str,
    },

    /// Both provisioning entries matched and the credential was stored.
    Provisioned,

    /// The two provisioning entries differed; storage untouched.
    ProvisionRejected,

    /// A privileged command passed verification.
    AccessGranted { node: Node, command: Command },

    /// A verification failed; `attempts` is the updated counter.
    AccessDenied { node: Node, attempts: u8 },

    /// The attempt limit was reached.
    LockoutStarted { node: Node },

    /// The lockout delay elapsed and the counter was reset.
    LockoutEnded { node: Node },

    /// The bolt was retracted.
    DoorUnlocked,

    /// One occupancy poll found motion; `polls` counts this sequence.
    StillOccupied { polls: u32 },

    /// The bolt was thrown after the space cleared.
    DoorLocked,

    /// The operator picked something that is not a menu option.
    InvalidMenuKey(u8),
}
