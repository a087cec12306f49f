//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`DoorEvent`] as one
//! structured line through the `log` facade (UART console on the ECUs,
//! `tracing-subscriber` output in the simulator).

use log::{info, warn};

use crate::app::events::{DoorEvent, Node};
use crate::app::ports::EventSink;

/// Adapter that logs every [`DoorEvent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn tag(node: Node) -> &'static str {
    match node {
        Node::Control => "ctl",
        Node::Interaction => "hmi",
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DoorEvent) {
        match event {
            DoorEvent::Started { node, state } => {
                info!("START | {} | initial_state={}", tag(*node), state);
            }
            DoorEvent::StateChanged { node, from, to } => {
                info!("STATE | {} | {} -> {}", tag(*node), from, to);
            }
            DoorEvent::Provisioned => info!("AUTH  | credential provisioned"),
            DoorEvent::ProvisionRejected => info!("AUTH  | provisioning entries differ"),
            DoorEvent::AccessGranted { node, command } => {
                info!("AUTH  | {} | granted {:?}", tag(*node), command);
            }
            DoorEvent::AccessDenied { node, attempts } => {
                warn!("AUTH  | {} | denied, attempts={}", tag(*node), attempts);
            }
            DoorEvent::LockoutStarted { node } => warn!("LOCK  | {} | lockout", tag(*node)),
            DoorEvent::LockoutEnded { node } => info!("LOCK  | {} | lockout over", tag(*node)),
            DoorEvent::DoorUnlocked => info!("DOOR  | unlocked"),
            DoorEvent::StillOccupied { polls } => info!("DOOR  | occupied, polls={}", polls),
            DoorEvent::DoorLocked => info!("DOOR  | locked"),
            DoorEvent::InvalidMenuKey(key) => info!("MENU  | invalid key 0x{:02x}", key),
        }
    }
}
