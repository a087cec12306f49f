//! Control ECU: credential authority and door actuator.
//!
//! Purely reactive.  Apart from the unlock / occupancy / lock sequence it
//! runs after authorising an open, every step starts by blocking on the
//! link for the interaction node's next request.

pub mod context;
pub mod states;

use core::convert::Infallible;

use log::info;

use crate::app::events::{DoorEvent, Node};
use crate::app::ports::{ControlHardware, EventSink};
use crate::config::LockConfig;
use crate::error::Result;
use crate::fsm::{Fsm, StateKey, Transition};

pub use context::ControlContext;

/// Control node states.  Discriminants index the state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControlState {
    AwaitProvision = 0,
    AwaitCommand = 1,
    Verifying = 2,
    UnlockSequence = 3,
    OccupancyPoll = 4,
    LockSequence = 5,
    Lockout = 6,
}

impl ControlState {
    pub const COUNT: usize = 7;
}

impl StateKey for ControlState {
    fn index(self) -> usize {
        self as usize
    }
}

/// The control node: state table, engine and context in one owner.
pub struct ControlNode<H: ControlHardware, E: EventSink> {
    fsm: Fsm<ControlState, ControlContext<H, E>, { ControlState::COUNT }>,
    ctx: ControlContext<H, E>,
}

impl<H: ControlHardware, E: EventSink> ControlNode<H, E> {
    /// Build a node in `AwaitProvision`.  Call [`start`](Self::start) before
    /// stepping.
    pub fn new(hw: H, sink: E, config: LockConfig) -> Self {
        Self {
            fsm: Fsm::new(states::build_state_table(), ControlState::AwaitProvision),
            ctx: ControlContext::new(hw, sink, config),
        }
    }

    pub fn start(&mut self) {
        self.ctx.hw.all_off();
        self.fsm.start(&mut self.ctx);
        let state = self.fsm.state_name(self.fsm.current_state());
        self.ctx.emit(DoorEvent::Started {
            node: Node::Control,
            state,
        });
    }

    /// Run one state handler.  Blocks for as long as the handler does.
    pub fn step(&mut self) -> Result<Option<Transition<ControlState>>> {
        let transition = self.fsm.step(&mut self.ctx)?;
        if let Some(t) = transition {
            let from = self.fsm.state_name(t.from);
            let to = self.fsm.state_name(t.to);
            self.ctx.emit(DoorEvent::StateChanged {
                node: Node::Control,
                from,
                to,
            });
        }
        Ok(transition)
    }

    /// Step forever.  Only returns when a port fails, typically because
    /// the link reported [`LinkError::Closed`](crate::error::LinkError).
    pub fn run(&mut self) -> Result<Infallible> {
        loop {
            if let Err(e) = self.step() {
                info!("Control node stopping: {}", e);
                self.ctx.hw.all_off();
                return Err(e);
            }
        }
    }

    pub fn state(&self) -> ControlState {
        self.fsm.current_state()
    }

    pub fn attempts(&self) -> u8 {
        self.ctx.attempts
    }

    pub fn context(&self) -> &ControlContext<H, E> {
        &self.ctx
    }

    /// Tear down and hand back the hardware and sink.
    pub fn into_parts(self) -> (H, E) {
        (self.ctx.hw, self.ctx.sink)
    }
}
