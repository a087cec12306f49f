//! Interaction (HMI) ECU: keypad, display and the operator workflow.
//!
//! Drives the conversation with the control node.  Each step either reads
//! the keypad or performs one request/response exchange on the link.

pub mod context;
pub mod screen;
pub mod states;

use core::convert::Infallible;

use log::info;

use crate::app::events::{DoorEvent, Node};
use crate::app::ports::{EventSink, InteractionHardware};
use crate::config::LockConfig;
use crate::error::Result;
use crate::fsm::{Fsm, StateKey, Transition};

pub use context::InteractionContext;
pub use screen::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InteractionState {
    Init = 0,
    Provision = 1,
    Menu = 2,
    Operation = 3,
    Unlocking = 4,
    UnlockWait = 5,
    Lockout = 6,
}

impl InteractionState {
    pub const COUNT: usize = 7;
}

impl StateKey for InteractionState {
    fn index(self) -> usize {
        self as usize
    }
}

pub struct InteractionNode<H: InteractionHardware, E: EventSink> {
    fsm: Fsm<InteractionState, InteractionContext<H, E>, { InteractionState::COUNT }>,
    ctx: InteractionContext<H, E>,
}

impl<H: InteractionHardware, E: EventSink> InteractionNode<H, E> {
    pub fn new(hw: H, sink: E, config: LockConfig) -> Self {
        Self {
            fsm: Fsm::new(states::build_state_table(), InteractionState::Init),
            ctx: InteractionContext::new(hw, sink, config),
        }
    }

    pub fn start(&mut self) {
        self.ctx.hw.clear_screen();
        self.fsm.start(&mut self.ctx);
        let state = self.fsm.state_name(self.fsm.current_state());
        self.ctx.emit(DoorEvent::Started {
            node: Node::Interaction,
            state,
        });
    }

    pub fn step(&mut self) -> Result<Option<Transition<InteractionState>>> {
        let transition = self.fsm.step(&mut self.ctx)?;
        if let Some(t) = transition {
            let from = self.fsm.state_name(t.from);
            let to = self.fsm.state_name(t.to);
            self.ctx.emit(DoorEvent::StateChanged {
                node: Node::Interaction,
                from,
                to,
            });
        }
        Ok(transition)
    }

    /// Step until a port fails (link closed or keypad input gone).
    pub fn run(&mut self) -> Result<Infallible> {
        loop {
            if let Err(e) = self.step() {
                info!("Interaction node stopping: {}", e);
                return Err(e);
            }
        }
    }

    pub fn state(&self) -> InteractionState {
        self.fsm.current_state()
    }

    pub fn attempts(&self) -> u8 {
        self.ctx.attempts
    }

    pub fn is_provisioned(&self) -> bool {
        self.ctx.provisioned
    }

    pub fn context(&self) -> &InteractionContext<H, E> {
        &self.ctx
    }

    pub fn into_parts(self) -> (H, E) {
        (self.ctx.hw, self.ctx.sink)
    }
}
