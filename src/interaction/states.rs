//! Interaction node state handlers and table builder.
//!
//! ```text
//!  INIT ──▶ PROVISION ──[Password Set!]──▶ MENU ◀──────────────────────┐
//!            ▲  └─[Mismatch! + TRY_AGAIN]─┐ │ └─[other key]─┐          │
//!            │◀───────────────────────────┘ │◀──────────────┘          │
//!            │                     ['+'|'-']│                          │
//!            │                              ▼                          │
//!            │◀──────[match, '-']──────  OPERATION ──[limit]─▶ LOCKOUT ┤
//!            │                         [match, '+']                    │
//!            │                              ▼                          │
//!            │                          UNLOCKING                      │
//!            │                              ▼                          │
//!            │                ┌─[WAIT_MSG]─ UNLOCK_WAIT ──[0]──────────┘
//!            │                └──────────▶
//! ```
//!
//! The interaction node initiates every exchange; the only bytes it reads
//! are verdicts and occupancy samples.

use log::{info, warn};

use super::InteractionState;
use super::context::InteractionContext;
use super::screen::Screen;
use crate::app::events::{DoorEvent, Node};
use crate::app::ports::{EventSink, InteractionHardware};
use crate::error::Result;
use crate::fsm::StateDescriptor;
use crate::protocol::{Command, OccupancyStatus, TRY_AGAIN, Verdict, send_credential};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table<H: InteractionHardware, E: EventSink>()
-> [StateDescriptor<InteractionState, InteractionContext<H, E>>; InteractionState::COUNT] {
    [
        StateDescriptor {
            id: InteractionState::Init,
            name: "Init",
            on_enter: None,
            on_exit: None,
            on_update: init_update::<H, E>,
        },
        StateDescriptor {
            id: InteractionState::Provision,
            name: "Provision",
            on_enter: None,
            on_exit: None,
            on_update: provision_update::<H, E>,
        },
        StateDescriptor {
            id: InteractionState::Menu,
            name: "Menu",
            on_enter: None,
            on_exit: None,
            on_update: menu_update::<H, E>,
        },
        StateDescriptor {
            id: InteractionState::Operation,
            name: "Operation",
            on_enter: Some(operation_enter::<H, E>),
            on_exit: Some(operation_exit::<H, E>),
            on_update: operation_update::<H, E>,
        },
        StateDescriptor {
            id: InteractionState::Unlocking,
            name: "Unlocking",
            on_enter: Some(unlocking_enter::<H, E>),
            on_exit: None,
            on_update: unlocking_update::<H, E>,
        },
        StateDescriptor {
            id: InteractionState::UnlockWait,
            name: "UnlockWait",
            on_enter: Some(unlock_wait_enter::<H, E>),
            on_exit: None,
            on_update: unlock_wait_update::<H, E>,
        },
        StateDescriptor {
            id: InteractionState::Lockout,
            name: "Lockout",
            on_enter: Some(lockout_enter::<H, E>),
            on_exit: Some(lockout_exit::<H, E>),
            on_update: lockout_update::<H, E>,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INIT
// ═══════════════════════════════════════════════════════════════════════════

fn init_update<H: InteractionHardware, E: EventSink>(
    ctx: &mut InteractionContext<H, E>,
) -> Result<Option<InteractionState>> {
    ctx.flash(Screen::Welcome);
    ctx.flash(Screen::WelcomeDetail);
    Ok(Some(InteractionState::Provision))
}

// ═══════════════════════════════════════════════════════════════════════════
//  PROVISION
// ═══════════════════════════════════════════════════════════════════════════

fn provision_update<H: InteractionHardware, E: EventSink>(
    ctx: &mut InteractionContext<H, E>,
) -> Result<Option<InteractionState>> {
    ctx.flash(Screen::CreatePassword);

    ctx.show(Screen::EnterNewPassword);
    let first = ctx.collect_candidate()?;
    ctx.show(Screen::ReEnterPassword);
    let second = ctx.collect_candidate()?;

    send_credential(&mut ctx.hw, &first)?;
    send_credential(&mut ctx.hw, &second)?;

    if Verdict::from_byte(ctx.hw.receive_byte()?).is_match() {
        ctx.provisioned = true;
        ctx.flash(Screen::PasswordSet);
        ctx.emit(DoorEvent::Provisioned);
        return Ok(Some(InteractionState::Menu));
    }

    info!("Provisioning rejected; retrying");
    ctx.flash(Screen::ProvisionMismatch);
    ctx.emit(DoorEvent::ProvisionRejected);
    ctx.hw.send_byte(TRY_AGAIN)?;
    Ok(None)
}

// ═══════════════════════════════════════════════════════════════════════════
//  MENU
// ═══════════════════════════════════════════════════════════════════════════

fn menu_update<H: InteractionHardware, E: EventSink>(
    ctx: &mut InteractionContext<H, E>,
) -> Result<Option<InteractionState>> {
    ctx.show(Screen::MainMenu);
    let key = ctx.hw.get_pressed_key()?;

    match Command::from_menu_key(key) {
        Some(command) => {
            ctx.pending = Some(command);
            Ok(Some(InteractionState::Operation))
        }
        None => {
            ctx.flash(Screen::InvalidOption);
            ctx.emit(DoorEvent::InvalidMenuKey(key));
            Ok(None)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  OPERATION
// ═══════════════════════════════════════════════════════════════════════════

fn operation_enter<H: InteractionHardware, E: EventSink>(ctx: &mut InteractionContext<H, E>) {
    ctx.attempts = 0;
}

/// One verification attempt per step.
fn operation_update<H: InteractionHardware, E: EventSink>(
    ctx: &mut InteractionContext<H, E>,
) -> Result<Option<InteractionState>> {
    let Some(command) = ctx.pending.filter(|c| c.is_privileged()) else {
        warn!("No menu choice to carry out; back to the menu");
        return Ok(Some(InteractionState::Menu));
    };

    ctx.show(Screen::EnterPassword);
    let candidate = ctx.collect_candidate()?;

    ctx.hw.send_byte(command.to_byte())?;
    ctx.hw.pause_ms(ctx.config.command_settle_ms);
    send_credential(&mut ctx.hw, &candidate)?;

    if Verdict::from_byte(ctx.hw.receive_byte()?).is_match() {
        ctx.attempts = 0;
        ctx.emit(DoorEvent::AccessGranted {
            node: Node::Interaction,
            command,
        });
        return Ok(Some(match command {
            Command::OpenDoor => InteractionState::Unlocking,
            Command::ChangePassword | Command::TryAgain => InteractionState::Provision,
        }));
    }

    ctx.flash(Screen::IncorrectPassword);
    ctx.attempts = ctx.attempts.saturating_add(1);
    warn!(
        "Incorrect password ({}/{})",
        ctx.attempts, ctx.config.max_attempts
    );
    ctx.emit(DoorEvent::AccessDenied {
        node: Node::Interaction,
        attempts: ctx.attempts,
    });

    Ok(ctx
        .attempts_exhausted()
        .then_some(InteractionState::Lockout))
}

fn operation_exit<H: InteractionHardware, E: EventSink>(ctx: &mut InteractionContext<H, E>) {
    ctx.pending = None;
}

// ═══════════════════════════════════════════════════════════════════════════
//  UNLOCKING / UNLOCK_WAIT
// ═══════════════════════════════════════════════════════════════════════════

fn unlocking_enter<H: InteractionHardware, E: EventSink>(ctx: &mut InteractionContext<H, E>) {
    ctx.show(Screen::DoorUnlocking);
}

fn unlocking_update<H: InteractionHardware, E: EventSink>(
    ctx: &mut InteractionContext<H, E>,
) -> Result<Option<InteractionState>> {
    ctx.hw.wait_ticks(ctx.config.unlock_ticks);
    Ok(Some(InteractionState::UnlockWait))
}

fn unlock_wait_enter<H: InteractionHardware, E: EventSink>(ctx: &mut InteractionContext<H, E>) {
    ctx.show(Screen::WaitForEntry);
}

/// One occupancy sample per step.
fn unlock_wait_update<H: InteractionHardware, E: EventSink>(
    ctx: &mut InteractionContext<H, E>,
) -> Result<Option<InteractionState>> {
    match OccupancyStatus::from_byte(ctx.hw.receive_byte()?) {
        OccupancyStatus::Occupied => Ok(None),
        OccupancyStatus::Clear => {
            ctx.show(Screen::DoorLocking);
            ctx.hw.wait_ticks(ctx.config.lock_ticks);
            Ok(Some(InteractionState::Menu))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  LOCKOUT
// ═══════════════════════════════════════════════════════════════════════════

fn lockout_enter<H: InteractionHardware, E: EventSink>(ctx: &mut InteractionContext<H, E>) {
    ctx.show(Screen::SystemLocked);
    ctx.emit(DoorEvent::LockoutStarted {
        node: Node::Interaction,
    });
}

fn lockout_update<H: InteractionHardware, E: EventSink>(
    ctx: &mut InteractionContext<H, E>,
) -> Result<Option<InteractionState>> {
    ctx.hw.wait_ticks(ctx.config.lockout_ticks);
    ctx.attempts = 0;
    Ok(Some(InteractionState::Menu))
}

fn lockout_exit<H: InteractionHardware, E: EventSink>(ctx: &mut InteractionContext<H, E>) {
    ctx.emit(DoorEvent::LockoutEnded {
        node: Node::Interaction,
    });
}
