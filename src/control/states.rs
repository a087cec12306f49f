//! Control node state handlers and table builder.
//!
//! ```text
//!  AWAIT_PROVISION ──[A == B, stored]──▶ AWAIT_COMMAND ◀──────────────┐
//!    ▲  └─[A != B]─┐                      │  │   ▲                     │
//!    │◀────────────┘             ['+'|'-']│  │   │[mismatch, < limit]  │
//!    │◀────────────[TRY_AGAIN]────────────┼──┘   │                     │
//!    │                                    ▼      │                     │
//!    │◀──────[match, '-']──────────── VERIFYING ─┤                     │
//!    │                                    │      └─[limit]─▶ LOCKOUT ──┤
//!    │                           [match, '+']                          │
//!    │                                    ▼                            │
//!    │                            UNLOCK_SEQUENCE                      │
//!    │                                    ▼                            │
//!    │                   ┌──[occupied]─ OCCUPANCY_POLL                 │
//!    │                   └───────────▶    │ [clear]                    │
//!    │                                    ▼                            │
//!    │                             LOCK_SEQUENCE ──────────────────────┘
//! ```
//!
//! Every handler that talks to the peer blocks in the transport.  Actuator
//! start/stop lives in `on_enter` / `on_exit` so the motor is guaranteed to
//! be stopped before the occupancy poll runs, whatever path leads there.

use log::{error, info, warn};

use super::ControlState;
use super::context::ControlContext;
use crate::app::events::{DoorEvent, Node};
use crate::app::ports::{ControlHardware, EventSink, MotorDirection};
use crate::error::Result;
use crate::fsm::StateDescriptor;
use crate::protocol::{Command, OccupancyStatus, Verdict, receive_credential};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the control node's state table.  Rows are ordered by
/// [`ControlState`] discriminant.
pub fn build_state_table<H: ControlHardware, E: EventSink>()
-> [StateDescriptor<ControlState, ControlContext<H, E>>; ControlState::COUNT] {
    [
        StateDescriptor {
            id: ControlState::AwaitProvision,
            name: "AwaitProvision",
            on_enter: None,
            on_exit: None,
            on_update: await_provision_update::<H, E>,
        },
        StateDescriptor {
            id: ControlState::AwaitCommand,
            name: "AwaitCommand",
            on_enter: Some(await_command_enter::<H, E>),
            on_exit: None,
            on_update: await_command_update::<H, E>,
        },
        StateDescriptor {
            id: ControlState::Verifying,
            name: "Verifying",
            on_enter: None,
            on_exit: Some(verifying_exit::<H, E>),
            on_update: verifying_update::<H, E>,
        },
        StateDescriptor {
            id: ControlState::UnlockSequence,
            name: "UnlockSequence",
            on_enter: Some(unlock_enter::<H, E>),
            on_exit: Some(motor_stop::<H, E>),
            on_update: unlock_update::<H, E>,
        },
        StateDescriptor {
            id: ControlState::OccupancyPoll,
            name: "OccupancyPoll",
            on_enter: Some(occupancy_enter::<H, E>),
            on_exit: None,
            on_update: occupancy_update::<H, E>,
        },
        StateDescriptor {
            id: ControlState::LockSequence,
            name: "LockSequence",
            on_enter: Some(lock_enter::<H, E>),
            on_exit: Some(motor_stop::<H, E>),
            on_update: lock_update::<H, E>,
        },
        StateDescriptor {
            id: ControlState::Lockout,
            name: "Lockout",
            on_enter: Some(lockout_enter::<H, E>),
            on_exit: Some(lockout_exit::<H, E>),
            on_update: lockout_update::<H, E>,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAIT_PROVISION
// ═══════════════════════════════════════════════════════════════════════════

fn await_provision_update<H: ControlHardware, E: EventSink>(
    ctx: &mut ControlContext<H, E>,
) -> Result<Option<ControlState>> {
    let first = receive_credential(&mut ctx.hw)?;
    let second = receive_credential(&mut ctx.hw)?;

    if !first.matches(&second) {
        info!("Provisioning entries differ; store untouched");
        ctx.hw.send_byte(Verdict::Mismatch.to_byte())?;
        ctx.emit(DoorEvent::ProvisionRejected);
        return Ok(None);
    }

    if let Err(e) = ctx.hw.persist_credential(&first) {
        error!("Credential persist failed: {}", e);
        ctx.hw.send_byte(Verdict::Mismatch.to_byte())?;
        ctx.emit(DoorEvent::ProvisionRejected);
        return Ok(None);
    }

    ctx.hw.send_byte(Verdict::Match.to_byte())?;
    info!("New credential stored");
    ctx.emit(DoorEvent::Provisioned);
    Ok(Some(ControlState::AwaitCommand))
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAIT_COMMAND
// ═══════════════════════════════════════════════════════════════════════════

fn await_command_enter<H: ControlHardware, E: EventSink>(ctx: &mut ControlContext<H, E>) {
    ctx.pending = None;
}

fn await_command_update<H: ControlHardware, E: EventSink>(
    ctx: &mut ControlContext<H, E>,
) -> Result<Option<ControlState>> {
    let byte = ctx.hw.receive_byte()?;

    Ok(match Command::from_byte(byte) {
        Some(Command::TryAgain) => Some(ControlState::AwaitProvision),
        Some(command) if command.is_privileged() => {
            ctx.pending = Some(command);
            Some(ControlState::Verifying)
        }
        Some(_) => None,
        None => {
            log::debug!("Ignoring byte 0x{:02x} while awaiting command", byte);
            None
        }
    })
}

// ═══════════════════════════════════════════════════════════════════════════
//  VERIFYING
// ═══════════════════════════════════════════════════════════════════════════

fn verifying_update<H: ControlHardware, E: EventSink>(
    ctx: &mut ControlContext<H, E>,
) -> Result<Option<ControlState>> {
    let Some(command) = ctx.pending else {
        warn!("Verifying with no pending command; back to AwaitCommand");
        return Ok(Some(ControlState::AwaitCommand));
    };

    let stored = ctx.hw.load_credential();
    let candidate = receive_credential(&mut ctx.hw)?;

    let verdict = match stored {
        Ok(stored) => Verdict::from(stored.matches(&candidate)),
        Err(e) => {
            error!("Credential load failed: {}; rejecting attempt", e);
            Verdict::Mismatch
        }
    };
    ctx.hw.send_byte(verdict.to_byte())?;

    if verdict.is_match() {
        ctx.attempts = 0;
        info!("Access granted for {:?}", command);
        ctx.emit(DoorEvent::AccessGranted {
            node: Node::Control,
            command,
        });
        return Ok(Some(match command {
            Command::OpenDoor => ControlState::UnlockSequence,
            Command::ChangePassword | Command::TryAgain => ControlState::AwaitProvision,
        }));
    }

    ctx.attempts = ctx.attempts.saturating_add(1);
    warn!(
        "Access denied ({}/{} attempts)",
        ctx.attempts, ctx.config.max_attempts
    );
    ctx.emit(DoorEvent::AccessDenied {
        node: Node::Control,
        attempts: ctx.attempts,
    });

    Ok(Some(if ctx.attempts_exhausted() {
        ControlState::Lockout
    } else {
        ControlState::AwaitCommand
    }))
}

fn verifying_exit<H: ControlHardware, E: EventSink>(ctx: &mut ControlContext<H, E>) {
    ctx.pending = None;
}

// ═══════════════════════════════════════════════════════════════════════════
//  UNLOCK_SEQUENCE / LOCK_SEQUENCE
// ═══════════════════════════════════════════════════════════════════════════

fn unlock_enter<H: ControlHardware, E: EventSink>(ctx: &mut ControlContext<H, E>) {
    let speed = ctx.config.motor_speed_percent;
    ctx.hw.rotate_motor(MotorDirection::Unlock, speed);
}

fn unlock_update<H: ControlHardware, E: EventSink>(
    ctx: &mut ControlContext<H, E>,
) -> Result<Option<ControlState>> {
    ctx.hw.wait_ticks(ctx.config.unlock_ticks);
    ctx.emit(DoorEvent::DoorUnlocked);
    Ok(Some(ControlState::OccupancyPoll))
}

fn lock_enter<H: ControlHardware, E: EventSink>(ctx: &mut ControlContext<H, E>) {
    let speed = ctx.config.motor_speed_percent;
    ctx.hw.rotate_motor(MotorDirection::Lock, speed);
}

fn lock_update<H: ControlHardware, E: EventSink>(
    ctx: &mut ControlContext<H, E>,
) -> Result<Option<ControlState>> {
    ctx.hw.wait_ticks(ctx.config.lock_ticks);
    ctx.emit(DoorEvent::DoorLocked);
    Ok(Some(ControlState::AwaitCommand))
}

fn motor_stop<H: ControlHardware, E: EventSink>(ctx: &mut ControlContext<H, E>) {
    ctx.hw.rotate_motor(MotorDirection::Stop, 0);
}

// ═══════════════════════════════════════════════════════════════════════════
//  OCCUPANCY_POLL
// ═══════════════════════════════════════════════════════════════════════════

fn occupancy_enter<H: ControlHardware, E: EventSink>(ctx: &mut ControlContext<H, E>) {
    ctx.occupied_polls = 0;
}

fn occupancy_update<H: ControlHardware, E: EventSink>(
    ctx: &mut ControlContext<H, E>,
) -> Result<Option<ControlState>> {
    let occupied = ctx.hw.is_occupied().unwrap_or_else(|e| {
        warn!("PIR read failed ({}); treating as occupied", e);
        true
    });

    if occupied {
        ctx.hw.send_byte(OccupancyStatus::Occupied.to_byte())?;
        ctx.occupied_polls = ctx.occupied_polls.saturating_add(1);
        ctx.emit(DoorEvent::StillOccupied {
            polls: ctx.occupied_polls,
        });
        ctx.hw.pause_ms(ctx.config.occupancy_poll_ms);
        return Ok(None);
    }

    ctx.hw.send_byte(OccupancyStatus::Clear.to_byte())?;
    Ok(Some(ControlState::LockSequence))
}

// ═══════════════════════════════════════════════════════════════════════════
//  LOCKOUT
// ═══════════════════════════════════════════════════════════════════════════

fn lockout_enter<H: ControlHardware, E: EventSink>(ctx: &mut ControlContext<H, E>) {
    warn!("Attempt limit reached; alarm on");
    ctx.hw.set_buzzer(true);
    ctx.emit(DoorEvent::LockoutStarted {
        node: Node::Control,
    });
}

fn lockout_update<H: ControlHardware, E: EventSink>(
    ctx: &mut ControlContext<H, E>,
) -> Result<Option<ControlState>> {
    ctx.hw.wait_ticks(ctx.config.lockout_ticks);
    ctx.attempts = 0;
    Ok(Some(ControlState::AwaitCommand))
}

fn lockout_exit<H: ControlHardware, E: EventSink>(ctx: &mut ControlContext<H, E>) {
    ctx.hw.set_buzzer(false);
    ctx.emit(DoorEvent::LockoutEnded {
        node: Node::Control,
    });
}
