//! Doorlock firmware library.
//!
//! Two-node door lock: the interaction (HMI) node drives the operator
//! workflow, the control node owns the credential and the door hardware.
//! Both state machines, the wire protocol and every adapter live here so
//! the device binaries, the host simulator and the tests share one core.
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! inside each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod interaction;
pub mod pins;
pub mod protocol;
