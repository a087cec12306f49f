//! Application core boundary.
//!
//! The node state machines in [`crate::control`] and
//! [`crate::interaction`] contain the business rules.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], and
//! everything worth observing leaves through [`events`], keeping the
//! domain testable without real peripherals.

pub mod events;
pub mod ports;
