//! Byte-level protocol shared by the HMI ECU and the Control ECU.
//!
//! ```text
//!  HMI ──[START c1..c5 START c1..c5]──▶ Control      provision
//!  HMI ◀──────────[1 | 0]───────────── Control      provision verdict
//!  HMI ──────────[TRY_AGAIN]─────────▶ Control      restart provisioning
//!  HMI ──────────[ '+' | '-' ]───────▶ Control      requested operation
//!  HMI ─────────[START c1..c5]───────▶ Control      operation candidate
//!  HMI ◀──────────[1 | 0]───────────── Control      verification verdict
//!  HMI ◀─────[WAIT_MSG ... WAIT_MSG 0]─ Control      occupancy poll
//! ```
//!
//! The link is strictly half-duplex alternating: at every point exactly one
//! side sends and the other is blocked in a receive.  There is no length
//! field, checksum or acknowledgement.  The 1/0 byte is overloaded; its
//! meaning depends on which phase both nodes are in, so it is decoded into
//! either [`Verdict`] or [`OccupancyStatus`] by the caller that knows the
//! phase.

pub mod codec;
pub mod credential;

pub use codec::{CredentialDecoder, encode_credential, receive_credential, send_credential};
pub use credential::{CREDENTIAL_LEN, Credential};

// ---------------------------------------------------------------------------
// Wire vocabulary
// ---------------------------------------------------------------------------

/// Marks the next [`CREDENTIAL_LEN`] bytes as a credential payload.
pub const START: u8 = 0x15;
/// Request a door-open operation.
pub const CMD_OPEN: u8 = b'+';
/// Request a password-change operation.
pub const CMD_CHANGE: u8 = b'-';
/// HMI asks the control node to restart provisioning.
pub const TRY_AGAIN: u8 = 0x11;
/// "Still occupied" during the occupancy poll.
pub const WAIT_MSG: u8 = 0x20;
/// Affirmative verdict.
pub const SUCCESS: u8 = 1;
/// Negative verdict; also "occupancy cleared" during the poll.
pub const FAILURE: u8 = 0;

// ---------------------------------------------------------------------------
// Commands (HMI → Control)
// ---------------------------------------------------------------------------

/// A command byte the control node acts on while awaiting a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Verify, then unlock / wait for occupancy / lock.
    OpenDoor = CMD_OPEN,
    /// Verify, then provision a new credential.
    ChangePassword = CMD_CHANGE,
    /// Restart provisioning without a password check.
    TryAgain = TRY_AGAIN,
}

impl Command {
    /// Parse a command byte.  Anything unrecognised is `None`; callers
    /// ignore such bytes rather than treating them as errors.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_OPEN => Some(Self::OpenDoor),
            CMD_CHANGE => Some(Self::ChangePassword),
            TRY_AGAIN => Some(Self::TryAgain),
            _ => None,
        }
    }

    /// The two operations an operator can pick from the menu.
    /// `TryAgain` is protocol-internal and never a menu choice.
    pub fn from_menu_key(key: u8) -> Option<Self> {
        match Self::from_byte(key) {
            Some(cmd @ (Self::OpenDoor | Self::ChangePassword)) => Some(cmd),
            _ => None,
        }
    }

    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Whether this command requires password verification.
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::OpenDoor | Self::ChangePassword)
    }
}

// ---------------------------------------------------------------------------
// Verdict (Control → HMI, after provisioning or verification)
// ---------------------------------------------------------------------------

/// Outcome of a provisioning comparison or a password verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
}

impl Verdict {
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Match => SUCCESS,
            Self::Mismatch => FAILURE,
        }
    }

    /// Only [`SUCCESS`] is a match; every other byte counts as a mismatch.
    pub const fn from_byte(byte: u8) -> Self {
        if byte == SUCCESS {
            Self::Match
        } else {
            Self::Mismatch
        }
    }

    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }
}

impl From<bool> for Verdict {
    fn from(matched: bool) -> Self {
        if matched { Self::Match } else { Self::Mismatch }
    }
}

// ---------------------------------------------------------------------------
// Occupancy status (Control → HMI, during the post-unlock poll)
// ---------------------------------------------------------------------------

/// One sample of the post-unlock occupancy poll as seen on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyStatus {
    /// Motion still detected; the door stays open.
    Occupied,
    /// Motion cleared; the control node is about to lock.
    Clear,
}

impl OccupancyStatus {
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Occupied => WAIT_MSG,
            Self::Clear => FAILURE,
        }
    }

    /// Only `0` ends the poll; any other byte means "still occupied".
    pub const fn from_byte(byte: u8) -> Self {
        if byte == FAILURE {
            Self::Clear
        } else {
            Self::Occupied
        }
    }
}
