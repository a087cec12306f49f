//! The 5-symbol door credential.
//!
//! Symbols are opaque bytes: whatever the keypad produced.  No character
//! set is enforced.  The same type is used for the stored credential and
//! for transient candidates; which one a value is depends only on who owns
//! it.

use core::fmt;

/// Number of symbols in a credential.  Fixed; never sent on the wire.
pub const CREDENTIAL_LEN: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Credential([u8; CREDENTIAL_LEN]);

impl Credential {
    pub const fn new(symbols: [u8; CREDENTIAL_LEN]) -> Self {
        Self(symbols)
    }

    pub const fn as_bytes(&self) -> &[u8; CREDENTIAL_LEN] {
        &self.0
    }

    /// Byte-for-byte comparison that inspects every symbol regardless of
    /// where the first difference is.
    pub fn matches(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl From<[u8; CREDENTIAL_LEN]> for Credential {
    fn from(symbols: [u8; CREDENTIAL_LEN]) -> Self {
        Self(symbols)
    }
}

impl TryFrom<&[u8]> for Credential {
    type Error = usize;

    /// Fails with the offending length unless exactly [`CREDENTIAL_LEN`]
    /// bytes are given.
    fn try_from(bytes: &[u8]) -> Result<Self, usize> {
        <[u8; CREDENTIAL_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| bytes.len())
    }
}

// Never print the symbols themselves.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(*****)")
    }
}
