//! [`CredentialStore`] backends.
//!
//! | Backend                  | Medium                   | Atomicity            |
//! |--------------------------|--------------------------|----------------------|
//! | [`NvsCredentialStore`]   | key-value [`StoragePort`]| one blob commit      |
//! | [`EepromCredentialStore`]| byte [`EepromPort`]      | per byte, see below  |
//!
//! Both only ever see a credential the control node has already confirmed,
//! so a rejected provisioning attempt never reaches storage.

use log::{info, warn};

use crate::app::ports::{CredentialStore, EepromPort, StorageError, StoragePort};
use crate::protocol::{CREDENTIAL_LEN, Credential};

// ── NVS ───────────────────────────────────────────────────────

/// NVS namespace holding the door credential.
pub const AUTH_NAMESPACE: &str = "auth";
/// Key of the credential blob.
pub const CREDENTIAL_KEY: &str = "door_pin";

/// Stores the credential as a single 5-byte blob.
pub struct NvsCredentialStore<S> {
    storage: S,
}

impl<S: StoragePort> NvsCredentialStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Whether a credential was ever persisted.
    pub fn is_provisioned(&self) -> bool {
        self.storage.exists(AUTH_NAMESPACE, CREDENTIAL_KEY)
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S: StoragePort> CredentialStore for NvsCredentialStore<S> {
    fn persist_credential(&mut self, credential: &Credential) -> Result<(), StorageError> {
        self.storage
            .write(AUTH_NAMESPACE, CREDENTIAL_KEY, credential.as_bytes())?;
        info!("Credential persisted to NVS");
        Ok(())
    }

    fn load_credential(&mut self) -> Result<Credential, StorageError> {
        let mut buf = [0u8; CREDENTIAL_LEN + 1];
        let len = self.storage.read(AUTH_NAMESPACE, CREDENTIAL_KEY, &mut buf)?;
        Credential::try_from(&buf[..len]).map_err(|len| {
            warn!("Stored credential has {} bytes", len);
            StorageError::Corrupted
        })
    }
}

// ── EEPROM ────────────────────────────────────────────────────

/// Stores the credential as five consecutive bytes from `base`.
///
/// Writes go symbol by symbol.  A reset mid-write can leave a mixed
/// credential, but both nodes provision on every boot before anything is
/// verified against it.
pub struct EepromCredentialStore<E> {
    eeprom: E,
    base: u16,
}

impl<E: EepromPort> EepromCredentialStore<E> {
    pub fn new(eeprom: E, base: u16) -> Self {
        Self { eeprom, base }
    }

    pub fn base_address(&self) -> u16 {
        self.base
    }

    pub fn into_inner(self) -> E {
        self.eeprom
    }

    fn slot(&self, index: usize) -> u16 {
        self.base.wrapping_add(index as u16)
    }
}

impl<E: EepromPort> CredentialStore for EepromCredentialStore<E> {
    fn persist_credential(&mut self, credential: &Credential) -> Result<(), StorageError> {
        for (i, &symbol) in credential.as_bytes().iter().enumerate() {
            let address = self.slot(i);
            self.eeprom.write_byte(address, symbol)?;
        }
        info!("Credential persisted to EEPROM at 0x{:04x}", self.base);
        Ok(())
    }

    fn load_credential(&mut self) -> Result<Credential, StorageError> {
        let mut symbols = [0u8; CREDENTIAL_LEN];
        for (i, slot) in symbols.iter_mut().enumerate() {
            let address = self.slot(i);
            *slot = self.eeprom.read_byte(address)?;
        }
        Ok(Credential::new(symbols))
    }
}
