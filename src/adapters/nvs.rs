//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StoragePort`] and [`ConfigPort`] for the door lock.
//!
//! - On ESP-IDF every write is one `nvs_set_blob` + `nvs_commit`, which the
//!   NVS library commits atomically.  A power cut during provisioning
//!   leaves either the old credential or the new one, never a mix.
//! - The host backend is an in-memory map (simulation and tests).
//! - `LockConfig` is stored as a `postcard` blob and range-checked before
//!   it is written.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::{LockConfig, validate_config};

#[cfg(not(target_os = "espidf"))]
use std::{cell::RefCell, collections::HashMap};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "doorlock";
const CONFIG_KEY: &str = "lockcfg";

/// Upper bound for any blob this crate stores.
const MAX_BLOB_SIZE: usize = 256;

#[cfg(not(target_os = "espidf"))]
type Slots = HashMap<(String, String), Vec<u8>>;

pub struct NvsStore {
    #[cfg(not(target_os = "espidf"))]
    slots: RefCell<Slots>,
}

impl NvsStore {
    /// Initialise NVS flash.
    ///
    /// A partition with no free pages or from a newer IDF version is erased
    /// and re-initialised; that loses the stored credential, after which
    /// the nodes fall back to provisioning as they do on every boot.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any other NVS use.
            let mut ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: partition unusable ({}), erasing", ret);
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
                ret = unsafe { nvs_flash_init() };
            }
            if ret != ESP_OK {
                return Err(StorageError::IoError);
            }
            info!("NvsStore: flash partition ready");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsStore: in-memory backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            slots: RefCell::new(Slots::new()),
        })
    }

    /// NVS names are at most 15 bytes plus NUL.
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; 16] {
        let mut buf = [0u8; 16];
        let bytes = name.as_bytes();
        let len = bytes.len().min(15);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open `namespace`, run `f` with the handle, close it again.
    #[cfg(target_os = "espidf")]
    fn with_handle<T>(
        namespace: &str,
        mode: nvs_open_mode_t,
        f: impl FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    ) -> Result<T, esp_err_t> {
        let ns = Self::c_name(namespace);
        let mut handle: nvs_handle_t = 0;
        let ret = unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }
        let result = f(handle);
        unsafe { nvs_close(handle) };
        result
    }

    /// Copy the blob at `namespace/key` into `buf`.
    fn get_blob(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let slots = self.slots.borrow();
            let data = slots
                .get(&(namespace.to_owned(), key.to_owned()))
                .ok_or(StorageError::NotFound)?;
            let len = data.len().min(buf.len());
            buf[..len].copy_from_slice(&data[..len]);
            Ok(len)
        }

        #[cfg(target_os = "espidf")]
        {
            let name = Self::c_name(key);
            Self::with_handle(namespace, nvs_open_mode_t_NVS_READONLY, |h| {
                let mut size = buf.len();
                match unsafe { nvs_get_blob(h, name.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size) } {
                    ESP_OK => Ok(size),
                    err => Err(err),
                }
            })
            .map_err(|err| match err {
                ESP_ERR_NVS_NOT_FOUND => StorageError::NotFound,
                _ => StorageError::IoError,
            })
        }
    }

    /// Replace the blob at `namespace/key` in one commit.
    fn put_blob(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MAX_BLOB_SIZE {
            warn!(
                "NvsStore: {}/{} is {} bytes (max {})",
                namespace,
                key,
                data.len(),
                MAX_BLOB_SIZE
            );
            return Err(StorageError::OutOfRange);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.slots
                .borrow_mut()
                .insert((namespace.to_owned(), key.to_owned()), data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let name = Self::c_name(key);
            Self::with_handle(namespace, nvs_open_mode_t_NVS_READWRITE, |h| {
                let ret = unsafe { nvs_set_blob(h, name.as_ptr().cast(), data.as_ptr().cast(), data.len()) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                match unsafe { nvs_commit(h) } {
                    ESP_OK => Ok(()),
                    err => Err(err),
                }
            })
            .map_err(|err| {
                warn!("NvsStore: writing {}/{} failed ({})", namespace, key, err);
                StorageError::IoError
            })
        }
    }
}

impl StoragePort for NvsStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        self.get_blob(namespace, key, buf)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.put_blob(namespace, key, data)
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            self.slots
                .borrow()
                .contains_key(&(namespace.to_owned(), key.to_owned()))
        }

        #[cfg(target_os = "espidf")]
        {
            let name = Self::c_name(key);
            Self::with_handle(namespace, nvs_open_mode_t_NVS_READONLY, |h| {
                Ok(unsafe { nvs_find_key(h, name.as_ptr().cast(), core::ptr::null_mut()) } == ESP_OK)
            })
            .unwrap_or(false)
        }
    }
}

impl ConfigPort for NvsStore {
    fn load(&self) -> Result<LockConfig, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        let len = match self.get_blob(CONFIG_NAMESPACE, CONFIG_KEY, &mut buf) {
            Ok(len) => len,
            Err(StorageError::NotFound) => {
                info!("NvsStore: no stored config, using defaults");
                return Ok(LockConfig::default());
            }
            Err(_) => return Err(ConfigError::IoError),
        };
        let cfg: LockConfig =
            postcard::from_bytes(&buf[..len]).map_err(|_| ConfigError::Corrupted)?;
        validate_config(&cfg)?;
        info!("NvsStore: loaded config ({} bytes)", len);
        Ok(cfg)
    }

    fn save(&self, config: &LockConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.put_blob(CONFIG_NAMESPACE, CONFIG_KEY, &bytes)
            .map_err(|_| ConfigError::IoError)?;
        info!("NvsStore: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
