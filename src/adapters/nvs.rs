//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ByteStorePort`] as an EEPROM-style byte region backed by
//! one NVS blob.  Reads and writes work on a RAM staging image; `commit`
//! writes the whole image as a single blob and calls `nvs_commit`, which
//! ESP-IDF applies atomically.  Until then the durable blob is untouched.
//!
//! On the host the "flash" is a second in-memory image.

use crate::app::ports::{ByteStorePort, StoreError};
use crate::app::credentials::RECORD_LEN;
use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
const NAMESPACE: &[u8] = b"desk\0";
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
const KEY: &[u8] = b"creds\0";

/// Size of the persisted region.
pub const STORE_CAPACITY: usize = RECORD_LEN;

pub struct NvsByteStore {
    staged: [u8; STORE_CAPACITY],
    durable: [u8; STORE_CAPACITY],
    #[cfg(not(target_os = "espidf"))]
    fail_commits: bool,
}

impl NvsByteStore {
    /// Initialise NVS flash and load the current blob.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised.  A missing blob reads as zeroes.
    pub fn new() -> Result<Self, StoreError> {
        #[cfg_attr(not(target_os = "espidf"), allow(unused_mut))]
        let mut this = Self {
            staged: [0; STORE_CAPACITY],
            durable: [0; STORE_CAPACITY],
            #[cfg(not(target_os = "espidf"))]
            fail_commits: false,
        };

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK || unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StoreError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(StoreError::IoError);
            }

            match this.read_blob() {
                Ok(()) => info!("NvsByteStore: loaded {} byte record", STORE_CAPACITY),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => info!("NvsByteStore: no record yet"),
                Err(e) => warn!("NvsByteStore: read error {}, starting blank", e),
            }
            this.staged = this.durable;
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsByteStore: simulation backend");

        Ok(this)
    }

    /// Open the namespace, run `f` with the handle, then close it.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_blob(&mut self) -> Result<(), i32> {
        let durable = &mut self.durable;
        Self::with_nvs_handle(false, |handle| {
            let mut size = STORE_CAPACITY;
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    KEY.as_ptr() as *const _,
                    durable.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        })
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(image: &[u8; STORE_CAPACITY]) -> Result<(), i32> {
        Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    KEY.as_ptr() as *const _,
                    image.as_ptr() as *const _,
                    image.len(),
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        })
    }

    /// Make every subsequent commit fail (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn set_fail_commits(&mut self, fail: bool) {
        self.fail_commits = fail;
    }

    /// The committed image.
    pub fn durable(&self) -> &[u8; STORE_CAPACITY] {
        &self.durable
    }

    fn range(offset: usize, len: usize) -> Result<core::ops::Range<usize>, StoreError> {
        let end = offset.checked_add(len).ok_or(StoreError::OutOfRange)?;
        if end > STORE_CAPACITY {
            return Err(StoreError::OutOfRange);
        }
        Ok(offset..end)
    }
}

impl ByteStorePort for NvsByteStore {
    fn capacity(&self) -> usize {
        STORE_CAPACITY
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        let range = Self::range(offset, buf.len())?;
        buf.copy_from_slice(&self.staged[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError> {
        let range = Self::range(offset, data.len())?;
        self.staged[range].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if self.staged == self.durable {
            return Ok(());
        }

        #[cfg(target_os = "espidf")]
        if let Err(e) = Self::write_blob(&self.staged) {
            warn!("NvsByteStore: NVS write error {}", e);
            return Err(StoreError::CommitFailed);
        }

        #[cfg(not(target_os = "espidf"))]
        if self.fail_commits {
            warn!("NvsByteStore: simulated commit failure");
            return Err(StoreError::CommitFailed);
        }

        self.durable = self.staged;
        info!("NvsByteStore: committed {} bytes", STORE_CAPACITY);
        Ok(())
    }

    fn rollback(&mut self) {
        self.staged = self.durable;
    }
}
