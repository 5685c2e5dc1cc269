//! Network credentials and their persistent record.
//!
//! The record is a fixed 130-byte image at offset 0 of the byte store:
//!
//! ```text
//!   0        33                       97        130
//!   ├─ ssid ─┼──────── pass ──────────┼─ dev_id ─┤
//!   [u8; 33]         [u8; 64]          [u8; 33]
//! ```
//!
//! Each field is NUL-terminated and NUL-padded.  An empty SSID means
//! "no credentials configured".  A record whose fields are not valid
//! text (e.g. erased flash reading back as `0xFF`) loads as empty.

use log::{info, warn};

use super::ports::{ByteStorePort, StoreError};

pub const SSID_MAX_LEN: usize = 32;
pub const PASS_MAX_LEN: usize = 63;
pub const DEV_ID_MAX_LEN: usize = 32;

const SSID_FIELD: usize = SSID_MAX_LEN + 1;
const PASS_FIELD: usize = PASS_MAX_LEN + 1;
const DEV_ID_FIELD: usize = DEV_ID_MAX_LEN + 1;

/// Size of the persisted record in bytes.
pub const RECORD_LEN: usize = SSID_FIELD + PASS_FIELD + DEV_ID_FIELD;
/// Offset of the record in the byte store.
pub const RECORD_OFFSET: usize = 0;

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

/// Station credentials plus the device identifier.
///
/// Fields are private so every value in circulation satisfies the
/// capacity and character invariants checked by [`Credentials::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    ssid: heapless::String<SSID_MAX_LEN>,
    pass: heapless::String<PASS_MAX_LEN>,
    dev_id: heapless::String<DEV_ID_MAX_LEN>,
}

impl Credentials {
    /// Validate and build a credential set.
    ///
    /// - `ssid`: 1–32 bytes, no control characters
    /// - `pass`: 0–63 bytes (empty = open network), no control characters
    /// - `dev_id`: 1–32 bytes of printable ASCII (used as host name and URL segment)
    pub fn new(ssid: &str, pass: &str, dev_id: &str) -> Result<Self, StoreError> {
        if ssid.is_empty() || ssid.len() > SSID_MAX_LEN || has_control_chars(ssid) {
            return Err(StoreError::ValidationFailed("SSID must be 1-32 bytes of text"));
        }
        if pass.len() > PASS_MAX_LEN || has_control_chars(pass) {
            return Err(StoreError::ValidationFailed("password must be at most 63 bytes of text"));
        }
        if dev_id.is_empty() || dev_id.len() > DEV_ID_MAX_LEN || !is_printable_ascii(dev_id) {
            return Err(StoreError::ValidationFailed(
                "device name must be 1-32 printable ASCII characters",
            ));
        }

        let mut creds = Self::default();
        // Lengths were checked above, so the pushes cannot overflow.
        let _ = creds.ssid.push_str(ssid);
        let _ = creds.pass.push_str(pass);
        let _ = creds.dev_id.push_str(dev_id);
        Ok(creds)
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn pass(&self) -> &str {
        &self.pass
    }

    pub fn dev_id(&self) -> &str {
        &self.dev_id
    }

    /// `false` when no network has been configured.
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }

    /// Serialize into the fixed record layout.
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        let (ssid, rest) = record.split_at_mut(SSID_FIELD);
        let (pass, dev_id) = rest.split_at_mut(PASS_FIELD);
        ssid[..self.ssid.len()].copy_from_slice(self.ssid.as_bytes());
        pass[..self.pass.len()].copy_from_slice(self.pass.as_bytes());
        dev_id[..self.dev_id.len()].copy_from_slice(self.dev_id.as_bytes());
        record
    }

    /// Parse a record.  Anything that does not decode to a valid
    /// credential set yields [`Credentials::default`].
    pub fn decode(record: &[u8; RECORD_LEN]) -> Self {
        let (ssid, rest) = record.split_at(SSID_FIELD);
        let (pass, dev_id) = rest.split_at(PASS_FIELD);

        let (Some(ssid), Some(pass), Some(dev_id)) =
            (field_str(ssid), field_str(pass), field_str(dev_id))
        else {
            return Self::default();
        };

        if ssid.is_empty() {
            return Self::default();
        }
        Self::new(ssid, pass, dev_id).unwrap_or_default()
    }
}

/// Text up to the first NUL.  `None` if the field has no terminator or is
/// not UTF-8.
fn field_str(field: &[u8]) -> Option<&str> {
    let end = field.iter().position(|&b| b == 0)?;
    core::str::from_utf8(&field[..end]).ok()
}

fn has_control_chars(s: &str) -> bool {
    s.chars().any(char::is_control)
}

/// Returns `true` if every byte of `s` is in the printable ASCII range
/// `0x20..=0x7E` (space through tilde, inclusive).
fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

// ───────────────────────────────────────────────────────────────
// Credential store
// ───────────────────────────────────────────────────────────────

/// Owns the credential record on top of a [`ByteStorePort`].
///
/// The cached copy is only replaced after the store commits, so a failed
/// save leaves both the durable record and the in-memory view unchanged.
pub struct CredentialStore<S> {
    store: S,
    cached: Credentials,
}

impl<S: ByteStorePort> CredentialStore<S> {
    /// Wrap `store` and load the current record.
    pub fn open(store: S) -> Self {
        let mut this = Self {
            store,
            cached: Credentials::default(),
        };
        this.load();
        this
    }

    /// Re-read the record from the store.
    pub fn load(&mut self) -> Credentials {
        let mut record = [0u8; RECORD_LEN];
        self.cached = match self.store.read(RECORD_OFFSET, &mut record) {
            Ok(()) => Credentials::decode(&record),
            Err(e) => {
                warn!("CredentialStore: read failed ({}), treating as unconfigured", e);
                Credentials::default()
            }
        };
        info!(
            "CredentialStore: loaded (configured={}, dev_id='{}')",
            self.cached.is_configured(),
            self.cached.dev_id()
        );
        self.cached.clone()
    }

    /// The last successfully loaded or committed record.
    pub fn current(&self) -> &Credentials {
        &self.cached
    }

    /// Persist `creds` atomically.
    pub fn save(&mut self, creds: &Credentials) -> Result<(), StoreError> {
        self.persist(creds)?;
        info!("CredentialStore: saved (ssid='{}', dev_id='{}')", creds.ssid(), creds.dev_id());
        Ok(())
    }

    /// Wipe the record to empty fields.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.persist(&Credentials::default())?;
        info!("CredentialStore: reset to factory state");
        Ok(())
    }

    /// Borrow the underlying store (diagnostics and tests).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, e.g. to reopen it after a restart.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn persist(&mut self, creds: &Credentials) -> Result<(), StoreError> {
        if let Err(e) = self.store.write(RECORD_OFFSET, &creds.encode()) {
            self.store.rollback();
            warn!("CredentialStore: staging failed ({})", e);
            return Err(e);
        }
        if let Err(e) = self.store.commit() {
            self.store.rollback();
            warn!("CredentialStore: commit failed ({}), previous record kept", e);
            return Err(StoreError::CommitFailed);
        }
        self.cached = creds.clone();
        Ok(())
    }
}
