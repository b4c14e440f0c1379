//! Durable credential slot.
//!
//! One directory, one blob (`creds.json`). Writes go through a temp
//! file followed by a rename so a concurrent reader sees the old blob
//! or the new one, never a partial write.

use std::path::{Path, PathBuf};

use wab_adapter::Credentials;
use wab_domain::Result;

const SLOT_FILE: &str = "creds.json";
const SLOT_TMP: &str = "creds.json.tmp";

pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Open (and create if needed) the slot directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        tracing::info!(path = %dir.display(), "credential store ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the persisted credential set. An absent slot yields
    /// `None`; an unreadable or corrupt blob is logged and treated as
    /// absent rather than crashing the process.
    pub fn load(&self) -> Option<Credentials> {
        let path = self.dir.join(SLOT_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "credential slot unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(creds) => Some(creds),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "credential blob corrupt, ignoring");
                None
            }
        }
    }

    /// Persist a rotated credential set, atomically superseding the
    /// prior one.
    pub fn save(&self, creds: &Credentials) -> Result<()> {
        let tmp = self.dir.join(SLOT_TMP);
        let path = self.dir.join(SLOT_FILE);
        let json = serde_json::to_string(creds)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Whether the persisted credential set has completed pairing.
    pub fn registered(&self) -> bool {
        self.load().map(|c| c.registered()).unwrap_or(false)
    }

    /// Destroy the slot and recreate it empty. Idempotent.
    pub fn wipe(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        std::fs::create_dir_all(&self.dir)?;
        tracing::info!(path = %self.dir.display(), "credential slot wiped");
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
