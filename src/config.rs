//! Mount configuration.
//!
//! Generalizes the teacher's build-time `serde`/`toml` configuration
//! loading to a runtime config object: the caller-supplied root prefix
//! (§3.6) and the default mode bits applied when none are given
//! explicitly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for mounting a [`crate::fs::Filesystem`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MountConfig {
    /// Caller-supplied prefix string identifying the root inode log
    /// (§3.6). Restarting against the same backend and prefix re-mounts
    /// the same filesystem.
    pub root_prefix: String,

    /// Mode bits applied to the root directory created on first mount,
    /// before `S_IFDIR` is added in.
    #[serde(default = "default_root_mode")]
    pub root_mode: u32,
}

fn default_root_mode() -> u32 {
    0o755
}

impl MountConfig {
    pub fn new(root_prefix: impl Into<String>) -> Self {
        MountConfig {
            root_prefix: root_prefix.into(),
            root_mode: default_root_mode(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Backend(format!("invalid mount config: {e}")))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Backend(format!("cannot serialize config: {e}")))
    }

    /// Derives the root inode-log ref from the prefix string (§3.6): the
    /// prefix identifies the filesystem, but the backend only knows refs,
    /// so the prefix is hashed down to one.
    pub fn root_log_ref(&self) -> crate::backend::Ref {
        // FNV-1a, expanded to fill all 32 bytes so two different
        // prefixes collide only with the same overwhelming-unlikelihood
        // as two fresh `Ref::generate()` calls.
        let mut bytes = [0u8; 32];
        for (i, chunk) in bytes.chunks_mut(8).enumerate() {
            let mut hash: u64 = 0xcbf29ce484222325 ^ (i as u64);
            for b in self.root_prefix.as_bytes() {
                hash ^= *b as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            chunk.copy_from_slice(&hash.to_le_bytes());
        }
        crate::backend::Ref(bytes)
    }
}
