//! Local state: the cached id of the provider-side ban list.
//!
//! Saving the id after `start` avoids a list lookup on every ban. There is
//! no locking and no atomic rename. Two windows are therefore open across
//! concurrent invocations: a `stop` deleting the list while a `ban` still
//! holds the old id, and two `save` calls racing on the file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// File name of the cache inside the state directory.
pub const LIST_ID_FILE: &str = "fail2ban-list.id";

/// Single-value store backed by one plaintext file.
#[derive(Debug, Clone)]
pub struct ListIdStore {
    path: PathBuf,
}

impl ListIdStore {
    /// Store at `<state_dir>/fail2ban-list.id`.
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(LIST_ID_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached id, or `None` on first run. Line endings are stripped.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents
                .lines()
                .next()
                .map(|line| line.trim_end_matches(['\r', '\n']).to_owned())
                .filter(|id| !id.is_empty()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), "cannot read list id cache: {e}");
                None
            }
        }
    }

    /// Overwrite the cache with `id`, verbatim. Returns whether the write
    /// succeeded.
    pub fn save(&self, id: &str) -> bool {
        match fs::write(&self.path, id) {
            Ok(()) => true,
            Err(e) => {
                debug!(path = %self.path.display(), "list id cache write failed: {e}");
                false
            }
        }
    }

    /// Forget the cached id. A missing file counts as cleared.
    pub fn clear(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                debug!(path = %self.path.display(), "list id cache removal failed: {e}");
                false
            }
        }
    }
}
