//! Optional reporting hook for dispatch.
//!
//! Dispatch drops list and collection entries whose service lacks the
//! required capability, and ignores keys no table knows about. Neither is an
//! error and neither is logged. An observer is the only way to see them.

use parking_lot::Mutex;

/// A list or collection entry that was not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Table key, e.g. `handlers`.
    pub key: &'static str,
    /// Position (`0`, `1`, ...) for lists, sub-key for collections.
    pub entry: String,
    /// Service identifier that was looked up.
    pub id: String,
    /// Capability the service was checked against.
    pub expected: &'static str,
    /// Type the service was created from.
    pub found: &'static str,
}

/// Receives dispatch events that do not affect the result.
pub trait DispatchObserver {
    /// An entry was dropped because its service lacks the capability.
    fn skipped(&self, _entry: &SkippedEntry) {}

    /// The section holds a key no operation reads.
    fn unknown_key(&self, _key: &str) {}

    /// A list or collection key holds a value of the wrong shape and was
    /// treated as empty.
    fn malformed(&self, _key: &'static str, _expected: &'static str) {}
}

/// Observer that records everything it is told.
#[derive(Debug, Default)]
pub struct SkipLog {
    skipped: Mutex<Vec<SkippedEntry>>,
    unknown: Mutex<Vec<String>>,
    malformed: Mutex<Vec<&'static str>>,
}

impl SkipLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipped_entries(&self) -> Vec<SkippedEntry> {
        self.skipped.lock().clone()
    }

    pub fn unknown_keys(&self) -> Vec<String> {
        self.unknown.lock().clone()
    }

    pub fn malformed_keys(&self) -> Vec<&'static str> {
        self.malformed.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.lock().is_empty()
            && self.unknown.lock().is_empty()
            && self.malformed.lock().is_empty()
    }
}

impl DispatchObserver for SkipLog {
    fn skipped(&self, entry: &SkippedEntry) {
        self.skipped.lock().push(entry.clone());
    }

    fn unknown_key(&self, key: &str) {
        self.unknown.lock().push(key.to_string());
    }

    fn malformed(&self, key: &'static str, _expected: &'static str) {
        self.malformed.lock().push(key);
    }
}
