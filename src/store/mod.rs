//! Skill Store
//!
//! Short-lived in-memory registry handing a packaged skill payload from
//! the moment it is stored to its later paid download. Entries expire
//! after one hour; cleanup happens lazily on reads, opportunistically on
//! writes, and on a periodic background sweep.
//!
//! Nothing here is durable: a process restart forgets all pending
//! downloads by design.

pub mod sweeper;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::types::SkillPackageData;

/// How long a stored skill stays downloadable.
pub const ENTRY_TTL: Duration = Duration::from_secs(60 * 60);

/// How often the background sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

struct StoredSkill {
    data: SkillPackageData,
    created_at: Instant,
}

/// Process-wide keyed store with TTL. Shared across request handlers
/// behind an `Arc`; the inner map is mutex-guarded since the axum
/// runtime is multi-threaded.
pub struct SkillStore {
    entries: Mutex<HashMap<String, StoredSkill>>,
    ttl: Duration,
}

impl Default for SkillStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillStore {
    pub fn new() -> Self {
        Self::with_ttl(ENTRY_TTL)
    }

    /// Store with a custom TTL. Tests use this to simulate expiry
    /// without waiting an hour.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Insert or overwrite the payload under `id`, resetting its age.
    /// Sweeps expired entries first so cleanup cost rides on write
    /// traffic.
    pub fn put(&self, id: &str, data: SkillPackageData) {
        let mut entries = self.entries.lock().unwrap();
        Self::sweep_locked(&mut entries, self.ttl);
        entries.insert(
            id.to_string(),
            StoredSkill {
                data,
                created_at: Instant::now(),
            },
        );
    }

    /// Fetch the payload under `id` if it exists and has not expired.
    /// An expired entry is deleted on discovery.
    pub fn get(&self, id: &str) -> Option<SkillPackageData> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get(id) {
            if entry.created_at.elapsed() <= self.ttl {
                return Some(entry.data.clone());
            }
            entries.remove(id);
        }
        None
    }

    /// Remove the entry under `id`. Idempotent: removing an absent id is
    /// a no-op, so racing deletes cannot corrupt state.
    pub fn delete(&self, id: &str) {
        self.entries.lock().unwrap().remove(id);
    }

    /// Drop every expired entry. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let removed = Self::sweep_locked(&mut entries, self.ttl);
        if removed > 0 {
            debug!("Swept {} expired skill store entries", removed);
        }
        removed
    }

    /// Number of live entries (expired-but-unswept entries included).
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep_locked(entries: &mut HashMap<String, StoredSkill>, ttl: Duration) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| entry.created_at.elapsed() <= ttl);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metadata;

    fn payload(name: &str) -> SkillPackageData {
        SkillPackageData {
            skill_content: format!("---\nname: {}\n---\nBody", name),
            metadata: Metadata {
                name: name.to_string(),
                description: String::new(),
                version: "1.0.0".to_string(),
            },
        }
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let store = SkillStore::new();
        store.put("abc", payload("demo"));
        assert_eq!(store.get("abc"), Some(payload("demo")));
    }

    #[test]
    fn test_get_after_ttl_elapse_is_absent() {
        let store = SkillStore::with_ttl(Duration::ZERO);
        store.put("abc", payload("demo"));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.get("abc"), None);
        // The expired entry was deleted on discovery, not just hidden.
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_before_ttl_elapse() {
        let store = SkillStore::new();
        store.put("abc", payload("demo"));
        store.delete("abc");
        assert_eq!(store.get("abc"), None);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = SkillStore::new();
        store.delete("never-stored");
        store.put("abc", payload("demo"));
        store.delete("abc");
        store.delete("abc");
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_overwrites_and_resets_age() {
        let store = SkillStore::new();
        store.put("abc", payload("first"));
        store.put("abc", payload("second"));
        assert_eq!(store.get("abc").unwrap().metadata.name, "second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_sweeps_expired_entries() {
        let store = SkillStore::with_ttl(Duration::ZERO);
        store.put("old", payload("old"));
        std::thread::sleep(Duration::from_millis(5));
        store.put("new", payload("new"));
        // "old" was swept by the put; only "new" remains.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sweep_reports_removed_count() {
        let store = SkillStore::with_ttl(Duration::ZERO);
        store.put("a", payload("a"));
        store.put("b", payload("b"));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.sweep(), 2);
        assert!(store.is_empty());
    }
}
