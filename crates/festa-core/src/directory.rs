//! # Waiter Directory
//!
//! Process-local, best-effort index of known waiters, keyed by uppercase
//! badge code.
//!
//! The index itself is pure data; the HTTP refresh that fills it lives in
//! `festa-scan`. A refresh failure simply leaves the prior (possibly empty)
//! contents in place, and lookups miss - which the session machine reports
//! as an unknown waiter.

use std::collections::HashMap;

use crate::normalize::normalize;
use crate::types::Waiter;

/// In-memory waiter index. Only meaningful in SALE mode.
#[derive(Debug, Clone, Default)]
pub struct WaiterDirectory {
    by_code: HashMap<String, Waiter>,
}

impl WaiterDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        WaiterDirectory::default()
    }

    /// Replaces the entire index with a freshly fetched waiter list.
    ///
    /// Codes are re-normalized on the way in so a lookup by canonical code
    /// always hits, whatever casing the server sent.
    pub fn replace_all(&mut self, waiters: Vec<Waiter>) {
        self.by_code = waiters
            .into_iter()
            .map(|w| (normalize(&w.code), w))
            .collect();
    }

    /// Looks up a waiter by canonical badge code.
    pub fn lookup(&self, code: &str) -> Option<&Waiter> {
        self.by_code.get(code)
    }

    /// Number of waiters currently indexed.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// True when no waiters are known (fresh station or failed preload).
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiter(code: &str, name: &str) -> Waiter {
        Waiter {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_lookup_hits_by_canonical_code() {
        let mut directory = WaiterDirectory::new();
        directory.replace_all(vec![waiter("W-7", "Ana"), waiter("w-9", "Luis")]);

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.lookup("W-7").unwrap().name, "Ana");
        // Server sent lowercase; index is still canonical
        assert_eq!(directory.lookup("W-9").unwrap().name, "Luis");
        assert!(directory.lookup("W-99").is_none());
    }

    #[test]
    fn test_replace_all_drops_prior_contents() {
        let mut directory = WaiterDirectory::new();
        directory.replace_all(vec![waiter("W-1", "Ana")]);
        directory.replace_all(vec![waiter("W-2", "Luis")]);

        assert!(directory.lookup("W-1").is_none());
        assert!(directory.lookup("W-2").is_some());
    }
}
