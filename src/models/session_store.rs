use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::QuoteSession;

struct Entry {
    session: QuoteSession,
    last_seen: Instant,
}

/// Quote sessions keyed by session id.
///
/// Reads never create entries. Writes prune sessions idle longer than
/// `idle_ttl` and, once `max_sessions` is reached, evict the least recently
/// seen one before inserting a new id.
pub struct SessionStore {
    entries: HashMap<String, Entry>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        SessionStore {
            entries: HashMap::new(),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, sid: &str) -> bool {
        self.entries.contains_key(sid)
    }

    /// Run `f` against the session for `sid`, or against an empty session
    /// when the id is unknown or expired. Nothing is stored for unknown ids.
    pub fn read<R>(&mut self, sid: &str, now: Instant, f: impl FnOnce(&QuoteSession) -> R) -> R {
        let ttl = self.idle_ttl;
        match self.entries.get_mut(sid) {
            Some(entry) if now.saturating_duration_since(entry.last_seen) <= ttl => {
                entry.last_seen = now;
                f(&entry.session)
            }
            _ => f(&QuoteSession::default()),
        }
    }

    /// Run `f` against the session for `sid`, creating it on first write.
    pub fn write<R>(&mut self, sid: &str, now: Instant, f: impl FnOnce(&mut QuoteSession) -> R) -> R {
        self.prune(now);
        if !self.entries.contains_key(sid) && self.entries.len() >= self.max_sessions {
            self.evict_oldest();
        }
        let entry = self.entries.entry(sid.to_string()).or_insert_with(|| Entry {
            session: QuoteSession::default(),
            last_seen: now,
        });
        entry.last_seen = now;
        f(&mut entry.session)
    }

    /// Like [`SessionStore::write`] but only for sessions that already exist.
    pub fn write_existing<R>(
        &mut self,
        sid: &str,
        now: Instant,
        f: impl FnOnce(&mut QuoteSession) -> R,
    ) -> Option<R> {
        self.prune(now);
        let entry = self.entries.get_mut(sid)?;
        entry.last_seen = now;
        Some(f(&mut entry.session))
    }

    pub fn remove(&mut self, sid: &str) -> bool {
        self.entries.remove(sid).is_some()
    }

    /// Drop sessions idle longer than the TTL. Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.idle_ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= ttl);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "Pruned idle quote sessions");
        }
        removed
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_seen)
            .map(|(sid, _)| sid.clone());
        if let Some(sid) = oldest {
            tracing::warn!(limit = self.max_sessions, "Session store full; evicting least recently used session");
            self.entries.remove(&sid);
        }
    }
}
