use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Outstanding requests keyed by resolved URL. At most one live entry per URL.
///
/// The lock is only taken for synchronous bookkeeping and never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_ticket: AtomicU64,
    entries: Mutex<HashMap<String, Entry>>,
}

#[derive(Debug)]
struct Entry {
    ticket: u64,
    token: CancellationToken,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels whatever is outstanding at `url` and registers a new request in its place.
    ///
    /// The returned guard removes the entry when dropped, unless a newer request has
    /// already replaced it.
    pub fn register(&self, url: &str) -> InFlightGuard {
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.entries().insert(
            url.to_string(),
            Entry {
                ticket,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(url, "Cancelling superseded request");
            previous.token.cancel();
        }

        InFlightGuard {
            registry: self.clone(),
            url: url.to_string(),
            ticket,
            token,
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn release(&self, url: &str, ticket: u64) {
        let mut entries = self.entries();
        if entries.get(url).is_some_and(|entry| entry.ticket == ticket) {
            entries.remove(url);
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Registration of one outstanding request.
#[derive(Debug)]
pub struct InFlightGuard {
    registry: InFlightRegistry,
    url: String,
    ticket: u64,
    token: CancellationToken,
}

impl InFlightGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.release(&self.url, self.ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_release() {
        let registry = InFlightRegistry::new();
        {
            let guard = registry.register("goods");
            assert!(registry.contains("goods"));
            assert!(!guard.token().is_cancelled());
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_second_registration_cancels_first() {
        let registry = InFlightRegistry::new();
        let first = registry.register("goods/1/dashboard");
        let second = registry.register("goods/1/dashboard");

        assert!(first.token().is_cancelled());
        assert!(!second.token().is_cancelled());
        assert_eq!(registry.len(), 1);

        // The superseded guard must not evict its successor.
        drop(first);
        assert!(registry.contains("goods/1/dashboard"));

        drop(second);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_different_urls_are_independent() {
        let registry = InFlightRegistry::new();
        let a = registry.register("goods/1/dashboard");
        let b = registry.register("goods/2/dashboard");

        assert!(!a.token().is_cancelled());
        assert!(!b.token().is_cancelled());
        assert_eq!(registry.len(), 2);
        assert_eq!(a.url(), "goods/1/dashboard");
    }
}
