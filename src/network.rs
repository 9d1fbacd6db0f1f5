//! Host-existence lookups used by `emailDNS` and `urlActive`.

use std::collections::HashSet;
use std::net::ToSocketAddrs;
use std::sync::{Arc, LazyLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Lookups the system resolvers let run at once by default.
pub const DEFAULT_MAX_PENDING: usize = 8;

/// Lookup threads alive across every [`SystemResolver`] in the process.
static PENDING: LazyLock<Arc<AtomicUsize>> = LazyLock::new(|| Arc::new(AtomicUsize::new(0)));

/// Extension point for blocking host lookups.
///
/// Implementations must not panic; any lookup failure is reported as `false`.
pub trait HostResolver: Send + Sync {
    /// True when the domain of an e-mail address accepts mail or at least
    /// resolves.
    fn domain_exists(&self, domain: &str) -> bool;

    /// True when the host name of a URL resolves.
    fn host_exists(&self, host: &str) -> bool {
        self.domain_exists(host)
    }
}

/// Resolver backed by the operating system's name service.
///
/// Each lookup runs on a helper thread and is abandoned after `timeout`. The
/// OS call cannot be cancelled, so an abandoned thread lives on until the
/// name service answers. Lookups fail immediately while `max_pending`
/// lookup threads are alive in the process.
#[derive(Clone, Debug)]
pub struct SystemResolver {
    timeout: Duration,
    max_pending: usize,
    pending: Arc<AtomicUsize>,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            max_pending: DEFAULT_MAX_PENDING,
            pending: Arc::clone(&PENDING),
        }
    }

    /// Caps the number of lookup threads alive at once.
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    /// Lookup threads currently alive in the process, including abandoned
    /// ones.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    fn lookup(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_string();
        if host.is_empty() {
            return false;
        }
        let reserved = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < self.max_pending).then_some(n + 1));
        if reserved.is_err() {
            tracing::warn!(host = %host, max_pending = self.max_pending, "too many host lookups in flight");
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let query = host.clone();
        let pending = Arc::clone(&self.pending);
        let spawned = thread::Builder::new()
            .name("fieldcheck-dns".to_string())
            .spawn(move || {
                let found = (query.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|mut addrs| addrs.next().is_some())
                    .unwrap_or(false);
                pending.fetch_sub(1, Ordering::AcqRel);
                let _ = tx.send(found);
            });
        if let Err(error) = spawned {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            tracing::warn!(host = %host, error = %error, "cannot start host lookup");
            return false;
        }

        match rx.recv_timeout(self.timeout) {
            Ok(found) => {
                tracing::trace!(host = %host, found, "host lookup finished");
                found
            }
            Err(_) => {
                tracing::warn!(
                    host = %host,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "host lookup timed out"
                );
                false
            }
        }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_DNS_TIMEOUT_MS))
    }
}

impl HostResolver for SystemResolver {
    fn domain_exists(&self, domain: &str) -> bool {
        self.lookup(domain)
    }
}

/// Resolver answering from a fixed set of known hosts. Matching is
/// case-insensitive and ignores a trailing dot.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    hosts: HashSet<String>,
}

impl StaticResolver {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts.into_iter().map(|h| normalize_host(h.as_ref())).collect(),
        }
    }
}

impl HostResolver for StaticResolver {
    fn domain_exists(&self, domain: &str) -> bool {
        self.hosts.contains(&normalize_host(domain))
    }
}

fn normalize_host(host: &str) -> String {
    host.trim_end_matches('.').to_ascii_lowercase()
}
