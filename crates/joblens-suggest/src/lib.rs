//! Type-ahead suggestions: a synchronous local path over the working set
//! and a debounced, cancelable remote path for cities.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use joblens_client::JobsClient;
use joblens_core::{City, JobRecord};
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

pub const CRATE_NAME: &str = "joblens-suggest";

/// Upper bound for both suggestion lists.
pub const MAX_SUGGESTIONS: usize = 5;

/// Inputs shorter than this clear suggestions without a lookup.
pub const MIN_PREFIX_LEN: usize = 2;

/// Quiet period the remote path waits for before issuing a lookup.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Title/company suggestions from the in-memory working set. Synchronous,
/// case-insensitive substring, order-preserving dedup, capped.
pub fn local_suggestions(working_set: &[JobRecord], input: &str) -> Vec<String> {
    let needle = input.trim().to_lowercase();
    let mut suggestions = Vec::new();
    if needle.is_empty() {
        return suggestions;
    }
    let mut seen = HashSet::new();
    for record in working_set {
        for candidate in [record.title.as_str(), record.company.as_str()] {
            if suggestions.len() == MAX_SUGGESTIONS {
                return suggestions;
            }
            let lowered = candidate.to_lowercase();
            if lowered.contains(&needle) && seen.insert(lowered) {
                suggestions.push(candidate.to_string());
            }
        }
    }
    suggestions
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("city lookup failed: {0}")]
    Lookup(String),
}

/// Seam between the suggestion engine and the `/cities` endpoint; test
/// fakes implement this to script latency and failures.
#[async_trait]
pub trait CityLookup: Send + Sync + 'static {
    async fn lookup(&self, prefix: &str) -> Result<Vec<City>, SuggestError>;
}

#[async_trait]
impl CityLookup for JobsClient {
    async fn lookup(&self, prefix: &str) -> Result<Vec<City>, SuggestError> {
        self.fetch_cities(prefix)
            .await
            .map_err(|err| SuggestError::Lookup(err.to_string()))
    }
}

/// Published snapshot of the remote suggestion state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitySuggestions {
    /// Input the snapshot answers; empty when cleared.
    pub query: String,
    pub cities: Vec<City>,
    /// Inline-message text for a failed lookup; suggestions are cleared.
    pub last_error: Option<String>,
}

/// Debounced city suggester with stale-response protection.
///
/// Every input bumps a generation counter. The spawned lookup task checks
/// the counter twice: after the quiet period (debounce cancel) and after
/// the lookup resolves (stale response discard), so the most recently
/// issued request always wins regardless of response arrival order.
pub struct RemoteSuggestEngine<L> {
    lookup: Arc<L>,
    quiet_period: Duration,
    generation: Arc<AtomicU64>,
    tx: watch::Sender<CitySuggestions>,
}

impl<L: CityLookup> RemoteSuggestEngine<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_quiet_period(lookup, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(lookup: L, quiet_period: Duration) -> Self {
        let (tx, _rx) = watch::channel(CitySuggestions::default());
        Self {
            lookup: Arc::new(lookup),
            quiet_period,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CitySuggestions> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> CitySuggestions {
        self.tx.borrow().clone()
    }

    /// Invalidate any pending or in-flight lookup without touching the
    /// published suggestions.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Input changed. Must be called from within a tokio runtime; the
    /// lookup itself runs on a spawned task after the quiet period.
    pub fn on_input(&self, input: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let prefix = input.trim().to_string();

        if prefix.chars().count() < MIN_PREFIX_LEN {
            // Too short to look up; clear immediately, no network.
            // send_replace publishes even while nothing is subscribed.
            self.tx.send_replace(CitySuggestions::default());
            return;
        }

        let lookup = Arc::clone(&self.lookup);
        let counter = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let quiet_period = self.quiet_period;

        tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if counter.load(Ordering::SeqCst) != generation {
                return;
            }

            let outcome = lookup.lookup(&prefix).await;
            if counter.load(Ordering::SeqCst) != generation {
                debug!(%prefix, "discarding stale city lookup");
                return;
            }

            let snapshot = match outcome {
                Ok(cities) => CitySuggestions {
                    query: prefix,
                    cities: bound_cities(cities),
                    last_error: None,
                },
                Err(err) => CitySuggestions {
                    query: prefix,
                    cities: Vec::new(),
                    last_error: Some(err.to_string()),
                },
            };
            tx.send_replace(snapshot);
        });
    }
}

fn bound_cities(cities: Vec<City>) -> Vec<City> {
    let mut seen = HashSet::new();
    let mut bounded = Vec::new();
    for city in cities {
        if bounded.len() == MAX_SUGGESTIONS {
            break;
        }
        if seen.insert(city.name.to_lowercase()) {
            bounded.push(city);
        }
    }
    bounded
}
