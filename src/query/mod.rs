//! Client-side query cache.
//!
//! Values are cached per `QueryKey` until a mutation invalidates them; there
//! is no time-based expiry. Concurrent reads of one key share a single fetch:
//! each key has a fill lock, and a reader that waited on the lock takes the
//! outcome of the fetch it waited for instead of issuing its own.
//!
//! A `QueryClient` is created per session and passed to whoever needs it.
//! `clear()` ends the session.

mod key;

pub use key::QueryKey;

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::error::{ApiError, FetchError};

type CachedValue = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct Entry {
    data: Option<CachedValue>,
    error: Option<FetchError>,
    stale: bool,
    fetching: bool,
    /// Bumped on every invalidation; a fetch that started under an older
    /// generation cannot mark the entry fresh.
    generation: u64,
    /// Number of fetches that have finished, successfully or not.
    settled: u64,
    /// Generation the most recently settled fetch started under.
    settled_generation: u64,
    updated_at: Option<DateTime<Utc>>,
}

/// What a page sees for one query.
#[derive(Debug)]
pub enum QueryStatus<T> {
    /// Never requested.
    Idle,
    /// First fetch in flight, nothing to show yet.
    Loading,
    /// The last fetch failed.
    Error(FetchError),
    Success(Arc<T>),
}

impl<T> Clone for QueryStatus<T> {
    fn clone(&self) -> Self {
        match self {
            QueryStatus::Idle => QueryStatus::Idle,
            QueryStatus::Loading => QueryStatus::Loading,
            QueryStatus::Error(e) => QueryStatus::Error(e.clone()),
            QueryStatus::Success(data) => QueryStatus::Success(Arc::clone(data)),
        }
    }
}

impl<T> QueryStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryStatus::Idle | QueryStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryStatus::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryStatus::Success(data) => Some(data.as_ref()),
            _ => None,
        }
    }

    pub fn from_result(result: Result<Arc<T>, FetchError>) -> Self {
        match result {
            Ok(data) => QueryStatus::Success(data),
            Err(e) => QueryStatus::Error(e),
        }
    }
}

#[derive(Default)]
pub struct QueryClient {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    fill_locks: Mutex<HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>>,
    /// Bumped by `clear()`. Only written while `entries` is locked; fetches
    /// begun under an older epoch never write back.
    epoch: AtomicU64,
}

/// Cache state a reader observed before queueing on the fill lock.
#[derive(Clone, Copy)]
struct Seen {
    epoch: u64,
    settled: u64,
    generation: u64,
}

/// Clears `fetching` if the fetch future is dropped before it settles.
struct FetchGuard<'a> {
    client: &'a QueryClient,
    key: &'a QueryKey,
    epoch: u64,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        let mut entries = self.client.entries.lock();
        if self.client.epoch.load(Ordering::SeqCst) != self.epoch {
            return;
        }
        if let Some(entry) = entries.get_mut(self.key) {
            entry.fetching = false;
        }
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// `fetch` runs only when the key has no fresh value and no other reader
    /// is already fetching it.
    pub async fn fetch_query<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<Arc<T>, FetchError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let seen = match self.lookup::<T>(key) {
            Lookup::Fresh(data) => {
                log::debug!("query {} cache hit", key);
                return Ok(data);
            }
            Lookup::Miss(seen) => seen,
        };

        let fill = self.fill_lock(key);
        let _guard = fill.lock().await;

        if let Some(outcome) = self.settled_since::<T>(key, seen) {
            log::debug!("query {} served by concurrent fetch", key);
            return outcome;
        }

        let (epoch, generation) = self.begin_fetch(key);
        let _fetching = FetchGuard {
            client: self,
            key,
            epoch,
        };
        log::debug!("query {} fetching", key);
        let result = fetch().await;
        self.finish_fetch(key, epoch, generation, result)
    }

    /// Mark every key under `prefix` stale. Returns how many entries matched.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.lock();
        let mut matched = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                entry.generation += 1;
                matched += 1;
            }
        }
        log::debug!("invalidated {} ({} entries)", prefix, matched);
        matched
    }

    pub fn invalidate_all(&self, prefixes: &[QueryKey]) -> usize {
        prefixes.iter().map(|prefix| self.invalidate(prefix)).sum()
    }

    /// Seed or replace a cached value. The entry becomes fresh.
    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey, value: T) {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.clone()).or_default();
        entry.data = Some(Arc::new(value));
        entry.error = None;
        entry.stale = false;
        entry.updated_at = Some(Utc::now());
    }

    /// Cached value regardless of staleness.
    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .and_then(|entry| entry.data.clone())
            .and_then(|data| data.downcast::<T>().ok())
    }

    pub fn status<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryStatus<T> {
        let entries = self.entries.lock();
        let Some(entry) = entries.get(key) else {
            return QueryStatus::Idle;
        };
        let data = entry
            .data
            .clone()
            .and_then(|data| data.downcast::<T>().ok());

        if let Some(err) = &entry.error {
            if !entry.fetching {
                return QueryStatus::Error(err.clone());
            }
        }
        match data {
            Some(data) => QueryStatus::Success(data),
            None if entry.fetching => QueryStatus::Loading,
            None => QueryStatus::Idle,
        }
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .lock()
            .get(key)
            .map_or(true, |entry| entry.data.is_none() || entry.stale)
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries.lock().get(key).is_some_and(|entry| entry.fetching)
    }

    pub fn updated_at(&self, key: &QueryKey) -> Option<DateTime<Utc>> {
        self.entries.lock().get(key).and_then(|entry| entry.updated_at)
    }

    /// Drop every cached value. Used at session end.
    ///
    /// Fetches still running finish without writing back. Their fill locks
    /// stay in place so a read issued after `clear` waits for them.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        entries.clear();
        drop(entries);
        self.fill_locks
            .lock()
            .retain(|_, lock| Arc::strong_count(lock) > 1);
        log::debug!("query cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn lookup<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Lookup<T> {
        let entries = self.entries.lock();
        let epoch = self.epoch.load(Ordering::SeqCst);
        let Some(entry) = entries.get(key) else {
            return Lookup::Miss(Seen {
                epoch,
                settled: 0,
                generation: 0,
            });
        };
        if !entry.stale {
            if let Some(data) = entry.data.clone() {
                match data.downcast::<T>() {
                    Ok(data) => return Lookup::Fresh(data),
                    Err(_) => log::warn!("query {} cached under a different type", key),
                }
            }
        }
        Lookup::Miss(Seen {
            epoch,
            settled: entry.settled,
            generation: entry.generation,
        })
    }

    /// Outcome of a fetch that finished after `seen`, for readers that waited
    /// on the fill lock. Only a fetch that started no earlier than the
    /// generation the reader saw is shared. `None` means the caller has to
    /// fetch.
    fn settled_since<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        seen: Seen,
    ) -> Option<Result<Arc<T>, FetchError>> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        let same_session = self.epoch.load(Ordering::SeqCst) == seen.epoch;
        let shareable = same_session
            && entry.settled > seen.settled
            && entry.settled_generation >= seen.generation;
        if !shareable {
            // No usable fetch settled while we waited. Fresh data seeded in between still counts.
            return match (&entry.data, entry.stale) {
                (Some(data), false) => data.clone().downcast::<T>().ok().map(Ok),
                _ => None,
            };
        }
        if let Some(err) = &entry.error {
            return Some(Err(err.clone()));
        }
        entry.data.clone()?.downcast::<T>().ok().map(Ok)
    }

    fn fill_lock(&self, key: &QueryKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.fill_locks.lock();
        Arc::clone(
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }

    fn begin_fetch(&self, key: &QueryKey) -> (u64, u64) {
        let mut entries = self.entries.lock();
        let epoch = self.epoch.load(Ordering::SeqCst);
        let entry = entries.entry(key.clone()).or_default();
        entry.fetching = true;
        (epoch, entry.generation)
    }

    fn finish_fetch<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        epoch: u64,
        generation: u64,
        result: Result<T, ApiError>,
    ) -> Result<Arc<T>, FetchError> {
        let mut entries = self.entries.lock();
        if self.epoch.load(Ordering::SeqCst) != epoch {
            log::debug!("query {} settled after clear, result dropped", key);
            return result.map(Arc::new).map_err(FetchError::from);
        }
        let entry = entries.entry(key.clone()).or_default();
        entry.fetching = false;
        entry.settled += 1;
        entry.settled_generation = generation;

        match result {
            Ok(value) => {
                let value = Arc::new(value);
                entry.data = Some(value.clone() as CachedValue);
                entry.error = None;
                entry.updated_at = Some(Utc::now());
                entry.stale = entry.generation != generation;
                if entry.stale {
                    log::debug!("query {} invalidated mid-flight, kept stale", key);
                }
                Ok(value)
            }
            Err(err) => {
                let err = FetchError::from(err);
                entry.error = Some(err.clone());
                Err(err)
            }
        }
    }
}

enum Lookup<T> {
    Fresh(Arc<T>),
    Miss(Seen),
}
