//! Multithreaded brute-force search over a candidate space.

use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::{Duration, Instant},
};

use rayon::ThreadPoolBuilder;
use tracing::debug;

use crate::{
    candidates::{Keyspace, TaskSource},
    error::{CrackError, CrackResult},
    hash::{HashFunction, TargetDigest},
};

/// The value of a found state that has not been set yet.
/// It can never be a candidate index, since a space holds at most `u64::MAX` candidates.
const NOT_FOUND: u64 = u64::MAX;

/// The index of the first candidate found to match, shared by the workers of a search.
/// Once set, it is never overwritten.
#[derive(Debug)]
pub struct FoundState(AtomicU64);

impl FoundState {
    pub fn new() -> Self {
        Self(AtomicU64::new(NOT_FOUND))
    }

    /// Commits a matching candidate index.
    /// Returns false if another index was committed first, in which case nothing is written.
    #[inline]
    pub fn commit(&self, index: u64) -> bool {
        self.0
            .compare_exchange(NOT_FOUND, index, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire) != NOT_FOUND
    }

    pub fn get(&self) -> Option<u64> {
        match self.0.load(Ordering::Acquire) {
            NOT_FOUND => None,
            index => Some(index),
        }
    }
}

impl Default for FoundState {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A candidate matching the target.
    Found(String),
    /// Every candidate was tried and none matched.
    Exhausted,
}

#[derive(Clone, Debug)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// The number of candidates hashed by all the workers.
    pub attempted: u64,
    pub elapsed: Duration,
}

/// Trait that every brute-force implementation must implement to be scheduled.
pub trait Searcher: Sync {
    /// Searches the keyspace for a candidate hashing to the target digest.
    fn search<K: Keyspace + ?Sized>(
        &self,
        hash_function: HashFunction,
        target: &TargetDigest,
        space: &K,
    ) -> CrackResult<SearchReport>;
}

/// A searcher running a fixed number of worker threads, first match wins.
#[derive(Clone, Copy, Debug)]
pub struct SearchEngine {
    workers: usize,
}

impl SearchEngine {
    /// Creates a search engine running `workers` threads per search.
    pub fn new(workers: usize) -> CrackResult<Self> {
        if workers == 0 {
            return Err(CrackError::Workers);
        }

        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Searches the keyspace for a candidate accepted by a matcher.
    /// `make_matcher` is called once on every worker thread, so each worker owns its matcher.
    ///
    /// Returns once all the workers have stopped. A worker stops when the keyspace is drained,
    /// or when it sees that a match was committed or that a matcher failed before claiming
    /// its next candidate.
    pub fn search_by<K, F, M>(&self, space: &K, make_matcher: F) -> CrackResult<SearchReport>
    where
        K: Keyspace + ?Sized,
        F: Fn() -> M + Sync,
        M: FnMut(&str) -> CrackResult<bool>,
    {
        let start = Instant::now();
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("search-worker-{i}"))
            .build()?;

        let tasks = TaskSource::new(space);
        let found = FoundState::new();
        let failed = AtomicBool::new(false);

        debug!(
            workers = self.workers,
            candidates = space.len(),
            "starting brute-force search"
        );

        // one call per pool thread
        let results = pool.broadcast(|_| drain(&tasks, &found, &failed, make_matcher()));

        let mut attempted = 0;
        for result in results {
            attempted += result?;
        }

        let outcome = match found.get().and_then(|index| space.candidate(index)) {
            Some(plaintext) => SearchOutcome::Found(plaintext),
            None => SearchOutcome::Exhausted,
        };
        let elapsed = start.elapsed();

        debug!(
            attempted,
            ?elapsed,
            found = outcome != SearchOutcome::Exhausted,
            "search finished"
        );

        Ok(SearchReport {
            outcome,
            attempted,
            elapsed,
        })
    }
}

impl Searcher for SearchEngine {
    fn search<K: Keyspace + ?Sized>(
        &self,
        hash_function: HashFunction,
        target: &TargetDigest,
        space: &K,
    ) -> CrackResult<SearchReport> {
        self.search_by(space, || {
            let mut matcher = hash_function.matcher(target);
            move |candidate: &str| matcher.matches(candidate.as_bytes())
        })
    }
}

/// Claims and tests candidates until the keyspace is drained, a match is committed
/// or a matcher fails.
/// Returns the number of candidates tested by this worker.
fn drain<K, M>(
    tasks: &TaskSource<K>,
    found: &FoundState,
    failed: &AtomicBool,
    mut matcher: M,
) -> CrackResult<u64>
where
    K: Keyspace + ?Sized,
    M: FnMut(&str) -> CrackResult<bool>,
{
    let mut candidate = String::new();
    let mut attempted = 0;

    // stop flags are only checked before claiming: a claimed candidate is always tested
    while !found.is_set() && !failed.load(Ordering::Acquire) {
        let Some(index) = tasks.claim() else {
            break;
        };

        tasks.space().write_candidate(index, &mut candidate);
        attempted += 1;

        match matcher(&candidate) {
            Ok(true) => {
                found.commit(index);
                break;
            }
            Ok(false) => (),
            Err(err) => {
                failed.store(true, Ordering::Release);
                return Err(err);
            }
        }
    }

    Ok(attempted)
}
