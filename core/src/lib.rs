mod candidates;
mod cracker;
mod ctx;
mod dictionary;
mod error;
mod event;
mod hash;
mod mask;
mod rules;
mod schedule;
mod search;

pub use {
    candidates::{CandidateSpace, Candidates, Keyspace, TaskSource},
    cracker::{Attempt, Cracker, Recovery},
    ctx::{CrackCtx, CrackCtxBuilder},
    dictionary::Dictionary,
    error::{CrackError, CrackResult},
    event::{CrackHandle, Event},
    hash::{DigestMatcher, HashFunction, TargetDigest},
    mask::{AlphabetPlan, CharClass, Mask, MaskToken, DIGITS, LOWERCASE, SYMBOLS, UPPERCASE},
    rules::{
        RuleAttack, WordProduct, COMBINATOR_MAX_WORDS, HYBRID_MAX_NUMBER, HYBRID_SUFFIXES,
    },
    schedule::MaskSchedule,
    search::{FoundState, SearchEngine, SearchOutcome, SearchReport, Searcher},
};

/// The default number of worker threads of a brute-force search.
pub const DEFAULT_WORKERS: usize = 8;

/// The default wordlist, checked before any brute force.
pub const DEFAULT_WORDLIST: &str = "wordlist.txt";

/// The default masks, from the cheapest to the most expensive.
/// Digits-only masks up to six characters, then lowercase-only masks up to five characters.
pub const DEFAULT_MASKS: &[&str] = &[
    "?d",
    "?d?d",
    "?d?d?d",
    "?d?d?d?d",
    "?d?d?d?d?d",
    "?d?d?d?d?d?d",
    "?l",
    "?l?l",
    "?l?l?l",
    "?l?l?l?l",
    "?l?l?l?l?l",
];
