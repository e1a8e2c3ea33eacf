use std::{panic, thread::JoinHandle, time::Duration};

use crossbeam_channel::Receiver;

use crate::{
    cracker::{Attempt, Recovery},
    error::CrackResult,
    hash::HashFunction,
    rules::RuleAttack,
};

/// An event to track the progress of a batch of digests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A digest is being cracked with the given hash function.
    Target {
        digest: String,
        hash_function: HashFunction,
    },
    /// The length of a digest matches no supported hash function. It is skipped.
    Unclassified { digest: String },
    /// The plaintext is not in the wordlist.
    DictionaryMiss,
    /// A rule attack is being run over the words of the wordlist.
    RuleStarted { attack: RuleAttack, candidates: u64 },
    /// Every candidate of a rule attack was tried without a match.
    RuleExhausted {
        attack: RuleAttack,
        attempted: u64,
        elapsed: Duration,
    },
    /// A rule attack is not run for a wordlist of this size.
    RuleSkipped { attack: RuleAttack, words: usize },
    /// A mask is being brute forced.
    MaskStarted { mask: String, candidates: u64 },
    /// Every candidate of a mask was tried without a match.
    MaskExhausted {
        mask: String,
        attempted: u64,
        elapsed: Duration,
    },
    /// The processing of a digest is over, found or not.
    Recovered { digest: String, recovery: Recovery },
}

pub struct CrackHandle {
    pub(crate) thread_handle: JoinHandle<CrackResult<Vec<Attempt>>>,
    pub(crate) receiver: Receiver<Event>,
}

impl CrackHandle {
    /// Returns the attempts of every digest.
    /// Blocks until the batch is finished.
    pub fn join(self) -> CrackResult<Vec<Attempt>> {
        self.thread_handle
            .join()
            .unwrap_or_else(|err| panic::resume_unwind(err))
    }

    /// Blocks until an event is received.
    /// Returns `None` if the batch is finished.
    pub fn recv(&self) -> Option<Event> {
        self.receiver.recv().ok()
    }
}
