//! Escalation from the wordlist to the rule attacks and to increasingly costly masks.

use std::{
    fmt::Display,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{unbounded, Sender};
use tracing::{debug, info, warn};

use crate::{
    candidates::{CandidateSpace, Keyspace},
    ctx::CrackCtx,
    dictionary::Dictionary,
    error::{CrackError, CrackResult},
    event::{CrackHandle, Event},
    hash::{HashFunction, TargetDigest},
    mask::Mask,
    rules::RuleAttack,
    search::{SearchEngine, SearchOutcome, Searcher},
};

/// How a digest was cracked, if it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// The plaintext was in the wordlist.
    Dictionary { plaintext: String },
    /// The plaintext was derived from the words of the wordlist by a rule attack.
    Rule {
        attack: RuleAttack,
        plaintext: String,
    },
    /// The plaintext was brute forced with the given mask.
    BruteForce { mask: String, plaintext: String },
    /// Neither the wordlist nor any mask of the schedule produced the plaintext.
    NotFound,
}

impl Recovery {
    pub fn plaintext(&self) -> Option<&str> {
        match self {
            Self::Dictionary { plaintext }
            | Self::Rule { plaintext, .. }
            | Self::BruteForce { plaintext, .. } => Some(plaintext),
            Self::NotFound => None,
        }
    }

    /// Returns the stage that produced the plaintext: `dictionary`, `hybrid`, `combinator`,
    /// `bruteforce:<mask>` or `none`.
    pub fn provenance(&self) -> String {
        match self {
            Self::Dictionary { .. } => "dictionary".to_owned(),
            Self::Rule { attack, .. } => attack.to_string(),
            Self::BruteForce { mask, .. } => format!("bruteforce:{mask}"),
            Self::NotFound => "none".to_owned(),
        }
    }
}

impl Display for Recovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.plaintext() {
            Some(plaintext) => write!(f, "{plaintext} ({})", self.provenance()),
            None => write!(f, "not found"),
        }
    }
}

/// The processing of one digest of a batch.
#[derive(Debug)]
pub struct Attempt {
    pub digest: String,
    /// Only holds an error for a digest that could not be classified.
    pub result: CrackResult<Recovery>,
    pub elapsed: Duration,
}

/// Cracks digests with a wordlist first, then with the rule attacks if enabled,
/// then with each mask of the schedule in order.
pub struct Cracker<S = SearchEngine> {
    ctx: CrackCtx,
    searcher: S,
    events: Option<Sender<Event>>,
}

impl Cracker<SearchEngine> {
    /// Creates a cracker searching with `ctx.workers` threads.
    pub fn new(ctx: CrackCtx) -> CrackResult<Self> {
        let searcher = SearchEngine::new(ctx.workers)?;
        Ok(Self::with_searcher(ctx, searcher))
    }
}

impl<S: Searcher> Cracker<S> {
    /// Creates a cracker brute forcing with the given searcher.
    pub fn with_searcher(ctx: CrackCtx, searcher: S) -> Self {
        Self {
            ctx,
            searcher,
            events: None,
        }
    }

    pub fn ctx(&self) -> &CrackCtx {
        &self.ctx
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    fn emit(&self, event: Event) {
        if let Some(sender) = &self.events {
            // the receiver may have been dropped, events are best effort
            sender.send(event).ok();
        }
    }

    /// Cracks a single digest.
    ///
    /// Fails with `UnclassifiedDigest` if no hash function is forced and the digest length
    /// is unknown. A mask that does not compile aborts the whole schedule.
    pub fn crack(&self, digest: &str) -> CrackResult<Recovery> {
        let target = TargetDigest::new(digest);
        let hash_function = match self.ctx.hash_function {
            Some(hash_function) => hash_function,
            None => target.classify()?,
        };

        self.emit(Event::Target {
            digest: digest.to_owned(),
            hash_function,
        });

        if let Some(wordlist) = &self.ctx.wordlist {
            if let Some(plaintext) = Dictionary::new(wordlist).lookup(hash_function, &target)? {
                info!(%target, %plaintext, "found in the wordlist");
                return Ok(Recovery::Dictionary { plaintext });
            }
        }

        self.emit(Event::DictionaryMiss);

        if let (true, Some(wordlist)) = (self.ctx.rules, &self.ctx.wordlist) {
            let words = Dictionary::new(wordlist).words()?;

            if let Some(recovery) = self.crack_rules(hash_function, &target, &words)? {
                return Ok(recovery);
            }
        }

        for mask in self.ctx.schedule.masks() {
            let plan = Mask::parse(mask)?.compile();
            let space = CandidateSpace::new(&plan)?;

            debug!(%mask, candidates = space.len(), "trying mask");
            self.emit(Event::MaskStarted {
                mask: mask.clone(),
                candidates: space.len(),
            });

            let report = self.searcher.search(hash_function, &target, &space)?;

            match report.outcome {
                SearchOutcome::Found(plaintext) => {
                    info!(%target, %plaintext, %mask, "found by brute force");
                    return Ok(Recovery::BruteForce {
                        mask: mask.clone(),
                        plaintext,
                    });
                }
                SearchOutcome::Exhausted => self.emit(Event::MaskExhausted {
                    mask: mask.clone(),
                    attempted: report.attempted,
                    elapsed: report.elapsed,
                }),
            }
        }

        info!(%target, "all masks exhausted");
        Ok(Recovery::NotFound)
    }

    /// Runs every rule attack over the words, in order, until one of them finds the plaintext.
    fn crack_rules(
        &self,
        hash_function: HashFunction,
        target: &TargetDigest,
        words: &[String],
    ) -> CrackResult<Option<Recovery>> {
        for attack in RuleAttack::ALL {
            if attack.skipped(words.len()) {
                debug!(%attack, words = words.len(), "skipping rule attack");
                self.emit(Event::RuleSkipped {
                    attack,
                    words: words.len(),
                });
                continue;
            }

            let space = attack.keyspace(words)?;

            debug!(%attack, candidates = space.len(), "trying rule attack");
            self.emit(Event::RuleStarted {
                attack,
                candidates: space.len(),
            });

            let report = self.searcher.search(hash_function, target, &space)?;

            match report.outcome {
                SearchOutcome::Found(plaintext) => {
                    info!(%target, %plaintext, %attack, "found by a rule attack");
                    return Ok(Some(Recovery::Rule { attack, plaintext }));
                }
                SearchOutcome::Exhausted => self.emit(Event::RuleExhausted {
                    attack,
                    attempted: report.attempted,
                    elapsed: report.elapsed,
                }),
            }
        }

        Ok(None)
    }

    /// Cracks every digest, in order.
    /// An unclassified digest is recorded in its attempt and the batch goes on,
    /// any other error stops the batch.
    pub fn crack_all<I, D>(&self, digests: I) -> CrackResult<Vec<Attempt>>
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        let mut attempts = Vec::new();

        for digest in digests {
            let digest = digest.as_ref();
            let start = Instant::now();

            let result = match self.crack(digest) {
                Ok(recovery) => {
                    self.emit(Event::Recovered {
                        digest: digest.to_owned(),
                        recovery: recovery.clone(),
                    });
                    Ok(recovery)
                }
                Err(err @ CrackError::UnclassifiedDigest { .. }) => {
                    warn!("{err}");
                    self.emit(Event::Unclassified {
                        digest: digest.to_owned(),
                    });
                    Err(err)
                }
                Err(err) => return Err(err),
            };

            attempts.push(Attempt {
                digest: digest.to_owned(),
                result,
                elapsed: start.elapsed(),
            });
        }

        Ok(attempts)
    }
}

impl<S: Searcher + Send + 'static> Cracker<S> {
    /// Cracks every digest on a background thread.
    /// Returns an handle to get events related to the batch and to get the attempts.
    pub fn spawn(mut self, digests: Vec<String>) -> CrackHandle {
        let (sender, receiver) = unbounded();
        self.events = Some(sender);

        // the sender is dropped with the cracker when the thread ends, which closes the channel
        let thread_handle = thread::spawn(move || self.crack_all(digests));

        CrackHandle {
            thread_handle,
            receiver,
        }
    }
}
