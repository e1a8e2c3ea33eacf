use std::path::PathBuf;

use crate::{
    error::{CrackError, CrackResult},
    hash::HashFunction,
    schedule::MaskSchedule,
    DEFAULT_WORDLIST, DEFAULT_WORKERS,
};

/// A builder for a cracking context.
#[derive(Clone, Debug)]
pub struct CrackCtxBuilder {
    wordlist: Option<PathBuf>,
    schedule: MaskSchedule,
    workers: usize,
    hash_function: Option<HashFunction>,
    rules: bool,
}

impl Default for CrackCtxBuilder {
    fn default() -> Self {
        Self {
            wordlist: Some(PathBuf::from(DEFAULT_WORDLIST)),
            schedule: MaskSchedule::default(),
            workers: DEFAULT_WORKERS,
            hash_function: None,
            rules: false,
        }
    }
}

impl CrackCtxBuilder {
    /// Creates a new CrackCtxBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wordlist checked before brute forcing.
    /// `None` disables the dictionary step.
    pub fn wordlist(mut self, wordlist: Option<PathBuf>) -> Self {
        self.wordlist = wordlist;

        self
    }

    /// Sets the masks to brute force, in order.
    pub fn schedule(mut self, schedule: MaskSchedule) -> Self {
        self.schedule = schedule;

        self
    }

    /// Sets the number of worker threads used by each brute-force search.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;

        self
    }

    /// Forces the hash function instead of inferring it from the digest length.
    pub fn hash(mut self, hash_function: Option<HashFunction>) -> Self {
        self.hash_function = hash_function;

        self
    }

    /// Runs the hybrid and combinator attacks over the wordlist before the masks.
    pub fn rules(mut self, rules: bool) -> Self {
        self.rules = rules;

        self
    }

    /// Builds a CrackCtx with the specified parameters.
    /// Every mask of the schedule is compiled here, so that a bad or oversized mask is
    /// reported before any digest is processed.
    pub fn build(self) -> CrackResult<CrackCtx> {
        if self.workers == 0 {
            return Err(CrackError::Workers);
        }

        self.schedule.validate()?;

        Ok(CrackCtx {
            wordlist: self.wordlist,
            schedule: self.schedule,
            workers: self.workers,
            hash_function: self.hash_function,
            rules: self.rules,
        })
    }
}

/// Context used to store all parameters used to crack digests.
#[derive(Clone, Debug)]
pub struct CrackCtx {
    /// The wordlist checked first, if any.
    pub wordlist: Option<PathBuf>,
    /// The masks brute forced after a dictionary miss.
    pub schedule: MaskSchedule,
    /// The number of worker threads of a brute-force search.
    pub workers: usize,
    /// The hash function to use regardless of the digest length.
    pub hash_function: Option<HashFunction>,
    /// Whether the rule attacks run after a dictionary miss.
    pub rules: bool,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{
        ctx::CrackCtxBuilder, error::CrackError, hash::HashFunction, schedule::MaskSchedule,
        DEFAULT_WORKERS,
    };

    #[test]
    fn test_defaults() {
        let ctx = CrackCtxBuilder::new().build().unwrap();

        assert_eq!(Some(PathBuf::from("wordlist.txt")), ctx.wordlist);
        assert_eq!(MaskSchedule::default(), ctx.schedule);
        assert_eq!(DEFAULT_WORKERS, ctx.workers);
        assert_eq!(None, ctx.hash_function);
        assert!(!ctx.rules);
    }

    #[test]
    fn test_overrides() {
        let ctx = CrackCtxBuilder::new()
            .wordlist(None)
            .workers(3)
            .hash(Some(HashFunction::Sha1))
            .rules(true)
            .schedule(MaskSchedule::new(["?u"]))
            .build()
            .unwrap();

        assert_eq!(None, ctx.wordlist);
        assert_eq!(3, ctx.workers);
        assert_eq!(Some(HashFunction::Sha1), ctx.hash_function);
        assert!(ctx.rules);
        assert_eq!(vec!["?u"], ctx.schedule.masks());
    }

    #[test]
    fn test_zero_workers() {
        let result = CrackCtxBuilder::new().workers(0).build();
        assert!(matches!(result, Err(CrackError::Workers)));
    }

    #[test]
    fn test_bad_mask_aborts_build() {
        let result = CrackCtxBuilder::new()
            .schedule(MaskSchedule::new(["?d", "?k"]))
            .build();

        assert!(matches!(result, Err(CrackError::UnknownMaskToken(token)) if token == "?k"));
    }

    #[test]
    fn test_oversized_mask_aborts_build() {
        let result = CrackCtxBuilder::new()
            .schedule(MaskSchedule::new(["?d".to_owned(), "?s".repeat(14)]))
            .build();

        assert!(matches!(result, Err(CrackError::SearchSpace(14))));
    }
}
