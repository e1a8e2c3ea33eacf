use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    error::{CrackError, CrackResult},
    mask::AlphabetPlan,
};

/// A finite set of candidates, each one reachable by its index in `0..len()`.
/// Implementors must be cheap to index from many threads at once.
pub trait Keyspace: Sync {
    /// Returns the number of candidates.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the candidate at the given index into `out`, replacing its content.
    /// Returns false if the index is out of the keyspace.
    fn write_candidate(&self, index: u64, out: &mut String) -> bool;

    /// Returns the candidate at the given index, or `None` if the index is out of the keyspace.
    fn candidate(&self, index: u64) -> Option<String> {
        let mut candidate = String::new();
        self.write_candidate(index, &mut candidate).then_some(candidate)
    }
}

/// The Cartesian product of the alphabets of a plan.
/// Candidates are numbered in odometer order: the last position varies the fastest.
#[derive(Clone, Debug)]
pub struct CandidateSpace {
    positions: Vec<Vec<char>>,
    /// The number of candidates between two increments of each position.
    strides: Vec<u64>,
    len: u64,
}

impl CandidateSpace {
    /// Creates the candidate space of a plan.
    /// Fails if the space holds more than `u64::MAX` candidates.
    pub fn new(plan: &AlphabetPlan) -> CrackResult<Self> {
        let positions = plan.positions().to_vec();
        let mut strides = vec![0; positions.len()];
        let mut len: u64 = 1;

        if positions.iter().any(Vec::is_empty) {
            len = 0;
        } else {
            for (stride, alphabet) in strides.iter_mut().zip(&positions).rev() {
                *stride = len;
                len = len
                    .checked_mul(alphabet.len() as u64)
                    .ok_or(CrackError::SearchSpace(positions.len()))?;
            }
        }

        Ok(Self {
            positions,
            strides,
            len,
        })
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the candidate at the given index, or `None` if the index is out of the space.
    pub fn candidate(&self, index: u64) -> Option<String> {
        let mut candidate = String::new();
        self.write_candidate(index, &mut candidate).then_some(candidate)
    }

    /// Writes the candidate at the given index into `out`, replacing its content.
    /// Returns false if the index is out of the space.
    #[inline]
    pub fn write_candidate(&self, index: u64, out: &mut String) -> bool {
        out.clear();

        if index >= self.len {
            return false;
        }

        for (alphabet, stride) in self.positions.iter().zip(&self.strides) {
            let digit = (index / stride) % alphabet.len() as u64;
            out.push(alphabet[digit as usize]);
        }

        true
    }

    /// Returns a lazy iterator over all the candidates, in odometer order.
    /// Each call starts a new enumeration.
    pub fn iter(&self) -> Candidates<'_> {
        self.into_iter()
    }
}

impl Keyspace for CandidateSpace {
    fn len(&self) -> u64 {
        self.len
    }

    fn write_candidate(&self, index: u64, out: &mut String) -> bool {
        CandidateSpace::write_candidate(self, index, out)
    }
}

impl<'a> IntoIterator for &'a CandidateSpace {
    type Item = String;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Candidates {
            space: self,
            next: 0,
        }
    }
}

pub struct Candidates<'a> {
    space: &'a CandidateSpace,
    next: u64,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.space.candidate(self.next)?;
        self.next += 1;

        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.space.len - self.next;
        match usize::try_from(remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Hands out the indices of a keyspace to concurrent workers.
/// Every index is claimed at most once, and all of them are claimed before `claim` returns `None`.
pub struct TaskSource<'a, K: Keyspace + ?Sized> {
    space: &'a K,
    next: AtomicU64,
}

impl<'a, K: Keyspace + ?Sized> TaskSource<'a, K> {
    pub fn new(space: &'a K) -> Self {
        Self {
            space,
            next: AtomicU64::new(0),
        }
    }

    pub fn space(&self) -> &'a K {
        self.space
    }

    /// Claims the next unclaimed candidate index.
    #[inline]
    pub fn claim(&self) -> Option<u64> {
        let len = self.space.len();

        // never increments past the end, so the counter cannot wrap around
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |index| {
                (index < len).then_some(index + 1)
            })
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Mutex, thread};

    use itertools::Itertools;

    use crate::{
        candidates::{CandidateSpace, TaskSource},
        error::CrackError,
        mask::AlphabetPlan,
    };

    fn plan(positions: &[&str]) -> AlphabetPlan {
        AlphabetPlan::from_positions(positions.iter().map(|p| p.chars().collect()).collect())
    }

    #[test]
    fn test_odometer_order() {
        let space = CandidateSpace::new(&plan(&["ab", "xyz"])).unwrap();

        assert_eq!(6, space.len());
        assert_eq!(
            vec!["ax", "ay", "az", "bx", "by", "bz"],
            space.iter().collect_vec()
        );
    }

    #[test]
    fn test_matches_cartesian_product() {
        let space = CandidateSpace::new(&AlphabetPlan::compile("?d-?l").unwrap()).unwrap();
        let expected = "0123456789"
            .chars()
            .cartesian_product("abcdefghijklmnopqrstuvwxyz".chars())
            .map(|(d, l)| format!("{d}-{l}"))
            .collect_vec();

        assert_eq!(260, space.len());
        assert_eq!(expected, space.iter().collect_vec());
    }

    #[test]
    fn test_restartable() {
        let space = CandidateSpace::new(&plan(&["ab", "cd"])).unwrap();
        let mut first = space.iter();
        first.next();

        assert_eq!(3, first.count());
        assert_eq!(4, space.iter().count());
    }

    #[test]
    fn test_empty_position() {
        let space = CandidateSpace::new(&plan(&["ab", "", "cd"])).unwrap();

        assert!(space.is_empty());
        assert_eq!(0, space.iter().count());
        assert_eq!(None, space.candidate(0));
    }

    #[test]
    fn test_empty_plan() {
        let space = CandidateSpace::new(&AlphabetPlan::default()).unwrap();

        assert_eq!(1, space.len());
        assert_eq!(vec![String::new()], space.iter().collect_vec());
    }

    #[test]
    fn test_candidate_by_index() {
        let space = CandidateSpace::new(&AlphabetPlan::compile("?d?d?d?d").unwrap()).unwrap();

        assert_eq!(Some("0000".to_owned()), space.candidate(0));
        assert_eq!(Some("0007".to_owned()), space.candidate(7));
        assert_eq!(Some("1234".to_owned()), space.candidate(1234));
        assert_eq!(Some("9999".to_owned()), space.candidate(9999));
        assert_eq!(None, space.candidate(10_000));
    }

    #[test]
    fn test_size_hint() {
        let space = CandidateSpace::new(&plan(&["abc", "de"])).unwrap();
        let mut iter = space.iter();

        assert_eq!((6, Some(6)), iter.size_hint());
        iter.next();
        assert_eq!((5, Some(5)), iter.size_hint());
    }

    #[test]
    fn test_space_overflow() {
        let mask = "?s".repeat(14);
        let plan = AlphabetPlan::compile(&mask).unwrap();

        match CandidateSpace::new(&plan) {
            Err(CrackError::SearchSpace(positions)) => assert_eq!(14, positions),
            other => panic!("unexpected space: {other:?}"),
        }
    }

    #[test]
    fn test_task_source_claims_each_index_once() {
        let space = CandidateSpace::new(&AlphabetPlan::compile("?l?d?d").unwrap()).unwrap();
        let source = TaskSource::new(&space);
        let claimed = Mutex::new(Vec::new());

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let mut local = Vec::new();
                    while let Some(index) = source.claim() {
                        local.push(index);
                    }
                    claimed.lock().unwrap().extend(local);
                });
            }
        });

        let claimed = claimed.into_inner().unwrap();
        let unique: HashSet<u64> = claimed.iter().copied().collect();

        assert_eq!(space.len() as usize, claimed.len());
        assert_eq!(claimed.len(), unique.len());
        assert_eq!(None, source.claim());
    }
}
