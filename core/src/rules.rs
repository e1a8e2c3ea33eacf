//! Word mangling attacks over the wordlist.

use std::fmt::Display;

use crate::{
    candidates::Keyspace,
    error::{CrackError, CrackResult},
};

/// The highest number appended to a word by the hybrid attack.
pub const HYBRID_MAX_NUMBER: u32 = 999;

/// The suffixes appended to a word by the hybrid attack, after the numbers.
pub const HYBRID_SUFFIXES: &[&str] = &[
    "!", "@", "#", "$", "%", "&", "*", "?", "123", "123!", "!!", "2023", "2024", "2025",
];

/// The combinator attack grows with the square of the number of words,
/// so it is skipped for wordlists of this size or larger.
pub const COMBINATOR_MAX_WORDS: usize = 5000;

/// All the supported rule attacks, in the order they are tried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuleAttack {
    /// A word, or the word with its first letter capitalized, followed by a number
    /// from 0 to 999 or by a common suffix.
    Hybrid,
    /// Two words of the wordlist glued together.
    Combinator,
}

impl RuleAttack {
    pub const ALL: [Self; 2] = [Self::Hybrid, Self::Combinator];

    /// Returns true if the attack is not run for a wordlist of `words` words.
    pub fn skipped(&self, words: usize) -> bool {
        match self {
            Self::Hybrid => words == 0,
            Self::Combinator => words == 0 || words >= COMBINATOR_MAX_WORDS,
        }
    }

    /// Returns the candidates of this attack over the given words.
    pub fn keyspace(&self, words: &[String]) -> CrackResult<WordProduct> {
        match self {
            Self::Hybrid => WordProduct::new(hybrid_bases(words), hybrid_suffixes()),
            // both orders of every pair are covered by the product itself
            Self::Combinator => WordProduct::new(words.to_vec(), words.to_vec()),
        }
    }
}

impl Display for RuleAttack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Hybrid => "hybrid",
            Self::Combinator => "combinator",
        };

        write!(f, "{name}")
    }
}

/// Every word followed by its capitalized variant, when it differs.
fn hybrid_bases(words: &[String]) -> Vec<String> {
    let mut bases = Vec::with_capacity(words.len() * 2);

    for word in words {
        bases.push(word.clone());

        let capitalized = capitalize(word);
        if capitalized != *word {
            bases.push(capitalized);
        }
    }

    bases
}

fn hybrid_suffixes() -> Vec<String> {
    (0..=HYBRID_MAX_NUMBER)
        .map(|n| n.to_string())
        .chain(HYBRID_SUFFIXES.iter().map(|suffix| suffix.to_string()))
        .collect()
}

/// Uppercases the first character of a word.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Every word of `left` followed by every word of `right`.
/// The right word varies the fastest.
#[derive(Clone, Debug)]
pub struct WordProduct {
    left: Vec<String>,
    right: Vec<String>,
    len: u64,
}

impl WordProduct {
    pub fn new(left: Vec<String>, right: Vec<String>) -> CrackResult<Self> {
        let len = (left.len() as u64)
            .checked_mul(right.len() as u64)
            .ok_or(CrackError::SearchSpace(2))?;

        Ok(Self { left, right, len })
    }
}

impl Keyspace for WordProduct {
    fn len(&self) -> u64 {
        self.len
    }

    fn write_candidate(&self, index: u64, out: &mut String) -> bool {
        out.clear();

        if index >= self.len {
            return false;
        }

        let right_len = self.right.len() as u64;
        out.push_str(&self.left[(index / right_len) as usize]);
        out.push_str(&self.right[(index % right_len) as usize]);

        true
    }
}
