//! Mask parsing and compilation into per-position alphabets.
//!
//! A mask is made of literal characters and class references: `?l` (lowercase letters),
//! `?u` (uppercase letters), `?d` (digits) and `?s` (symbols). A `?` in last position is
//! a literal. Any other character following `?` is an error.

use std::{fmt::Display, str::FromStr};

use crate::error::{CrackError, CrackResult};

/// The character introducing a class reference.
pub const MASK_ESCAPE: char = '?';

/// The lowercase class, `?l`.
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

/// The uppercase class, `?u`.
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The digit class, `?d`.
pub const DIGITS: &str = "0123456789";

/// The symbol class, `?s`.
pub const SYMBOLS: &str = r#"!@#$%^&*()-_=+[]{};:'",.<>/?\|"#;

/// A predefined set of characters a mask position can draw from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl CharClass {
    /// Returns the class referenced by the letter following the escape marker.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'l' => Some(Self::Lowercase),
            'u' => Some(Self::Uppercase),
            'd' => Some(Self::Digit),
            's' => Some(Self::Symbol),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::Lowercase => 'l',
            Self::Uppercase => 'u',
            Self::Digit => 'd',
            Self::Symbol => 's',
        }
    }

    /// Returns the characters of this class, in enumeration order.
    pub fn charset(&self) -> &'static str {
        match self {
            Self::Lowercase => LOWERCASE,
            Self::Uppercase => UPPERCASE,
            Self::Digit => DIGITS,
            Self::Symbol => SYMBOLS,
        }
    }
}

/// A single element of a mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaskToken {
    Literal(char),
    Class(CharClass),
}

/// A parsed mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    text: String,
    tokens: Vec<MaskToken>,
}

impl Mask {
    /// Parses a mask from left to right.
    /// Fails on the first unknown `?x` token, without returning any partial result.
    pub fn parse(mask: &str) -> CrackResult<Self> {
        let mut tokens = Vec::with_capacity(mask.len());
        let mut chars = mask.chars();

        while let Some(c) = chars.next() {
            if c != MASK_ESCAPE {
                tokens.push(MaskToken::Literal(c));
                continue;
            }

            match chars.next() {
                // a trailing escape marker is a literal
                None => tokens.push(MaskToken::Literal(c)),
                Some(letter) => match CharClass::from_letter(letter) {
                    Some(class) => tokens.push(MaskToken::Class(class)),
                    None => return Err(CrackError::UnknownMaskToken(format!("{c}{letter}"))),
                },
            }
        }

        Ok(Self {
            text: mask.to_owned(),
            tokens,
        })
    }

    /// Returns the mask as it was written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Expands every token into the set of characters of its position.
    pub fn compile(&self) -> AlphabetPlan {
        let positions = self
            .tokens
            .iter()
            .map(|token| match token {
                MaskToken::Literal(c) => vec![*c],
                MaskToken::Class(class) => class.charset().chars().collect(),
            })
            .collect();

        AlphabetPlan { positions }
    }
}

impl FromStr for Mask {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// An ordered sequence of alphabets, one per position of the generated candidates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlphabetPlan {
    positions: Vec<Vec<char>>,
}

impl AlphabetPlan {
    /// Creates a plan from raw alphabets.
    /// An empty alphabet is allowed and makes the plan produce no candidate.
    pub fn from_positions(positions: Vec<Vec<char>>) -> Self {
        Self { positions }
    }

    /// Parses and compiles a mask in one step.
    pub fn compile(mask: &str) -> CrackResult<Self> {
        Ok(Mask::parse(mask)?.compile())
    }

    /// Returns the alphabets of each position.
    pub fn positions(&self) -> &[Vec<char>] {
        &self.positions
    }

    /// Returns the number of positions, which is the length of every candidate.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
