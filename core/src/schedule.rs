use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{candidates::CandidateSpace, error::CrackResult, mask::Mask, DEFAULT_MASKS};

/// The masks to brute force, in the order they are tried.
/// Cheaper masks should come first, since the search stops at the first hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskSchedule {
    masks: Vec<String>,
}

impl Default for MaskSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_MASKS.iter().copied())
    }
}

impl MaskSchedule {
    pub fn new<I, M>(masks: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            masks: masks.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a schedule from a TOML document of the form `masks = ["?d", "?d?d"]`.
    pub fn from_toml(document: &str) -> CrackResult<Self> {
        Ok(toml::from_str(document)?)
    }

    /// Loads a schedule from a TOML file.
    pub fn load(path: &Path) -> CrackResult<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn masks(&self) -> &[String] {
        &self.masks
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Makes sure every mask of the schedule compiles into a search space that can be indexed.
    pub fn validate(&self) -> CrackResult<()> {
        for mask in &self.masks {
            CandidateSpace::new(&Mask::parse(mask)?.compile())?;
        }

        Ok(())
    }
}
