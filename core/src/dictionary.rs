use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    error::CrackResult,
    hash::{HashFunction, TargetDigest},
};

/// A wordlist checked before any brute force, one plaintext per line.
#[derive(Clone, Debug)]
pub struct Dictionary {
    path: PathBuf,
}

impl Dictionary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the wordlist for reading.
    /// A missing wordlist is not an error: it is logged and `None` is returned.
    fn open(&self) -> CrackResult<Option<BufReader<File>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(BufReader::with_capacity(1024 * 1024, file))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "wordlist not found, treating it as empty");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Streams the wordlist and returns the first word hashing to the target.
    /// Surrounding whitespace is trimmed and blank lines are skipped.
    ///
    /// A missing wordlist is not an error: it behaves as an empty one.
    pub fn lookup(
        &self,
        hash_function: HashFunction,
        target: &TargetDigest,
    ) -> CrackResult<Option<String>> {
        let Some(mut reader) = self.open()? else {
            return Ok(None);
        };

        let mut matcher = hash_function.matcher(target);
        let mut line = Vec::new();
        let mut words = 0u64;

        // read raw bytes, a word does not have to be valid UTF-8 to be hashed
        while reader.read_until(b'\n', &mut line)? != 0 {
            let word = line.trim_ascii();

            if !word.is_empty() {
                words += 1;
                if matcher.matches(word)? {
                    debug!(words, "dictionary hit");
                    return Ok(Some(String::from_utf8_lossy(word).into_owned()));
                }
            }

            line.clear();
        }

        debug!(words, "dictionary exhausted");
        Ok(None)
    }

    /// Loads every distinct word of the wordlist, in order of first appearance.
    /// Words are trimmed like in `lookup`, and a missing wordlist has no words.
    pub fn words(&self) -> CrackResult<Vec<String>> {
        let Some(mut reader) = self.open()? else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let mut words = Vec::new();
        let mut line = Vec::new();

        while reader.read_until(b'\n', &mut line)? != 0 {
            let word = line.trim_ascii();

            if !word.is_empty() {
                let word = String::from_utf8_lossy(word).into_owned();
                if seen.insert(word.clone()) {
                    words.push(word);
                }
            }

            line.clear();
        }

        debug!(words = words.len(), "wordlist loaded");
        Ok(words)
    }
}
