use std::{fmt::Display, str::FromStr};

use digest::{Digest as _, DynDigest};
use md5::Md5;
use sha1::Sha1;
use sha2::Sha256;

use crate::error::{CrackError, CrackResult};

/// All the supported hash functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashFunction {
    Md5,
    Sha1,
    Sha2_256,
}

impl HashFunction {
    /// Infers the hash function from the number of characters of a hex digest.
    /// Only the length is looked at, the content is not validated.
    pub fn classify(digest: &str) -> Option<Self> {
        match digest.chars().count() {
            32 => Some(Self::Md5),
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha2_256),
            _ => None,
        }
    }

    /// Returns the CPU implementation of this hash.
    pub fn cpu(&self) -> Box<dyn DynDigest> {
        match self {
            Self::Md5 => Box::new(Md5::new()),
            Self::Sha1 => Box::new(Sha1::new()),
            Self::Sha2_256 => Box::new(Sha256::new()),
        }
    }

    /// Returns the size of a digest in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha2_256 => 32,
        }
    }

    /// Hashes a plaintext and returns the lowercase hexadecimal digest.
    pub fn hash_hex(&self, plaintext: impl AsRef<[u8]>) -> String {
        let mut hasher = self.cpu();
        hasher.update(plaintext.as_ref());
        hex::encode(hasher.finalize())
    }

    /// Returns a matcher testing plaintexts against `target` with this hash function.
    pub fn matcher<'a>(&self, target: &'a TargetDigest) -> DigestMatcher<'a> {
        DigestMatcher {
            hasher: self.cpu(),
            buf: vec![0; self.digest_size()],
            target,
        }
    }
}

impl Display for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha2_256 => "sha256",
        };

        write!(f, "{name}")
    }
}

impl FromStr for HashFunction {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" | "sha2-256" => Ok(Self::Sha2_256),
            _ => Err(CrackError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// A digest to recover the plaintext of, as given by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetDigest {
    text: String,
    /// `None` when the text is not valid hexadecimal. Such a digest never matches.
    bytes: Option<Vec<u8>>,
}

impl TargetDigest {
    pub fn new(digest: &str) -> Self {
        Self {
            text: digest.to_owned(),
            bytes: hex::decode(digest).ok(),
        }
    }

    /// Returns the digest as it was given.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the hash function matching the length of this digest.
    pub fn classify(&self) -> CrackResult<HashFunction> {
        HashFunction::classify(&self.text).ok_or_else(|| CrackError::UnclassifiedDigest {
            digest: self.text.clone(),
            length: self.text.chars().count(),
        })
    }

    /// Returns true if the raw digest is equal to this one.
    #[inline]
    pub fn matches(&self, digest: &[u8]) -> bool {
        self.bytes.as_deref() == Some(digest)
    }
}

impl Display for TargetDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Hashes plaintexts and compares them to a target, reusing the same hasher and buffer.
pub struct DigestMatcher<'a> {
    hasher: Box<dyn DynDigest>,
    buf: Vec<u8>,
    target: &'a TargetDigest,
}

impl DigestMatcher<'_> {
    /// Returns true if the plaintext hashes to the target digest.
    #[inline]
    pub fn matches(&mut self, plaintext: &[u8]) -> CrackResult<bool> {
        self.hasher.update(plaintext);
        self.hasher
            .finalize_into_reset(&mut self.buf)
            .map_err(|_| CrackError::Digest)?;

        Ok(self.target.matches(&self.buf))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::CrackError,
        hash::{HashFunction, TargetDigest},
    };

    #[test]
    fn test_classify() {
        assert_eq!(Some(HashFunction::Md5), HashFunction::classify(&"a".repeat(32)));
        assert_eq!(Some(HashFunction::Sha1), HashFunction::classify(&"a".repeat(40)));
        assert_eq!(
            Some(HashFunction::Sha2_256),
            HashFunction::classify(&"a".repeat(64))
        );

        for len in [0, 1, 31, 33, 39, 41, 56, 63, 65, 128] {
            assert_eq!(None, HashFunction::classify(&"a".repeat(len)), "length {len}");
        }
    }

    #[test]
    fn test_classify_ignores_content() {
        // not hexadecimal, but the right length
        assert_eq!(Some(HashFunction::Md5), HashFunction::classify(&"z".repeat(32)));
    }

    #[test]
    fn test_unclassified_digest() {
        let target = TargetDigest::new("abc123");
        match target.classify() {
            Err(CrackError::UnclassifiedDigest { digest, length }) => {
                assert_eq!("abc123", digest);
                assert_eq!(6, length);
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(
            "900150983cd24fb0d6963f7d28e17f72",
            HashFunction::Md5.hash_hex("abc")
        );
        assert_eq!(
            "a9993e364706816aba3e25717850c26c9cd0d89d",
            HashFunction::Sha1.hash_hex("abc")
        );
        assert_eq!(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            HashFunction::Sha2_256.hash_hex("abc")
        );
        assert_eq!(
            "d41d8cd98f00b204e9800998ecf8427e",
            HashFunction::Md5.hash_hex("")
        );
    }

    #[test]
    fn test_hash_is_stable() {
        for hash_function in [HashFunction::Md5, HashFunction::Sha1, HashFunction::Sha2_256] {
            let first = hash_function.hash_hex("letmeout");
            assert_eq!(first, hash_function.hash_hex("letmeout"));
            assert_eq!(hash_function.digest_size() * 2, first.len());
            assert_eq!(Some(hash_function), HashFunction::classify(&first));
        }
    }

    #[test]
    fn test_matcher() {
        let target = TargetDigest::new(&HashFunction::Sha1.hash_hex("0007"));
        let mut matcher = HashFunction::Sha1.matcher(&target);

        assert!(!matcher.matches(b"0006").unwrap());
        assert!(matcher.matches(b"0007").unwrap());
        // the hasher is reset between calls
        assert!(matcher.matches(b"0007").unwrap());
    }

    #[test]
    fn test_uppercase_target_matches() {
        let target = TargetDigest::new(&HashFunction::Md5.hash_hex("abc").to_uppercase());
        assert!(HashFunction::Md5.matcher(&target).matches(b"abc").unwrap());
    }

    #[test]
    fn test_malformed_target_never_matches() {
        let target = TargetDigest::new(&"z".repeat(32));
        let mut matcher = HashFunction::Md5.matcher(&target);
        assert!(!matcher.matches(b"abc").unwrap());
        assert!(!matcher.matches(b"").unwrap());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(HashFunction::Md5, "MD5".parse::<HashFunction>().unwrap());
        assert_eq!(HashFunction::Sha1, "sha1".parse::<HashFunction>().unwrap());
        assert_eq!(HashFunction::Sha2_256, "sha256".parse::<HashFunction>().unwrap());

        for hash_function in [HashFunction::Md5, HashFunction::Sha1, HashFunction::Sha2_256] {
            assert_eq!(
                hash_function,
                hash_function.to_string().parse::<HashFunction>().unwrap()
            );
        }

        match "ntlm".parse::<HashFunction>() {
            Err(CrackError::UnknownAlgorithm(name)) => assert_eq!("ntlm", name),
            other => panic!("unexpected parse result: {other:?}"),
        }
    }
}
