use std::io;

use thiserror::Error;

pub type CrackResult<T> = std::result::Result<T, CrackError>;

#[derive(Error, Debug)]
pub enum CrackError {
    #[error("Cannot infer the hash algorithm of a {length}-character digest: {digest}")]
    UnclassifiedDigest { digest: String, length: usize },

    #[error("Unknown mask token: {0}")]
    UnknownMaskToken(String),

    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Only search spaces up to 2^64 candidates are supported, but the {0} positions provided exceed it")]
    SearchSpace(usize),

    #[error("At least one worker is required to search")]
    Workers,

    #[error("Failed to build the worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("The digest buffer does not match the output size of the hash function")]
    Digest,

    #[error("Failed to parse the mask schedule")]
    Schedule(#[from] toml::de::Error),

    #[error(
        "Unable to access the file at the given path. Make sure the right permissions are available"
    )]
    Io(#[from] io::Error),
}
