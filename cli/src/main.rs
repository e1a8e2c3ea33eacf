mod crack;
mod library;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::Level;

use hashcrack_core::{HashFunction, Mask, DEFAULT_WORDLIST, DEFAULT_WORKERS};

use crack::crack;
use library::library;

/// Hash digest recovery, with a wordlist first and multithreaded mask brute force next.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more details on stderr. Can be repeated up to three times.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Crack(Crack),
    Library(Library),
}

/// Find the plaintexts producing MD5, SHA-1 or SHA-256 digests.
#[derive(Args)]
pub struct Crack {
    /// A file containing the digests to crack in hexadecimal, one per line.
    #[arg(value_parser)]
    digests_file: Option<PathBuf>,

    /// A digest to crack in hexadecimal, in addition to the ones of the file.
    #[arg(short, long = "digest", value_parser)]
    digests: Vec<String>,

    /// The wordlist checked before brute forcing.
    /// Plaintexts found by a rule attack or by brute force are appended to it.
    #[arg(short, long, value_parser, default_value = DEFAULT_WORDLIST)]
    wordlist: PathBuf,

    /// The number of threads used to brute force a mask.
    #[arg(short = 'j', long, value_parser = check_workers, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// A mask to brute force, replacing the default ones.
    /// Can be repeated, masks are tried in order.
    /// `?l` is a lowercase letter, `?u` an uppercase letter, `?d` a digit and `?s` a symbol.
    #[arg(short, long = "mask", value_parser = check_mask, conflicts_with = "schedule")]
    masks: Vec<String>,

    /// A TOML file listing the masks to brute force, of the form `masks = ["?d", "?d?d"]`.
    #[arg(short, long, value_parser)]
    schedule: Option<PathBuf>,

    /// Use this hash function instead of inferring it from the digest length.
    #[arg(long, value_parser = check_hash)]
    hash: Option<HashFunction>,

    /// Run the hybrid and combinator attacks over the wordlist before brute forcing.
    #[arg(long, conflicts_with = "no_wordlist")]
    rules: bool,

    /// Do not append the plaintexts found by a rule attack or by brute force to the wordlist.
    #[arg(long)]
    no_save: bool,

    /// Skip the wordlist and brute force directly.
    #[arg(long)]
    no_wordlist: bool,
}

/// Enrich a wordlist with PINs, years and common passwords.
/// The wordlist is rewritten sorted and without duplicates.
#[derive(Args)]
pub struct Library {
    /// The wordlist to enrich. It is created if it does not exist.
    #[arg(short, long, value_parser, default_value = DEFAULT_WORDLIST)]
    wordlist: PathBuf,
}

/// Checks if the number of workers is at least one.
fn check_workers(workers: &str) -> Result<usize> {
    let workers = workers
        .parse::<usize>()
        .context("The number of workers should be a positive integer")?;

    if workers == 0 {
        bail!("At least one worker is required");
    }

    Ok(workers)
}

/// Checks if the mask only contains known tokens.
fn check_mask(mask: &str) -> Result<String> {
    Mask::parse(mask)?;
    Ok(mask.to_owned())
}

/// Checks if the hash function is supported.
fn check_hash(name: &str) -> Result<HashFunction> {
    Ok(name.parse()?)
}

/// Maps the number of `-v` flags to the maximum level logged.
fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.commands {
        Commands::Crack(args) => crack(args)?,
        Commands::Library(args) => library(args)?,
    }

    Ok(())
}

/// Helper function to gather the digests of a file and of the command line.
/// Lines are trimmed and blank lines are skipped.
fn load_digests(file: Option<&Path>, extra: &[String]) -> Result<Vec<String>> {
    let mut digests = Vec::new();

    if let Some(file) = file {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Unable to read the digests file {}", file.display()))?;

        digests.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned),
        );
    }

    digests.extend(
        extra
            .iter()
            .map(|digest| digest.trim())
            .filter(|digest| !digest.is_empty())
            .map(str::to_owned),
    );

    if digests.is_empty() {
        bail!("No digest to crack, provide a digests file or use --digest");
    }

    Ok(digests)
}
