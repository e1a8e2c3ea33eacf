use std::{
    collections::BTreeSet,
    fs::{self, File},
    io::{self, BufWriter, Write},
};

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use tracing::info;

use crate::Library;

/// Passwords common enough to always be in the wordlist.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "admin", "root", "guest", "user", "login", "123456", "12345", "12345678",
    "123456789", "qwerty", "football", "baseball", "dragon", "monkey", "letmeout",
];

/// The range of years added to the wordlist.
const YEARS: std::ops::RangeInclusive<u32> = 1900..=2030;

pub fn library(args: Library) -> Result<()> {
    let existing = match fs::read_to_string(&args.wordlist) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Unable to read the wordlist {}", args.wordlist.display())
            })
        }
    };

    let words = enrich(&existing);
    info!(words = words.len(), "writing the wordlist");

    let disk_error = || format!("Unable to write the wordlist {}", args.wordlist.display());
    let mut writer = BufWriter::new(File::create(&args.wordlist).with_context(disk_error)?);
    for word in &words {
        writeln!(writer, "{word}").with_context(disk_error)?;
    }
    writer.flush().with_context(disk_error)?;

    println!(
        "{} {} now has {} entries",
        "Done!".green().bold(),
        args.wordlist.display(),
        words.len()
    );

    Ok(())
}

/// Merges the words of an existing wordlist with 4-digit PINs, years and common passwords.
/// Words are trimmed, blank ones are dropped.
fn enrich(existing: &str) -> BTreeSet<String> {
    let pins = (0..10_000).map(|pin| format!("{pin:04}"));
    let years = YEARS.map(|year| year.to_string());
    let common = COMMON_PASSWORDS.iter().map(|word| word.to_string());

    existing
        .lines()
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .chain(pins)
        .chain(years)
        .chain(common)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::{
        library::{enrich, library, COMMON_PASSWORDS},
        Library,
    };

    #[test]
    fn test_enrich_empty() {
        let words = enrich("");

        // years are 4 digits long, so they are pins too
        assert_eq!(10_000 + COMMON_PASSWORDS.len(), words.len());
        assert!(words.contains("0000"));
        assert!(words.contains("9999"));
        assert!(words.contains("1900"));
        assert!(words.contains("2030"));
        assert!(!words.contains("10000"));
        assert!(words.contains("letmeout"));
    }

    #[test]
    fn test_enrich_keeps_existing_words() {
        let words = enrich("  hunter2 \n\n0007\npassword\r\n");

        assert!(words.contains("hunter2"));
        assert!(!words.contains(""));
        assert_eq!(10_000 + COMMON_PASSWORDS.len() + 1, words.len());
    }

    #[test]
    fn test_library_writes_sorted_wordlist() {
        let dir = tempdir().unwrap();
        let wordlist = dir.path().join("wordlist.txt");
        fs::write(&wordlist, "zebra\nhunter2\n").unwrap();

        library(Library {
            wordlist: wordlist.clone(),
        })
        .unwrap();
        let content = fs::read_to_string(&wordlist).unwrap();
        let lines = content.lines().collect::<Vec<_>>();

        assert_eq!(Some(&"0000"), lines.first());
        assert_eq!(Some(&"zebra"), lines.last());
        assert!(lines.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(lines.contains(&"hunter2"));

        // running it twice changes nothing
        library(Library {
            wordlist: wordlist.clone(),
        })
        .unwrap();
        assert_eq!(content, fs::read_to_string(&wordlist).unwrap());
    }
}
