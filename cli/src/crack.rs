use std::{
    collections::HashSet,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_BORDERS_ONLY, Cell, Color, Table};
use crossterm::style::{self, Stylize};
use hashcrack_core::{Attempt, CrackCtxBuilder, CrackError, Cracker, Event, MaskSchedule, Recovery};
use human_repr::{HumanCount, HumanDuration};
use tracing::debug;

use crate::{load_digests, Crack};

pub fn crack(args: Crack) -> Result<()> {
    let digests = load_digests(args.digests_file.as_deref(), &args.digests)?;

    let schedule = if let Some(path) = &args.schedule {
        MaskSchedule::load(path)
            .with_context(|| format!("Unable to load the mask schedule {}", path.display()))?
    } else if !args.masks.is_empty() {
        MaskSchedule::new(args.masks.iter().cloned())
    } else {
        MaskSchedule::default()
    };

    let wordlist = (!args.no_wordlist).then(|| args.wordlist.clone());

    let ctx = CrackCtxBuilder::new()
        .wordlist(wordlist.clone())
        .schedule(schedule)
        .workers(args.workers)
        .hash(args.hash)
        .rules(args.rules)
        .build()?;

    let handle = Cracker::new(ctx)?.spawn(digests);

    while let Some(event) = handle.recv() {
        print_event(&event);
    }

    let attempts = handle.join()?;
    print_summary(&attempts);

    if let (Some(wordlist), false) = (&wordlist, args.no_save) {
        let saved =
            save_recoveries(wordlist, &attempts).context("Unable to update the wordlist")?;

        if saved > 0 {
            println!(
                "Saved {saved} new plaintext(s) to {} for future use",
                wordlist.display()
            );
        }
    }

    Ok(())
}

/// Prints the progress of the batch as it goes.
fn print_event(event: &Event) {
    match event {
        Event::Target {
            digest,
            hash_function,
        } => println!("{} {digest} ({hash_function})", "Cracking".bold()),

        Event::Unclassified { digest } => println!(
            "{}",
            format!("Skipping {digest}: unknown digest length").with(style::Color::Yellow)
        ),

        Event::DictionaryMiss => println!("  Not in the wordlist"),

        Event::RuleStarted { attack, candidates } => println!(
            "  Trying the {attack} attack ({} candidates)",
            candidates.human_count_bare()
        ),

        Event::RuleExhausted {
            attack,
            attempted,
            elapsed,
        } => println!(
            "  {attack} attack exhausted, {attempted} candidates in {}",
            elapsed.as_secs_f64().human_duration()
        ),

        Event::RuleSkipped { attack, words } => println!(
            "{}",
            format!("  Skipping the {attack} attack for {words} words").with(style::Color::Yellow)
        ),

        Event::MaskStarted { mask, candidates } => println!(
            "  Trying {mask} ({} candidates)",
            candidates.human_count_bare()
        ),

        Event::MaskExhausted {
            mask,
            attempted,
            elapsed,
        } => println!(
            "  {mask} exhausted, {attempted} candidates in {}",
            elapsed.as_secs_f64().human_duration()
        ),

        Event::Recovered { recovery, .. } => match recovery.plaintext() {
            Some(plaintext) => println!(
                "  {} {} ({})\n",
                "Found".green().bold(),
                plaintext.green(),
                recovery.provenance()
            ),
            None => println!("  {}\n", "No plaintext found".red()),
        },
    }
}

/// Prints one row per digest.
fn print_summary(attempts: &[Attempt]) {
    let mut display_table = Table::new();
    display_table.load_preset(UTF8_BORDERS_ONLY);
    display_table.set_header(vec!["Digest", "Plaintext", "Found by", "Time"]);

    for attempt in attempts {
        let digest = Cell::new(&attempt.digest);
        let time = Cell::new(attempt.elapsed.as_secs_f64().human_duration());

        let (plaintext, provenance) = match &attempt.result {
            Ok(recovery) => match recovery.plaintext() {
                Some(plaintext) => (
                    Cell::new(plaintext).fg(Color::Green),
                    Cell::new(recovery.provenance()),
                ),
                None => (
                    Cell::new("No plaintext found").fg(Color::Red),
                    Cell::new(""),
                ),
            },
            Err(CrackError::UnclassifiedDigest { length, .. }) => (
                Cell::new(format!("Unknown digest length ({length})")).fg(Color::Grey),
                Cell::new(""),
            ),
            Err(err) => (Cell::new(err).fg(Color::Red), Cell::new("")),
        };

        display_table.add_row(vec![digest, plaintext, provenance, time]);
    }

    println!("{display_table}");
}

/// Appends the plaintexts found by a rule attack or by brute force to the wordlist, unless the exact line is
/// already there. Creates the wordlist if it does not exist.
/// Returns the number of plaintexts appended.
fn save_recoveries(wordlist: &Path, attempts: &[Attempt]) -> io::Result<usize> {
    let existing = match fs::read(wordlist) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(err),
    };

    let mut known = existing
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect::<HashSet<_>>();

    let new_words = attempts
        .iter()
        .filter_map(|attempt| match &attempt.result {
            Ok(Recovery::Rule { plaintext, .. } | Recovery::BruteForce { plaintext, .. }) => {
                Some(plaintext)
            }
            _ => None,
        })
        .filter(|plaintext| known.insert((*plaintext).clone()))
        .collect::<Vec<_>>();

    if new_words.is_empty() {
        return Ok(0);
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(wordlist)?;

    // do not glue the first word to an unterminated last line
    if existing.last().is_some_and(|&b| b != b'\n') {
        file.write_all(b"\n")?;
    }

    for word in &new_words {
        writeln!(file, "{word}")?;
    }

    debug!(count = new_words.len(), "wordlist updated");
    Ok(new_words.len())
}
