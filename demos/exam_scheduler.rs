//! Exam-room scheduling: find slots where a free room and enough friends
//! line up.
//!
//! Run with:
//!
//! ```text
//! cargo run --example exam_scheduler
//! ```
//!
//! The input mixes two record kinds:
//!
//! - room availability: a Roman-numeral day followed by free hours
//!   (`I 9 10 15`);
//! - friend preferences: a 12-column name field, a slot count, then
//!   `day hour` pairs (`Alice       2 I 9 II 10`).
//!
//! The mapper keys both kinds by the `(day, hour)` slot; the reducer ORs
//! room availability and concatenates interested friends. Everything after
//! the job -- filtering to slots with a room and more than three friends,
//! sorting by attendance, writing the report -- is plain post-processing on
//! the returned results.

use anyhow::Result;
use gristmill::{Job, JobConfig, Key, LineFileSource, Scalar};
use std::fs::File;
use std::io::{BufWriter, Write};

const DAYS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
const OUTPUT_DIR: &str = "output/exam_results";

/// Payload per slot: (room is free, interested friends so far).
type Slot = (bool, Vec<String>);

fn slot_key(day: &str, hour: i64) -> Key {
    Key::Tuple(vec![Scalar::from(day), Scalar::from(hour)])
}

fn exam_mapper(line: &str) -> Result<Vec<(Key, Slot)>> {
    let mut parts = line.split_whitespace();
    let Some(first) = parts.next() else {
        return Ok(Vec::new());
    };

    let mut emissions = Vec::new();
    if DAYS.contains(&first) {
        // Room availability: day then free hours.
        for hour_str in parts {
            if let Ok(hour) = hour_str.parse::<i64>() {
                emissions.push((slot_key(first, hour), (true, Vec::new())));
            }
        }
    } else {
        // Friend preference: 12-column name field, slot count, day/hour pairs.
        let cut = line
            .char_indices()
            .nth(12)
            .map_or(line.len(), |(i, _)| i);
        let (name_field, rest) = line.split_at(cut);
        let name = name_field.trim().to_string();

        let slots: Vec<&str> = rest.split_whitespace().skip(1).collect();
        for pair in slots.chunks(2) {
            let [day, hour_str] = pair else { continue };
            if let Ok(hour) = hour_str.parse::<i64>() {
                emissions.push((slot_key(day, hour), (false, vec![name.clone()])));
            }
        }
    }
    Ok(emissions)
}

fn exam_reducer(acc: Slot, next: Slot) -> Result<Slot> {
    let (available, mut friends) = acc;
    friends.extend(next.1);
    Ok((available || next.0, friends))
}

/// Keep slots with a free room and more than three interested friends,
/// ordered by descending attendance.
fn viable_slots(results: Vec<(Key, Slot)>) -> Vec<(String, i64, Vec<String>)> {
    let mut slots = Vec::new();
    for (key, (available, friends)) in results {
        if !available || friends.len() <= 3 {
            continue;
        }
        // Slot keys come back list-shaped: [day, hour].
        let Key::List(elems) = key else { continue };
        let [Scalar::Str(day), Scalar::Int(hour)] = elems.as_slice() else {
            continue;
        };
        let mut friends = friends;
        friends.sort();
        slots.push((day.clone(), *hour, friends));
    }
    slots.sort_by(|a, b| b.2.len().cmp(&a.2.len()));
    slots
}

fn write_report(slots: &[(String, i64, Vec<String>)]) -> Result<()> {
    let path = format!("{OUTPUT_DIR}/final_results.txt");
    let mut w = BufWriter::new(File::create(&path)?);
    for (day, hour, friends) in slots {
        writeln!(w, "{day} {hour} {}", friends.len())?;
        for name in friends {
            writeln!(w, "{name}")?;
        }
    }
    w.flush()?;
    println!("Formatted results written to {path}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let source = LineFileSource::open("demos/data/exam_input.txt")?;
    let job = Job::new(source, exam_mapper, exam_reducer).with_config(JobConfig {
        output_dir: Some(OUTPUT_DIR.into()),
        ..JobConfig::default()
    });

    let results = job.run()?;
    let slots = viable_slots(results);
    write_report(&slots)?;
    Ok(())
}
