use anyhow::{bail, Result};
use gristmill::testing::*;
use gristmill::{Job, JobConfig, JobState, Key, Phase, VecSource};
use std::sync::Arc;

fn word_mapper(line: &str) -> Result<Vec<(Key, u64)>> {
    Ok(line
        .split_whitespace()
        .map(|w| (Key::from(w.to_lowercase()), 1))
        .collect())
}

fn sum(acc: u64, next: u64) -> Result<u64> {
    Ok(acc + next)
}

#[test]
fn word_count_end_to_end() -> Result<()> {
    let job = Job::new(
        VecSource::new(["the cat sat", "the dog ran"]),
        word_mapper,
        sum,
    );
    let results = job.run()?;

    assert_results_equal(
        results,
        vec![
            (Key::from("the"), 2),
            (Key::from("cat"), 1),
            (Key::from("sat"), 1),
            (Key::from("dog"), 1),
            (Key::from("ran"), 1),
        ],
    );
    Ok(())
}

#[test]
fn empty_input_completes_with_no_results() -> Result<()> {
    let observer = Arc::new(RecordingObserver::new());
    let job = Job::new(VecSource::new(Vec::<String>::new()), word_mapper, sum)
        .with_observer(observer.clone());

    let results = job.run()?;
    assert!(results.is_empty());

    // All three phases still ran, each over zero items.
    assert_eq!(
        observer.events(),
        vec![
            ObservedEvent::Started(Phase::Map),
            ObservedEvent::Completed(Phase::Map, 0),
            ObservedEvent::Started(Phase::Shuffle),
            ObservedEvent::Completed(Phase::Shuffle, 0),
            ObservedEvent::Started(Phase::Reduce),
            ObservedEvent::Completed(Phase::Reduce, 0),
        ],
    );
    Ok(())
}

#[test]
fn single_emission_passes_value_through_untouched() -> Result<()> {
    let job = Job::new(
        VecSource::new(["only"]),
        |_line: &str| -> Result<Vec<(Key, u64)>> { Ok(vec![(Key::from("k"), 99)]) },
        |_acc: u64, _next: u64| -> Result<u64> { bail!("reducer must not run") },
    );
    let results = job.run()?;
    assert_results_equal(results, vec![(Key::from("k"), 99)]);
    Ok(())
}

#[test]
fn phases_run_in_order_with_expected_counts() -> Result<()> {
    let observer = Arc::new(RecordingObserver::new());
    let job = Job::new(VecSource::new(["a b a"]), word_mapper, sum).with_observer(observer.clone());

    assert_eq!(job.state(), JobState::Idle);
    job.run()?;

    assert_eq!(
        observer.events(),
        vec![
            ObservedEvent::Started(Phase::Map),
            ObservedEvent::Completed(Phase::Map, 3),
            ObservedEvent::Started(Phase::Shuffle),
            ObservedEvent::Completed(Phase::Shuffle, 2),
            ObservedEvent::Started(Phase::Reduce),
            ObservedEvent::Completed(Phase::Reduce, 2),
        ],
    );
    Ok(())
}

#[test]
fn mapper_failure_aborts_the_job() {
    let job = Job::new(
        VecSource::new(["good", "bad"]),
        |line: &str| -> Result<Vec<(Key, u64)>> {
            if line == "bad" {
                bail!("cannot map this");
            }
            Ok(vec![(Key::from(line), 1)])
        },
        sum,
    );
    let err = job.run().unwrap_err();
    assert!(matches!(err, gristmill::Error::Mapper { ref record, .. } if record == "bad"));
}

#[test]
fn persistence_writes_all_three_files() -> Result<()> {
    let dir = temp_output_dir();
    let job = Job::new(
        VecSource::new(["the cat sat", "the dog ran"]),
        word_mapper,
        sum,
    )
    .with_config(JobConfig {
        output_dir: Some(dir.path().to_path_buf()),
        ..JobConfig::default()
    });
    let results = job.run()?;

    let mapped: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        dir.path().join("intermediate/mapped_data.json"),
    )?)?;
    let shuffled: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        dir.path().join("intermediate/shuffled_data.json"),
    )?)?;
    let persisted: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("results.json"))?)?;

    // One row per emission, one object key per canonical key, one row per result.
    assert_eq!(mapped.as_array().map(Vec::len), Some(6));
    assert_eq!(shuffled.as_object().map(serde_json::Map::len), Some(5));
    assert_eq!(persisted.as_array().map(Vec::len), Some(results.len()));

    // Untagged keys persist as bare JSON values.
    assert_eq!(mapped[0]["value"], serde_json::json!(1));
    assert!(shuffled.get("the").is_some(), "got: {shuffled}");
    Ok(())
}

#[test]
fn storage_failure_fails_the_job_by_default() -> Result<()> {
    let dir = temp_output_dir();
    // Occupy the output path with a plain file so mkdir fails.
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, b"not a directory")?;

    let job = Job::new(VecSource::new(["a"]), word_mapper, sum).with_config(JobConfig {
        output_dir: Some(blocked.clone()),
        ..JobConfig::default()
    });
    let err = job.run().unwrap_err();
    assert!(matches!(err, gristmill::Error::Storage { .. }));
    Ok(())
}

#[test]
fn tolerated_storage_failure_still_returns_results() -> Result<()> {
    let dir = temp_output_dir();
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, b"not a directory")?;

    let job = Job::new(VecSource::new(["a b a"]), word_mapper, sum).with_config(JobConfig {
        output_dir: Some(blocked),
        tolerate_storage_errors: true,
        ..JobConfig::default()
    });
    let results = job.run()?;
    assert_results_equal(results, vec![(Key::from("a"), 2), (Key::from("b"), 1)]);
    Ok(())
}

#[test]
fn compound_keys_flow_end_to_end() -> Result<()> {
    // Slot-style records: "DAY HOUR kind".
    type Slot = (bool, Vec<String>);
    let mapper = |line: &str| -> Result<Vec<(Key, Slot)>> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [day, hour, kind] = fields.as_slice() else {
            bail!("malformed record: {line}");
        };
        let hour: i64 = hour.parse()?;
        let key = Key::Tuple(vec![
            gristmill::Scalar::from(*day),
            gristmill::Scalar::from(hour),
        ]);
        let value = if *kind == "room" {
            (true, Vec::new())
        } else {
            (false, vec![kind.to_string()])
        };
        Ok(vec![(key, value)])
    };
    let reducer = |acc: Slot, next: Slot| -> Result<Slot> {
        let (available, mut names) = acc;
        names.extend(next.1);
        Ok((available || next.0, names))
    };

    let job = Job::new(
        VecSource::new(["II 10 room", "II 10 alice", "II 10 bob", "III 9 carol"]),
        mapper,
        reducer,
    );
    let results = job.run()?;

    // Tuple keys come back list-shaped after reduction.
    let slot_ii = Key::List(vec![
        gristmill::Scalar::from("II"),
        gristmill::Scalar::from(10i64),
    ]);
    let slot_iii = Key::List(vec![
        gristmill::Scalar::from("III"),
        gristmill::Scalar::from(9i64),
    ]);
    assert_eq!(
        find_result(&results, &slot_ii),
        Some(&(true, vec!["alice".to_string(), "bob".to_string()]))
    );
    assert_eq!(
        find_result(&results, &slot_iii),
        Some(&(false, vec!["carol".to_string()]))
    );
    Ok(())
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_mode_matches_sequential_results() -> Result<()> {
    use gristmill::ExecMode;

    let lines: Vec<String> = (0..200)
        .map(|i| format!("w{} w{} shared", i % 17, i % 5))
        .collect();

    let seq = Job::new(VecSource::new(lines.clone()), word_mapper, sum).run()?;
    let par = Job::new(VecSource::new(lines), word_mapper, sum)
        .with_config(JobConfig {
            mode: ExecMode::Parallel { threads: Some(4) },
            ..JobConfig::default()
        })
        .run()?;

    assert_results_equal(seq, par);
    Ok(())
}
