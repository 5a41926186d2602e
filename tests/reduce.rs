use anyhow::bail;
use gristmill::reduce::{fold_values, run_reduce};
use gristmill::shuffle::Groups;
use gristmill::testing::find_result;
use gristmill::{Error, Key, Reducer};

/// Reducer that records fold structure, so associativity order is visible.
fn parenthesize(acc: String, next: String) -> anyhow::Result<String> {
    Ok(format!("({acc}+{next})"))
}

/// Reducer that always fails; folding any pair through it is an error.
fn poisoned(_acc: u64, _next: u64) -> anyhow::Result<u64> {
    bail!("reducer must not run")
}

#[test]
fn fold_is_strictly_left_associated() -> anyhow::Result<()> {
    let values = vec![
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "d".to_string(),
    ];
    let folded = fold_values(&parenthesize, values)?;
    assert_eq!(folded.as_deref(), Some("(((a+b)+c)+d)"));
    Ok(())
}

#[test]
fn fold_of_empty_input_is_none() -> anyhow::Result<()> {
    let folded = fold_values(&parenthesize, Vec::new())?;
    assert_eq!(folded, None);
    Ok(())
}

#[test]
fn single_value_skips_the_reducer() -> anyhow::Result<()> {
    // `poisoned` errors on any invocation, so Ok proves it never ran.
    let folded = fold_values(&poisoned, vec![7u64])?;
    assert_eq!(folded, Some(7));
    Ok(())
}

#[test]
fn empty_groups_produce_no_result() -> anyhow::Result<()> {
    let mut groups: Groups<u64> = Groups::new();
    groups.insert(Key::from("empty").normalize()?, Vec::new());
    groups.insert(Key::from("full").normalize()?, vec![1, 2, 3]);

    let results = run_reduce(groups, &|acc: u64, next: u64| -> anyhow::Result<u64> {
        Ok(acc + next)
    })?;

    assert_eq!(results.len(), 1);
    assert_eq!(find_result(&results, &Key::from("full")), Some(&6));
    assert_eq!(find_result(&results, &Key::from("empty")), None);
    Ok(())
}

#[test]
fn reducer_failure_names_the_group() -> anyhow::Result<()> {
    let mut groups: Groups<u64> = Groups::new();
    groups.insert(Key::from("boom").normalize()?, vec![1, 2]);

    let err = run_reduce(groups, &poisoned).unwrap_err();
    match err {
        Error::Reducer { key, .. } => assert_eq!(key, "boom"),
        other => panic!("expected reducer error, got {other}"),
    }
    Ok(())
}

#[test]
fn output_keys_are_reconstructed() -> anyhow::Result<()> {
    let mut groups: Groups<u64> = Groups::new();
    groups.insert(Key::tuple(["a", "b"]).normalize()?, vec![1]);

    let results = run_reduce(groups, &poisoned)?;
    // Single-char fragments reassemble; see the key tests for the policy.
    assert_eq!(results, vec![(Key::from("ab"), 1)]);
    Ok(())
}

#[test]
fn trait_objects_and_closures_both_reduce() -> anyhow::Result<()> {
    struct SumReducer;
    impl Reducer<u64> for SumReducer {
        fn reduce(&self, acc: u64, next: u64) -> anyhow::Result<u64> {
            Ok(acc + next)
        }
    }

    let folded = fold_values(&SumReducer, vec![1, 2, 3])?;
    assert_eq!(folded, Some(6));
    Ok(())
}
