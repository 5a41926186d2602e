use gristmill::{LineFileSource, RecordSource, VecSource};
use std::io::Write;

#[test]
fn vec_source_yields_in_order_then_ends() -> anyhow::Result<()> {
    let mut source = VecSource::new(["first", "second"]);
    assert_eq!(source.next_record()?.as_deref(), Some("first"));
    assert_eq!(source.next_record()?.as_deref(), Some("second"));
    assert_eq!(source.next_record()?, None);
    // End of sequence is stable, not an error.
    assert_eq!(source.next_record()?, None);
    Ok(())
}

#[test]
fn line_file_source_trims_each_line() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("records.txt");
    let mut f = std::fs::File::create(&path)?;
    writeln!(f, "  padded line\t")?;
    writeln!(f, "plain")?;
    writeln!(f)?;
    drop(f);

    let mut source = LineFileSource::open(&path)?;
    assert_eq!(source.next_record()?.as_deref(), Some("padded line"));
    assert_eq!(source.next_record()?.as_deref(), Some("plain"));
    assert_eq!(source.next_record()?.as_deref(), Some(""));
    assert_eq!(source.next_record()?, None);
    Ok(())
}

#[test]
fn missing_file_is_a_source_error() {
    let err = LineFileSource::open("no/such/file.txt").unwrap_err();
    assert!(matches!(err, gristmill::Error::Source { .. }));
}
