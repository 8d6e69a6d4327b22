use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReelError::open("x").to_string().contains("open error:"));
    assert!(ReelError::display("x").to_string().contains("display error:"));
    assert_eq!(
        ReelError::no_episodes("Show").to_string(),
        "no episodes found in series 'Show'"
    );
    assert!(
        ReelError::NoSeries(PathBuf::from("Media"))
            .to_string()
            .contains("'Media'")
    );
}

#[test]
fn only_open_errors_are_recoverable() {
    assert!(!ReelError::open("x").is_fatal());
    assert!(ReelError::no_episodes("x").is_fatal());
    assert!(ReelError::display("x").is_fatal());
    assert!(ReelError::validation("x").is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
