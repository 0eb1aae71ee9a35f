use super::*;

#[test]
fn parses_format_duration() {
    let json = br#"{"format": {"filename": "a.mp3", "duration": "183.240000"}}"#;
    assert_eq!(parse_probe_duration(json).unwrap(), 183.24);
}

#[test]
fn missing_duration_is_an_error() {
    assert!(parse_probe_duration(br#"{"format": {}}"#).is_err());
    assert!(parse_probe_duration(br#"{}"#).is_err());
}

#[test]
fn garbage_is_a_serde_error() {
    let err = parse_probe_duration(b"not json").unwrap_err();
    assert!(matches!(err, LyricaError::Serde(_)));
}

#[test]
fn non_positive_duration_is_rejected() {
    assert!(parse_probe_duration(br#"{"format": {"duration": "0.0"}}"#).is_err());
    assert!(parse_probe_duration(br#"{"format": {"duration": "N/A"}}"#).is_err());
}

#[test]
fn missing_file_fails_before_probing() {
    let err = probe_duration_secs(Path::new("/no/such/song.mp3")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}
