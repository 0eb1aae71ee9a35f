use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LyricaError::invalid_timeline("x")
            .to_string()
            .contains("invalid timeline:")
    );
    assert!(
        LyricaError::invalid_config("x")
            .to_string()
            .contains("invalid config:")
    );
    assert!(
        LyricaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(LyricaError::render("x").to_string().contains("render error:"));
    assert!(LyricaError::encode("x").to_string().contains("encode error:"));
    assert!(
        LyricaError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LyricaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
