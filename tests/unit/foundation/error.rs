use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TixelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TixelError::compile("x")
            .to_string()
            .contains("compile error:")
    );
    assert!(
        TixelError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        TixelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TixelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
