use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PageStackError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        PageStackError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        PageStackError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PageStackError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_invalid_input());
}

#[test]
fn anyhow_converts_into_other() {
    fn fails() -> PageStackResult<()> {
        Err(anyhow::anyhow!("disk gone"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err, PageStackError::Other(_)));
}
