use rpgmark_core::errors::{ErrorInfo, ErrorKind, RpgError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("vertices", 9)
        .with_context("edges", "14")
}

#[test]
fn structure_mismatch_surface() {
    let err = RpgError::StructureMismatch(sample_info("degree-pattern", "no damage row matches"));
    assert_eq!(err.info().code, "degree-pattern");
    assert_eq!(err.kind(), ErrorKind::StructureMismatch);
    assert_eq!(err.info().context.get("vertices"), Some(&"9".to_string()));
}

#[test]
fn unrepairable_surface() {
    let err = RpgError::Unrepairable(sample_info("ambiguous-root", "tie"));
    assert_eq!(err.kind(), ErrorKind::Unrepairable);
    assert!(err.info().context.contains_key("edges"));
}

#[test]
fn not_an_rpg_surface() {
    let err = RpgError::NotAnRpg(sample_info("no-fixed-element", "forest has no fixed element"));
    assert_eq!(err.kind(), ErrorKind::NotAnRpg);
}

#[test]
fn context_and_hint_keep_variant() {
    let err = rpgmark_core::errors::invalid_input("zero-watermark", "w must be positive")
        .with_context("w", 0)
        .with_hint("encode values starting at 1");
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.info().context.get("w"), Some(&"0".to_string()));
    assert_eq!(err.info().hint.as_deref(), Some("encode values starting at 1"));
}

#[test]
fn display_includes_code_context_and_hint() {
    let err = RpgError::NotInvolution(
        ErrorInfo::new("not-involution", "sip[sip[i]] != i")
            .with_context("index", 3)
            .with_hint("check the preorder"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("not an involution: sip[sip[i]] != i (code: not-involution)"));
    assert!(rendered.contains("index=3"));
    assert!(rendered.contains("hint: check the preorder"));
}

#[test]
fn errors_round_trip_json() {
    let err = RpgError::Serde(sample_info("schema", "unsupported schema"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"Serde\""));
    let back: RpgError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}
