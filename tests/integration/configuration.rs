//! Translator configuration

use lifeguard_translate::{BatchCheckModifiedKinds, SyntaxProvider, TranslatorConfig};

#[test]
fn test_config_drives_context_options() {
    let config = TranslatorConfig::from_toml(
        r#"
        [translator]
        identity_select = "SELECT LASTVAL()"
        max_relation_depth = 1
        batch_check_modified = "all"
        no_tracking = true
        "#,
    )
    .unwrap();

    let options = config.translate_options();
    assert_eq!(options.max_relation_depth, 1);
    assert!(options.no_tracking);
    assert_eq!(
        options.batch.map(|b| b.check_modified_kinds),
        Some(BatchCheckModifiedKinds::All)
    );
    assert_eq!(
        config.provider_syntax().identity_select(),
        Some("SELECT LASTVAL()")
    );
}

#[test]
fn test_missing_section_uses_defaults() {
    let config = TranslatorConfig::from_toml("[database]\nurl = \"postgres://localhost\"\n").unwrap();
    assert_eq!(config, TranslatorConfig::default());
    assert_eq!(config.translate_options().max_relation_depth, 4);
    assert!(config.provider_syntax().identity_select().is_none());
}
