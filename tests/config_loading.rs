use spark_breakpoints::{
    signal, use_breakpoint, BreakpointConfig, ConfigProvider, ConfigurationError, Pairing,
    ThresholdSet,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(
        r#"
pairing = "by-name"

[breakpoints]
lg = 992
sm = 576
"#,
    );

    let config = BreakpointConfig::load(file.path()).unwrap();
    assert_eq!(config.pairing, Pairing::ByName);

    let width = signal(600.0);
    let resolver = use_breakpoint(None, &config, &width).unwrap();
    assert_eq!(resolver.breakpoint().get(), "sm");
}

#[test]
fn test_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("breakpoints.toml");

    match BreakpointConfig::load(&path) {
        Err(ConfigurationError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn test_invalid_file_is_a_parse_error() {
    let file = write_config("[breakpoints\nsm = 576");
    assert!(matches!(
        BreakpointConfig::load(file.path()),
        Err(ConfigurationError::Parse(_))
    ));
}

#[test]
fn test_saved_config_loads_back_in_order() {
    let config = BreakpointConfig {
        pairing: Pairing::Positional,
        breakpoints: [("xl", 1200.0), ("sm", 576.0)]
            .into_iter()
            .map(|(n, v)| (n.to_string(), v))
            .collect(),
    };
    let file = write_config(&config.to_toml_string().unwrap());

    assert_eq!(BreakpointConfig::load(file.path()).unwrap(), config);
}

#[test]
fn test_explicit_thresholds_win_over_provider() {
    let explicit = ThresholdSet::from_pairs([("tablet", 600.0)]).unwrap();
    let width = signal(700.0);

    let resolver = use_breakpoint(Some(explicit), &BreakpointConfig::default(), &width).unwrap();
    assert_eq!(resolver.breakpoint().get(), "tablet");
    assert!(resolver.status("sm").is_none());
}

#[test]
fn test_provider_defaults_apply_without_explicit_thresholds() {
    let width = signal(800.0);
    let resolver = use_breakpoint(None, &BreakpointConfig::default(), &width).unwrap();

    assert_eq!(resolver.breakpoint().get(), "md");
    assert_eq!(
        resolver.statuses().names().collect::<Vec<_>>(),
        vec!["sm", "md", "lg", "xl"]
    );
}

#[test]
fn test_invalid_provider_config_is_reported() {
    let config = BreakpointConfig::from_toml_str("[breakpoints]\nfilter = 10").unwrap();
    let width = signal(0.0);

    let err = use_breakpoint(None, &config, &width).unwrap_err();
    assert!(matches!(err, ConfigurationError::ReservedName { ref name } if name == "filter"));
}

struct Fixed;

impl ConfigProvider for Fixed {
    fn breakpoints(&self) -> Result<ThresholdSet, ConfigurationError> {
        ThresholdSet::from_pairs([("compact", 0.0), ("regular", 600.0)])
    }
}

#[test]
fn test_custom_provider_with_zero_threshold() {
    let width = signal(200.0);
    let resolver = use_breakpoint(None, &Fixed, &width).unwrap();

    assert_eq!(resolver.breakpoint().get(), "compact");
    assert!(!resolver.min().get());

    width.set(640.0);
    assert_eq!(resolver.breakpoint().get(), "regular");
}

#[test]
fn test_threshold_set_is_its_own_provider() {
    let set = ThresholdSet::from_pairs([("wide", 1400.0)]).unwrap();
    let width = signal(1500.0);
    let resolver = use_breakpoint(None, &set, &width).unwrap();
    assert_eq!(resolver.breakpoint().get(), "wide");
}
