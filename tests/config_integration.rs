use spelunk::config::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn parse_complete_config_file() {
    let config_content = r#"
[scanner]
fan_out = 4
large_files = 10

[cache]
freshness_ceiling_secs = 3600
grace_window_secs = 5
directory = "/tmp/spelunk-cache"

[explorer]
top = 15
decimal_sizes = true
"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.scanner.fan_out, 4);
    assert_eq!(config.scanner.large_files, 10);
    assert_eq!(config.cache.freshness_ceiling_secs, 3600);
    assert_eq!(config.cache.grace_window_secs, 5);
    assert_eq!(
        config.cache.directory.as_deref(),
        Some(std::path::Path::new("/tmp/spelunk-cache"))
    );
    assert_eq!(config.explorer.top, 15);
    assert!(config.explorer.decimal_sizes);
}

#[test]
fn parse_partial_config_uses_defaults() {
    let config_content = r#"
[cache]
freshness_ceiling_secs = 60
"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();

    let config = Config::load(Some(file.path())).unwrap();

    // Explicit value
    assert_eq!(config.cache.freshness_ceiling_secs, 60);
    // Default values
    assert_eq!(config.cache.grace_window_secs, 2);
    assert_eq!(config.scanner.fan_out, 8);
    assert_eq!(config.explorer.top, 30);
}

#[test]
fn parse_invalid_toml_returns_error() {
    let config_content = "this is not valid toml [[[";

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();

    let result = Config::load(Some(file.path()));
    assert!(result.is_err());
}

#[test]
fn parse_zero_large_files_returns_error() {
    let config_content = r#"
[scanner]
large_files = 0
"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();

    let result = Config::load(Some(file.path()));
    assert!(result.is_err());
}
