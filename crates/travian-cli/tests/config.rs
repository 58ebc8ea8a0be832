//! Config file resolution against real files on disk.

use std::io::Write;

use travian_cli::{Config, ConfigError};

fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn test_file_values_win_over_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"username": "alice", "password": "hunter2", "server": "ts3.example.com"}"#,
    )
    .unwrap();

    let env = env_of(&[("TR_SERVER", "ts9.example.com")]);
    let config = Config::resolve_with(Some(path.as_path()), env).unwrap();
    assert_eq!(config.username, "alice");
    assert_eq!(config.password, "hunter2");
    assert_eq!(config.server, "ts3.example.com");
}

#[test]
fn test_partial_file_falls_back_to_env() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"username": "alice", "password": ""}}"#).unwrap();

    let env = env_of(&[("tr_password", "from-env"), ("TR_SERVER", "ts1.example.com")]);
    let config = Config::resolve_with(Some(file.path()), env).unwrap();
    assert_eq!(config.password, "from-env");
    assert_eq!(config.server, "ts1.example.com");
}

#[test]
fn test_invalid_json_is_ignored() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "username = alice").unwrap();

    let env = env_of(&[("TR_USERNAME", "bob"), ("TR_PASSWORD", "pw")]);
    let err = Config::resolve_with(Some(file.path()), env).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Missing {
            field: "server",
            env: "TR_SERVER"
        }
    );
    assert!(err.to_string().contains("server is not given"));
}

#[test]
fn test_credentials_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("travian.json");
    std::fs::write(&path, r#"{"username": "a", "password": "b", "server": "c"}"#).unwrap();

    let config = Config::resolve_with(Some(path.as_path()), |_| None).unwrap();
    let credentials = config.credentials();
    assert_eq!(credentials.username, "a");
    assert_eq!(credentials.server, "c");
}
