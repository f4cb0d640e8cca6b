use super::*;

#[test]
fn defaults_match_shipped_configuration() {
    let config = Config::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.projects.directory, "./projects");
    assert_eq!(config.database.path, "./syncx.db");
    assert_eq!(config.balancer.endpoints, vec!["http://localhost:8081", "http://localhost:8082"]);
    assert_eq!(config.balancer.check_interval_secs, 60);
    assert!(config.scanning.auto_scan_on_add);
}

#[test]
fn parse_config_keeps_defaults_for_missing_keys() {
    let config = parse_config("server:\n  port: 9000\nscanning:\n  auto_scan_on_add: false\n").unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert!(!config.scanning.auto_scan_on_add);
    assert_eq!(config.database.path, "./syncx.db");
}

#[test]
fn parse_config_empty_input_is_default() {
    assert_eq!(parse_config("   \n").unwrap(), Config::default());
}

#[test]
fn parse_config_rejects_wrong_types() {
    assert!(parse_config("server:\n  port: not-a-number\n").is_err());
}

#[test]
fn listen_addr_joins_host_and_port() {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".into();
    config.server.port = 3000;
    assert_eq!(config.listen_addr(), "127.0.0.1:3000");
}

#[test]
fn load_config_writes_defaults_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/syncx.yaml");

    let config = load_config(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(path.exists(), "default config should be written");

    let reloaded = load_config(&path).unwrap();
    assert_eq!(reloaded, Config::default());
}

#[test]
fn load_config_reads_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("syncx.yaml");
    std::fs::write(&path, "balancer:\n  endpoints:\n    - http://10.0.0.1:80\n").unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.balancer.endpoints, vec!["http://10.0.0.1:80"]);
    assert_eq!(config.balancer.check_interval_secs, 60);
}

#[test]
fn load_config_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("syncx.yaml");
    std::fs::write(&path, "server: [unclosed").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn save_config_round_trips_custom_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.yaml");
    let mut config = Config::default();
    config.projects.directory = "/srv/projects".into();

    save_config(&config, &path).unwrap();
    assert_eq!(load_config(&path).unwrap(), config);
}

#[test]
fn apply_env_overrides_port_only_when_valid() {
    let mut config = Config::default();
    config.server.port = 9000;

    unsafe { std::env::set_var("PORT", "7070") };
    config.apply_env();
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.listen_addr(), "0.0.0.0:7070");

    unsafe { std::env::set_var("PORT", "not-a-port") };
    config.apply_env();
    assert_eq!(config.server.port, 7070);

    unsafe { std::env::remove_var("PORT") };
    config.apply_env();
    assert_eq!(config.server.port, 7070);
}
