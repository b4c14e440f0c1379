use wab_domain::config::Config;

#[test]
fn default_port_matches_deploy_convention() {
    let config = Config::default();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
fn explicit_server_section_parses() {
    let toml_str = r#"
[server]
host = "127.0.0.1"
port = 8080
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
}

#[test]
fn secret_env_default() {
    let config = Config::default();
    assert_eq!(config.auth.secret_env, "API_SECRET");
}

#[test]
fn session_delays_default() {
    let config = Config::default();
    assert_eq!(config.session.reconnect_delay_secs, 30);
    assert_eq!(config.session.reset_delay_secs, 5);
    assert!(!config.session.wipe_on_auth_errors);
}

#[test]
fn port_env_override_rejects_garbage() {
    std::env::set_var("PORT", "not-a-port");
    let mut config = Config::default();
    config.apply_env();
    assert_eq!(config.server.port, 3000, "garbage PORT keeps the default");

    std::env::set_var("PORT", "8081");
    let mut config = Config::default();
    config.apply_env();
    assert_eq!(config.server.port, 8081);

    std::env::remove_var("PORT");
}

#[test]
fn wipe_on_auth_errors_parses() {
    let toml_str = r#"
[session]
wipe_on_auth_errors = true
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert!(config.session.wipe_on_auth_errors);
}
