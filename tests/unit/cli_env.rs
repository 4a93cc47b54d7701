use serial_test::serial;

use pubs_chat::cli::{Cli, API_KEY_ENV_VARS, DB_CONNECTION_ENV_VAR};

fn clear_env() {
    for var in API_KEY_ENV_VARS {
        std::env::remove_var(var);
    }
    std::env::remove_var(DB_CONNECTION_ENV_VAR);
}

#[test]
#[serial]
fn flag_beats_environment() {
    clear_env();
    std::env::set_var("GOOGLE_API_KEY", "env-key");
    let cli = Cli { api_key: Some("flag-key".to_string()), ..Default::default() };
    assert_eq!(cli.resolve_api_key().as_deref(), Some("flag-key"));
    clear_env();
}

#[test]
#[serial]
fn api_key_env_vars_are_checked_in_order() {
    clear_env();
    std::env::set_var("GEMINI_API_KEY", "gemini-key");
    std::env::set_var("GOOGLE_AI_KEY", "ai-key");
    let cli = Cli::default();
    assert_eq!(cli.resolve_api_key().as_deref(), Some("gemini-key"));

    std::env::set_var("GOOGLE_API_KEY", "google-key");
    assert_eq!(cli.resolve_api_key().as_deref(), Some("google-key"));
    clear_env();
}

#[test]
#[serial]
fn missing_key_resolves_to_none() {
    clear_env();
    let cli = Cli::default();
    assert_eq!(cli.resolve_api_key(), None);
}

#[test]
#[serial]
fn sqlite_file_flag_builds_connection_string() {
    clear_env();
    let cli = Cli { filename: Some("pubs.db".to_string()), ..Default::default() };
    assert_eq!(cli.resolve_connection_string().as_deref(), Some("sqlite:pubs.db"));
}

#[test]
#[serial]
fn connection_string_falls_back_to_env() {
    clear_env();
    std::env::set_var(DB_CONNECTION_ENV_VAR, "postgresql://localhost/pubs");
    let cli = Cli::default();
    assert_eq!(cli.resolve_connection_string().as_deref(), Some("postgresql://localhost/pubs"));
    clear_env();
}

#[test]
#[serial]
fn empty_env_value_is_ignored() {
    clear_env();
    std::env::set_var("GOOGLE_API_KEY", "");
    let cli = Cli::default();
    assert_eq!(cli.resolve_api_key(), None);
    clear_env();
}
