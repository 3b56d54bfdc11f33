use super::*;

#[test]
fn flags_override_environment_settings() {
    let cli = Cli::try_parse_from(["storaige", "--base-url", "http://api.test/", "--timeout-secs", "3", "status"]).unwrap();

    let config = session_config(&cli).unwrap();

    assert_eq!(config.base_url, "http://api.test");
    assert_eq!(config.request_timeout, Duration::from_secs(3));
}

#[test]
fn zero_timeout_flag_is_rejected() {
    let cli = Cli::try_parse_from(["storaige", "--timeout-secs", "0", "status"]).unwrap();

    assert!(matches!(session_config(&cli), Err(CliError::Config(_))));
}

#[test]
fn signup_confirmation_defaults_to_password() {
    let cli = Cli::try_parse_from([
        "storaige", "signup", "--name", "Ada", "--email", "ada@example.com", "--password", "hunter22",
    ])
    .unwrap();

    let Command::Signup { confirm_password, .. } = cli.command else {
        panic!("expected signup");
    };
    assert_eq!(confirm_password, None);
}
