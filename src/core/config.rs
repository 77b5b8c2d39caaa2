mod parsing;
mod settings;
mod types;

pub(crate) use types::{ConfigError, Environment, Settings};

#[cfg(test)]
mod tests {
    use super::parsing::*;
    use super::*;
    use crate::test_support;

    #[test]
    fn parse_cors_origins_json() {
        let raw = "[\"http://a\",\"http://b\"]".to_string();
        let parsed = parse_cors_origins(Some(raw)).expect("cors json");
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn parse_cors_origins_csv() {
        let raw = "http://a, http://b".to_string();
        let parsed = parse_cors_origins(Some(raw)).expect("cors csv");
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn parse_cors_origins_defaults_on_empty() {
        let parsed = parse_cors_origins(Some(" ".to_string())).expect("cors empty");
        assert_eq!(parsed, default_cors_origins());
    }

    #[test]
    fn parse_cors_origins_rejects_bad_json() {
        let err = parse_cors_origins(Some("[\"http://a\"".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCors(_)));
    }

    #[test]
    fn parse_bool_variants() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment(Some("prod".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("production".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("staging".to_string())), Environment::Staging);
        assert_eq!(parse_environment(Some("testing".to_string())), Environment::Test);
        assert_eq!(parse_environment(None), Environment::Development);
    }

    #[test]
    fn parse_string_list_lowercases_and_skips_blanks() {
        let parsed = parse_string_list(Some("JPG, ,png".to_string()), &["gif"]);
        assert_eq!(parsed, vec!["jpg".to_string(), "png".to_string()]);
        assert_eq!(parse_string_list(None, &["gif"]), vec!["gif".to_string()]);
    }

    #[tokio::test]
    async fn load_uses_defaults() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::remove_var("GEMINI_MODEL");
        std::env::remove_var("ALLOWED_IMAGE_EXTENSIONS");

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.server_addr(), "0.0.0.0:8000");
        assert_eq!(settings.api().api_v1_str, "/api/v1");
        assert_eq!(settings.ai().model, "gemini-1.5-flash");
        assert_eq!(settings.ai().base_url, "https://generativelanguage.googleapis.com/v1beta");
        assert_eq!(
            settings.uploads().allowed_image_extensions,
            vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
        );
        assert_eq!(settings.runtime().environment, Environment::Test);
    }

    #[tokio::test]
    async fn load_rejects_unsupported_extension() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("ALLOWED_IMAGE_EXTENSIONS", "png,exe");

        let err = Settings::load().unwrap_err();
        std::env::remove_var("ALLOWED_IMAGE_EXTENSIONS");

        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "ALLOWED_IMAGE_EXTENSIONS", ref value } if value == "exe"
        ));
    }

    #[tokio::test]
    async fn load_rejects_zero_port() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("GRADER_PORT", "0");

        let err = Settings::load().unwrap_err();
        std::env::remove_var("GRADER_PORT");

        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[tokio::test]
    async fn load_rejects_zero_pool_size() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();
        std::env::set_var("DATABASE_MAX_CONNECTIONS", "0");

        let err = Settings::load().unwrap_err();
        std::env::remove_var("DATABASE_MAX_CONNECTIONS");

        assert!(matches!(err, ConfigError::InvalidValue { field: "DATABASE_MAX_CONNECTIONS", .. }));
    }
}
