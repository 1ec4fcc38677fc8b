//! Environment-driven configuration for the admin binary.

/// Admin client configuration loaded from environment variables.
///
/// All fields have defaults suitable for the hosted demo backend.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the REST backend.
    pub api_url: String,
    /// Path of the durable session file.
    pub session_file: String,
    /// HTTP request timeout in seconds.
    pub http_timeout_secs: u64,
    /// Email to sign in with when no session exists.
    pub login_email: String,
}

/// Default REST backend.
const DEFAULT_API_URL: &str = "https://api.fake-rest.refine.dev";
/// Default durable session key location.
const DEFAULT_SESSION_FILE: &str = ".pressroom/session.json";
/// Default request timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Default demo login.
const DEFAULT_LOGIN_EMAIL: &str = "apip@mail.com";

impl AdminConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default                            |
    /// |---------------------|------------------------------------|
    /// | `API_URL`           | `https://api.fake-rest.refine.dev` |
    /// | `SESSION_FILE`      | `.pressroom/session.json`          |
    /// | `HTTP_TIMEOUT_SECS` | `30`                               |
    /// | `LOGIN_EMAIL`       | `apip@mail.com`                    |
    ///
    /// # Panics
    ///
    /// Panics if `HTTP_TIMEOUT_SECS` is set but not a valid u64.
    pub fn from_env() -> Self {
        let api_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let session_file =
            std::env::var("SESSION_FILE").unwrap_or_else(|_| DEFAULT_SESSION_FILE.into());

        let http_timeout_secs: u64 = std::env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse()
            .expect("HTTP_TIMEOUT_SECS must be a valid u64");

        let login_email =
            std::env::var("LOGIN_EMAIL").unwrap_or_else(|_| DEFAULT_LOGIN_EMAIL.into());

        Self {
            api_url,
            session_file,
            http_timeout_secs,
            login_email,
        }
    }
}
