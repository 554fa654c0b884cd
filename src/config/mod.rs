use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.digitalocean.com";
pub const TOKEN_ENV_VAR: &str = "DO_TOKEN";
pub const TOKEN_PROMPT: &str = "Enter your Digital Ocean token:";
pub const DEFAULT_DROPLET_ID: u64 = 288429968;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 600;

/// Everything the run needs besides the token, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub droplet_id: u64,
    pub poll_interval: Duration,
    pub wait_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            droplet_id: DEFAULT_DROPLET_ID,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
        }
    }
}
