/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "NAMEDOTCOM_CONFIG_PATH";
/// Prefix for `NAMEDOTCOM__SECTION__KEY` style overrides.
pub const ENV_PREFIX: &str = "NAMEDOTCOM";
pub const ENV_SEPARATOR: &str = "__";

/// Credentials may also come from these, matching the Terraform provider.
pub const USERNAME_ENV: &str = "NAMEDOTCOM_USERNAME";
pub const TOKEN_ENV: &str = "NAMEDOTCOM_TOKEN";

/// Default settings
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_RATE_LIMIT_PER_SECOND: u32 = 20;
pub const DEFAULT_RATE_LIMIT_PER_HOUR: u32 = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_BASE_URL: &str = "https://api.name.com";

pub fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub fn default_rate_limit_per_second() -> u32 {
    DEFAULT_RATE_LIMIT_PER_SECOND
}

pub fn default_rate_limit_per_hour() -> u32 {
    DEFAULT_RATE_LIMIT_PER_HOUR
}

pub fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Example configuration
pub const DEFAULT_CONFIG: &str = r#"
# Logging configuration
[log]
# Level can be "error", "warn", "info", "debug", or "trace"
level = "info"

# Name.com API configuration
[provider]
# API username; can also be set with NAMEDOTCOM_USERNAME
username = ""
# API token; can also be set with NAMEDOTCOM_TOKEN
token = ""

# Maximum number of API requests per second
rate_limit_per_second = 20
# Maximum number of API requests per hour
rate_limit_per_hour = 3000

# Timeout in seconds for API requests
timeout = 120

# API endpoint, change to https://api.dev.name.com for the sandbox
base_url = "https://api.name.com"
"#;
