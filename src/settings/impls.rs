// Standard library
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs};

// 3rd party crates
use config::{Config, ConfigError, Environment, File, Source};
use log::LevelFilter;
use tokio::sync::RwLock;
use tracing::{error, info};

// Current module imports
use super::constants::{
    default_base_url, default_log_level, default_rate_limit_per_hour,
    default_rate_limit_per_second, default_timeout, CONFIG_PATH_ENV, DEFAULT_CONFIG, ENV_PREFIX,
    ENV_SEPARATOR, TOKEN_ENV, USERNAME_ENV,
};
use super::errors::ValidationError;
use super::types::{ConfigManager, Log, ProviderSettings, Settings, ValidatedSettings};

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            username: String::new(),
            token: String::new(),
            rate_limit_per_second: default_rate_limit_per_second(),
            rate_limit_per_hour: default_rate_limit_per_hour(),
            timeout: default_timeout(),
            base_url: default_base_url(),
        }
    }
}

impl ProviderSettings {
    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingUsername);
        }

        if self.token.trim().is_empty() {
            return Err(ValidationError::MissingToken);
        }

        if self.rate_limit_per_second == 0 {
            return Err(ValidationError::InvalidRateLimit {
                field: "rate_limit_per_second",
                value: self.rate_limit_per_second,
            });
        }

        if self.rate_limit_per_hour == 0 {
            return Err(ValidationError::InvalidRateLimit {
                field: "rate_limit_per_hour",
                value: self.rate_limit_per_hour,
            });
        }

        if self.timeout == 0 {
            return Err(ValidationError::InvalidTimeout(self.timeout));
        }

        if self.base_url.trim().is_empty() {
            return Err(ValidationError::MissingBaseUrl);
        }

        Ok(())
    }
}

impl Settings {
    pub fn get_log_level(&self) -> String {
        self.log.level.to_lowercase()
    }

    /// Configured `(per_second, per_hour)` request limits.
    pub fn get_rate_limits(&self) -> (u32, u32) {
        (
            self.provider.rate_limit_per_second,
            self.provider.rate_limit_per_hour,
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.log.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(ValidationError::InvalidLogLevel(self.log.level.clone())),
        }

        self.provider.validate()
    }
}

impl ConfigManager {
    /// Creates a new `ConfigManager` instance by loading and validating the configuration.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config_path: PathBuf = Self::get_config_path()?;
        Self::ensure_config_file_exists(&config_path)?;

        let settings: Settings = Self::load_settings(&config_path)?;

        let validated_settings = ValidatedSettings::new(settings).map_err(|e| {
            error!("Configuration validation failed: {}", e);
            e
        })?;

        let manager = ConfigManager {
            settings: Arc::new(RwLock::new(validated_settings.into_inner())),
            config_path,
        };

        manager.adjust_logging_level().await;

        Ok(manager)
    }

    /// Determines the configuration file path.
    fn get_config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            Ok(PathBuf::from(path))
        } else if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("namedotcom").join("config.toml"))
        } else {
            let msg: &str = "Could not determine the configuration directory";
            error!("{}", msg);
            Err(ConfigError::Message(msg.into()))
        }
    }

    /// Ensures that the configuration file exists, creating it if necessary.
    fn ensure_config_file_exists(config_path: &Path) -> Result<(), ConfigError> {
        if !config_path.exists() {
            if let Some(parent_dir) = config_path.parent() {
                fs::create_dir_all(parent_dir).map_err(|e| {
                    let msg: String = format!("Failed to create configuration directory: {}", e);
                    error!("{}", msg);
                    ConfigError::Message(msg)
                })?;
            }
            fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                let msg: String = format!("Failed to create default configuration file: {}", e);
                error!("{}", msg);
                ConfigError::Message(msg)
            })?;
            info!("Default configuration file created at: {:?}", config_path);
        }
        Ok(())
    }

    /// Loads the settings from the configuration file and environment variables.
    fn load_settings(config_path: &Path) -> Result<Settings, ConfigError> {
        let config_file: &str = config_path.to_str().ok_or_else(|| {
            let msg: &str = "Configuration file path contains invalid UTF-8 characters";
            error!("{}", msg);
            ConfigError::Message(msg.into())
        })?;

        Self::load_from_source(File::with_name(config_file))
    }

    /// Layers environment overrides on top of `source` and deserializes the result.
    fn load_from_source<S>(source: S) -> Result<Settings, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let username: Option<String> = env::var(USERNAME_ENV).ok().filter(|v| !v.is_empty());
        let token: Option<String> = env::var(TOKEN_ENV).ok().filter(|v| !v.is_empty());

        let settings: Config = Config::builder()
            .add_source(source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .set_override_option("provider.username", username)?
            .set_override_option("provider.token", token)?
            .build()?;

        settings.try_deserialize()
    }

    /// Reloads the configuration from the file.
    pub async fn reload(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let new_settings: Settings = Self::load_settings(&self.config_path)?;

        let validated_settings = ValidatedSettings::new(new_settings).map_err(|e| {
            error!("Configuration validation failed during reload: {}", e);
            e
        })?;

        *self.settings.write().await = validated_settings.into_inner();
        self.adjust_logging_level().await;
        info!("Configuration reloaded from {:?}", self.config_path);
        Ok(())
    }

    /// Mirrors the configured level into the `log` facade used by the HTTP stack.
    async fn adjust_logging_level(&self) {
        let level: String = self.get_log_level().await;
        let level_filter: LevelFilter = match level.as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        };
        log::set_max_level(level_filter);
    }

    /// Provides a read-locked reference to the current settings.
    pub async fn get_settings(&self) -> tokio::sync::RwLockReadGuard<'_, Settings> {
        self.settings.read().await
    }

    pub async fn get_log_level(&self) -> String {
        self.settings.read().await.get_log_level()
    }
}

impl ValidatedSettings {
    pub fn new(settings: Settings) -> Result<Self, ValidationError> {
        settings.validate()?;
        Ok(ValidatedSettings(settings))
    }

    pub fn into_inner(self) -> Settings {
        self.0
    }
}

// Implement Deref to allow transparent access to Settings fields
impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard};

    use config::FileFormat;

    use super::*;

    /// Serializes tests that read or change the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 6] = [
        CONFIG_PATH_ENV,
        USERNAME_ENV,
        TOKEN_ENV,
        "NAMEDOTCOM__PROVIDER__USERNAME",
        "NAMEDOTCOM__PROVIDER__TOKEN",
        "NAMEDOTCOM__PROVIDER__RATE_LIMIT_PER_HOUR",
    ];

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    /// A fresh, empty directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!(
            "namedotcom-provider-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn load_str(toml: &str) -> Result<Settings, ConfigError> {
        let _env = lock_env();
        clear_env();
        ConfigManager::load_from_source(File::from_str(toml, FileFormat::Toml))
    }

    fn parse(toml: &str) -> Settings {
        load_str(toml).unwrap()
    }

    fn valid_settings() -> Settings {
        parse(
            r#"
            [provider]
            username = "testuser"
            token = "testtoken"
            "#,
        )
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let settings = valid_settings();
        assert_eq!(settings.get_log_level(), "info");
        assert_eq!(settings.get_rate_limits(), (20, 3000));
        assert_eq!(settings.provider.get_timeout(), Duration::from_secs(120));
        assert_eq!(settings.provider.base_url, "https://api.name.com");
        assert!(ValidatedSettings::new(settings).is_ok());
    }

    #[test]
    fn custom_limits_are_read() {
        let settings = parse(
            r#"
            [log]
            level = "DEBUG"

            [provider]
            username = "testuser"
            token = "testtoken"
            rate_limit_per_second = 10
            rate_limit_per_hour = 1000
            timeout = 60
            "#,
        );
        assert_eq!(settings.get_log_level(), "debug");
        assert_eq!(settings.get_rate_limits(), (10, 1000));
        assert_eq!(settings.provider.timeout, 60);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn default_config_file_parses() {
        let settings = parse(DEFAULT_CONFIG);
        assert_eq!(settings.get_rate_limits(), (20, 3000));
        assert_eq!(settings.provider.timeout, 120);
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let mut settings = valid_settings();
        settings.provider.username = " ".into();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::MissingUsername)
        ));

        let mut settings = valid_settings();
        settings.provider.token.clear();
        assert!(matches!(settings.validate(), Err(ValidationError::MissingToken)));
    }

    #[test]
    fn zero_rate_limits_are_rejected() {
        let mut settings = valid_settings();
        settings.provider.rate_limit_per_second = 0;
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidRateLimit {
                field: "rate_limit_per_second",
                ..
            })
        ));

        let mut settings = valid_settings();
        settings.provider.rate_limit_per_hour = 0;
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidRateLimit {
                field: "rate_limit_per_hour",
                ..
            })
        ));
    }

    #[test]
    fn negative_rate_limit_fails_to_load() {
        let result = load_str("[provider]\nrate_limit_per_second = -1\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_log_level_and_timeout_are_rejected() {
        let mut settings = valid_settings();
        settings.log.level = "verbose".into();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidLogLevel(_))
        ));

        let mut settings = valid_settings();
        settings.provider.timeout = 0;
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidTimeout(0))
        ));
    }

    #[test]
    fn environment_layers_over_the_config_file() {
        let _env = lock_env();
        clear_env();

        let dir = scratch_dir("env-layers");
        let path = dir.join("config.toml");
        fs::write(
            &path,
            "[provider]\nusername = \"fileuser\"\ntoken = \"filetoken\"\nrate_limit_per_hour = 100\n",
        )
        .unwrap();

        env::set_var("NAMEDOTCOM__PROVIDER__USERNAME", "prefixeduser");
        env::set_var("NAMEDOTCOM__PROVIDER__RATE_LIMIT_PER_HOUR", "42");
        let settings = ConfigManager::load_settings(&path).unwrap();
        assert_eq!(settings.provider.username, "prefixeduser");
        assert_eq!(settings.provider.token, "filetoken");
        assert_eq!(settings.get_rate_limits(), (20, 42));

        // The provider's own credential variables win over everything, empty ones are ignored.
        env::set_var(USERNAME_ENV, "envuser");
        env::set_var(TOKEN_ENV, "");
        let settings = ConfigManager::load_settings(&path).unwrap();
        assert_eq!(settings.provider.username, "envuser");
        assert_eq!(settings.provider.token, "filetoken");
        assert_eq!(settings.get_rate_limits(), (20, 42));

        clear_env();
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn config_path_comes_from_the_environment() {
        let _env = lock_env();
        clear_env();

        let path = env::temp_dir().join("namedotcom-elsewhere").join("custom.toml");
        env::set_var(CONFIG_PATH_ENV, &path);
        assert_eq!(ConfigManager::get_config_path().unwrap(), path);

        env::remove_var(CONFIG_PATH_ENV);
        if let Some(config_dir) = dirs::config_dir() {
            assert_eq!(
                ConfigManager::get_config_path().unwrap(),
                config_dir.join("namedotcom").join("config.toml")
            );
        }
    }

    #[test]
    fn default_config_file_is_written_once() {
        let _env = lock_env();
        clear_env();

        let dir = scratch_dir("default-file");
        let path = dir.join("nested").join("config.toml");

        ConfigManager::ensure_config_file_exists(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        let settings = ConfigManager::load_settings(&path).unwrap();
        assert_eq!(settings.get_rate_limits(), (20, 3000));
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::MissingUsername)
        ));

        // An existing file is left alone.
        fs::write(&path, "[log]\nlevel = \"warn\"\n").unwrap();
        ConfigManager::ensure_config_file_exists(&path).unwrap();
        assert_eq!(
            ConfigManager::load_settings(&path).unwrap().get_log_level(),
            "warn"
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn reload_applies_valid_files_and_keeps_settings_on_invalid_ones() {
        let _env = lock_env();
        clear_env();

        let dir = scratch_dir("reload");
        let path = dir.join("config.toml");
        let write_limits = |per_second: u32| {
            fs::write(
                &path,
                format!(
                    "[provider]\nusername = \"testuser\"\ntoken = \"testtoken\"\nrate_limit_per_second = {}\n",
                    per_second
                ),
            )
            .unwrap();
        };

        write_limits(20);
        let manager = ConfigManager {
            settings: Arc::new(RwLock::new(ConfigManager::load_settings(&path).unwrap())),
            config_path: path.clone(),
        };

        write_limits(10);
        manager.reload().await.unwrap();
        assert_eq!(manager.get_settings().await.get_rate_limits(), (10, 3000));

        write_limits(0);
        assert!(manager.reload().await.is_err());
        assert_eq!(manager.get_settings().await.get_rate_limits(), (10, 3000));

        let _ = fs::remove_dir_all(&dir);
    }
}
