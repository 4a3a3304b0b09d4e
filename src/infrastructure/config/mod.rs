//! Configuration management
//!
//! Everything is read once from the process environment at start-up.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use crate::application::errors::ConfigError;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_IP: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_type: BotType,
    pub credentials: Credentials,
    pub sheet: SheetCredentials,
    pub wit_tokens: WitTokens,
    pub redis_url: String,
    pub server: ServerConfig,
    pub admin: AdminPrincipal,
}

/// Messaging channel plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BotType {
    Trial,
    Business,
}

impl Default for BotType {
    fn default() -> Self {
        Self::Trial
    }
}

impl FromStr for BotType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRIAL" => Ok(Self::Trial),
            "BUSINESS" => Ok(Self::Business),
            other => Err(ConfigError::InvalidValue(format!("BOT_TYPE={}", other))),
        }
    }
}

impl fmt::Display for BotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotType::Trial => write!(f, "TRIAL"),
            BotType::Business => write!(f, "BUSINESS"),
        }
    }
}

/// Channel credentials, shape depends on the bot type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Credentials {
    Trial {
        channel_id: String,
        channel_secret: String,
        channel_mid: String,
    },
    Business {
        channel_secret: String,
        channel_token: String,
    },
}

impl Credentials {
    pub fn channel_secret(&self) -> &str {
        match self {
            Credentials::Trial { channel_secret, .. } => channel_secret,
            Credentials::Business { channel_secret, .. } => channel_secret,
        }
    }

    /// Copy with every secret value masked, for logging
    pub fn masked(&self) -> Self {
        match self {
            Credentials::Trial { channel_id, channel_secret, channel_mid } => Credentials::Trial {
                channel_id: channel_id.clone(),
                channel_secret: mask(channel_secret),
                channel_mid: channel_mid.clone(),
            },
            Credentials::Business { channel_secret, channel_token } => Credentials::Business {
                channel_secret: mask(channel_secret),
                channel_token: mask(channel_token),
            },
        }
    }
}

/// Spreadsheet backend location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetCredentials {
    pub path: PathBuf,
    pub name: String,
}

/// Locale code -> NLU service token
pub type WitTokens = BTreeMap<String, String>;

/// Principal allowed on the admin endpoints
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AdminPrincipal {
    pub id: String,
    pub password: String,
}

impl fmt::Debug for AdminPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminPrincipal")
            .field("id", &self.id)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    /// Verify webhook signatures
    pub production: bool,
    pub debug: bool,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: DEFAULT_IP.to_string(),
            port: DEFAULT_PORT,
            production: false,
            debug: false,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

impl Config {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let bot_type = match lookup("BOT_TYPE") {
            Some(value) if !value.is_empty() => value.parse()?,
            _ => BotType::default(),
        };

        let credentials = match bot_type {
            BotType::Trial => Credentials::Trial {
                channel_id: var("CHANNEL_ID"),
                channel_secret: var("CHANNEL_SECRET"),
                channel_mid: var("CHANNEL_MID"),
            },
            BotType::Business => Credentials::Business {
                channel_secret: var("CHANNEL_SECRET"),
                channel_token: var("CHANNEL_TOKEN"),
            },
        };

        let sheet = SheetCredentials {
            path: PathBuf::from(var("SHEET_CREDENTIAL_PATH")),
            name: var("SHEET_NAME"),
        };

        let mut wit_tokens = WitTokens::new();
        if let Some(token) = lookup("WIT_ZHTW_TOKEN") {
            wit_tokens.insert("zh_TW".to_string(), token);
        }
        if let Some(token) = lookup("WIT_ENUS_TOKEN") {
            wit_tokens.insert("en_US".to_string(), token);
        }

        let redis_url = lookup("REDIS").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());

        let mut server = ServerConfig::default();
        if let Some(ip) = lookup("IP").filter(|v| !v.is_empty()) {
            server.ip = ip;
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT={}", port)))?;
        }
        server.production = is_flag_set(lookup("PRODUCTION"));
        server.debug = is_flag_set(lookup("DEBUG"));
        if let Some(dir) = lookup("STATIC_DIR").filter(|v| !v.is_empty()) {
            server.static_dir = PathBuf::from(dir);
        }

        let admin = AdminPrincipal {
            id: lookup("ADMIN_ID").ok_or_else(|| ConfigError::MissingField("ADMIN_ID".to_string()))?,
            password: lookup("ADMIN_PWD").ok_or_else(|| ConfigError::MissingField("ADMIN_PWD".to_string()))?,
        };

        Ok(Self {
            bot_type,
            credentials,
            sheet,
            wit_tokens,
            redis_url,
            server,
            admin,
        })
    }

    /// Loggable view of the configuration, secrets masked
    pub fn summary(&self) -> serde_json::Value {
        let masked_tokens: WitTokens = self.wit_tokens
            .iter()
            .map(|(locale, token)| (locale.clone(), mask(token)))
            .collect();

        serde_json::json!({
            "bot_type": self.bot_type,
            "credentials": self.credentials.masked(),
            "sheet": self.sheet,
            "wit_tokens": masked_tokens,
            "redis_url": self.redis_url,
            "server": self.server,
            "admin_id": self.admin.id,
        })
    }
}

fn is_flag_set(value: Option<String>) -> bool {
    value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Keep the first four characters of a secret
pub fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let head: String = secret.chars().take(4).collect();
    format!("{}***", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    const ADMIN: [(&str, &str); 2] = [("ADMIN_ID", "admin"), ("ADMIN_PWD", "secret")];

    #[test]
    fn test_business_credentials_shape() {
        let mut vars = ADMIN.to_vec();
        vars.extend([
            ("BOT_TYPE", "BUSINESS"),
            ("CHANNEL_ID", "123"),
            ("CHANNEL_SECRET", "s3cret"),
            ("CHANNEL_TOKEN", "tok"),
        ]);
        let config = load(&vars).unwrap();
        assert_eq!(config.bot_type, BotType::Business);

        let json = serde_json::to_value(&config.credentials).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["channel_secret", "channel_token"]);
    }

    #[test]
    fn test_trial_credentials_shape() {
        let mut vars = ADMIN.to_vec();
        vars.extend([
            ("BOT_TYPE", "TRIAL"),
            ("CHANNEL_ID", "123"),
            ("CHANNEL_SECRET", "s3cret"),
            ("CHANNEL_MID", "u-bot"),
            ("CHANNEL_TOKEN", "ignored"),
        ]);
        let config = load(&vars).unwrap();

        let json = serde_json::to_value(&config.credentials).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["channel_id", "channel_mid", "channel_secret"]);
        assert_eq!(json["channel_mid"], "u-bot");
    }

    #[test]
    fn test_bot_type_defaults_to_trial() {
        let config = load(&ADMIN).unwrap();
        assert_eq!(config.bot_type, BotType::Trial);
    }

    #[test]
    fn test_unknown_bot_type_rejected() {
        let mut vars = ADMIN.to_vec();
        vars.push(("BOT_TYPE", "ENTERPRISE"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_missing_admin_fails() {
        assert!(matches!(load(&[("ADMIN_ID", "admin")]), Err(ConfigError::MissingField(f)) if f == "ADMIN_PWD"));
        assert!(matches!(load(&[]), Err(ConfigError::MissingField(f)) if f == "ADMIN_ID"));
    }

    #[test]
    fn test_wit_tokens_only_for_set_variables() {
        let mut vars = ADMIN.to_vec();
        vars.push(("WIT_ZHTW_TOKEN", "zh-token"));
        let config = load(&vars).unwrap();
        assert_eq!(config.wit_tokens.len(), 1);
        assert_eq!(config.wit_tokens.get("zh_TW").map(String::as_str), Some("zh-token"));

        vars.push(("WIT_ENUS_TOKEN", "en-token"));
        let config = load(&vars).unwrap();
        assert_eq!(config.wit_tokens.get("en_US").map(String::as_str), Some("en-token"));
    }

    #[test]
    fn test_server_defaults_and_flags() {
        let config = load(&ADMIN).unwrap();
        assert_eq!(config.redis_url, DEFAULT_REDIS_URL);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:5000");
        assert!(!config.server.production);
        assert!(!config.server.debug);

        let mut vars = ADMIN.to_vec();
        vars.extend([("IP", "0.0.0.0"), ("PORT", "8080"), ("PRODUCTION", "1"), ("DEBUG", "1")]);
        let config = load(&vars).unwrap();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert!(config.server.production);
        assert!(config.server.debug);
    }

    #[test]
    fn test_flags_accept_true_spelling() {
        let mut vars = ADMIN.to_vec();
        vars.extend([("PRODUCTION", "true"), ("DEBUG", "True")]);
        let config = load(&vars).unwrap();
        assert!(config.server.production);
        assert!(config.server.debug);

        let mut vars = ADMIN.to_vec();
        vars.extend([("PRODUCTION", "0"), ("DEBUG", "yes")]);
        let config = load(&vars).unwrap();
        assert!(!config.server.production);
        assert!(!config.server.debug);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut vars = ADMIN.to_vec();
        vars.push(("PORT", "http"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_summary_masks_secrets() {
        let mut vars = ADMIN.to_vec();
        vars.extend([("BOT_TYPE", "BUSINESS"), ("CHANNEL_SECRET", "abcdefgh"), ("CHANNEL_TOKEN", "tokentoken")]);
        let summary = load(&vars).unwrap().summary().to_string();
        assert!(summary.contains("abcd***"));
        assert!(!summary.contains("abcdefgh"));
        assert!(!summary.contains("\"secret\""));
    }
}
