use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Prefixed to every stored relative image path in API responses.
    pub public_base_url: String,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:8080".to_string(),
            upload_dir: "uploads".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    pub feature_expiry_interval_secs: u64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            feature_expiry_interval_secs: 600,
        }
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("{config_path} not found, building configuration from environment");
                Self::from_env_only()?
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        toml::from_str(config_str).map_err(|e| format!("Failed to parse config file: {e}").into())
    }

    fn from_env_only() -> Result<Self, Box<dyn std::error::Error>> {
        // DATABASE_URL is mandatory without a config file
        let database_url = get_env("DATABASE_URL")
            .ok_or("DATABASE_URL is not set and no config.toml was found")?;

        let media_defaults = MediaConfig::default();
        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
                cors_allowed_origins: get_env("CORS_ALLOWED_ORIGINS")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET")
                    .unwrap_or_else(|| "change-me-in-production".to_string()),
                access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                refresh_token_expires_in: get_env_parse("JWT_REFRESH_EXPIRES_IN", 2_592_000i64),
            },
            media: MediaConfig {
                public_base_url: get_env("MEDIA_PUBLIC_BASE_URL")
                    .unwrap_or(media_defaults.public_base_url),
                upload_dir: get_env("MEDIA_UPLOAD_DIR").unwrap_or(media_defaults.upload_dir),
                max_upload_bytes: get_env_parse(
                    "MEDIA_MAX_UPLOAD_BYTES",
                    media_defaults.max_upload_bytes,
                ),
            },
            tasks: TasksConfig {
                feature_expiry_interval_secs: get_env_parse(
                    "FEATURE_EXPIRY_INTERVAL_SECS",
                    TasksConfig::default().feature_expiry_interval_secs,
                ),
            },
        })
    }

    /// Environment variables win over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("CORS_ALLOWED_ORIGINS") {
            self.server.cors_allowed_origins = split_list(&v);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("MEDIA_PUBLIC_BASE_URL") {
            self.media.public_base_url = v;
        }
        if let Ok(v) = env::var("MEDIA_UPLOAD_DIR") {
            self.media.upload_dir = v;
        }
        if let Ok(v) = env::var("MEDIA_MAX_UPLOAD_BYTES")
            && let Ok(n) = v.parse()
        {
            self.media.max_upload_bytes = n;
        }
        if let Ok(v) = env::var("FEATURE_EXPIRY_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.tasks.feature_expiry_interval_secs = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
url = "postgres://localhost/stagehand"
max_connections = 5

[jwt]
secret = "s3cret"
access_token_expires_in = 60
refresh_token_expires_in = 120
"#;

    #[test]
    fn test_parse_uses_section_defaults() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.media.upload_dir, "uploads");
        assert_eq!(config.media.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.tasks.feature_expiry_interval_secs, 600);
    }

    #[test]
    fn test_parse_media_section() {
        let with_media = format!(
            "{SAMPLE}\n[media]\npublic_base_url = \"https://cdn.example.com\"\nupload_dir = \"/srv/media\"\nmax_upload_bytes = 1024\n"
        );
        let config = Config::parse(&with_media).unwrap();
        assert_eq!(config.media.public_base_url, "https://cdn.example.com");
        assert_eq!(config.media.upload_dir, "/srv/media");
        assert_eq!(config.media.max_upload_bytes, 1024);
    }

    #[test]
    fn test_cors_origins_default_to_empty() {
        let config = Config::parse(SAMPLE).unwrap();
        assert!(config.server.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" http://a.test, ,http://b.test "),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_sections() {
        assert!(Config::parse("[server]\nhost = \"x\"\nport = 1\n").is_err());
    }
}
