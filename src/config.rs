use serde::{Deserialize, Serialize};
use std::env;

use crate::utils::{DEFAULT_MAX_ATTEMPTS, normalize_name};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    /// 抽签最大尝试次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

/// 管理接口没有鉴权，仅在显式开启时挂载
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// 初始数据
/// version 未应用过时才会导入；已有数据不会被清空
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub version: i32,
    pub event: SeedEvent,
    #[serde(default)]
    pub participants: Vec<SeedParticipant>,
    #[serde(default)]
    pub exclusions: Vec<SeedExclusion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedEvent {
    pub name: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedParticipant {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub alternative_names: Vec<String>,
}

/// 按显示名描述的排除规则
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedExclusion {
    pub first: String,
    pub second: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let participant = |name: &str| SeedParticipant {
            name: name.to_string(),
            email: None,
            alternative_names: Vec::new(),
        };
        SeedConfig {
            version: 1,
            event: SeedEvent {
                name: "Secret Santa".to_string(),
                year: 2025,
            },
            participants: vec![
                participant("Anna"),
                participant("Marek"),
                participant("Kasia"),
                participant("Piotr"),
                participant("Zofia"),
            ],
            exclusions: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is required when config.toml is missing")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    draw: DrawConfig::default(),
                    admin: AdminConfig::default(),
                    seed: Some(SeedConfig::default()),
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config =
            toml::from_str(config_str).map_err(|e| format!("Failed to parse config file: {e}"))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("DRAW_MAX_ATTEMPTS")
            && let Ok(n) = v.parse()
        {
            self.draw.max_attempts = n;
        }
        if let Ok(v) = env::var("ADMIN_ENABLED")
            && let Ok(b) = v.parse()
        {
            self.admin.enabled = b;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.draw.max_attempts == 0 {
            return Err("draw.max_attempts must be at least 1".to_string());
        }
        if let Some(seed) = &self.seed {
            for ex in &seed.exclusions {
                let known = |n: &str| {
                    let n = normalize_name(n);
                    seed.participants.iter().any(|p| normalize_name(&p.name) == n)
                };
                if !known(&ex.first) || !known(&ex.second) {
                    log::warn!(
                        "Seed exclusion {} <-> {} references an unknown participant and will be ignored",
                        ex.first,
                        ex.second
                    );
                }
            }
        }
        Ok(())
    }
}
