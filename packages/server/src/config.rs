use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["http://localhost:5173".into()],
            max_age: 3600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/trailhead".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Bearer tokens expire after this many days.
    pub token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".into(),
            token_ttl_days: 7,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory submission uploads are stored in.
    pub dir: String,
    /// Maximum accepted upload size in bytes.
    pub max_size: u64,
    /// Lowercase extensions accepted for submission uploads.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "uploads/submissions".into(),
            max_size: 16 * 1024 * 1024,
            allowed_extensions: [
                "py", "txt", "pdf", "doc", "docx", "zip", "rar", "7z", "jpg", "jpeg", "png",
                "gif",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProjectsConfig {
    /// Directory holding each project's runnable sources, keyed by the
    /// project's `project_path`.
    pub dir: String,
    /// Wall-clock limit for `index.py` runs, in seconds.
    pub run_timeout_secs: u64,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            dir: "projects".into(),
            run_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResourceConfig {
    /// Directory scanned for PDF reference books at startup.
    pub books_dir: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            books_dir: "uploads/books".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SeedConfig {
    /// Directory of declarative project fixtures (`*.toml`).
    pub fixtures_dir: String,
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: "fixtures".into(),
            admin_username: "admin".into(),
            admin_email: "admin@trailhead.local".into(),
            admin_password: "admin123".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub projects: ProjectsConfig,
    pub resources: ResourceConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., TRAILHEAD__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("TRAILHEAD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
