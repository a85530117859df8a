use std::env;
use std::time::Duration;

use crate::features::lifecycle::{IssueType, SlaPolicy};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub upstream: UpstreamConfig,
    pub session: SessionConfig,
    pub sla: SlaConfig,
    pub map: MapConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Connection settings for the external report-service API
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL without trailing slash, e.g. "http://localhost:8000/api"
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a token validated against `/auth/me` is trusted before re-validation
    pub cache_ttl: Duration,
}

/// Display-only SLA windows per issue type
#[derive(Debug, Clone)]
pub struct SlaConfig {
    pub policy: SlaPolicy,
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub duplicate_radius_meters: f64,
    pub radius_options: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            upstream: UpstreamConfig::from_env()?,
            session: SessionConfig::from_env()?,
            sla: SlaConfig::from_env()?,
            map: MapConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl UpstreamConfig {
    const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("CIVIC_API_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(format!(
                "CIVIC_API_BASE_URL must start with http:// or https://, got {}",
                base_url
            ));
        }

        let request_timeout_secs = env::var("CIVIC_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CIVIC_API_TIMEOUT_SECS must be a valid number".to_string())?;

        let connect_timeout_secs = env::var("CIVIC_API_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CONNECT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CIVIC_API_CONNECT_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

impl SessionConfig {
    const DEFAULT_CACHE_TTL_SECS: u64 = 300; // 5 minutes

    pub fn from_env() -> Result<Self, String> {
        let cache_ttl_secs = env::var("SESSION_CACHE_TTL")
            .unwrap_or_else(|_| Self::DEFAULT_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_CACHE_TTL must be a valid number".to_string())?;

        Ok(Self {
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

impl SlaConfig {
    pub fn from_env() -> Result<Self, String> {
        let mut policy = SlaPolicy::default();

        for issue_type in IssueType::ALL {
            let key = format!("SLA_HOURS_{}", issue_type.as_str().to_uppercase());
            if let Ok(raw) = env::var(&key) {
                let hours = raw
                    .parse::<u32>()
                    .map_err(|_| format!("{} must be a valid number of hours", key))?;
                if hours == 0 {
                    return Err(format!("{} must be greater than zero", key));
                }
                policy.set_window_hours(issue_type, hours);
            }
        }

        Ok(Self { policy })
    }
}

impl MapConfig {
    const DEFAULT_DUPLICATE_RADIUS_METERS: f64 = 50.0;
    const DEFAULT_RADIUS_OPTIONS: [u32; 4] = [2000, 1000, 500, 200];

    pub fn from_env() -> Result<Self, String> {
        let duplicate_radius_meters = env::var("DUPLICATE_RADIUS_METERS")
            .unwrap_or_else(|_| Self::DEFAULT_DUPLICATE_RADIUS_METERS.to_string())
            .parse::<f64>()
            .map_err(|_| "DUPLICATE_RADIUS_METERS must be a valid number".to_string())?;

        if !duplicate_radius_meters.is_finite() || duplicate_radius_meters <= 0.0 {
            return Err("DUPLICATE_RADIUS_METERS must be positive".to_string());
        }

        let radius_options = match env::var("MAP_RADIUS_OPTIONS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u32>()
                        .map_err(|_| format!("Invalid MAP_RADIUS_OPTIONS entry: {}", s))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Err(_) => Self::DEFAULT_RADIUS_OPTIONS.to_vec(),
        };

        Ok(Self {
            duplicate_radius_meters,
            radius_options,
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            duplicate_radius_meters: Self::DEFAULT_DUPLICATE_RADIUS_METERS,
            radius_options: Self::DEFAULT_RADIUS_OPTIONS.to_vec(),
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "LetsFix Portal API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Display API for the LetsFix civic issue tracker".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
