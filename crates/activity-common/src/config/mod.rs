//! Configuration structs

mod app_config;

pub use app_config::{
    AdminSeedConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    DisplayConfig, Environment, IdConfig, JwtConfig, RateLimitConfig, ServerConfig,
};
