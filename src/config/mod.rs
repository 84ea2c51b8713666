pub mod app_config;
pub mod aws;
pub mod database;

pub use app_config::{
    aws_region_from_env, aws_region_from_lookup, AppConfig, ConfigError, ServerConfig,
};
pub use aws::load_sdk_config;
pub use database::{establish_connection, ConnectionParameters};
