// Process configuration, loaded once at startup and injected through
// AppState. Secrets come from the environment or a config file, never from
// module-level mutable state.

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_address: String,
    /// Path of the JSON snapshot file backing the store.
    pub data_file: String,
    /// HS256 signing secret for admin tokens. Required.
    pub jwt_secret: String,
    pub admin_username: String,
    /// Argon2 PHC-format hash of the shared admin password. Required.
    pub admin_password_hash: String,
    // Defaults used to seed the site configuration document on first read.
    pub business_address: String,
    pub business_phone: String,
    pub business_whatsapp: String,
    pub business_email: String,
    /// Extra allowed CORS origin (e.g. the deployed storefront URL).
    pub frontend_origin: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            // Add default values
            .set_default("server_address", "127.0.0.1:5000")?
            .set_default("data_file", "carstock.json")?
            .set_default("admin_username", "admin")?
            .set_default("business_address", "123, Auto Market Road, Nagpur")?
            .set_default("business_phone", "+919876543210")?
            .set_default("business_whatsapp", "919876543210")?
            .set_default("business_email", "info@carstock.example")?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_JWT_SECRET)
            .add_source(Environment::with_prefix("APP"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}
