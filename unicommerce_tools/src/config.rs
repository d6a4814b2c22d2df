use log::*;
use karban_common::Secret;

pub const DEFAULT_CLIENT_ID: &str = "my-trusted-client";

#[derive(Debug, Clone, Default)]
pub struct UnicommerceConfig {
    /// The tenant name, i.e. the subdomain in `https://<tenant>.unicommerce.com`
    pub tenant: String,
    pub username: String,
    pub password: Secret<String>,
    pub client_id: String,
}

impl UnicommerceConfig {
    pub fn new_from_env_or_default() -> Self {
        let tenant = std::env::var("KSS_UNICOMMERCE_TENANT").unwrap_or_else(|_| {
            warn!("KSS_UNICOMMERCE_TENANT not set, using (probably useless) default");
            "demostaging".to_string()
        });
        let username = std::env::var("KSS_UNICOMMERCE_USERNAME").unwrap_or_else(|_| {
            warn!("KSS_UNICOMMERCE_USERNAME not set, using (probably useless) default");
            "admin".to_string()
        });
        let password = Secret::new(std::env::var("KSS_UNICOMMERCE_PASSWORD").unwrap_or_else(|_| {
            warn!("KSS_UNICOMMERCE_PASSWORD not set, using (probably useless) default");
            String::default()
        }));
        let client_id = std::env::var("KSS_UNICOMMERCE_CLIENT_ID").unwrap_or_else(|_| {
            debug!("KSS_UNICOMMERCE_CLIENT_ID not set, using {DEFAULT_CLIENT_ID}");
            DEFAULT_CLIENT_ID.to_string()
        });
        Self { tenant, username, password, client_id }
    }

    pub fn base_url(&self) -> String {
        format!("https://{}.unicommerce.com", self.tenant)
    }
}
