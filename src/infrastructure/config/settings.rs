use serde::Deserialize;

use crate::domain::gateway::GatewayConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub server_host:             String,
	pub server_port:             u16,
	pub server_keepalive:        u64,
	/// Public base URL of the booking site, used to build vendor return URLs.
	pub site_url:                String,
	pub paypal_client_id:        Option<String>,
	pub paypal_client_secret:    Option<String>,
	pub paypal_environment:      Option<String>,
	pub paypal_api_url:          Option<String>,
	pub pesapal_consumer_key:    Option<String>,
	pub pesapal_consumer_secret: Option<String>,
	pub pesapal_environment:     Option<String>,
	pub pesapal_ipn_id:          Option<String>,
	pub pesapal_api_url:         Option<String>,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.set_default("server_host", "0.0.0.0")?
			.set_default("server_port", 3000)?
			.set_default("server_keepalive", 75)?
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn paypal_config(&self) -> GatewayConfig {
		GatewayConfig {
			key:          self.paypal_client_id.clone().unwrap_or_default(),
			secret:       self.paypal_client_secret.clone().unwrap_or_default(),
			environment:  self.paypal_environment.clone().unwrap_or_default(),
			api_base_url: self.paypal_api_url.clone(),
		}
	}

	pub fn pesapal_config(&self) -> GatewayConfig {
		GatewayConfig {
			key:          self.pesapal_consumer_key.clone().unwrap_or_default(),
			secret:       self.pesapal_consumer_secret.clone().unwrap_or_default(),
			environment:  self.pesapal_environment.clone().unwrap_or_default(),
			api_base_url: self.pesapal_api_url.clone(),
		}
	}
}
