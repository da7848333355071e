use std::str::FromStr;

use async_trait::async_trait;
use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

use crate::domain::gateway_error::GatewayError;
use crate::domain::order::{CreatedOrder, OrderRequest};
use crate::domain::payment_status::{CaptureResult, PaymentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
	#[display("PayPal")]
	PayPal,
	#[display("Pesapal")]
	Pesapal,
}

impl Provider {
	/// Human readable names of the credential pair, used in configuration
	/// errors.
	fn credential_names(&self) -> (&'static str, &'static str) {
		match self {
			Provider::PayPal => ("client ID", "client secret"),
			Provider::Pesapal => ("consumer key", "consumer secret"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
	Sandbox,
	Live,
}

impl FromStr for Environment {
	type Err = GatewayError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"sandbox" => Ok(Environment::Sandbox),
			"live" => Ok(Environment::Live),
			_ => Err(GatewayError::configuration(
				"Environment must be either \"sandbox\" or \"live\"",
			)),
		}
	}
}

/// Raw gateway settings as they come out of configuration.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
	pub key:          String,
	pub secret:       String,
	pub environment:  String,
	/// Overrides the vendor host derived from the environment.
	pub api_base_url: Option<String>,
}

impl GatewayConfig {
	/// Checks the credentials and parses the environment. Never touches the
	/// network.
	pub fn validate(&self, provider: Provider) -> Result<Environment, GatewayError> {
		let (key_name, secret_name) = provider.credential_names();

		if self.key.trim().is_empty() {
			return Err(GatewayError::configuration(format!(
				"{provider} {key_name} is required and cannot be empty"
			)));
		}
		if self.secret.trim().is_empty() {
			return Err(GatewayError::configuration(format!(
				"{provider} {secret_name} is required and cannot be empty"
			)));
		}
		if self.environment.trim().is_empty() {
			return Err(GatewayError::configuration(format!(
				"{provider} environment is required and cannot be empty"
			)));
		}

		self.environment.parse()
	}

	pub(crate) fn resolve_base_url(&self, default: &str) -> String {
		self.api_base_url
			.as_deref()
			.filter(|url| !url.trim().is_empty())
			.unwrap_or(default)
			.trim_end_matches('/')
			.to_string()
	}
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
	fn provider(&self) -> Provider;

	async fn create_order(
		&self,
		order: &OrderRequest,
	) -> Result<CreatedOrder, GatewayError>;

	async fn get_status(
		&self,
		tracking_id: &str,
	) -> Result<PaymentStatus, GatewayError>;

	/// Finalizes an approved order. Only providers that split approval from
	/// capture implement this.
	async fn capture_order(
		&self,
		_order_id: &str,
	) -> Result<CaptureResult, GatewayError> {
		Err(GatewayError::CaptureNotSupported {
			provider: self.provider(),
		})
	}
}
