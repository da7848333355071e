use derive_more::derive::{Display, Error};
use serde_json::Value;

use crate::domain::gateway::Provider;

/// Failure of a payment gateway operation.
///
/// Vendor-originated variants keep the HTTP status and the raw vendor
/// payload so they can be surfaced to the caller for diagnostics.
#[derive(Debug, Clone, Display, Error)]
pub enum GatewayError {
	#[display("{message}")]
	Configuration { message: String },
	#[display("{message}")]
	Authentication {
		message: String,
		status:  Option<u16>,
		details: Option<Value>,
	},
	#[display("{message}")]
	InvalidResponse {
		message: String,
		details: Option<Value>,
	},
	#[display("{message}")]
	Transport {
		message: String,
		status:  Option<u16>,
		details: Option<Value>,
	},
	#[display("{provider} does not support capturing orders")]
	CaptureNotSupported { provider: Provider },
}

impl GatewayError {
	pub fn configuration(message: impl Into<String>) -> Self {
		GatewayError::Configuration {
			message: message.into(),
		}
	}

	pub fn invalid_response(message: impl Into<String>, details: Value) -> Self {
		GatewayError::InvalidResponse {
			message: message.into(),
			details: Some(details),
		}
	}

	/// HTTP status reported by the vendor, if the failure came with one.
	pub fn status(&self) -> Option<u16> {
		match self {
			GatewayError::Authentication { status, .. } |
			GatewayError::Transport { status, .. } => *status,
			_ => None,
		}
	}

	pub fn details(&self) -> Option<&Value> {
		match self {
			GatewayError::Authentication { details, .. } |
			GatewayError::InvalidResponse { details, .. } |
			GatewayError::Transport { details, .. } => details.as_ref(),
			_ => None,
		}
	}
}

impl From<reqwest::Error> for GatewayError {
	fn from(err: reqwest::Error) -> Self {
		GatewayError::Transport {
			message: format!("Payment provider request failed: {err}"),
			status:  err.status().map(|s| s.as_u16()),
			details: None,
		}
	}
}
