use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, error, web};
use derive_more::derive::{Display, Error};
use log::{error, warn};
use serde::Serialize;
use serde_json::Value;

use crate::domain::gateway_error::GatewayError;

#[derive(Serialize)]
struct ErrorResponse<'a> {
	error:   String,
	#[serde(skip_serializing_if = "Option::is_none")]
	details: Option<&'a Value>,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("Missing required fields")]
	MissingFields,
	#[display("{message}")]
	BadRequest { message: String },
	#[display("{_0}")]
	Gateway(GatewayError),
}

impl ApiError {
	pub fn bad_request(message: impl Into<String>) -> Self {
		ApiError::BadRequest {
			message: message.into(),
		}
	}
}

impl From<GatewayError> for ApiError {
	fn from(err: GatewayError) -> Self {
		ApiError::Gateway(err)
	}
}

impl error::ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		let status = self.status_code();
		if status.is_server_error() {
			error!("Request failed with {status}: {self}");
		} else {
			warn!("Request rejected with {status}: {self}");
		}

		let details = match self {
			ApiError::Gateway(err) => err.details(),
			_ => None,
		};

		HttpResponse::build(status)
			.content_type(ContentType::json())
			.json(ErrorResponse {
				error: self.to_string(),
				details,
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::MissingFields | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
			ApiError::Gateway(GatewayError::CaptureNotSupported { .. }) => {
				StatusCode::BAD_REQUEST
			}
			ApiError::Gateway(err) => err
				.status()
				.and_then(|status| StatusCode::from_u16(status).ok())
				.filter(|status| status.is_client_error() || status.is_server_error())
				.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
		}
	}
}

/// Renders body deserialization failures in the API error shape.
pub fn json_config() -> web::JsonConfig {
	web::JsonConfig::default().error_handler(|err, _req| {
		ApiError::bad_request(format!("Invalid request body: {err}")).into()
	})
}

pub fn query_config() -> web::QueryConfig {
	web::QueryConfig::default().error_handler(|err, _req| {
		ApiError::bad_request(format!("Invalid query string: {err}")).into()
	})
}
