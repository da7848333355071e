use log::{debug, error};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::gateway_error::GatewayError;

/// Reads a vendor response body as JSON.
///
/// Bodies that are not JSON are kept as a JSON string so they can still be
/// reported back as error details.
pub(crate) async fn read_payload(
	response: Response,
	operation: &str,
) -> Result<(u16, Value), GatewayError> {
	let status = response.status().as_u16();
	let body = response.text().await?;

	let payload = if body.trim().is_empty() {
		Value::Null
	} else {
		serde_json::from_str(&body).unwrap_or(Value::String(body))
	};
	debug!("{operation} response ({status}): {payload}");

	Ok((status, payload))
}

/// Fails with a transport error for any non-2xx status.
pub(crate) fn ensure_success(
	status: u16,
	payload: Value,
	message: &str,
) -> Result<Value, GatewayError> {
	if (200..300).contains(&status) {
		return Ok(payload);
	}

	error!("{message}: vendor returned {status}");
	Err(GatewayError::Transport {
		message: message.to_string(),
		status:  Some(status),
		details: Some(payload),
	})
}

pub(crate) fn decode<T: DeserializeOwned>(
	payload: Value,
	message: &str,
) -> Result<T, GatewayError> {
	serde_json::from_value(payload.clone())
		.map_err(|e| GatewayError::invalid_response(format!("{message}: {e}"), payload))
}

/// Joins path segments onto a vendor base URL, escaping each segment.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, GatewayError> {
	let mut url = Url::parse(base_url).map_err(|e| {
		GatewayError::configuration(format!("Invalid API base URL '{base_url}': {e}"))
	})?;
	url.path_segments_mut()
		.map_err(|_| {
			GatewayError::configuration(format!(
				"API base URL '{base_url}' cannot carry a path"
			))
		})?
		.pop_if_empty()
		.extend(segments);
	Ok(url)
}

/// Treats blank strings the same as a missing field.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_ensure_success_keeps_payload_on_failure() {
		let err = ensure_success(
			422,
			json!({ "name": "UNPROCESSABLE_ENTITY" }),
			"Failed to create order",
		)
		.unwrap_err();

		assert_eq!(err.status(), Some(422));
		assert_eq!(err.details(), Some(&json!({ "name": "UNPROCESSABLE_ENTITY" })));
		assert_eq!(err.to_string(), "Failed to create order");
	}

	#[test]
	fn test_decode_failure_is_invalid_response() {
		let err = decode::<Vec<String>>(json!({ "id": 1 }), "Unexpected order payload")
			.unwrap_err();
		assert!(matches!(err, GatewayError::InvalidResponse { .. }));
	}

	#[test]
	fn test_endpoint_joins_and_escapes_segments() {
		let url = endpoint("https://cybqa.pesapal.com/pesapalv3", &[
			"api",
			"Auth",
			"RequestToken",
		])
		.unwrap();
		assert_eq!(
			url.as_str(),
			"https://cybqa.pesapal.com/pesapalv3/api/Auth/RequestToken"
		);

		let url = endpoint("http://127.0.0.1:8080", &["v2", "checkout", "orders", "../x"])
			.unwrap();
		assert_eq!(url.as_str(), "http://127.0.0.1:8080/v2/checkout/orders/..%2Fx");
	}

	#[test]
	fn test_endpoint_rejects_invalid_base() {
		let err = endpoint("not a url", &["v1"]).unwrap_err();
		assert!(matches!(err, GatewayError::Configuration { .. }));
	}

	#[test]
	fn test_non_empty() {
		assert_eq!(non_empty(Some(" ".to_string())), None);
		assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
		assert_eq!(non_empty(None), None);
	}
}
