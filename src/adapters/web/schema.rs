use serde::{Deserialize, Serialize};

use crate::adapters::web::errors::ApiError;
use crate::domain::gateway::Provider;
use crate::domain::order::{CreatedOrder, Customer};
use crate::domain::payment_status::{CaptureResult, PaymentState, PaymentStatus};
use crate::use_cases::dto::{ConfirmPaymentQuery, CreateOrderCommand};

/// Booking form submission. Every field is optional at the wire level so a
/// missing field is reported as such instead of as a parse error.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingRequest {
	pub name:    Option<String>,
	pub email:   Option<String>,
	pub phone:   Option<String>,
	pub date:    Option<String>,
	pub message: Option<String>,
	pub service: Option<String>,
	pub amount:  Option<f64>,
}

fn required(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

impl TryFrom<BookingRequest> for CreateOrderCommand {
	type Error = ApiError;

	fn try_from(request: BookingRequest) -> Result<Self, Self::Error> {
		let (
			Some(name),
			Some(email),
			Some(phone),
			Some(date),
			Some(service),
			Some(amount),
		) = (
			required(request.name),
			required(request.email),
			required(request.phone),
			required(request.date),
			required(request.service),
			request.amount.filter(|amount| *amount != 0.0),
		)
		else {
			return Err(ApiError::MissingFields);
		};

		if !amount.is_finite() || amount < 0.0 {
			return Err(ApiError::bad_request("Amount must be a positive number"));
		}

		Ok(CreateOrderCommand {
			customer: Customer { name, email, phone },
			date,
			service,
			message: required(request.message),
			amount,
		})
	}
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CheckoutResponse {
	pub redirect_url: String,
	pub order_id:     String,
}

impl From<CreatedOrder> for CheckoutResponse {
	fn from(order: CreatedOrder) -> Self {
		CheckoutResponse {
			redirect_url: order.redirect_url,
			order_id:     order.id,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PayPalOrderQuery {
	#[serde(rename = "orderId")]
	pub order_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PesapalOrderQuery {
	#[serde(rename = "OrderTrackingId")]
	pub order_tracking_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CaptureRequest {
	#[serde(rename = "orderId")]
	pub order_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StatusResponse {
	pub status:         PaymentState,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payment_method: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payment_source: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount:         Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency:       Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created_at:     Option<String>,
}

impl From<PaymentStatus> for StatusResponse {
	fn from(status: PaymentStatus) -> Self {
		StatusResponse {
			status:         status.status,
			payment_method: status.method,
			payment_source: status.source,
			amount:         status.amount,
			currency:       status.currency,
			created_at:     status.created_at,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CaptureResponse {
	pub success:        bool,
	pub capture_id:     String,
	pub status:         PaymentState,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payment_source: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount:         Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency:       Option<String>,
}

impl From<CaptureResult> for CaptureResponse {
	fn from(capture: CaptureResult) -> Self {
		CaptureResponse {
			success:        true,
			capture_id:     capture.capture_id,
			status:         capture.status,
			payment_source: capture.payer_email,
			amount:         capture.amount,
			currency:       capture.currency,
		}
	}
}

/// Pesapal IPN call, either as query parameters (GET) or JSON body (POST).
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct IpnNotification {
	#[serde(rename = "OrderTrackingId")]
	pub order_tracking_id:        Option<String>,
	#[serde(rename = "OrderNotificationType")]
	pub order_notification_type:  Option<String>,
	#[serde(rename = "OrderMerchantReference")]
	pub order_merchant_reference: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IpnAck {
	pub status: String,
}

impl IpnAck {
	pub fn success() -> Self {
		IpnAck {
			status: "success".to_string(),
		}
	}
}

/// Query the vendor redirect lands with. An unrecognised provider is treated
/// as absent rather than rejected, so the page still renders.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ConfirmationParams {
	pub provider:          Option<String>,
	#[serde(rename = "orderId")]
	pub order_id:          Option<String>,
	#[serde(rename = "OrderTrackingId")]
	pub order_tracking_id: Option<String>,
}

impl From<ConfirmationParams> for ConfirmPaymentQuery {
	fn from(params: ConfirmationParams) -> Self {
		ConfirmPaymentQuery {
			provider:          params.provider.as_deref().and_then(parse_provider),
			order_id:          required(params.order_id),
			order_tracking_id: required(params.order_tracking_id),
		}
	}
}

fn parse_provider(value: &str) -> Option<Provider> {
	match value.trim().to_ascii_lowercase().as_str() {
		"paypal" => Some(Provider::PayPal),
		"pesapal" => Some(Provider::Pesapal),
		_ => None,
	}
}

/// Trims the id and rejects blank values.
pub fn required_id(value: Option<String>, missing: &str) -> Result<String, ApiError> {
	required(value).ok_or_else(|| ApiError::bad_request(missing))
}
