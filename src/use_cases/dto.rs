use serde::{Deserialize, Serialize};

use crate::domain::gateway::Provider;
use crate::domain::order::Customer;
use crate::domain::payment_status::{CaptureResult, PaymentStatus};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreateOrderCommand {
	pub customer: Customer,
	pub date:     String,
	pub service:  String,
	pub message:  Option<String>,
	pub amount:   f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ConfirmPaymentQuery {
	pub provider:          Option<Provider>,
	pub order_id:          Option<String>,
	pub order_tracking_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PaymentDetails {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amount:         Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency:       Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payment_method: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payment_source: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created_at:     Option<String>,
}

impl From<PaymentStatus> for PaymentDetails {
	fn from(status: PaymentStatus) -> Self {
		PaymentDetails {
			amount:         status.amount,
			currency:       status.currency,
			payment_method: status.method,
			payment_source: status.source,
			created_at:     status.created_at,
		}
	}
}

impl From<CaptureResult> for PaymentDetails {
	fn from(capture: CaptureResult) -> Self {
		PaymentDetails {
			amount:         capture.amount,
			currency:       capture.currency,
			payment_method: None,
			payment_source: capture.payer_email,
			created_at:     None,
		}
	}
}

/// Terminal state shown on the booking confirmation page.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "state")]
pub enum ConfirmationView {
	#[serde(rename = "COMPLETED")]
	Completed { details: PaymentDetails },
	#[serde(rename = "PENDING")]
	Pending { details: PaymentDetails },
	#[serde(rename = "FAILED")]
	Failed { details: PaymentDetails },
	#[serde(rename = "error")]
	Error { message: String },
}
