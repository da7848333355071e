use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Duration;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::gateway::{Environment, GatewayConfig, PaymentGateway, Provider};
use crate::domain::gateway_error::GatewayError;
use crate::domain::order::{CreatedOrder, OrderRequest};
use crate::domain::payment_status::{PaymentState, PaymentStatus, StatusTable};
use crate::infrastructure::gateways::http::{
	decode, endpoint, ensure_success, non_empty, read_payload,
};
use crate::infrastructure::gateways::token_cache::TokenCache;

pub const SANDBOX_API_URL: &str = "https://cybqa.pesapal.com/pesapalv3";
pub const LIVE_API_URL: &str = "https://pay.pesapal.com/v3";
pub const CURRENCY: &str = "KES";
pub const COUNTRY_CODE: &str = "KE";

/// Pesapal tokens live for five minutes; refresh a minute early.
const TOKEN_LIFETIME: Duration = Duration::minutes(4);

/// Values of `payment_status_description`.
pub const STATUS_TABLE: StatusTable = &[
	("COMPLETED", PaymentState::Completed),
	("PENDING", PaymentState::Pending),
	("FAILED", PaymentState::Failed),
	("INVALID", PaymentState::Failed),
	("REVERSED", PaymentState::Failed),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IpnNotificationType {
	Get,
	Post,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IpnRegistration {
	pub ipn_id: String,
	pub url:    String,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
	consumer_key:    &'a str,
	consumer_secret: &'a str,
}

#[derive(Debug, Serialize)]
struct SubmitOrderPayload<'a> {
	id:               String,
	currency:         &'static str,
	amount:           f64,
	description:      &'a str,
	callback_url:     &'a str,
	cancellation_url: &'a str,
	notification_id:  &'a str,
	billing_address:  BillingAddress<'a>,
}

#[derive(Debug, Serialize)]
struct BillingAddress<'a> {
	email_address: &'a str,
	phone_number:  &'a str,
	country_code:  &'static str,
	first_name:    &'a str,
	middle_name:   &'static str,
	last_name:     String,
	line_1:        &'static str,
	line_2:        &'static str,
	city:          &'static str,
	state:         &'static str,
	postal_code:   &'static str,
	zip_code:      &'static str,
}

#[derive(Debug, Serialize)]
struct RegisterIpnPayload<'a> {
	url:                   &'a str,
	ipn_notification_type: IpnNotificationType,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	token:             Option<String>,
	#[serde(default)]
	error:             Value,
	error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitOrderResponse {
	order_tracking_id: Option<String>,
	redirect_url:      Option<String>,
	#[serde(default)]
	error:             Value,
	status:            Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransactionStatusResponse {
	payment_method:             Option<String>,
	amount:                     Option<f64>,
	created_date:               Option<String>,
	payment_status_description: Option<String>,
	payment_account:            Option<String>,
	currency:                   Option<String>,
	#[serde(default)]
	error:                      Value,
	status:                     Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegisterIpnResponse {
	ipn_id: Option<String>,
	url:    Option<String>,
	#[serde(default)]
	error:  Value,
	status: Option<String>,
}

/// Pesapal reports some failures inside a 200 response. The `error` member
/// is either null, a string, or an object whose fields are all null on
/// success.
fn vendor_error(error: &Value) -> Option<String> {
	match error {
		Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
		Value::Object(fields) => ["message", "code", "error_type"]
			.iter()
			.filter_map(|key| fields.get(*key).and_then(Value::as_str))
			.find(|value| !value.trim().is_empty())
			.map(str::to_string),
		_ => None,
	}
}

fn embedded_status(status: Option<&str>) -> Option<u16> {
	status
		.and_then(|s| s.trim().parse::<u16>().ok())
		.filter(|s| *s >= 400)
}

pub struct PesapalGateway {
	http:            Client,
	base_url:        String,
	environment:     Environment,
	consumer_key:    String,
	consumer_secret: String,
	ipn_id:          Option<String>,
	tokens:          TokenCache,
}

impl PesapalGateway {
	pub fn new(config: GatewayConfig, http: Client) -> Result<Self, GatewayError> {
		Self::with_clock(config, http, Arc::new(SystemClock))
	}

	pub fn with_clock(
		config: GatewayConfig,
		http: Client,
		clock: Arc<dyn Clock>,
	) -> Result<Self, GatewayError> {
		let environment = config.validate(Provider::Pesapal)?;
		let base_url = config.resolve_base_url(match environment {
			Environment::Live => LIVE_API_URL,
			Environment::Sandbox => SANDBOX_API_URL,
		});
		endpoint(&base_url, &[])?;

		info!("Pesapal gateway configured for {environment:?} at {base_url}");

		Ok(Self {
			http,
			base_url,
			environment,
			consumer_key: config.key,
			consumer_secret: config.secret,
			ipn_id: None,
			tokens: TokenCache::new(TOKEN_LIFETIME, clock),
		})
	}

	/// Sets the IPN id sent as `notification_id` with every order.
	pub fn with_ipn_id(mut self, ipn_id: Option<String>) -> Self {
		self.ipn_id = non_empty(ipn_id);
		self
	}

	pub fn environment(&self) -> Environment {
		self.environment
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub async fn access_token(&self) -> Result<String, GatewayError> {
		self.tokens.get_or_refresh(|| self.request_token()).await
	}

	async fn request_token(&self) -> Result<String, GatewayError> {
		info!("Requesting new Pesapal token");

		let response = self
			.http
			.post(endpoint(&self.base_url, &["api", "Auth", "RequestToken"])?)
			.header(ACCEPT, "application/json")
			.json(&Credentials {
				consumer_key:    &self.consumer_key,
				consumer_secret: &self.consumer_secret,
			})
			.send()
			.await?;
		let (status, payload) = read_payload(response, "Pesapal auth").await?;

		if !(200..300).contains(&status) {
			warn!("Pesapal rejected the credentials with status {status}");
			return Err(GatewayError::Authentication {
				message: "Authentication failed".to_string(),
				status:  Some(status),
				details: Some(payload),
			});
		}

		let body: TokenResponse = decode(payload.clone(), "Unexpected Pesapal auth payload")?;
		let error = non_empty(body.error_description).or_else(|| vendor_error(&body.error));
		if let Some(message) = error {
			warn!("Pesapal authentication failed: {message}");
			return Err(GatewayError::Authentication {
				message,
				status: Some(status),
				details: Some(payload),
			});
		}

		non_empty(body.token).ok_or_else(|| {
			GatewayError::invalid_response(
				"No token received from authentication response",
				payload,
			)
		})
	}

	/// Registers the URL Pesapal calls with payment notifications and
	/// returns the IPN id to configure orders with.
	pub async fn register_ipn_url(
		&self,
		url: &str,
		notification_type: IpnNotificationType,
	) -> Result<IpnRegistration, GatewayError> {
		let token = self.access_token().await?;
		info!("Registering Pesapal IPN URL {url}");

		let response = self
			.http
			.post(endpoint(&self.base_url, &["api", "URLSetup", "RegisterIPN"])?)
			.header(ACCEPT, "application/json")
			.bearer_auth(token)
			.json(&RegisterIpnPayload {
				url,
				ipn_notification_type: notification_type,
			})
			.send()
			.await?;
		let (status, payload) = read_payload(response, "Pesapal IPN registration").await?;
		let payload = ensure_success(status, payload, "Failed to register IPN URL")?;

		let registered: RegisterIpnResponse =
			decode(payload.clone(), "Unexpected Pesapal IPN payload")?;
		if let Some(message) = vendor_error(&registered.error) {
			return Err(GatewayError::Transport {
				message,
				status: embedded_status(registered.status.as_deref()),
				details: Some(payload),
			});
		}

		let ipn_id = non_empty(registered.ipn_id).ok_or_else(|| {
			GatewayError::invalid_response("No IPN id received", payload.clone())
		})?;
		Ok(IpnRegistration {
			ipn_id,
			url: non_empty(registered.url).unwrap_or_else(|| url.to_string()),
		})
	}
}

#[async_trait]
impl PaymentGateway for PesapalGateway {
	fn provider(&self) -> Provider {
		Provider::Pesapal
	}

	async fn create_order(
		&self,
		order: &OrderRequest,
	) -> Result<CreatedOrder, GatewayError> {
		let notification_id = self.ipn_id.as_deref().ok_or_else(|| {
			GatewayError::configuration("Pesapal IPN id is required to submit orders")
		})?;
		let token = self.access_token().await?;

		let body = SubmitOrderPayload {
			id: order.correlation_id.to_string(),
			currency: CURRENCY,
			amount: order.amount,
			description: &order.description,
			callback_url: &order.return_url,
			cancellation_url: &order.cancel_url,
			notification_id,
			billing_address: BillingAddress {
				email_address: &order.customer.email,
				phone_number:  &order.customer.phone,
				country_code:  COUNTRY_CODE,
				first_name:    order.customer.first_name(),
				middle_name:   "",
				last_name:     order.customer.last_name(),
				line_1:        "",
				line_2:        "",
				city:          "",
				state:         "",
				postal_code:   "",
				zip_code:      "",
			},
		};
		debug!("Submitting Pesapal order {}", order.correlation_id);

		let response = self
			.http
			.post(endpoint(&self.base_url, &[
				"api",
				"Transactions",
				"SubmitOrderRequest",
			])?)
			.header(ACCEPT, "application/json")
			.bearer_auth(token)
			.json(&body)
			.send()
			.await?;
		let (status, payload) = read_payload(response, "Pesapal submit order").await?;
		let payload = ensure_success(status, payload, "Failed to submit order")?;

		let submitted: SubmitOrderResponse =
			decode(payload.clone(), "Unexpected Pesapal order payload")?;
		if let Some(message) = vendor_error(&submitted.error) {
			return Err(GatewayError::Transport {
				message,
				status: embedded_status(submitted.status.as_deref()),
				details: Some(payload),
			});
		}

		let invalid = || {
			GatewayError::invalid_response(
				"Invalid response from payment provider",
				payload.clone(),
			)
		};
		let redirect_url = non_empty(submitted.redirect_url).ok_or_else(invalid)?;
		let id = non_empty(submitted.order_tracking_id).ok_or_else(invalid)?;

		info!(
			"Pesapal order {id} submitted for correlation id {}",
			order.correlation_id
		);
		Ok(CreatedOrder { id, redirect_url })
	}

	async fn get_status(
		&self,
		tracking_id: &str,
	) -> Result<PaymentStatus, GatewayError> {
		let token = self.access_token().await?;
		debug!("Checking Pesapal transaction status for {tracking_id}");

		let mut url =
			endpoint(&self.base_url, &["api", "Transactions", "GetTransactionStatus"])?;
		url.query_pairs_mut()
			.append_pair("orderTrackingId", tracking_id);

		let response = self
			.http
			.get(url)
			.header(ACCEPT, "application/json")
			.bearer_auth(token)
			.send()
			.await?;
		let (status, payload) = read_payload(response, "Pesapal transaction status").await?;
		let payload = ensure_success(status, payload, "Failed to get transaction status")?;

		let transaction: TransactionStatusResponse =
			decode(payload.clone(), "Unexpected Pesapal status payload")?;
		let raw_status = match non_empty(transaction.payment_status_description) {
			Some(raw) => raw,
			None => {
				let message = vendor_error(&transaction.error)
					.unwrap_or_else(|| "Failed to get transaction status".to_string());
				return Err(GatewayError::Transport {
					message,
					status: embedded_status(transaction.status.as_deref()),
					details: Some(payload),
				});
			}
		};

		Ok(PaymentStatus {
			status: PaymentState::normalize(STATUS_TABLE, &raw_status),
			raw_status,
			amount: transaction.amount,
			currency: non_empty(transaction.currency).or_else(|| Some(CURRENCY.to_string())),
			method: non_empty(transaction.payment_method),
			source: non_empty(transaction.payment_account),
			created_at: non_empty(transaction.created_date),
		})
	}
}
