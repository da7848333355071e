use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Duration;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::gateway::{Environment, GatewayConfig, PaymentGateway, Provider};
use crate::domain::gateway_error::GatewayError;
use crate::domain::order::{CreatedOrder, OrderRequest};
use crate::domain::payment_status::{
	CaptureResult, PaymentState, PaymentStatus, StatusTable,
};
use crate::infrastructure::gateways::http::{
	decode, endpoint, ensure_success, non_empty, read_payload,
};
use crate::infrastructure::gateways::token_cache::TokenCache;

pub const SANDBOX_API_URL: &str = "https://api-m.sandbox.paypal.com";
pub const LIVE_API_URL: &str = "https://api-m.paypal.com";
pub const CURRENCY: &str = "USD";

/// PayPal access tokens live for nine hours; refresh an hour early.
const TOKEN_LIFETIME: Duration = Duration::hours(8);

/// Order and capture statuses of the Orders v2 API.
pub const STATUS_TABLE: StatusTable = &[
	("COMPLETED", PaymentState::Completed),
	("APPROVED", PaymentState::Approved),
	("CREATED", PaymentState::Pending),
	("SAVED", PaymentState::Pending),
	("PAYER_ACTION_REQUIRED", PaymentState::Pending),
	("PENDING", PaymentState::Pending),
	("VOIDED", PaymentState::Failed),
	("DECLINED", PaymentState::Failed),
	("FAILED", PaymentState::Failed),
];

const APPROVAL_RELS: [&str; 2] = ["approve", "payer-action"];

#[derive(Debug, Serialize)]
struct CreateOrderPayload<'a> {
	intent:              &'static str,
	purchase_units:      Vec<PurchaseUnitPayload<'a>>,
	application_context: ApplicationContext<'a>,
}

#[derive(Debug, Serialize)]
struct PurchaseUnitPayload<'a> {
	amount:      AmountPayload,
	description: &'a str,
	custom_id:   String,
}

#[derive(Debug, Serialize)]
struct AmountPayload {
	currency_code: &'static str,
	value:         String,
}

#[derive(Debug, Serialize)]
struct ApplicationContext<'a> {
	return_url: &'a str,
	cancel_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token:      Option<String>,
	error:             Option<String>,
	error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
	id:             Option<String>,
	status:         Option<String>,
	#[serde(default)]
	links:          Vec<Link>,
	payment_source: Option<PaymentSource>,
	#[serde(default)]
	purchase_units: Vec<PurchaseUnit>,
	create_time:    Option<String>,
}

#[derive(Debug, Deserialize)]
struct Link {
	href: String,
	rel:  String,
}

#[derive(Debug, Deserialize)]
struct PaymentSource {
	paypal: Option<PayPalWallet>,
}

#[derive(Debug, Deserialize)]
struct PayPalWallet {
	email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
	amount:   Option<Amount>,
	payments: Option<Payments>,
}

#[derive(Debug, Deserialize)]
struct Payments {
	#[serde(default)]
	captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct Capture {
	id:     Option<String>,
	amount: Option<Amount>,
}

#[derive(Debug, Deserialize, Clone)]
struct Amount {
	currency_code: Option<String>,
	value:         Option<String>,
}

impl OrderResponse {
	fn payer_email(&self) -> Option<String> {
		self.payment_source
			.as_ref()
			.and_then(|source| source.paypal.as_ref())
			.and_then(|wallet| wallet.email_address.clone())
	}

	fn first_capture(&self) -> Option<&Capture> {
		self.purchase_units
			.first()
			.and_then(|unit| unit.payments.as_ref())
			.and_then(|payments| payments.captures.first())
	}

	/// Unit amount, falling back to the first capture's amount.
	fn amount(&self) -> Option<Amount> {
		self.purchase_units
			.first()
			.and_then(|unit| unit.amount.clone())
			.or_else(|| self.first_capture().and_then(|c| c.amount.clone()))
	}

	fn raw_status(&self) -> String {
		self.status.clone().unwrap_or_default()
	}
}

pub struct PayPalGateway {
	http:          Client,
	base_url:      String,
	environment:   Environment,
	client_id:     String,
	client_secret: String,
	tokens:        TokenCache,
}

impl PayPalGateway {
	pub fn new(config: GatewayConfig, http: Client) -> Result<Self, GatewayError> {
		Self::with_clock(config, http, Arc::new(SystemClock))
	}

	pub fn with_clock(
		config: GatewayConfig,
		http: Client,
		clock: Arc<dyn Clock>,
	) -> Result<Self, GatewayError> {
		let environment = config.validate(Provider::PayPal)?;
		let base_url = config.resolve_base_url(match environment {
			Environment::Live => LIVE_API_URL,
			Environment::Sandbox => SANDBOX_API_URL,
		});
		endpoint(&base_url, &[])?;

		info!("PayPal gateway configured for {environment:?} at {base_url}");

		Ok(Self {
			http,
			base_url,
			environment,
			client_id: config.key,
			client_secret: config.secret,
			tokens: TokenCache::new(TOKEN_LIFETIME, clock),
		})
	}

	pub fn environment(&self) -> Environment {
		self.environment
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Returns the cached bearer token, authenticating only when it is
	/// missing or expired.
	pub async fn access_token(&self) -> Result<String, GatewayError> {
		self.tokens.get_or_refresh(|| self.request_token()).await
	}

	async fn request_token(&self) -> Result<String, GatewayError> {
		info!("Requesting new PayPal access token");

		let response = self
			.http
			.post(endpoint(&self.base_url, &["v1", "oauth2", "token"])?)
			.basic_auth(&self.client_id, Some(&self.client_secret))
			.form(&[("grant_type", "client_credentials")])
			.send()
			.await?;
		let (status, payload) = read_payload(response, "PayPal auth").await?;

		if !(200..300).contains(&status) {
			warn!("PayPal rejected the credentials with status {status}");
			return Err(GatewayError::Authentication {
				message: "Authentication failed".to_string(),
				status:  Some(status),
				details: Some(payload),
			});
		}

		let body: TokenResponse = decode(payload.clone(), "Unexpected PayPal auth payload")?;
		if let Some(error) = non_empty(body.error) {
			return Err(GatewayError::Authentication {
				message: non_empty(body.error_description).unwrap_or(error),
				status:  Some(status),
				details: Some(payload),
			});
		}

		non_empty(body.access_token).ok_or_else(|| {
			GatewayError::invalid_response(
				"No access token received from authentication response",
				payload,
			)
		})
	}

	async fn fetch_order(
		&self,
		segments: &[&str],
		capture: bool,
		failure: &str,
	) -> Result<OrderResponse, GatewayError> {
		let token = self.access_token().await?;
		let url = endpoint(&self.base_url, segments)?;

		let request = if capture {
			self.http
				.post(url)
				.header(CONTENT_TYPE, "application/json")
		} else {
			self.http.get(url)
		};
		let response = request.bearer_auth(token).send().await?;

		let (status, payload) = read_payload(response, failure).await?;
		let payload = ensure_success(status, payload, failure)?;
		decode(payload, "Unexpected PayPal order payload")
	}

	fn approval_redirect(
		&self,
		order_id: &str,
		links: &[Link],
		return_url: &str,
		payload: &Value,
	) -> Result<String, GatewayError> {
		let approve = links
			.iter()
			.find(|link| APPROVAL_RELS.contains(&link.rel.as_str()))
			.ok_or_else(|| {
				GatewayError::invalid_response(
					"Invalid response from payment provider",
					payload.clone(),
				)
			})?;

		let mut final_return = Url::parse(return_url).map_err(|e| {
			GatewayError::configuration(format!("Invalid return URL '{return_url}': {e}"))
		})?;
		final_return
			.query_pairs_mut()
			.append_pair("orderId", order_id);

		let mut redirect = Url::parse(&approve.href).map_err(|e| {
			GatewayError::invalid_response(
				format!("Invalid approval link from payment provider: {e}"),
				payload.clone(),
			)
		})?;
		redirect
			.query_pairs_mut()
			.append_pair("return_url", final_return.as_str());

		Ok(redirect.into())
	}
}

fn parse_amount(amount: Option<&Amount>) -> Option<f64> {
	amount
		.and_then(|a| a.value.as_deref())
		.and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
	fn provider(&self) -> Provider {
		Provider::PayPal
	}

	async fn create_order(
		&self,
		order: &OrderRequest,
	) -> Result<CreatedOrder, GatewayError> {
		let token = self.access_token().await?;

		let body = CreateOrderPayload {
			intent:              "CAPTURE",
			purchase_units:      vec![PurchaseUnitPayload {
				amount:      AmountPayload {
					currency_code: CURRENCY,
					value:         format!("{:.2}", order.amount),
				},
				description: &order.description,
				custom_id:   order.correlation_id.to_string(),
			}],
			application_context: ApplicationContext {
				return_url: &order.return_url,
				cancel_url: &order.cancel_url,
			},
		};
		debug!("Creating PayPal order {}", order.correlation_id);

		let response = self
			.http
			.post(endpoint(&self.base_url, &["v2", "checkout", "orders"])?)
			.bearer_auth(token)
			.json(&body)
			.send()
			.await?;
		let (status, payload) = read_payload(response, "PayPal create order").await?;
		let payload = ensure_success(status, payload, "Failed to create order")?;

		let created: OrderResponse =
			decode(payload.clone(), "Unexpected PayPal order payload")?;
		let id = non_empty(created.id).ok_or_else(|| {
			GatewayError::invalid_response(
				"Invalid response from payment provider",
				payload.clone(),
			)
		})?;
		let redirect_url =
			self.approval_redirect(&id, &created.links, &order.return_url, &payload)?;

		info!(
			"PayPal order {id} created for correlation id {}",
			order.correlation_id
		);
		Ok(CreatedOrder { id, redirect_url })
	}

	async fn get_status(
		&self,
		tracking_id: &str,
	) -> Result<PaymentStatus, GatewayError> {
		let order = self
			.fetch_order(
				&["v2", "checkout", "orders", tracking_id],
				false,
				"Failed to get order details",
			)
			.await?;

		let raw_status = order.raw_status();
		let amount = order.amount();
		Ok(PaymentStatus {
			status: PaymentState::normalize(STATUS_TABLE, &raw_status),
			raw_status,
			amount: parse_amount(amount.as_ref()),
			currency: amount.and_then(|a| a.currency_code),
			method: order
				.payment_source
				.as_ref()
				.and_then(|s| s.paypal.as_ref())
				.map(|_| "PayPal".to_string()),
			source: order.payer_email(),
			created_at: order.create_time,
		})
	}

	async fn capture_order(
		&self,
		order_id: &str,
	) -> Result<CaptureResult, GatewayError> {
		info!("Capturing PayPal order {order_id}");
		let captured = self
			.fetch_order(
				&["v2", "checkout", "orders", order_id, "capture"],
				true,
				"Failed to capture order",
			)
			.await?;

		let capture_id = captured
			.first_capture()
			.and_then(|c| c.id.clone())
			.or_else(|| captured.id.clone())
			.unwrap_or_else(|| order_id.to_string());
		let raw_status = captured.raw_status();
		let amount = captured.amount();

		Ok(CaptureResult {
			capture_id,
			status: PaymentState::normalize(STATUS_TABLE, &raw_status),
			raw_status,
			amount: parse_amount(amount.as_ref()),
			currency: amount.and_then(|a| a.currency_code),
			payer_email: captured.payer_email(),
		})
	}
}
