use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

pub const ACCESS_TOKEN: &str = "paypal-access-token";
pub const ORDER_ID: &str = "5O190127TN364715T";
pub const CAPTURE_ID: &str = "3C679366HH908993F";

#[derive(Clone)]
pub struct PayPalBehavior {
	pub reject_auth:    bool,
	pub omit_approval:  bool,
	pub order_status:   String,
	pub capture_status: String,
}

impl Default for PayPalBehavior {
	fn default() -> Self {
		PayPalBehavior {
			reject_auth:    false,
			omit_approval:  false,
			order_status:   "CREATED".to_string(),
			capture_status: "COMPLETED".to_string(),
		}
	}
}

pub struct PayPalState {
	behavior:      PayPalBehavior,
	auth_calls:    AtomicUsize,
	capture_calls: AtomicUsize,
	last_order:    Mutex<Option<Value>>,
	base_url:      Mutex<String>,
}

/// In-process stand-in for the PayPal REST API.
pub struct MockPayPal {
	pub base_url: String,
	state:        Arc<PayPalState>,
}

impl MockPayPal {
	pub async fn start(behavior: PayPalBehavior) -> MockPayPal {
		let state = Arc::new(PayPalState {
			behavior,
			auth_calls: AtomicUsize::new(0),
			capture_calls: AtomicUsize::new(0),
			last_order: Mutex::new(None),
			base_url: Mutex::new(String::new()),
		});

		let app_state = state.clone();
		let server = HttpServer::new(move || {
			App::new()
				.app_data(web::Data::from(app_state.clone()))
				.route("/v1/oauth2/token", web::post().to(token))
				.route("/v2/checkout/orders", web::post().to(create_order))
				.route("/v2/checkout/orders/{id}", web::get().to(get_order))
				.route("/v2/checkout/orders/{id}/capture", web::post().to(capture))
		})
		.workers(1)
		.bind(("127.0.0.1", 0))
		.unwrap();

		let address = server.addrs()[0];
		let base_url = format!("http://{address}");
		*state.base_url.lock().unwrap() = base_url.clone();
		actix_web::rt::spawn(server.run());

		MockPayPal { base_url, state }
	}

	pub fn auth_calls(&self) -> usize {
		self.state.auth_calls.load(Ordering::SeqCst)
	}

	pub fn capture_calls(&self) -> usize {
		self.state.capture_calls.load(Ordering::SeqCst)
	}

	pub fn last_order(&self) -> Option<Value> {
		self.state.last_order.lock().unwrap().clone()
	}
}

fn authorized(req: &HttpRequest) -> bool {
	req.headers()
		.get("Authorization")
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value == format!("Bearer {ACCESS_TOKEN}"))
}

fn unauthorized() -> HttpResponse {
	HttpResponse::Unauthorized().json(json!({
		"error": "invalid_token",
		"error_description": "Token signature verification failed"
	}))
}

async fn token(req: HttpRequest, state: web::Data<PayPalState>) -> HttpResponse {
	state.auth_calls.fetch_add(1, Ordering::SeqCst);

	let basic = req
		.headers()
		.get("Authorization")
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.starts_with("Basic "));

	if state.behavior.reject_auth || !basic {
		return HttpResponse::Unauthorized().json(json!({
			"error": "invalid_client",
			"error_description": "Client Authentication failed"
		}));
	}

	HttpResponse::Ok().json(json!({
		"scope": "https://uri.paypal.com/services/payments/payment",
		"access_token": ACCESS_TOKEN,
		"token_type": "Bearer",
		"app_id": "APP-80W284485P519543T",
		"expires_in": 32400
	}))
}

async fn create_order(
	req: HttpRequest,
	body: web::Json<Value>,
	state: web::Data<PayPalState>,
) -> HttpResponse {
	if !authorized(&req) {
		return unauthorized();
	}
	*state.last_order.lock().unwrap() = Some(body.into_inner());

	let base_url = state.base_url.lock().unwrap().clone();
	let mut links = vec![json!({
		"href": format!("{base_url}/v2/checkout/orders/{ORDER_ID}"),
		"rel": "self",
		"method": "GET"
	})];
	if !state.behavior.omit_approval {
		links.push(json!({
			"href": format!("{base_url}/checkoutnow?token={ORDER_ID}"),
			"rel": "approve",
			"method": "GET"
		}));
	}

	HttpResponse::Created().json(json!({
		"id": ORDER_ID,
		"status": "CREATED",
		"links": links
	}))
}

async fn get_order(
	req: HttpRequest,
	path: web::Path<String>,
	state: web::Data<PayPalState>,
) -> HttpResponse {
	if !authorized(&req) {
		return unauthorized();
	}

	let id = path.into_inner();
	if id != ORDER_ID {
		return HttpResponse::NotFound().json(json!({
			"name": "RESOURCE_NOT_FOUND",
			"message": "The specified resource does not exist."
		}));
	}

	HttpResponse::Ok().json(json!({
		"id": id,
		"status": state.behavior.order_status,
		"create_time": "2025-01-01T10:00:00Z",
		"payment_source": { "paypal": { "email_address": "jane@x.com" } },
		"purchase_units": [{
			"amount": { "currency_code": "USD", "value": "1000.00" }
		}]
	}))
}

async fn capture(
	req: HttpRequest,
	path: web::Path<String>,
	state: web::Data<PayPalState>,
) -> HttpResponse {
	if !authorized(&req) {
		return unauthorized();
	}
	state.capture_calls.fetch_add(1, Ordering::SeqCst);

	HttpResponse::Created().json(json!({
		"id": path.into_inner(),
		"status": state.behavior.capture_status,
		"payment_source": { "paypal": { "email_address": "jane@x.com" } },
		"purchase_units": [{
			"payments": {
				"captures": [{
					"id": CAPTURE_ID,
					"status": "COMPLETED",
					"amount": { "currency_code": "USD", "value": "1000.00" }
				}]
			}
		}]
	}))
}
