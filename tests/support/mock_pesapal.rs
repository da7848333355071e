use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

pub const TOKEN: &str = "pesapal-token";
pub const ORDER_TRACKING_ID: &str = "b945e4af-80a5-4ec1-8706-e03f8332fb04";
pub const IPN_ID: &str = "e32182ca-0983-4fa0-91bc-c3bb813ba750";

#[derive(Clone)]
pub struct PesapalBehavior {
	pub reject_auth:    bool,
	pub omit_redirect:  bool,
	pub payment_status: String,
}

impl Default for PesapalBehavior {
	fn default() -> Self {
		PesapalBehavior {
			reject_auth:    false,
			omit_redirect:  false,
			payment_status: "COMPLETED".to_string(),
		}
	}
}

pub struct PesapalState {
	behavior:     PesapalBehavior,
	auth_calls:   AtomicUsize,
	status_calls: AtomicUsize,
	last_order:   Mutex<Option<Value>>,
	last_ipn:     Mutex<Option<Value>>,
	base_url:     Mutex<String>,
}

/// In-process stand-in for the Pesapal v3 API.
pub struct MockPesapal {
	pub base_url: String,
	state:        Arc<PesapalState>,
}

impl MockPesapal {
	pub async fn start(behavior: PesapalBehavior) -> MockPesapal {
		let state = Arc::new(PesapalState {
			behavior,
			auth_calls: AtomicUsize::new(0),
			status_calls: AtomicUsize::new(0),
			last_order: Mutex::new(None),
			last_ipn: Mutex::new(None),
			base_url: Mutex::new(String::new()),
		});

		let app_state = state.clone();
		let server = HttpServer::new(move || {
			App::new()
				.app_data(web::Data::from(app_state.clone()))
				.route("/api/Auth/RequestToken", web::post().to(token))
				.route("/api/URLSetup/RegisterIPN", web::post().to(register_ipn))
				.route(
					"/api/Transactions/SubmitOrderRequest",
					web::post().to(submit_order),
				)
				.route(
					"/api/Transactions/GetTransactionStatus",
					web::get().to(transaction_status),
				)
		})
		.workers(1)
		.bind(("127.0.0.1", 0))
		.unwrap();

		let address = server.addrs()[0];
		let base_url = format!("http://{address}");
		*state.base_url.lock().unwrap() = base_url.clone();
		actix_web::rt::spawn(server.run());

		MockPesapal { base_url, state }
	}

	pub fn auth_calls(&self) -> usize {
		self.state.auth_calls.load(Ordering::SeqCst)
	}

	pub fn status_calls(&self) -> usize {
		self.state.status_calls.load(Ordering::SeqCst)
	}

	pub fn last_order(&self) -> Option<Value> {
		self.state.last_order.lock().unwrap().clone()
	}

	pub fn last_ipn(&self) -> Option<Value> {
		self.state.last_ipn.lock().unwrap().clone()
	}
}

fn authorized(req: &HttpRequest) -> bool {
	req.headers()
		.get("Authorization")
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> HttpResponse {
	HttpResponse::Unauthorized().finish()
}

async fn token(body: web::Json<Value>, state: web::Data<PesapalState>) -> HttpResponse {
	state.auth_calls.fetch_add(1, Ordering::SeqCst);

	let has_credentials = ["consumer_key", "consumer_secret"]
		.iter()
		.all(|key| body.get(*key).and_then(Value::as_str).is_some());

	// Pesapal reports bad credentials inside a 200 response.
	if state.behavior.reject_auth || !has_credentials {
		return HttpResponse::Ok().json(json!({
			"token": null,
			"expiryDate": null,
			"error": {
				"error_type": "api_error",
				"code": "invalid_consumer_key_or_secret_provided",
				"message": "Invalid consumer_key or consumer_secret provided"
			},
			"status": "500",
			"message": ""
		}));
	}

	HttpResponse::Ok().json(json!({
		"token": TOKEN,
		"expiryDate": "2025-01-01T10:05:00.000Z",
		"error": null,
		"status": "200",
		"message": "Request processed successfully"
	}))
}

async fn register_ipn(
	req: HttpRequest,
	body: web::Json<Value>,
	state: web::Data<PesapalState>,
) -> HttpResponse {
	if !authorized(&req) {
		return unauthorized();
	}
	let body = body.into_inner();
	let url = body.get("url").cloned().unwrap_or(Value::Null);
	*state.last_ipn.lock().unwrap() = Some(body);

	HttpResponse::Ok().json(json!({
		"url": url,
		"created_date": "2025-01-01T10:00:00.000Z",
		"ipn_id": IPN_ID,
		"notification_type": 0,
		"ipn_notification_type_description": "GET",
		"ipn_status": 1,
		"ipn_status_description": "Active",
		"error": null,
		"status": "200"
	}))
}

async fn submit_order(
	req: HttpRequest,
	body: web::Json<Value>,
	state: web::Data<PesapalState>,
) -> HttpResponse {
	if !authorized(&req) {
		return unauthorized();
	}
	let body = body.into_inner();
	let merchant_reference = body.get("id").cloned().unwrap_or(Value::Null);
	*state.last_order.lock().unwrap() = Some(body);

	let base_url = state.base_url.lock().unwrap().clone();
	let redirect_url = if state.behavior.omit_redirect {
		Value::Null
	} else {
		json!(format!(
			"{base_url}/iframe/PesapalIframe3/Index?OrderTrackingId={ORDER_TRACKING_ID}"
		))
	};

	HttpResponse::Ok().json(json!({
		"order_tracking_id": ORDER_TRACKING_ID,
		"merchant_reference": merchant_reference,
		"redirect_url": redirect_url,
		"error": null,
		"status": "200"
	}))
}

async fn transaction_status(
	req: HttpRequest,
	query: web::Query<HashMap<String, String>>,
	state: web::Data<PesapalState>,
) -> HttpResponse {
	if !authorized(&req) {
		return unauthorized();
	}
	state.status_calls.fetch_add(1, Ordering::SeqCst);

	if query.get("orderTrackingId").map(String::as_str) != Some(ORDER_TRACKING_ID) {
		return HttpResponse::Ok().json(json!({
			"payment_status_description": null,
			"error": {
				"error_type": "api_error",
				"code": "invalid_order_tracking_id",
				"message": "Invalid order tracking id"
			},
			"status": "500"
		}));
	}

	HttpResponse::Ok().json(json!({
		"payment_method": "Visa",
		"amount": 1000.0,
		"created_date": "2025-01-01T10:00:00.000Z",
		"confirmation_code": "6513008693186320103009",
		"payment_status_description": state.behavior.payment_status,
		"description": "",
		"message": "Request processed successfully",
		"payment_account": "476173**0010",
		"status_code": 1,
		"merchant_reference": "TEST1515111119",
		"currency": "KES",
		"error": {
			"error_type": null,
			"code": null,
			"message": null,
			"call_back_url": null
		},
		"status": "200"
	}))
}
