use actix_web::{HttpResponse, get, post, web};
use log::info;

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{
	BookingRequest, CaptureRequest, CaptureResponse, CheckoutResponse,
	PayPalOrderQuery, StatusResponse, required_id,
};
use crate::infrastructure::gateways::paypal::PayPalGateway;
use crate::use_cases::capture_order::CaptureOrderUseCase;
use crate::use_cases::create_order::CreateOrderUseCase;
use crate::use_cases::dto::CreateOrderCommand;
use crate::use_cases::get_payment_status::GetPaymentStatusUseCase;

const MISSING_ORDER_ID: &str = "OrderId is required";

#[post("/api/paypal")]
pub async fn create_paypal_order(
	payload: web::Json<BookingRequest>,
	create_order_use_case: web::Data<CreateOrderUseCase<PayPalGateway>>,
) -> Result<HttpResponse, ApiError> {
	let command = CreateOrderCommand::try_from(payload.into_inner())?;
	let order = create_order_use_case.execute(command).await?;

	info!("PayPal order created: {}", order.id);
	Ok(HttpResponse::Ok().json(CheckoutResponse::from(order)))
}

#[get("/api/paypal")]
pub async fn paypal_order_status(
	query: web::Query<PayPalOrderQuery>,
	status_use_case: web::Data<GetPaymentStatusUseCase<PayPalGateway>>,
) -> Result<HttpResponse, ApiError> {
	let order_id = required_id(query.into_inner().order_id, MISSING_ORDER_ID)?;
	let status = status_use_case.execute(&order_id).await?;

	Ok(HttpResponse::Ok().json(StatusResponse::from(status)))
}

#[post("/api/paypal/capture")]
pub async fn capture_paypal_order(
	payload: web::Json<CaptureRequest>,
	capture_use_case: web::Data<CaptureOrderUseCase<PayPalGateway>>,
) -> Result<HttpResponse, ApiError> {
	let order_id = required_id(payload.into_inner().order_id, MISSING_ORDER_ID)?;
	let capture = capture_use_case.execute(&order_id).await?;

	info!("PayPal order {order_id} captured as {}", capture.capture_id);
	Ok(HttpResponse::Ok().json(CaptureResponse::from(capture)))
}
