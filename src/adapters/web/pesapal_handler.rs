use actix_web::{HttpResponse, get, post, web};
use log::info;

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{
	BookingRequest, CheckoutResponse, PesapalOrderQuery, StatusResponse,
	required_id,
};
use crate::infrastructure::gateways::pesapal::PesapalGateway;
use crate::use_cases::create_order::CreateOrderUseCase;
use crate::use_cases::dto::CreateOrderCommand;
use crate::use_cases::get_payment_status::GetPaymentStatusUseCase;

#[post("/api/pesapal")]
pub async fn create_pesapal_order(
	payload: web::Json<BookingRequest>,
	create_order_use_case: web::Data<CreateOrderUseCase<PesapalGateway>>,
) -> Result<HttpResponse, ApiError> {
	let command = CreateOrderCommand::try_from(payload.into_inner())?;
	let order = create_order_use_case.execute(command).await?;

	info!("Pesapal order submitted: {}", order.id);
	Ok(HttpResponse::Ok().json(CheckoutResponse::from(order)))
}

#[get("/api/pesapal")]
pub async fn pesapal_order_status(
	query: web::Query<PesapalOrderQuery>,
	status_use_case: web::Data<GetPaymentStatusUseCase<PesapalGateway>>,
) -> Result<HttpResponse, ApiError> {
	let tracking_id = required_id(
		query.into_inner().order_tracking_id,
		"OrderTrackingId is required",
	)?;
	let status = status_use_case.execute(&tracking_id).await?;

	Ok(HttpResponse::Ok().json(StatusResponse::from(status)))
}
