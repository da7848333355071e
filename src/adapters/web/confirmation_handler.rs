use actix_web::{HttpResponse, get, web};

use crate::adapters::web::schema::ConfirmationParams;
use crate::infrastructure::gateways::paypal::PayPalGateway;
use crate::infrastructure::gateways::pesapal::PesapalGateway;
use crate::use_cases::confirm_payment::ConfirmPaymentUseCase;
use crate::use_cases::dto::ConfirmPaymentQuery;

/// Landing endpoint for the vendor redirect. Always answers 200; failures are
/// part of the rendered state.
#[get("/booking/confirmation")]
pub async fn booking_confirmation(
	params: web::Query<ConfirmationParams>,
	confirm_use_case: web::Data<ConfirmPaymentUseCase<PayPalGateway, PesapalGateway>>,
) -> HttpResponse {
	let view = confirm_use_case
		.execute(ConfirmPaymentQuery::from(params.into_inner()))
		.await;

	HttpResponse::Ok().json(view)
}
