use std::sync::Arc;

use actix_web::web;

use crate::adapters::web::confirmation_handler::booking_confirmation;
use crate::adapters::web::errors::{json_config, query_config};
use crate::adapters::web::ipn_handler::{pesapal_ipn_get, pesapal_ipn_post};
use crate::adapters::web::paypal_handler::{
	capture_paypal_order, create_paypal_order, paypal_order_status,
};
use crate::adapters::web::pesapal_handler::{
	create_pesapal_order, pesapal_order_status,
};
use crate::domain::gateway_error::GatewayError;
use crate::infrastructure::gateways::paypal::PayPalGateway;
use crate::infrastructure::gateways::pesapal::PesapalGateway;
use crate::use_cases::capture_order::CaptureOrderUseCase;
use crate::use_cases::confirm_payment::ConfirmPaymentUseCase;
use crate::use_cases::create_order::CreateOrderUseCase;
use crate::use_cases::get_payment_status::GetPaymentStatusUseCase;
use crate::use_cases::handle_ipn::HandleIpnUseCase;

/// Use cases shared by every worker, built once per process around the two
/// gateway clients.
#[derive(Clone)]
pub struct AppState {
	create_paypal_order:  web::Data<CreateOrderUseCase<PayPalGateway>>,
	paypal_status:        web::Data<GetPaymentStatusUseCase<PayPalGateway>>,
	capture_paypal_order: web::Data<CaptureOrderUseCase<PayPalGateway>>,
	create_pesapal_order: web::Data<CreateOrderUseCase<PesapalGateway>>,
	pesapal_status:       web::Data<GetPaymentStatusUseCase<PesapalGateway>>,
	pesapal_ipn:          web::Data<HandleIpnUseCase<PesapalGateway>>,
	confirm_payment:
		web::Data<ConfirmPaymentUseCase<PayPalGateway, PesapalGateway>>,
}

impl AppState {
	pub fn new(
		paypal: Result<Arc<PayPalGateway>, GatewayError>,
		pesapal: Result<Arc<PesapalGateway>, GatewayError>,
		site_url: &str,
	) -> Self {
		Self {
			create_paypal_order:  web::Data::new(CreateOrderUseCase::new(
				paypal.clone(),
				site_url,
			)),
			paypal_status:        web::Data::new(GetPaymentStatusUseCase::new(
				paypal.clone(),
			)),
			capture_paypal_order: web::Data::new(CaptureOrderUseCase::new(
				paypal.clone(),
			)),
			create_pesapal_order: web::Data::new(CreateOrderUseCase::new(
				pesapal.clone(),
				site_url,
			)),
			pesapal_status:       web::Data::new(GetPaymentStatusUseCase::new(
				pesapal.clone(),
			)),
			pesapal_ipn:          web::Data::new(HandleIpnUseCase::new(
				pesapal.clone(),
			)),
			confirm_payment:      web::Data::new(ConfirmPaymentUseCase::new(
				paypal, pesapal,
			)),
		}
	}

	/// Registers the shared state, extractor settings and every route.
	pub fn configure(&self, cfg: &mut web::ServiceConfig) {
		cfg.app_data(json_config())
			.app_data(query_config())
			.app_data(self.create_paypal_order.clone())
			.app_data(self.paypal_status.clone())
			.app_data(self.capture_paypal_order.clone())
			.app_data(self.create_pesapal_order.clone())
			.app_data(self.pesapal_status.clone())
			.app_data(self.pesapal_ipn.clone())
			.app_data(self.confirm_payment.clone())
			.service(create_paypal_order)
			.service(paypal_order_status)
			.service(capture_paypal_order)
			.service(create_pesapal_order)
			.service(pesapal_order_status)
			.service(pesapal_ipn_get)
			.service(pesapal_ipn_post)
			.service(booking_confirmation);
	}
}
