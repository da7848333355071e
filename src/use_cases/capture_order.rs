use std::sync::Arc;

use crate::domain::gateway::PaymentGateway;
use crate::domain::gateway_error::GatewayError;
use crate::domain::payment_status::CaptureResult;

pub struct CaptureOrderUseCase<G: PaymentGateway> {
	gateway: Result<Arc<G>, GatewayError>,
}

impl<G: PaymentGateway> CaptureOrderUseCase<G> {
	pub fn new(gateway: Result<Arc<G>, GatewayError>) -> Self {
		Self { gateway }
	}

	/// The order is expected to be approved; the vendor rejects anything
	/// else.
	pub async fn execute(&self, order_id: &str) -> Result<CaptureResult, GatewayError> {
		let gateway = self.gateway.as_deref().map_err(Clone::clone)?;
		gateway.capture_order(order_id).await
	}
}
