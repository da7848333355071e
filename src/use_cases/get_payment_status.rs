use std::sync::Arc;

use crate::domain::gateway::PaymentGateway;
use crate::domain::gateway_error::GatewayError;
use crate::domain::payment_status::PaymentStatus;

pub struct GetPaymentStatusUseCase<G: PaymentGateway> {
	gateway: Result<Arc<G>, GatewayError>,
}

impl<G: PaymentGateway> GetPaymentStatusUseCase<G> {
	pub fn new(gateway: Result<Arc<G>, GatewayError>) -> Self {
		Self { gateway }
	}

	pub async fn execute(
		&self,
		tracking_id: &str,
	) -> Result<PaymentStatus, GatewayError> {
		let gateway = self.gateway.as_deref().map_err(Clone::clone)?;
		gateway.get_status(tracking_id).await
	}
}
