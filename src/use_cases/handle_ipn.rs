use std::sync::Arc;

use log::info;

use crate::domain::gateway::PaymentGateway;
use crate::domain::gateway_error::GatewayError;
use crate::domain::payment_status::PaymentStatus;

/// Re-reads the payment a vendor notification refers to. Notifications are
/// never trusted on their own.
pub struct HandleIpnUseCase<G: PaymentGateway> {
	gateway: Result<Arc<G>, GatewayError>,
}

impl<G: PaymentGateway> HandleIpnUseCase<G> {
	pub fn new(gateway: Result<Arc<G>, GatewayError>) -> Self {
		Self { gateway }
	}

	pub async fn execute(
		&self,
		tracking_id: &str,
		notification_type: Option<&str>,
	) -> Result<PaymentStatus, GatewayError> {
		let gateway = self.gateway.as_deref().map_err(Clone::clone)?;
		let status = gateway.get_status(tracking_id).await?;

		info!(
			"IPN {} for {tracking_id}: {} ({:?})",
			notification_type.unwrap_or("notification"),
			status.raw_status,
			status.status
		);
		Ok(status)
	}
}
