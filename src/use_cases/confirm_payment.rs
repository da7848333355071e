use std::sync::Arc;

use log::{error, info};

use crate::domain::gateway::{PaymentGateway, Provider};
use crate::domain::gateway_error::GatewayError;
use crate::domain::payment_status::PaymentState;
use crate::use_cases::dto::{ConfirmPaymentQuery, ConfirmationView, PaymentDetails};

const MISSING_TRACKING_ID: &str = "Payment tracking ID not found";

/// Resolves what the booking confirmation page shows after the vendor
/// redirects the customer back.
///
/// A single status snapshot is taken. Orders the vendor reports as approved
/// are captured immediately.
pub struct ConfirmPaymentUseCase<P: PaymentGateway, Q: PaymentGateway> {
	paypal:  Result<Arc<P>, GatewayError>,
	pesapal: Result<Arc<Q>, GatewayError>,
}

impl<P: PaymentGateway, Q: PaymentGateway> ConfirmPaymentUseCase<P, Q> {
	pub fn new(
		paypal: Result<Arc<P>, GatewayError>,
		pesapal: Result<Arc<Q>, GatewayError>,
	) -> Self {
		Self { paypal, pesapal }
	}

	pub async fn execute(&self, query: ConfirmPaymentQuery) -> ConfirmationView {
		let outcome = match (query.provider, query.order_id, query.order_tracking_id) {
			(Some(Provider::PayPal), Some(order_id), _) => {
				match self.paypal.as_deref() {
					Ok(gateway) => confirm(gateway, &order_id).await,
					Err(e) => Err(e.clone()),
				}
			}
			(_, _, Some(tracking_id)) => match self.pesapal.as_deref() {
				Ok(gateway) => confirm(gateway, &tracking_id).await,
				Err(e) => Err(e.clone()),
			},
			_ => {
				return ConfirmationView::Error {
					message: MISSING_TRACKING_ID.to_string(),
				};
			}
		};

		outcome.unwrap_or_else(|e| {
			error!("Payment confirmation failed: {e}");
			ConfirmationView::Error {
				message: e.to_string(),
			}
		})
	}
}

async fn confirm<G: PaymentGateway>(
	gateway: &G,
	tracking_id: &str,
) -> Result<ConfirmationView, GatewayError> {
	let status = gateway.get_status(tracking_id).await?;
	info!(
		"{} payment {tracking_id} reported as {}",
		gateway.provider(),
		status.raw_status
	);

	if status.status == PaymentState::Approved {
		let capture = gateway.capture_order(tracking_id).await?;
		let completed = capture.status == PaymentState::Completed;
		let details = PaymentDetails::from(capture);
		return Ok(if completed {
			ConfirmationView::Completed { details }
		} else {
			ConfirmationView::Pending { details }
		});
	}

	let state = status.status;
	let details = PaymentDetails::from(status);
	Ok(match state {
		PaymentState::Completed => ConfirmationView::Completed { details },
		PaymentState::Failed => ConfirmationView::Failed { details },
		PaymentState::Pending | PaymentState::Approved | PaymentState::Unknown => {
			ConfirmationView::Pending { details }
		}
	})
}
