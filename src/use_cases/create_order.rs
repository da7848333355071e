use std::sync::Arc;

use log::info;
use reqwest::Url;
use uuid::Uuid;

use crate::domain::gateway::{PaymentGateway, Provider};
use crate::domain::gateway_error::GatewayError;
use crate::domain::order::{CreatedOrder, OrderRequest};
use crate::use_cases::dto::CreateOrderCommand;

pub struct CreateOrderUseCase<G: PaymentGateway> {
	gateway:  Result<Arc<G>, GatewayError>,
	site_url: Result<String, GatewayError>,
}

/// The site URL ends up in vendor return and callback URLs, so it must be
/// absolute.
fn parse_site_url(site_url: &str) -> Result<String, GatewayError> {
	let trimmed = site_url.trim().trim_end_matches('/');
	let url = Url::parse(trimmed).map_err(|e| {
		GatewayError::configuration(format!("Invalid site URL '{site_url}': {e}"))
	})?;
	if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
		return Err(GatewayError::configuration(format!(
			"Invalid site URL '{site_url}': expected an absolute http(s) URL"
		)));
	}
	Ok(trimmed.to_string())
}

impl<G: PaymentGateway> CreateOrderUseCase<G> {
	/// `gateway` is the outcome of constructing the client. It and the site
	/// URL are checked here; a configuration error is reported on every call
	/// instead of preventing startup.
	pub fn new(gateway: Result<Arc<G>, GatewayError>, site_url: &str) -> Self {
		Self {
			gateway,
			site_url: parse_site_url(site_url),
		}
	}

	pub async fn execute(
		&self,
		command: CreateOrderCommand,
	) -> Result<CreatedOrder, GatewayError> {
		let gateway = self.gateway.as_deref().map_err(Clone::clone)?;
		let site_url = self.site_url.as_deref().map_err(Clone::clone)?;

		let return_url = match gateway.provider() {
			Provider::PayPal => format!("{site_url}/booking/confirmation?provider=paypal"),
			Provider::Pesapal => format!("{site_url}/booking/confirmation"),
		};

		let order = OrderRequest {
			correlation_id: Uuid::new_v4(),
			amount: command.amount,
			description: format!("Photography Service: {}", command.service),
			customer: command.customer,
			return_url,
			cancel_url: format!("{site_url}/booking?error=payment_cancelled"),
		};

		info!(
			"Creating {} order {} for {} on {}",
			gateway.provider(),
			order.correlation_id,
			command.service,
			command.date
		);
		gateway.create_order(&order).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_site_url_is_trimmed() {
		assert_eq!(
			parse_site_url(" https://studio.example.com/ ").unwrap(),
			"https://studio.example.com"
		);
	}

	#[test]
	fn test_blank_or_relative_site_url_is_a_configuration_error() {
		for site_url in ["", "   ", "/", "studio.example.com", "mailto:studio@example.com"] {
			assert!(
				matches!(
					parse_site_url(site_url),
					Err(GatewayError::Configuration { .. })
				),
				"{site_url:?}"
			);
		}
	}
}
