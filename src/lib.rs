use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer};
use log::{info, warn};
use reqwest::Client;

use crate::adapters::web::routes::AppState;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::gateways::paypal::PayPalGateway;
use crate::infrastructure::gateways::pesapal::PesapalGateway;

pub mod adapters {
	pub mod web {
		pub mod confirmation_handler;
		pub mod errors;
		pub mod ipn_handler;
		pub mod paypal_handler;
		pub mod pesapal_handler;
		pub mod routes;
		pub mod schema;
	}
}

pub mod domain {
	pub mod clock;
	pub mod gateway;
	pub mod gateway_error;
	pub mod order;
	pub mod payment_status;
}

pub mod infrastructure {
	pub mod config {
		pub mod settings;
	}

	pub mod gateways {
		pub(crate) mod http;
		pub mod paypal;
		pub mod pesapal;
		pub mod token_cache;
	}
}

pub mod use_cases {
	pub mod capture_order;
	pub mod confirm_payment;
	pub mod create_order;
	pub mod dto;
	pub mod get_payment_status;
	pub mod handle_ipn;
}

pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	let http_client = Client::new();

	let paypal = PayPalGateway::new(config.paypal_config(), http_client.clone())
		.map(Arc::new);
	if let Err(e) = &paypal {
		warn!("PayPal checkout unavailable: {e}");
	}

	let pesapal = PesapalGateway::new(config.pesapal_config(), http_client)
		.map(|gateway| Arc::new(gateway.with_ipn_id(config.pesapal_ipn_id.clone())));
	if let Err(e) = &pesapal {
		warn!("Pesapal checkout unavailable: {e}");
	}

	let state = AppState::new(paypal, pesapal, &config.site_url);

	info!(
		"Starting Actix-Web server on {}:{}...",
		config.server_host, config.server_port
	);
	HttpServer::new(move || {
		let state = state.clone();
		App::new().configure(move |cfg| state.configure(cfg))
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind((config.server_host.as_str(), config.server_port))?
	.run()
	.await
}
