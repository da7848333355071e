//! Registers this service's IPN endpoint with Pesapal and prints the id to
//! configure as `APP_PESAPAL_IPN_ID`.

use reqwest::Client;
use studio_booking::infrastructure::config::settings::Config;
use studio_booking::infrastructure::gateways::pesapal::{
	IpnNotificationType, PesapalGateway,
};

#[actix_web::main]
async fn main() {
	env_logger::init();

	let config = Config::load().expect("Failed to load configuration");
	let gateway = match PesapalGateway::new(config.pesapal_config(), Client::new()) {
		Ok(gateway) => gateway,
		Err(e) => {
			eprintln!("Pesapal is not configured: {e}");
			std::process::exit(1);
		}
	};

	let url = format!("{}/api/pesapal/ipn", config.site_url.trim_end_matches('/'));
	match gateway.register_ipn_url(&url, IpnNotificationType::Get).await {
		Ok(registration) => {
			println!("Registered IPN URL {}", registration.url);
			println!("APP_PESAPAL_IPN_ID={}", registration.ipn_id);
		}
		Err(e) => {
			eprintln!("Failed to register IPN URL: {e}");
			if let Some(details) = e.details() {
				eprintln!("{details}");
			}
			std::process::exit(1);
		}
	}
}
