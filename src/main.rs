use std::sync::Arc;

use studio_booking::infrastructure::config::settings::Config;
use studio_booking::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config = Arc::new(Config::load().expect("Failed to load configuration"));
	run(config).await
}
