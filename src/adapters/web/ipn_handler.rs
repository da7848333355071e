use actix_web::{HttpResponse, get, post, web};
use log::{error, info};

use crate::adapters::web::schema::{IpnAck, IpnNotification};
use crate::infrastructure::gateways::pesapal::PesapalGateway;
use crate::use_cases::handle_ipn::HandleIpnUseCase;

const IPN_FAILURE: &str = "Failed to process IPN notification";

/// Pesapal calls back with GET when the IPN was registered that way. A bare
/// GET is a reachability probe and is acknowledged as such.
#[get("/api/pesapal/ipn")]
pub async fn pesapal_ipn_get(
	query: web::Query<IpnNotification>,
	ipn_use_case: web::Data<HandleIpnUseCase<PesapalGateway>>,
) -> HttpResponse {
	let notification = query.into_inner();
	if notification
		.order_tracking_id
		.as_deref()
		.is_none_or(|id| id.trim().is_empty())
	{
		info!("IPN endpoint probed without a tracking id");
		return HttpResponse::Ok().json(IpnAck::success());
	}

	process(notification, &ipn_use_case).await
}

/// Body errors are answered like any other IPN failure.
#[post("/api/pesapal/ipn")]
pub async fn pesapal_ipn_post(
	payload: Result<web::Json<IpnNotification>, actix_web::Error>,
	ipn_use_case: web::Data<HandleIpnUseCase<PesapalGateway>>,
) -> HttpResponse {
	match payload {
		Ok(notification) => process(notification.into_inner(), &ipn_use_case).await,
		Err(e) => {
			error!("Unreadable IPN notification: {e}");
			failure()
		}
	}
}

async fn process(
	notification: IpnNotification,
	ipn_use_case: &HandleIpnUseCase<PesapalGateway>,
) -> HttpResponse {
	let Some(tracking_id) = notification
		.order_tracking_id
		.map(|id| id.trim().to_string())
		.filter(|id| !id.is_empty())
	else {
		error!("IPN notification without OrderTrackingId");
		return failure();
	};

	match ipn_use_case
		.execute(&tracking_id, notification.order_notification_type.as_deref())
		.await
	{
		Ok(_) => HttpResponse::Ok().json(IpnAck::success()),
		Err(e) => {
			error!("IPN processing for {tracking_id} failed: {e}");
			failure()
		}
	}
}

fn failure() -> HttpResponse {
	HttpResponse::InternalServerError()
		.json(serde_json::json!({ "error": IPN_FAILURE }))
}
