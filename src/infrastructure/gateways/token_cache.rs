use std::future::Future;
use std::sync::Arc;

use log::debug;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use crate::domain::clock::Clock;
use crate::domain::gateway_error::GatewayError;

#[derive(Debug, Clone)]
pub struct CachedToken {
	pub value:      String,
	pub expires_at: OffsetDateTime,
}

impl CachedToken {
	pub fn is_usable_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}

/// Single-slot bearer token cache.
///
/// The slot stays locked while a refresh is in flight, so concurrent callers
/// wait for one authentication exchange instead of each starting their own.
pub struct TokenCache {
	slot:     Mutex<Option<CachedToken>>,
	lifetime: Duration,
	clock:    Arc<dyn Clock>,
}

impl TokenCache {
	/// `lifetime` must be shorter than the lifetime the vendor grants.
	pub fn new(lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
		Self {
			slot: Mutex::new(None),
			lifetime,
			clock,
		}
	}

	pub async fn get_or_refresh<F, Fut>(
		&self,
		refresh: F,
	) -> Result<String, GatewayError>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<String, GatewayError>>,
	{
		let mut slot = self.slot.lock().await;

		if let Some(token) = slot.as_ref() &&
			token.is_usable_at(self.clock.now())
		{
			return Ok(token.value.clone());
		}

		if slot.take().is_some() {
			debug!("Cached token expired, discarding it");
		}

		let value = refresh().await?;
		let expires_at = self.clock.now() + self.lifetime;
		*slot = Some(CachedToken {
			value: value.clone(),
			expires_at,
		});

		Ok(value)
	}

	pub async fn current(&self) -> Option<CachedToken> {
		self.slot.lock().await.clone()
	}
}
