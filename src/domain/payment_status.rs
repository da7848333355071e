use serde::{Deserialize, Serialize};

/// Caller-facing payment status, shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
	Completed,
	Pending,
	Failed,
	Approved,
	Unknown,
}

/// Maps a vendor status string to a [`PaymentState`].
pub type StatusTable = &'static [(&'static str, PaymentState)];

impl PaymentState {
	/// Case-insensitive lookup; unrecognized strings fall back to
	/// [`PaymentState::Unknown`].
	pub fn normalize(table: StatusTable, raw: &str) -> PaymentState {
		let raw = raw.trim();
		table
			.iter()
			.find(|(vendor, _)| vendor.eq_ignore_ascii_case(raw))
			.map(|(_, state)| *state)
			.unwrap_or(PaymentState::Unknown)
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentStatus {
	pub status:     PaymentState,
	pub raw_status: String,
	pub amount:     Option<f64>,
	pub currency:   Option<String>,
	pub method:     Option<String>,
	pub source:     Option<String>,
	pub created_at: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CaptureResult {
	pub capture_id:  String,
	pub status:      PaymentState,
	pub raw_status:  String,
	pub amount:      Option<f64>,
	pub currency:    Option<String>,
	pub payer_email: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	const TABLE: StatusTable = &[
		("COMPLETED", PaymentState::Completed),
		("PENDING", PaymentState::Pending),
	];

	#[test]
	fn test_normalize_is_case_insensitive() {
		assert_eq!(
			PaymentState::normalize(TABLE, "completed"),
			PaymentState::Completed
		);
		assert_eq!(
			PaymentState::normalize(TABLE, " Pending "),
			PaymentState::Pending
		);
	}

	#[test]
	fn test_normalize_falls_back_to_unknown() {
		assert_eq!(PaymentState::normalize(TABLE, "REFUNDED"), PaymentState::Unknown);
		assert_eq!(PaymentState::normalize(TABLE, ""), PaymentState::Unknown);
	}

	#[test]
	fn test_state_serializes_upper_case() {
		assert_eq!(
			serde_json::to_string(&PaymentState::Completed).unwrap(),
			"\"COMPLETED\""
		);
	}
}
