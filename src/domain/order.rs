use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Customer {
	pub name:  String,
	pub email: String,
	pub phone: String,
}

impl Customer {
	pub fn first_name(&self) -> &str {
		self.name.split_whitespace().next().unwrap_or_default()
	}

	pub fn last_name(&self) -> String {
		self.name
			.split_whitespace()
			.skip(1)
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// A single checkout attempt, handed to a gateway exactly once.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OrderRequest {
	pub correlation_id: Uuid,
	pub amount:         f64,
	pub description:    String,
	pub customer:       Customer,
	pub return_url:     String,
	pub cancel_url:     String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CreatedOrder {
	pub id:           String,
	pub redirect_url: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn customer(name: &str) -> Customer {
		Customer {
			name:  name.to_string(),
			email: "jane@x.com".to_string(),
			phone: "+254700000000".to_string(),
		}
	}

	#[test]
	fn test_name_split() {
		let c = customer("Jane  Mary Doe");
		assert_eq!(c.first_name(), "Jane");
		assert_eq!(c.last_name(), "Mary Doe");
	}

	#[test]
	fn test_single_word_name_has_empty_last_name() {
		let c = customer("Jane");
		assert_eq!(c.first_name(), "Jane");
		assert_eq!(c.last_name(), "");
	}
}
