#![allow(dead_code)]

pub mod clock;
pub mod mock_paypal;
pub mod mock_pesapal;
