//! x402 Payment Gate
//!
//! Enforces "no artifact without settled payment" over HTTP 402.
//! Challenges are derived deterministically from configuration plus the
//! gated resource URL; proofs arrive as a base64 JSON envelope and are
//! verified and settled through an external facilitator.

pub mod facilitator;
pub mod requirements;

pub use facilitator::{decode_payment_envelope, FacilitatorClient};
pub use requirements::{payment_requirements, PaymentOption, PaymentRequirements, ResourceInfo};

/// Request header carrying the client's payment proof envelope.
pub const PAYMENT_SIGNATURE_HEADER: &str = "payment-signature";

/// Response header echoing the JSON challenge alongside the 402 body.
pub const PAYMENT_REQUIRED_HEADER: &str = "payment-required";
