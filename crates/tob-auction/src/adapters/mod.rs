//! Adapters (outbound port implementations)

pub mod attestation;

pub use attestation::{build_attestor, ConfigFsTsmAttestor, MockAttestor};
