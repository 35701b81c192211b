//! Outbound Ports (Driven Ports / SPI)

use crate::domain::errors::AttestationError;
use crate::domain::value_objects::Quote;
use async_trait::async_trait;

/// Attestation collaborator
///
/// Produces a hardware-backed quote binding `report_data` (at most 64 bytes)
/// to the platform measurements. Called once per finalized auction.
#[async_trait]
pub trait Attestor: Send + Sync {
    async fn produce_attestation(&self, report_data: &[u8]) -> Result<Quote, AttestationError>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}
