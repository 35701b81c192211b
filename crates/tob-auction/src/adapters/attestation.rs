//! Attestation adapters
//!
//! - [`MockAttestor`]: in-process quote echoing the report data
//! - [`ConfigFsTsmAttestor`]: TDX quote through Linux configfs-tsm
//!   (`<base>/<entry>/inblob` in, `<base>/<entry>/outblob` out)

use crate::config::{AttestationMode, AuctionConfig};
use crate::domain::errors::AttestationError;
use crate::domain::value_objects::{Quote, REPORT_DATA_LEN};
use crate::ports::outbound::Attestor;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Left-align `report_data` in a zeroed 64-byte buffer.
fn pad_report_data(report_data: &[u8]) -> Result<[u8; REPORT_DATA_LEN], AttestationError> {
    if report_data.len() > REPORT_DATA_LEN {
        return Err(AttestationError::ReportDataTooLong {
            len: report_data.len(),
        });
    }
    let mut padded = [0u8; REPORT_DATA_LEN];
    padded[..report_data.len()].copy_from_slice(report_data);
    Ok(padded)
}

/// Quote shaped like a version-1 TDX quote, carrying only the report data.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockAttestor;

#[async_trait]
impl Attestor for MockAttestor {
    async fn produce_attestation(&self, report_data: &[u8]) -> Result<Quote, AttestationError> {
        let padded = pad_report_data(report_data)?;
        let quote = serde_json::json!({
            "header": { "version": 1 },
            "td_quote_body": { "report_data": hex::encode(padded) },
        });
        Ok(Quote(quote.to_string().into_bytes()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// TDX quotes via the kernel's configfs-tsm report interface.
#[derive(Debug, Clone)]
pub struct ConfigFsTsmAttestor {
    report_path: PathBuf,
}

impl ConfigFsTsmAttestor {
    pub fn new(report_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
        }
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    async fn read_quote(entry: &Path, report_data: &[u8]) -> Result<Quote, AttestationError> {
        tokio::fs::write(entry.join("inblob"), report_data).await?;
        let quote = tokio::fs::read(entry.join("outblob")).await?;
        if quote.is_empty() {
            return Err(AttestationError::EmptyQuote);
        }
        Ok(Quote(quote))
    }
}

#[async_trait]
impl Attestor for ConfigFsTsmAttestor {
    async fn produce_attestation(&self, report_data: &[u8]) -> Result<Quote, AttestationError> {
        let padded = pad_report_data(report_data)?;

        // One entry per request; configfs creates inblob/outblob on mkdir
        let entry = self.report_path.join(format!("tob-{}", Uuid::new_v4()));
        tokio::fs::create_dir(&entry).await.map_err(|e| {
            AttestationError::Unavailable(format!("{}: {}", self.report_path.display(), e))
        })?;

        let result = Self::read_quote(&entry, &padded).await;

        if let Err(e) = tokio::fs::remove_dir(&entry).await {
            warn!(entry = %entry.display(), error = %e, "Failed to remove configfs-tsm report entry");
        }

        if let Ok(ref quote) = result {
            debug!(entry = %entry.display(), quote_len = quote.len(), "Read TDX quote");
        }
        result
    }

    fn name(&self) -> &'static str {
        "tdx-configfs-tsm"
    }
}

/// Build the attestor selected by `config.attestation`.
pub fn build_attestor(config: &AuctionConfig) -> Arc<dyn Attestor> {
    match config.attestation {
        AttestationMode::Mock => {
            info!("Using mock attestation");
            Arc::new(MockAttestor)
        }
        AttestationMode::Tdx => {
            if !config.tsm_report_path.exists() {
                warn!(
                    path = %config.tsm_report_path.display(),
                    "configfs-tsm report path not present; attestation requests will fail"
                );
            }
            info!(path = %config.tsm_report_path.display(), "Using TDX attestation via configfs-tsm");
            Arc::new(ConfigFsTsmAttestor::new(config.tsm_report_path.clone()))
        }
    }
}
