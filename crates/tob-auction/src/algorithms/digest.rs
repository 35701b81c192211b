//! Digest of a finalized auction, bound into the attestation quote
//!
//! SHA-512 yields exactly the 64 bytes of quote report data. Every
//! variable-length field is length-prefixed so distinct results cannot
//! produce the same preimage.

use crate::domain::entities::Transaction;
use crate::domain::value_objects::{ChainId, ReportData, REPORT_DATA_LEN};
use sha2::{Digest, Sha512};

/// Report data for the finalized TOB of `auction_id` on `chain_id`.
pub fn report_data(chain_id: ChainId, auction_id: &str, tob: &[Transaction]) -> ReportData {
    let mut hasher = Sha512::new();
    hasher.update(chain_id.to_be_bytes());
    update_prefixed(&mut hasher, auction_id.as_bytes());
    hasher.update((tob.len() as u64).to_be_bytes());
    for tx in tob {
        update_prefixed(&mut hasher, tx.data.as_bytes());
    }

    let mut out = [0u8; REPORT_DATA_LEN];
    out.copy_from_slice(&hasher.finalize());
    ReportData(out)
}

fn update_prefixed(hasher: &mut Sha512, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txs(data: &[&str]) -> Vec<Transaction> {
        data.iter().map(|d| Transaction::new(*d)).collect()
    }

    #[test]
    fn test_deterministic() {
        let a = report_data(1, "a-1", &txs(&["b", "c", "a"]));
        let b = report_data(1, "a-1", &txs(&["b", "c", "a"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sensitive_to_order_and_context() {
        let base = report_data(1, "a-1", &txs(&["b", "c", "a"]));

        assert_ne!(base, report_data(1, "a-1", &txs(&["a", "b", "c"])));
        assert_ne!(base, report_data(2, "a-1", &txs(&["b", "c", "a"])));
        assert_ne!(base, report_data(1, "a-2", &txs(&["b", "c", "a"])));
    }

    #[test]
    fn test_length_prefix_separates_boundaries() {
        assert_ne!(
            report_data(1, "a", &txs(&["ab", "c"])),
            report_data(1, "a", &txs(&["a", "bc"]))
        );
    }
}
