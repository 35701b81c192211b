//! # Worker Registry
//!
//! Maps chain ids to their [`ChainWorker`]. Workers are created lazily on the
//! first auction registered for a chain and live until [`WorkerRegistry::shutdown`].
//!
//! Lookups take the read lock; creation re-checks under the write lock so two
//! concurrent first registrations for one chain end up sharing one worker.

use super::worker::ChainWorker;
use crate::config::AuctionConfig;
use crate::domain::errors::{AuctionError, Result};
use crate::domain::value_objects::ChainId;
use crate::ports::outbound::Attestor;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Chain id → worker map
pub struct WorkerRegistry {
    workers: RwLock<HashMap<ChainId, Arc<ChainWorker>>>,
    config: AuctionConfig,
    attestor: Arc<dyn Attestor>,
    shutdown_tx: watch::Sender<bool>,
}

impl WorkerRegistry {
    pub fn new(config: AuctionConfig, attestor: Arc<dyn Attestor>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            workers: RwLock::new(HashMap::new()),
            config,
            attestor,
            shutdown_tx,
        }
    }

    /// Worker for `chain_id`, creating and starting it if absent.
    ///
    /// Fails with [`AuctionError::ShuttingDown`] once [`shutdown`](Self::shutdown)
    /// has been requested. Must be called inside a tokio runtime.
    pub fn resolve(&self, chain_id: ChainId) -> Result<Arc<ChainWorker>> {
        if self.is_shutting_down() {
            return Err(AuctionError::ShuttingDown);
        }
        if let Some(worker) = self.workers.read().get(&chain_id) {
            return Ok(Arc::clone(worker));
        }

        let mut workers = self.workers.write();
        // Re-checked under the write lock so shutdown never misses a new worker
        if self.is_shutting_down() {
            return Err(AuctionError::ShuttingDown);
        }
        let worker = workers.entry(chain_id).or_insert_with(|| {
            info!(chain_id, "Starting worker for new chain");
            ChainWorker::spawn(
                chain_id,
                self.config.clone(),
                Arc::clone(&self.attestor),
                self.shutdown_tx.subscribe(),
            )
        });
        Ok(Arc::clone(worker))
    }

    /// Worker for `chain_id`, if one exists.
    pub fn get(&self, chain_id: ChainId) -> Option<Arc<ChainWorker>> {
        self.workers.read().get(&chain_id).cloned()
    }

    /// Known chains, ascending
    pub fn chain_ids(&self) -> Vec<ChainId> {
        let mut ids: Vec<_> = self.workers.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.workers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.read().is_empty()
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Stop every queue processor and wait for them to exit.
    ///
    /// Active auctions are left unfinalized. Idempotent.
    pub async fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);

        let workers: Vec<_> = self.workers.read().values().cloned().collect();
        info!(workers = workers.len(), "Shutting down chain workers");
        for worker in workers {
            worker.join().await;
        }
    }
}

impl std::fmt::Debug for WorkerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerRegistry")
            .field("chains", &self.chain_ids())
            .field("attestor", &self.attestor.name())
            .finish()
    }
}
