//! Chain Worker: the per-chain auction scheduling engine
//!
//! Owns one time-ordered queue of pending auctions and one active-auction
//! slot, both behind a single `RwLock`. A single queue-processor task per
//! chain moves auctions from the queue into the slot at their start time,
//! re-ranks bids while the auction is open and freezes the ranking at the
//! end time.
//!
//! ## Wake-up discipline
//!
//! The processor waits on a single-permit [`Notify`]. `notify_one` stores a
//! permit when nobody is waiting, so an enqueue that races with the
//! processor between "peek head" and "start waiting" is never lost: the
//! next `notified().await` returns immediately and the head is re-peeked.
//!
//! The lock is never held across an `.await`.

use crate::algorithms::report_data;
use crate::config::AuctionConfig;
use crate::domain::entities::{AuctionInfo, AuctionState, Bid, Transaction};
use crate::domain::errors::{AuctionError, Result};
use crate::domain::invariants;
use crate::domain::queue::AuctionQueue;
use crate::domain::value_objects::{AuctionId, AuctionStatus, ChainId, ReportData};
use crate::ports::outbound::Attestor;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Instant;
use tob_telemetry::{
    ATTESTATIONS, AUCTIONS_ACTIVATED, AUCTIONS_ENQUEUED, AUCTIONS_FINALIZED, BIDS_ACCEPTED,
    BID_REJECTIONS, ENQUEUE_REJECTIONS, QUEUE_DEPTH, RANKING_DURATION,
};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

/// Queue and active slot, guarded together
#[derive(Debug, Default)]
struct WorkerState {
    queue: AuctionQueue,
    active: Option<AuctionState>,
}

/// Scheduling engine for one chain
pub struct ChainWorker {
    chain_id: ChainId,
    /// `chain_id` as a metrics label
    chain_label: String,
    config: AuctionConfig,
    state: RwLock<WorkerState>,
    /// Wakes the queue processor when the queue head may have changed
    queue_changed: Notify,
    /// Wakes the active-auction updater after a bid submission
    bids_changed: Notify,
    attestor: Arc<dyn Attestor>,
    processor: Mutex<Option<JoinHandle<()>>>,
}

impl ChainWorker {
    /// Create a worker without starting its queue processor.
    pub fn new(chain_id: ChainId, config: AuctionConfig, attestor: Arc<dyn Attestor>) -> Self {
        Self {
            chain_id,
            chain_label: chain_id.to_string(),
            config,
            state: RwLock::new(WorkerState::default()),
            queue_changed: Notify::new(),
            bids_changed: Notify::new(),
            attestor,
            processor: Mutex::new(None),
        }
    }

    /// Create a worker and start its queue processor on the current tokio runtime.
    ///
    /// The processor stops once `shutdown` turns `true` or its sender is dropped.
    pub fn spawn(
        chain_id: ChainId,
        config: AuctionConfig,
        attestor: Arc<dyn Attestor>,
        shutdown: watch::Receiver<bool>,
    ) -> Arc<Self> {
        let worker = Arc::new(Self::new(chain_id, config, attestor));
        let handle = tokio::spawn(Arc::clone(&worker).run_queue_processor(shutdown));
        *worker.processor.lock() = Some(handle);
        worker
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    // =========================================================================
    // CALLER OPERATIONS
    // =========================================================================

    /// Validate and queue an auction, waking the processor if it became the head.
    pub fn enqueue(&self, info: AuctionInfo) -> Result<()> {
        let result = self.try_enqueue(info);
        if let Err(ref e) = result {
            ENQUEUE_REJECTIONS.with_label_values(&[e.kind().as_str()]).inc();
            debug!(chain_id = self.chain_id, error = %e, "Auction rejected");
        }
        result
    }

    fn try_enqueue(&self, info: AuctionInfo) -> Result<()> {
        if info.chain_id != self.chain_id {
            return Err(AuctionError::WrongChain {
                expected: self.chain_id,
                got: info.chain_id,
            });
        }
        invariants::check_time_range(&info)?;
        invariants::check_start_not_past(&info, Utc::now())?;

        let auction_id = info.auction_id.clone();
        let start_time = info.start_time;

        let (became_head, depth) = {
            let mut state = self.state.write();
            let is_active = state
                .active
                .as_ref()
                .is_some_and(|active| !active.ended && active.auction_id() == auction_id);
            if is_active || state.queue.contains(&auction_id) {
                return Err(AuctionError::DuplicateAuction(auction_id));
            }
            let became_head = state.queue.push(info);
            (became_head, state.queue.len())
        };

        QUEUE_DEPTH
            .with_label_values(&[self.chain_label.as_str()])
            .set(depth as f64);
        AUCTIONS_ENQUEUED.inc();
        info!(
            chain_id = self.chain_id,
            auction_id = %auction_id,
            start_time = %start_time,
            queue_depth = depth,
            "Enqueued auction"
        );

        if became_head {
            self.queue_changed.notify_one();
        }
        Ok(())
    }

    /// Append bids to the active auction `auction_id`.
    pub fn submit_bids(&self, auction_id: &str, bids: Vec<Bid>) -> Result<()> {
        let result = self.try_submit_bids(auction_id, bids);
        if let Err(ref e) = result {
            BID_REJECTIONS.with_label_values(&[e.kind().as_str()]).inc();
            debug!(chain_id = self.chain_id, auction_id, error = %e, "Bids rejected");
        }
        result
    }

    fn try_submit_bids(&self, auction_id: &str, bids: Vec<Bid>) -> Result<()> {
        invariants::check_bid_targets(self.chain_id, auction_id, &bids)?;
        invariants::check_bid_sizes(&bids, self.config.max_txs_per_bid)?;

        let count = bids.len();
        {
            let mut state = self.state.write();
            let active = state
                .active
                .as_mut()
                .ok_or(AuctionError::NoActiveAuction(self.chain_id))?;
            if active.auction_id() != auction_id {
                return Err(AuctionError::AuctionIdMismatch {
                    active: active.auction_id().to_string(),
                    got: auction_id.to_string(),
                });
            }
            // Past the end time the auction is closed even before the updater freezes it
            if active.ended || active.info.has_expired(Utc::now()) {
                return Err(AuctionError::AuctionEnded(auction_id.to_string()));
            }
            invariants::check_bid_capacity(
                active.bids.len(),
                count,
                self.config.max_bids_per_auction,
            )?;
            active.append_bids(bids);
        }

        BIDS_ACCEPTED.inc_by(count as f64);
        info!(chain_id = self.chain_id, auction_id, count, "Received bids");
        self.bids_changed.notify_one();
        Ok(())
    }

    /// Info of the auction in the active slot (ended auctions stay until replaced).
    pub fn active_info(&self) -> Option<AuctionInfo> {
        self.state
            .read()
            .active
            .as_ref()
            .map(|active| active.info.clone())
    }

    /// Copy of the active slot; never observes a half-finished ranking pass.
    pub fn state_snapshot(&self) -> Option<AuctionState> {
        self.state.read().active.clone()
    }

    /// Ranked transactions of the auction in the active slot.
    pub fn latest_tob(&self) -> Vec<Transaction> {
        self.state
            .read()
            .active
            .as_ref()
            .map(|active| active.tob.clone())
            .unwrap_or_default()
    }

    pub fn queue_len(&self) -> usize {
        self.state.read().queue.len()
    }

    /// Queued auctions in activation order
    pub fn pending_auctions(&self) -> Vec<AuctionInfo> {
        self.state.read().queue.iter().cloned().collect()
    }

    /// Where `auction_id` currently is in its lifecycle, if this worker knows it.
    pub fn status_of(&self, auction_id: &str) -> Option<AuctionStatus> {
        let state = self.state.read();
        match state.active.as_ref() {
            Some(active) if active.auction_id() == auction_id && !active.ended => {
                Some(AuctionStatus::Active)
            }
            _ if state.queue.contains(auction_id) => Some(AuctionStatus::Queued),
            Some(active) if active.auction_id() == auction_id => Some(AuctionStatus::Ended),
            _ => None,
        }
    }

    /// Finalize the active auction if its end time has passed.
    ///
    /// Returns `true` if this call performed the `Active → Ended` transition.
    /// Must run inside a tokio runtime: the attestation request is spawned.
    pub fn finalize_if_expired(&self) -> bool {
        let Some((auction_id, bid_count, tx_count, report)) = self.freeze_expired() else {
            return false;
        };

        AUCTIONS_FINALIZED.inc();
        info!(
            chain_id = self.chain_id,
            auction_id = %auction_id,
            bids = bid_count,
            transactions = tx_count,
            "Auction ended"
        );

        self.request_attestation(auction_id, report);
        true
    }

    /// Wait for the queue processor to exit (after shutdown was signalled).
    pub async fn join(&self) {
        let handle = self.processor.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(chain_id = self.chain_id, error = %e, "Queue processor task failed");
            }
        }
    }

    // =========================================================================
    // QUEUE PROCESSOR
    // =========================================================================

    async fn run_queue_processor(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(chain_id = self.chain_id, "Queue processor started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let head_start = self.state.read().queue.peek().map(|info| info.start_time);
            let start_time = match head_start {
                Some(start_time) => start_time,
                None => {
                    tokio::select! {
                        _ = self.queue_changed.notified() => {}
                        _ = shutdown.changed() => break,
                    }
                    continue;
                }
            };

            let now = Utc::now();
            if now < start_time {
                let wait = (start_time - now).to_std().unwrap_or_default();
                trace!(chain_id = self.chain_id, ?wait, "Waiting for queue head");
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = self.queue_changed.notified() => {
                        debug!(chain_id = self.chain_id, "Queue changed, re-checking head");
                    }
                    _ = shutdown.changed() => break,
                }
                continue;
            }

            let due = {
                let mut state = self.state.write();
                let due = state.queue.pop_due(Utc::now());
                QUEUE_DEPTH
                    .with_label_values(&[self.chain_label.as_str()])
                    .set(state.queue.len() as f64);
                due
            };

            if let Some(info) = due {
                if !self.run_auction(info, &mut shutdown).await {
                    break;
                }
            }
        }

        info!(chain_id = self.chain_id, "Queue processor stopped");
    }

    /// Activate `info` and keep its ranking current until the end time.
    ///
    /// Returns `false` if shutdown interrupted the auction; it is then left
    /// active and unfinalized.
    async fn run_auction(&self, info: AuctionInfo, shutdown: &mut watch::Receiver<bool>) -> bool {
        let auction_id = info.auction_id.clone();
        let end_time = info.end_time;
        self.activate(info);

        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            let now = Utc::now();
            if now >= end_time {
                self.finalize_if_expired();
                return true;
            }

            let until_end = (end_time - now).to_std().unwrap_or_default();
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.bids_changed.notified() => {}
                _ = tokio::time::sleep(until_end) => {}
                _ = shutdown.changed() => {
                    info!(
                        chain_id = self.chain_id,
                        auction_id = %auction_id,
                        "Shutdown requested, stopping auction updater"
                    );
                    return false;
                }
            }

            if Utc::now() < end_time {
                self.rerank(&auction_id);
            }
        }
    }

    fn activate(&self, info: AuctionInfo) {
        let auction_id = info.auction_id.clone();
        let late = info.has_expired(Utc::now());

        let previous = self.state.write().active.replace(AuctionState::new(info));
        if let Some(previous) = previous {
            debug!(
                chain_id = self.chain_id,
                previous = %previous.auction_id(),
                ended = previous.ended,
                "Replacing previous auction state"
            );
        }

        AUCTIONS_ACTIVATED.inc();
        if late {
            warn!(
                chain_id = self.chain_id,
                auction_id = %auction_id,
                "Auction activated after its end time; finalizing without bids"
            );
        } else {
            info!(chain_id = self.chain_id, auction_id = %auction_id, "Initializing auction");
        }
    }

    fn rerank(&self, auction_id: &str) {
        let started = Instant::now();
        let ranked = {
            let mut state = self.state.write();
            match state.active.as_mut() {
                Some(active) if active.auction_id() == auction_id => {
                    Some((active.bids.len(), active.rerank()))
                }
                _ => None,
            }
        };
        RANKING_DURATION.observe(started.elapsed().as_secs_f64());

        if let Some((bids, transactions)) = ranked {
            trace!(
                chain_id = self.chain_id,
                auction_id,
                bids,
                transactions,
                "Auction running, TOB re-ranked"
            );
        }
    }

    /// Final ranking pass and `ended = true`, all under one write lock.
    fn freeze_expired(&self) -> Option<(AuctionId, usize, usize, ReportData)> {
        let started = Instant::now();
        let mut state = self.state.write();
        let active = state.active.as_mut()?;
        if !active.info.has_expired(Utc::now()) || !active.finalize() {
            return None;
        }
        RANKING_DURATION.observe(started.elapsed().as_secs_f64());

        let report = report_data(self.chain_id, active.auction_id(), &active.tob);
        Some((
            active.auction_id().to_string(),
            active.bids.len(),
            active.tob.len(),
            report,
        ))
    }

    /// Detached: the processor never waits for the attestor.
    fn request_attestation(&self, auction_id: AuctionId, report: ReportData) {
        let attestor = Arc::clone(&self.attestor);
        let chain_id = self.chain_id;

        tokio::spawn(async move {
            match attestor.produce_attestation(report.as_bytes()).await {
                Ok(quote) => {
                    ATTESTATIONS.with_label_values(&["success"]).inc();
                    info!(
                        chain_id,
                        auction_id = %auction_id,
                        provider = attestor.name(),
                        report_data = %report.to_hex(),
                        quote_len = quote.len(),
                        "Attestation produced"
                    );
                }
                Err(e) => {
                    ATTESTATIONS.with_label_values(&["failure"]).inc();
                    warn!(
                        chain_id,
                        auction_id = %auction_id,
                        provider = attestor.name(),
                        error = %e,
                        "Failed to get quote"
                    );
                }
            }
        });
    }
}

impl std::fmt::Debug for ChainWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainWorker")
            .field("chain_id", &self.chain_id)
            .field("attestor", &self.attestor.name())
            .finish_non_exhaustive()
    }
}
