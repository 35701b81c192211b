//! IPC Handler for the auction service
//!
//! Converts wire payloads to domain entities and delegates to [`AuctionApi`].
//! `AddAuction` and `SubmitBids` report failures in-band (`success = false`);
//! the getters return errors.

use crate::domain::entities::{AuctionInfo, Bid};
use crate::domain::errors::Result;
use crate::ipc::payloads::{
    AddAuctionRequest, AddAuctionResponse, ChainRequest, GetAuctionInfoResponse,
    GetAuctionStateResponse, GetLatestTobResponse, SubmitBidsRequest, SubmitBidsResponse,
};
use crate::ports::inbound::AuctionApi;
use std::sync::Arc;
use tracing::{debug, warn};

/// Request handler shared by every RPC transport.
#[derive(Clone)]
pub struct AuctionHandler {
    api: Arc<dyn AuctionApi>,
}

impl AuctionHandler {
    pub fn new(api: Arc<dyn AuctionApi>) -> Self {
        Self { api }
    }

    pub async fn handle_add_auction(&self, request: AddAuctionRequest) -> AddAuctionResponse {
        let outcome = match AuctionInfo::try_from(request.auction_info) {
            Ok(info) => self.api.add_auction(info).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => AddAuctionResponse {
                success: true,
                message: "Auction added successfully".to_string(),
            },
            Err(e) => {
                warn!(error = %e, "AddAuction failed");
                AddAuctionResponse {
                    success: false,
                    message: e.to_string(),
                }
            }
        }
    }

    pub async fn handle_submit_bids(&self, request: SubmitBidsRequest) -> SubmitBidsResponse {
        let bids: Vec<Bid> = request.bid_list.into_iter().map(Into::into).collect();
        debug!(
            chain_id = request.chain_id,
            auction_id = %request.auction_id,
            count = bids.len(),
            "SubmitBids"
        );

        match self
            .api
            .submit_bids(request.chain_id, &request.auction_id, bids)
            .await
        {
            Ok(()) => SubmitBidsResponse {
                success: true,
                message: "Bids submitted successfully".to_string(),
            },
            Err(e) => SubmitBidsResponse {
                success: false,
                message: e.to_string(),
            },
        }
    }

    pub async fn handle_get_auction_info(
        &self,
        request: ChainRequest,
    ) -> Result<GetAuctionInfoResponse> {
        let info = self.api.get_auction_info(request.chain_id).await?;
        Ok(GetAuctionInfoResponse {
            auction_info: info.into(),
        })
    }

    pub async fn handle_get_auction_state(
        &self,
        request: ChainRequest,
    ) -> Result<GetAuctionStateResponse> {
        let state = self.api.get_auction_state(request.chain_id).await?;
        Ok(GetAuctionStateResponse {
            state: state.map(Into::into),
        })
    }

    pub async fn handle_get_latest_tob(&self, request: ChainRequest) -> Result<GetLatestTobResponse> {
        let tob = self.api.get_latest_tob(request.chain_id).await?;
        Ok(GetLatestTobResponse {
            tx_list: tob.into_iter().map(Into::into).collect(),
        })
    }
}

impl std::fmt::Debug for AuctionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuctionHandler").finish_non_exhaustive()
    }
}
