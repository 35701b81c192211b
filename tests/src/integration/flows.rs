//! # Auction Lifecycle Flows
//!
//! Drives the service the way callers do: register auctions, submit bids
//! while they run, read the final TOB, and check the attestation request
//! that finalization emits.

#[cfg(test)]
mod tests {
    use crate::fixtures::{auction, bid, test_service, wait_until};
    use std::time::Duration;
    use tob_auction::{report_data, AuctionApi, AuctionError, AuctionStatus, Transaction};

    fn tx_data(txs: Vec<Transaction>) -> Vec<String> {
        txs.into_iter().map(|t| t.data).collect()
    }

    #[tokio::test]
    async fn test_full_auction_lifecycle() {
        let (service, attestor) = test_service();
        service.add_auction(auction(1, "X", 50, 450)).await.unwrap();
        let worker = service.registry().get(1).unwrap();

        assert!(
            wait_until(Duration::from_secs(1), || {
                worker.status_of("X") == Some(AuctionStatus::Active)
            })
            .await
        );
        assert_eq!(service.get_auction_info(1).await.unwrap().auction_id, "X");

        service
            .submit_bids(1, "X", vec![bid(1, "X", 5, &["a"])])
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        service
            .submit_bids(1, "X", vec![bid(1, "X", 9, &["b", "c"])])
            .await
            .unwrap();

        assert!(
            wait_until(Duration::from_secs(2), || {
                worker.status_of("X") == Some(AuctionStatus::Ended)
            })
            .await
        );

        let tob = service.get_latest_tob(1).await.unwrap();
        assert_eq!(tx_data(tob.clone()), vec!["b", "c", "a"]);

        let state = service.get_auction_state(1).await.unwrap().unwrap();
        assert!(state.ended);
        assert_eq!(state.bids.len(), 2);
        assert_eq!(state.tob, tob);

        let err = service
            .submit_bids(1, "X", vec![bid(1, "X", 100, &["z"])])
            .await
            .unwrap_err();
        assert_eq!(err, AuctionError::AuctionEnded("X".to_string()));

        assert!(wait_until(Duration::from_secs(1), || attestor.reports().len() == 1).await);
        assert_eq!(
            attestor.reports()[0],
            report_data(1, "X", &tob).as_bytes().to_vec()
        );
    }

    #[tokio::test]
    async fn test_queue_runs_back_to_back_auctions() {
        let (service, attestor) = test_service();

        // Registered out of order
        service.add_auction(auction(1, "third", 400, 550)).await.unwrap();
        service.add_auction(auction(1, "first", 50, 200)).await.unwrap();
        service.add_auction(auction(1, "second", 220, 380)).await.unwrap();

        let worker = service.registry().get(1).unwrap();
        let pending: Vec<_> = worker
            .pending_auctions()
            .into_iter()
            .map(|info| info.auction_id)
            .collect();
        assert_eq!(pending, vec!["first", "second", "third"]);

        let mut seen = Vec::new();
        let done = wait_until(Duration::from_secs(3), || {
            if let Some(info) = worker.active_info() {
                if seen.last() != Some(&info.auction_id) {
                    seen.push(info.auction_id);
                }
            }
            worker.status_of("third") == Some(AuctionStatus::Ended)
        })
        .await;

        assert!(done);
        assert_eq!(seen, vec!["first", "second", "third"]);
        assert!(wait_until(Duration::from_secs(1), || attestor.reports().len() == 3).await);
    }

    #[tokio::test]
    async fn test_chains_run_independently() {
        let (service, _attestor) = test_service();
        service.add_auction(auction(1, "a", 30, 300)).await.unwrap();
        service.add_auction(auction(2, "a", 30, 300)).await.unwrap();

        let one = service.registry().get(1).unwrap();
        let two = service.registry().get(2).unwrap();
        assert!(
            wait_until(Duration::from_secs(1), || {
                one.active_info().is_some() && two.active_info().is_some()
            })
            .await
        );

        service
            .submit_bids(1, "a", vec![bid(1, "a", 1, &["chain-one"])])
            .await
            .unwrap();
        service
            .submit_bids(2, "a", vec![bid(2, "a", 1, &["chain-two"])])
            .await
            .unwrap();

        // A bid addressed to chain 1 is refused by chain 2
        let err = service
            .submit_bids(2, "a", vec![bid(1, "a", 50, &["cross"])])
            .await
            .unwrap_err();
        assert!(matches!(err, AuctionError::BidTargetMismatch { .. }));

        assert!(
            wait_until(Duration::from_secs(2), || {
                one.status_of("a") == Some(AuctionStatus::Ended)
                    && two.status_of("a") == Some(AuctionStatus::Ended)
            })
            .await
        );
        assert_eq!(tx_data(service.get_latest_tob(1).await.unwrap()), vec!["chain-one"]);
        assert_eq!(tx_data(service.get_latest_tob(2).await.unwrap()), vec!["chain-two"]);
    }

    #[tokio::test]
    async fn test_equal_amounts_keep_submission_order() {
        let (service, _attestor) = test_service();
        service.add_auction(auction(1, "X", 20, 250)).await.unwrap();
        let worker = service.registry().get(1).unwrap();
        assert!(wait_until(Duration::from_secs(1), || worker.active_info().is_some()).await);

        service
            .submit_bids(
                1,
                "X",
                vec![
                    bid(1, "X", 7, &["first"]),
                    bid(1, "X", 7, &["second"]),
                    bid(1, "X", 3, &["low"]),
                ],
            )
            .await
            .unwrap();
        service
            .submit_bids(1, "X", vec![bid(1, "X", 7, &["third"])])
            .await
            .unwrap();

        assert!(
            wait_until(Duration::from_secs(2), || {
                worker.status_of("X") == Some(AuctionStatus::Ended)
            })
            .await
        );
        assert_eq!(
            tx_data(service.get_latest_tob(1).await.unwrap()),
            vec!["first", "second", "third", "low"]
        );
    }

    #[tokio::test]
    async fn test_shutdown_leaves_auction_unfinalized() {
        let (service, attestor) = test_service();
        service.add_auction(auction(1, "X", 20, 60_000)).await.unwrap();
        let worker = service.registry().get(1).unwrap();
        assert!(wait_until(Duration::from_secs(1), || worker.active_info().is_some()).await);

        tokio::time::timeout(Duration::from_secs(1), service.registry().shutdown())
            .await
            .expect("shutdown should not wait for the auction end");

        let state = service.get_auction_state(1).await.unwrap().unwrap();
        assert!(!state.ended);
        assert!(attestor.reports().is_empty());
    }
}
