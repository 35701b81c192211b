//! # TOB Auction Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Ranking and submission throughput
//! └── src/
//!     ├── fixtures.rs   # Shared builders and a recording attestor
//!     └── integration/  # Registry + service + IPC handler + JSON-RPC flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tob-tests
//! cargo test -p tob-tests integration::rpc
//! cargo bench -p tob-tests
//! ```

pub mod fixtures;
pub mod integration;
