//! # Hashpin Test Suite
//!
//! Unified test crate containing cross-module integration flows:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── chain_flows.rs      # skipchain lookup + proof scenarios
//!     ├── tree_flows.rs       # search tree lookup + proof scenarios
//!     └── store_integrity.rs  # content addressing end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hashpin-tests
//! ```

pub mod integration;
