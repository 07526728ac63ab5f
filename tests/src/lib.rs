//! # Chaincode Kit Test Suite
//!
//! Cross-crate flows exercising the mapping engine through the router.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── paper.rs          # Commercial paper chaincode used as the fixture
//! └── integration/      # Flows across cc-01, cc-02 and shared-types
//!     ├── commercial_paper.rs
//!     ├── batch.rs
//!     ├── dispatch.rs
//!     └── properties.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cc-tests
//!
//! # By category
//! cargo test -p cc-tests integration::dispatch::
//!
//! # Benchmarks
//! cargo bench -p cc-tests
//! ```

pub mod integration;
pub mod paper;
