//! Testing utilities and mock implementations for E2E tests.
//!
//! `MockLedger` stands in for both ledger collaborators (submission and
//! query), allowing full batch flows to be exercised without a gateway.

mod mock_ledger;

pub use mock_ledger::MockLedger;
