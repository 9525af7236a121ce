//! wordstash-core: vocabulary ledger, definition cache, statistics, and
//! quiz/revision engines.
//!
//! Every component borrows one [`store::Store`] opened for the duration of a
//! command. External collaborators plug in through the traits in [`traits`].

pub mod cache;
pub mod error;
pub mod ledger;
pub mod model;
pub mod pool;
pub mod quiz;
pub mod revision;
pub mod statistics;
pub mod status;
pub mod store;
pub mod traits;

#[cfg(test)]
mod testing;

pub use cache::{LookupCache, RefreshReport};
pub use error::{FetchError, Result, WordstashError};
pub use ledger::WordLedger;
pub use model::{PoolFilter, StatusFlag, WordState};
pub use quiz::{QuizEngine, QuizOutcome};
pub use revision::{RevisionEngine, RevisionSummary};
pub use status::{StatusMachine, StatusOutcome};
pub use store::Store;
