pub mod client;
pub mod protocol;

pub use client::{spawn_advice_request, AdviceOutcome, AdvisorClient, AdvisorError};
pub use protocol::{ActionValue, Advice, AdvisorRequest, SnapshotError};
