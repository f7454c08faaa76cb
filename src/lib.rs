#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod advisor;
pub mod cli;
pub mod coords;
pub mod counts;
pub mod geometry;
pub mod scenario;
pub mod store;
pub mod template;
pub mod types;

pub use advisor::{Advice, AdvisorClient, AdvisorError, AdvisorRequest};
pub use coords::CubeCoord;
pub use store::BoardStore;
pub use template::{BoardTemplate, EdgeId, NodeId};
pub use types::Color;
