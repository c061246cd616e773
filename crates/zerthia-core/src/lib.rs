//! Query routing, context assembly, session state, and configuration.

pub mod agent;
pub mod config;
pub mod context;
pub mod router;
pub mod session;
pub mod thoughts;

pub use agent::{Assistant, Strategy, TurnOutcome};
pub use config::Config;
pub use router::{QueryRouter, RouteDecision};
pub use session::{Session, UploadOutcome};
