//! Services
//!
//! Business logic of the verification engine. Storage and models are
//! consumed from their own modules; nothing here touches the network.

pub mod verification;

pub use verification::{HeuristicAnalyzer, VerificationEngine};
