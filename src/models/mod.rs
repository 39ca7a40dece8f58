//! Data Models
//!
//! Request, verdict, preference, and settings structures used by the engine.

pub mod preferences;
pub mod request;
pub mod settings;
pub mod verdict;

pub use preferences::*;
pub use request::*;
pub use settings::*;
pub use verdict::*;
