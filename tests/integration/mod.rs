//! Integration Tests Module
//!
//! End-to-end tests for the verification engine: mode resolution against
//! stored preferences, provider selection, concurrent execution with
//! scripted gateways, aggregation, and the heuristic fallback.

// Scripted gateway, fixed analyzer, engine builders
mod support;

// execute() end to end
mod engine_test;

// Preference persistence through the SQLite repository
mod preference_test;

// Engine config file round trip and validation
mod config_test;
