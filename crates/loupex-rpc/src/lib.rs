//! Loupex RPC - HTTP adapters for Diamond introspection
//!
//! Provides:
//! - A JSON-RPC `eth_call` client implementing `ReadCall`
//! - Tenderly and Blockscout verification lookups
//! - Configuration loading (TOML file, `.env`, `LOUPEX__*` overrides)
//! - Snapshot JSON files and a one-shot `Inspector`

pub mod config;
pub mod errors;
pub mod inspector;
pub mod json_rpc;
pub mod snapshot_file;
pub mod verification;

// Re-export key types
pub use config::{DiamondTarget, LoupexConfig};
pub use errors::Result;
pub use inspector::{Inspection, Inspector};
pub use json_rpc::JsonRpcClient;
