//! # Escrow Openbooks Harness
//!
//! Off-chain client that proves a cluster is reachable and the Escrow
//! Openbooks program is deployed, by calling its `initialize` instruction
//! once and reporting the transaction signature.
//!
//! ```ignore
//! let config = HarnessConfig::from_env()?;
//! let program = ProgramHandle::resolve(&config, ESCROW_OPENBOOKS)?;
//! let harness = InitializeHarness::connect(&config, program)?;
//! let signature = harness.run_initialize_test(&mut std::io::stdout()).await?;
//! ```
//!
//! Configuration is read from the environment once and passed in
//! explicitly; the program handle is resolved before any request is made.

// =============================================================================
// MODULE DECLARATIONS
// =============================================================================

/// Explicit network configuration built from the environment
pub mod config;

/// Harness error taxonomy
pub mod error;

/// The initialize harness itself
pub mod harness;

/// Program handle resolution (built-in id or generated IDL)
pub mod program;

/// Cluster RPC seam and its JSON-RPC implementation
pub mod rpc;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use config::{Cluster, Commitment, HarnessConfig};
pub use error::{HarnessError, HarnessResult};
pub use harness::InitializeHarness;
pub use program::{ProgramHandle, ESCROW_OPENBOOKS};
pub use rpc::{AccountSummary, ClusterRpc, HttpRpc};
