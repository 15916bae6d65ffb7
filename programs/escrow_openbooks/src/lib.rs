//! # Escrow Openbooks
//!
//! On-chain program scaffold for the Escrow Openbooks workspace.
//!
//! ## Overview
//!
//! The program exposes a single instruction, `initialize`, which takes no
//! accounts and no arguments and succeeds without touching any state. It is
//! the target the off-chain harness (`escrow_openbooks_harness`) calls to
//! prove that the cluster is reachable and the program is deployed.
//!
//! ## Instructions
//!
//! | Discriminator | Instruction | Description |
//! |---------------|-------------|-------------|
//! | `sha256("global:initialize")[..8]` | Initialize | No-op, logs and succeeds |
//!
//! Instruction data uses the same 8-byte discriminator scheme as Anchor
//! programs, so Anchor clients and the generated IDL can address it.

// =============================================================================
// MODULE DECLARATIONS
// =============================================================================

/// Program entrypoint - where Solana calls into our program
pub mod entrypoint;

/// Custom error types with Anchor-compatible codes
pub mod error;

/// Instruction definitions, parsing and client-side builders
pub mod instruction;

/// Instruction processors
pub mod processor;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use error::EscrowError;
pub use instruction::EscrowInstruction;
pub use processor::Processor;

// =============================================================================
// PROGRAM ID
// =============================================================================

solana_program::declare_id!("4EFSQt73xMA7Mtaw8tsMd27kVyJH9KiBzEeYQhFrtT1E");

/// Name the program is registered under in the workspace (`target/idl`, `target/deploy`).
pub const PROGRAM_NAME: &str = "escrow_openbooks";
