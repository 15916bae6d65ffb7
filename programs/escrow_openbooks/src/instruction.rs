//! Instruction Types
//!
//! This module defines the instructions supported by the program and the
//! client-side builders for them.
//!
//! # Instruction Format
//!
//! ```text
//! [discriminator: 8 bytes][arguments: varies]
//! ```
//!
//! The discriminator is the first 8 bytes of `sha256("global:<name>")`,
//! where `<name>` is the snake_case instruction name.
//!
//! # Discriminator Values
//!
//! | Bytes | Instruction |
//! |-------|-------------|
//! | `[175, 175, 109, 31, 13, 152, 155, 237]` | Initialize |

use crate::error::EscrowError;
use solana_program::{hash::hash, instruction::Instruction, program_error::ProgramError, pubkey::Pubkey};

/// Length of the instruction discriminator prefix.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Namespace used when hashing instruction names.
pub const GLOBAL_NAMESPACE: &str = "global";

/// `sha256("global:initialize")[..8]`
pub const INITIALIZE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [175, 175, 109, 31, 13, 152, 155, 237];

/// Compute the discriminator for an instruction name.
///
/// ```ignore
/// assert_eq!(instruction_discriminator("initialize"), INITIALIZE_DISCRIMINATOR);
/// ```
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let preimage = format!("{}:{}", GLOBAL_NAMESPACE, name);
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..DISCRIMINATOR_LEN]);
    discriminator
}

// =============================================================================
// ESCROW INSTRUCTION ENUM
// =============================================================================

/// All instructions supported by the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowInstruction {
    /// Scaffold initializer. Takes no accounts and no arguments.
    ///
    /// # Data Layout
    ///
    /// ```text
    /// [0..8]: discriminator
    /// ```
    Initialize,
}

impl EscrowInstruction {
    /// Parse instruction data.
    ///
    /// # Errors
    ///
    /// * `InstructionMissing` - fewer than 8 bytes
    /// * `InstructionFallbackNotFound` - unknown discriminator
    /// * `InstructionDidNotDeserialize` - arguments left over after decoding
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        if input.len() < DISCRIMINATOR_LEN {
            return Err(EscrowError::InstructionMissing.into());
        }
        let (discriminator, rest) = input.split_at(DISCRIMINATOR_LEN);

        if discriminator != INITIALIZE_DISCRIMINATOR {
            return Err(EscrowError::InstructionFallbackNotFound.into());
        }

        // Initialize has no arguments, anything after the prefix is garbage
        if !rest.is_empty() {
            return Err(EscrowError::InstructionDidNotDeserialize.into());
        }
        Ok(EscrowInstruction::Initialize)
    }

    /// Serialize the instruction into its data bytes.
    pub fn pack(&self) -> Vec<u8> {
        match self {
            EscrowInstruction::Initialize => INITIALIZE_DISCRIMINATOR.to_vec(),
        }
    }

    /// snake_case name of the instruction, as it appears in the IDL.
    pub fn name(&self) -> &'static str {
        match self {
            EscrowInstruction::Initialize => "initialize",
        }
    }
}

// =============================================================================
// INSTRUCTION BUILDERS
// =============================================================================

/// Build an `initialize` instruction for the program deployed at `program_id`.
pub fn initialize(program_id: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![],
        data: EscrowInstruction::Initialize.pack(),
    }
}


/*
=============================================================================
DETAILED EXPLANATION
=============================================================================

DISCRIMINATORS
==============

A one-byte tag (0, 1, 2, ...) depends on declaration order. A hashed name
does not: adding `exchange` later never shifts the bytes of `initialize`.

    sha256("global:initialize") = afaf6d1f0d989bed ...
                                  └──────┬───────┘
                                   first 8 bytes

The same bytes appear in the generated IDL under `discriminator`, which is
how the harness and any Anchor client build the instruction without sharing
code with the program.

DISPATCH ORDER
==============

1. program id check       -> DeclaredProgramIdMismatch (4100)
2. data.len() < 8         -> InstructionMissing (100)
3. unknown discriminator  -> InstructionFallbackNotFound (101)
4. leftover argument data -> InstructionDidNotDeserialize (102)
5. handler

In a transaction log a failure shows up as the hex code, e.g.
"custom program error: 0x65" for 101.
*/
