//! Custom Error Types
//!
//! Errors the program can return. Codes follow the Anchor framework numbering
//! so that Anchor clients decode them the same way they would for a program
//! generated by `anchor init`.
//!
//! # Error Code Ranges
//!
//! | Range | Category |
//! |-------|----------|
//! | 100-999 | Instruction dispatch errors |
//! | 4100 | Program id errors |

use solana_program::program_error::ProgramError;
use thiserror::Error;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// Errors that may be returned by the Escrow Openbooks program.
///
/// Each variant carries an explicit code. Never renumber a variant after
/// deployment, clients match on the numeric value.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum EscrowError {
    /// Error 100: Instruction data is shorter than the 8-byte discriminator.
    #[error("8 byte instruction identifier not provided")]
    InstructionMissing = 100,

    /// Error 101: The discriminator does not match any instruction.
    #[error("Fallback functions are not supported")]
    InstructionFallbackNotFound = 101,

    /// Error 102: The discriminator matched but the arguments did not decode.
    #[error("The program could not deserialize the given instruction")]
    InstructionDidNotDeserialize = 102,

    /// Error 4100: The program was invoked under an id other than the declared one.
    #[error("The declared program id does not match the actual program id")]
    DeclaredProgramIdMismatch = 4100,
}

impl EscrowError {
    /// Numeric code reported to clients as `Custom(code)`.
    pub fn code(self) -> u32 {
        self as u32
    }
}

// =============================================================================
// CONVERSION TO PROGRAMERROR
// =============================================================================

/// Convert EscrowError to ProgramError so handlers can use `?` and `.into()`.
impl From<EscrowError> for ProgramError {
    fn from(e: EscrowError) -> Self {
        ProgramError::Custom(e.code())
    }
}
