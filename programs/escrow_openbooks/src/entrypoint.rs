//! Program Entrypoint
//!
//! The Solana runtime calls into this module for every instruction that
//! targets the Escrow Openbooks program.

// Only compile this module if the "no-entrypoint" feature is NOT enabled
#![cfg(not(feature = "no-entrypoint"))]

use crate::processor::Processor;
use solana_program::{
    account_info::AccountInfo,
    entrypoint,
    entrypoint::ProgramResult,
    pubkey::Pubkey,
};

entrypoint!(process_instruction);

/// Entrypoint for the Escrow Openbooks program.
///
/// # Arguments
///
/// * `program_id` - The public key the program was invoked as
/// * `accounts` - Accounts passed with the instruction (unused by `initialize`)
/// * `instruction_data` - Discriminator followed by serialized arguments
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    Processor::process(program_id, accounts, instruction_data)
}
