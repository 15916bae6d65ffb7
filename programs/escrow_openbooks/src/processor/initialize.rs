//! Initialize Instruction Processor

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

/// Process Initialize instruction
///
/// Accounts expected: none. Extra accounts are accepted and ignored.
pub fn process(_program_id: &Pubkey, _accounts: &[AccountInfo]) -> ProgramResult {
    Ok(())
}
