//! Instruction Processors
//!
//! Routes decoded instructions to their handlers. Each instruction has its
//! own file.

pub mod initialize;

use crate::{error::EscrowError, instruction::EscrowInstruction};
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
};

/// Main processor that routes instructions to specific handlers
pub struct Processor;

impl Processor {
    /// Process an Escrow Openbooks instruction
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        if *program_id != crate::id() {
            return Err(EscrowError::DeclaredProgramIdMismatch.into());
        }

        let instruction = EscrowInstruction::unpack(instruction_data)?;

        match instruction {
            EscrowInstruction::Initialize => {
                msg!("Instruction: Initialize");
                initialize::process(program_id, accounts)
            }
        }
    }
}
