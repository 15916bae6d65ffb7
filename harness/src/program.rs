//! Program Handle
//!
//! A [`ProgramHandle`] is the client-side reference to the deployed program.
//! It is resolved once, up front, and passed to the harness by value, so a
//! bad name or a broken IDL fails before anything touches the network.
//!
//! # IDL Layouts
//!
//! Both layouts produced by `anchor build` are accepted:
//!
//! ```text
//! current:  { "address": "<id>", "metadata": { "name": "escrow_openbooks" }, "instructions": [...] }
//! legacy:   { "name": "escrow_openbooks", "metadata": { "address": "<id>" }, "instructions": [...] }
//! ```

use crate::{
    config::HarnessConfig,
    error::{HarnessError, HarnessResult},
};
use escrow_openbooks::instruction::{self, EscrowInstruction};
use serde::Deserialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use std::{fs, path::Path, str::FromStr};

/// Workspace name of the Escrow Openbooks program.
pub const ESCROW_OPENBOOKS: &str = "EscrowOpenbooks";

// =============================================================================
// IDL
// =============================================================================

#[derive(Debug, Deserialize)]
struct IdlMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdlInstruction {
    name: String,
}

/// Subset of an Anchor IDL needed to resolve a program.
#[derive(Debug, Deserialize)]
struct Idl {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    metadata: Option<IdlMetadata>,
    #[serde(default)]
    instructions: Vec<IdlInstruction>,
}

impl Idl {
    fn program_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .or(self.name.as_deref())
    }

    fn program_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .or_else(|| self.metadata.as_ref().and_then(|m| m.address.as_deref()))
    }

    fn has_instruction(&self, name: &str) -> bool {
        self.instructions.iter().any(|ix| ix.name == name)
    }
}

/// Convert a snake_case program name to its PascalCase workspace name.
///
/// `escrow_openbooks` → `EscrowOpenbooks`
pub fn workspace_name(program_name: &str) -> String {
    program_name
        .split(|c| c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

// =============================================================================
// PROGRAM HANDLE
// =============================================================================

/// Client-side reference to the deployed Escrow Openbooks program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramHandle {
    name: String,
    program_id: Pubkey,
}

impl ProgramHandle {
    pub fn new(name: impl Into<String>, program_id: Pubkey) -> Self {
        Self {
            name: name.into(),
            program_id,
        }
    }

    /// Handle for the program id compiled into the `escrow_openbooks` crate.
    pub fn escrow_openbooks() -> Self {
        Self::new(ESCROW_OPENBOOKS, escrow_openbooks::id())
    }

    /// Resolve `name` against the IDL at `path`.
    ///
    /// # Errors
    ///
    /// `ProgramNotFound` if the file is missing or malformed, declares a
    /// different program, has no valid address, or lacks `initialize`.
    pub fn from_idl(path: impl AsRef<Path>, name: &str) -> HarnessResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            HarnessError::program_not_found(name, format!("cannot read IDL {}: {}", path.display(), e))
        })?;
        Self::from_idl_json(&raw, name)
    }

    /// Resolve `name` against IDL JSON already in memory.
    pub fn from_idl_json(raw: &str, name: &str) -> HarnessResult<Self> {
        let idl: Idl = serde_json::from_str(raw)
            .map_err(|e| HarnessError::program_not_found(name, format!("malformed IDL: {e}")))?;

        let idl_name = idl
            .program_name()
            .ok_or_else(|| HarnessError::program_not_found(name, "IDL has no program name"))?;
        if workspace_name(idl_name) != name {
            return Err(HarnessError::program_not_found(
                name,
                format!("IDL describes `{}`", workspace_name(idl_name)),
            ));
        }

        let address = idl
            .program_address()
            .ok_or_else(|| HarnessError::program_not_found(name, "IDL has no program address"))?;
        let program_id = Pubkey::from_str(address).map_err(|e| {
            HarnessError::program_not_found(name, format!("invalid program address `{address}`: {e}"))
        })?;

        let initialize = EscrowInstruction::Initialize.name();
        if !idl.has_instruction(initialize) {
            return Err(HarnessError::program_not_found(
                name,
                format!("IDL does not declare `{initialize}`"),
            ));
        }

        Ok(Self::new(name, program_id))
    }

    /// Handle named `name`, taken from the configured IDL when there is one
    /// and from the compiled-in program id otherwise.
    pub fn resolve(config: &HarnessConfig, name: &str) -> HarnessResult<Self> {
        match &config.idl_path {
            Some(path) => Self::from_idl(path, name),
            None if name == ESCROW_OPENBOOKS => Ok(Self::escrow_openbooks()),
            None => Err(HarnessError::program_not_found(
                name,
                "no IDL configured and no built-in program of that name",
            )),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Build the zero-argument `initialize` instruction.
    pub fn initialize(&self) -> Instruction {
        instruction::initialize(&self.program_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cluster;
    use escrow_openbooks::instruction::INITIALIZE_DISCRIMINATOR;
    use serde_json::json;
    use std::io::Write;

    const PROGRAM_ADDRESS: &str = "4EFSQt73xMA7Mtaw8tsMd27kVyJH9KiBzEeYQhFrtT1E";

    fn current_idl() -> String {
        json!({
            "address": PROGRAM_ADDRESS,
            "metadata": { "name": "escrow_openbooks", "version": "0.1.0", "spec": "0.1.0" },
            "instructions": [
                { "name": "initialize", "discriminator": INITIALIZE_DISCRIMINATOR, "accounts": [], "args": [] }
            ]
        })
        .to_string()
    }

    #[test]
    fn test_workspace_name() {
        assert_eq!(workspace_name("escrow_openbooks"), "EscrowOpenbooks");
        assert_eq!(workspace_name("escrow-openbooks"), "EscrowOpenbooks");
        assert_eq!(workspace_name("vault"), "Vault");
        assert_eq!(workspace_name(escrow_openbooks::PROGRAM_NAME), ESCROW_OPENBOOKS);
    }

    #[test]
    fn test_builtin_handle_matches_program_crate() {
        let handle = ProgramHandle::escrow_openbooks();
        assert_eq!(handle.name(), ESCROW_OPENBOOKS);
        assert_eq!(handle.program_id(), &escrow_openbooks::id());
        assert_eq!(handle.program_id().to_string(), PROGRAM_ADDRESS);
    }

    #[test]
    fn test_resolve_current_idl() {
        let handle = ProgramHandle::from_idl_json(&current_idl(), ESCROW_OPENBOOKS).unwrap();
        assert_eq!(handle, ProgramHandle::escrow_openbooks());
    }

    #[test]
    fn test_resolve_legacy_idl() {
        let idl = json!({
            "version": "0.1.0",
            "name": "escrow_openbooks",
            "instructions": [{ "name": "initialize", "accounts": [], "args": [] }],
            "metadata": { "address": PROGRAM_ADDRESS }
        })
        .to_string();

        let handle = ProgramHandle::from_idl_json(&idl, ESCROW_OPENBOOKS).unwrap();
        assert_eq!(handle.program_id().to_string(), PROGRAM_ADDRESS);
    }

    #[test]
    fn test_resolve_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(current_idl().as_bytes()).unwrap();

        let handle = ProgramHandle::from_idl(file.path(), ESCROW_OPENBOOKS).unwrap();
        assert_eq!(handle.program_id(), &escrow_openbooks::id());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProgramHandle::from_idl(dir.path().join("escrow_openbooks.json"), ESCROW_OPENBOOKS);
        assert!(matches!(result, Err(HarnessError::ProgramNotFound { .. })));
    }

    #[test]
    fn test_name_mismatch_is_not_found() {
        let result = ProgramHandle::from_idl_json(&current_idl(), "CompositeVault");
        match result {
            Err(HarnessError::ProgramNotFound { name, reason }) => {
                assert_eq!(name, "CompositeVault");
                assert!(reason.contains("EscrowOpenbooks"));
            }
            other => panic!("expected ProgramNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_address_is_not_found() {
        let idl = json!({
            "address": "not-base58!",
            "metadata": { "name": "escrow_openbooks" },
            "instructions": [{ "name": "initialize" }]
        })
        .to_string();
        let result = ProgramHandle::from_idl_json(&idl, ESCROW_OPENBOOKS);
        assert!(matches!(result, Err(HarnessError::ProgramNotFound { .. })));
    }

    #[test]
    fn test_missing_initialize_is_not_found() {
        let idl = json!({
            "address": PROGRAM_ADDRESS,
            "metadata": { "name": "escrow_openbooks" },
            "instructions": []
        })
        .to_string();
        let result = ProgramHandle::from_idl_json(&idl, ESCROW_OPENBOOKS);
        assert!(matches!(result, Err(HarnessError::ProgramNotFound { .. })));
    }

    #[test]
    fn test_malformed_json_is_not_found() {
        let result = ProgramHandle::from_idl_json("{ not json", ESCROW_OPENBOOKS);
        assert!(matches!(result, Err(HarnessError::ProgramNotFound { .. })));
    }

    #[test]
    fn test_resolve_without_idl() {
        let config = HarnessConfig::new(Cluster::Localnet, "/tmp/id.json");
        assert_eq!(
            ProgramHandle::resolve(&config, ESCROW_OPENBOOKS).unwrap(),
            ProgramHandle::escrow_openbooks()
        );
        assert!(matches!(
            ProgramHandle::resolve(&config, "CompositeVault"),
            Err(HarnessError::ProgramNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_with_missing_idl() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = HarnessConfig::new(Cluster::Localnet, "/tmp/id.json");
        config.idl_path = Some(dir.path().join("escrow_openbooks.json"));
        assert!(matches!(
            ProgramHandle::resolve(&config, ESCROW_OPENBOOKS),
            Err(HarnessError::ProgramNotFound { .. })
        ));
    }

    #[test]
    fn test_initialize_instruction() {
        let ix = ProgramHandle::escrow_openbooks().initialize();
        assert_eq!(ix.program_id, escrow_openbooks::id());
        assert!(ix.accounts.is_empty());
        assert_eq!(ix.data, INITIALIZE_DISCRIMINATOR.to_vec());
    }
}
