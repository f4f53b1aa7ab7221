//! Locating and parsing compiled contract artifacts.
//!
//! Both the Foundry layout (`out/<Source>.sol/<Name>.json` with a
//! `bytecode.object` field) and the Hardhat layout
//! (`artifacts/contracts/<Source>.sol/<Name>.json` with a `bytecode` string)
//! are accepted.
//!
//! A contract is identified either by its bare name (`MockERC20`) or, when
//! several compiled contracts share that name, by its source file and name
//! (`src/mocks/MockERC20.sol:MockERC20`).

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;

use crate::{
    constants::{ARTIFACT_EXTENSION, ARTIFACT_SOURCE_SEPARATOR, IGNORED_ARTIFACT_DIRS},
    errors::ScriptError,
};

/// The creation bytecode as it appears in either artifact layout
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat stores the bytecode as a bare hex string
    Hex(String),
    /// Foundry nests it under `object`
    Object {
        /// The hex-encoded bytecode
        object: String,
    },
}

impl RawBytecode {
    /// The hex string regardless of layout
    fn as_hex(&self) -> &str {
        match self {
            RawBytecode::Hex(s) => s,
            RawBytecode::Object { object } => object,
        }
    }
}

/// The subset of an artifact file read by the scripts
#[derive(Deserialize)]
struct RawArtifact {
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: RawBytecode,
}

/// A compiled contract, ready to be deployed
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// The contract name
    pub name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Locate and parse the artifact identified by `identifier` under
    /// `artifacts_path`.
    ///
    /// The identifier is a contract name, optionally prefixed with the path
    /// of its source file and a `:`.
    pub fn load(artifacts_path: &Path, identifier: &str) -> Result<Self, ScriptError> {
        let (source, name) = split_identifier(identifier);
        let artifact_path = find_artifact(artifacts_path, source, name)?;
        let content = fs::read_to_string(&artifact_path).map_err(|e| {
            ScriptError::ArtifactParsing(format!("{}: {}", artifact_path.display(), e))
        })?;

        Self::parse(name, &content)
    }

    /// Parse the artifact of contract `name` from its JSON content
    pub fn parse(name: &str, content: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact = serde_json::from_str(content)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;

        let bytecode = Bytes::from_str(raw.bytecode.as_hex())
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name} bytecode: {e}")))?;

        // Interfaces and abstract contracts compile to empty bytecode
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name} has no creation bytecode"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            abi: raw.abi,
            bytecode,
        })
    }

    /// The creation code for this contract, with the ABI-encoded
    /// constructor arguments appended
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }

    /// Whether the contract ABI exposes a function called `function_name`
    pub fn has_function(&self, function_name: &str) -> bool {
        self.abi.function(function_name).is_some()
    }
}

/// Split `Source.sol:Name` into its source path and contract name
fn split_identifier(identifier: &str) -> (Option<&Path>, &str) {
    match identifier.rsplit_once(ARTIFACT_SOURCE_SEPARATOR) {
        Some((source, name)) => (Some(Path::new(source)), name),
        None => (None, identifier),
    }
}

/// Recursively search `artifacts_path` for `<name>.json`, failing if there
/// is no match or more than one.
///
/// With a `source`, only artifacts in a directory whose path ends with that
/// source path are considered, which is how both Foundry and Hardhat lay
/// out artifacts.
fn find_artifact(
    artifacts_path: &Path,
    source: Option<&Path>,
    name: &str,
) -> Result<PathBuf, ScriptError> {
    let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
    let mut matches = Vec::new();
    collect_matches(artifacts_path, &file_name, &mut matches)?;

    if let Some(source) = source {
        matches.retain(|path| path.parent().is_some_and(|dir| dir.ends_with(source)));
    }

    match matches.len() {
        0 => Err(ScriptError::ArtifactParsing(format!(
            "no artifact for {} under {}",
            name,
            artifacts_path.display()
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(ScriptError::ArtifactParsing(format!(
            "multiple artifacts for {}, qualify it as `<Source>.sol:{}`: {:?}",
            name, name, matches
        ))),
    }
}

/// Walk `dir`, pushing every file called `file_name` onto `matches`
fn collect_matches(
    dir: &Path,
    file_name: &str,
    matches: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
            .path();

        if path.is_dir() {
            let ignored = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| IGNORED_ARTIFACT_DIRS.contains(&n));
            if !ignored {
                collect_matches(&path, file_name, matches)?;
            }
        } else if path.file_name().is_some_and(|n| n == file_name) {
            matches.push(path);
        }
    }

    Ok(())
}
