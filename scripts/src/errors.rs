//! Definitions of errors that can occur during the execution of the marketplace scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the marketplace scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading the deployments registry
    ReadDeployments(String),
    /// Error writing the deployments registry
    WriteDeployments(String),
    /// A registry entry required by the script is absent for the network
    MissingDeployment {
        /// The network the registry was scoped to
        network: String,
        /// The name of the missing entry
        name: String,
    },
    /// Error parsing an address
    AddressParsing(String),
    /// Error locating or parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Error compiling the contracts
    ContractCompilation(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::MissingDeployment { network, name } => {
                write!(f, "no `{}` entry in deployments for network `{}`", name, network)
            }
            ScriptError::AddressParsing(s) => write!(f, "error parsing address: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ContractCompilation(s) => write!(f, "error compiling contracts: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
        }
    }
}

impl Error for ScriptError {}
