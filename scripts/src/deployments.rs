//! Reading and writing the per-network deployments registry.
//!
//! The registry is a JSON file mapping a network name to the contracts
//! deployed on it:
//!
//! ```json
//! {
//!     "sepolia": {
//!         "NFTMarketplace": "0x5FbDB2315678afecb367f032d93F642f64180aa3"
//!     }
//! }
//! ```

use std::{fs, path::Path, str::FromStr};

use alloy::primitives::Address;
use serde_json::{Map, Value};

use crate::errors::ScriptError;

/// The on-disk shape of the registry: network name -> contract name -> address.
///
/// Values are kept as raw JSON so that entries the scripts never resolve,
/// whatever their shape, are written back verbatim.
type Registry = Map<String, Value>;

/// The registry entries recorded for a single network
#[derive(Debug, Clone, Default)]
pub struct NetworkContracts {
    /// The network the entries belong to
    network: String,
    /// Contract name -> recorded value, an address string for contracts
    entries: Map<String, Value>,
}

impl NetworkContracts {
    /// Resolve the address recorded under `name`
    pub fn address(&self, name: &str) -> Result<Address, ScriptError> {
        let entry = self.entries.get(name).ok_or_else(|| ScriptError::MissingDeployment {
            network: self.network.clone(),
            name: name.to_string(),
        })?;

        let addr_str = entry.as_str().ok_or_else(|| {
            ScriptError::AddressParsing(format!("`{name}` = {entry}: not an address string"))
        })?;

        Address::from_str(addr_str)
            .map_err(|e| ScriptError::AddressParsing(format!("`{name}` = {addr_str}: {e}")))
    }
}

/// Read the whole registry, treating a missing file as empty
fn read_registry(deployments_path: &Path) -> Result<Registry, ScriptError> {
    if !deployments_path.exists() {
        return Ok(Registry::new());
    }

    let content = fs::read_to_string(deployments_path).map_err(|e| {
        ScriptError::ReadDeployments(format!("{}: {}", deployments_path.display(), e))
    })?;

    if content.trim().is_empty() {
        return Ok(Registry::new());
    }

    serde_json::from_str(&content).map_err(|e| {
        ScriptError::ReadDeployments(format!("{}: {}", deployments_path.display(), e))
    })
}

/// The entries of `network`, failing if they are not a JSON object
fn network_entries(
    registry: &mut Registry,
    network: &str,
) -> Result<Option<Map<String, Value>>, ScriptError> {
    match registry.remove(network) {
        None => Ok(None),
        Some(Value::Object(entries)) => Ok(Some(entries)),
        Some(other) => Err(ScriptError::ReadDeployments(format!(
            "entries of network `{network}` are not an object: {other}"
        ))),
    }
}

/// Load the registry entries recorded for `network`
pub fn get_contracts(
    deployments_path: &Path,
    network: &str,
) -> Result<NetworkContracts, ScriptError> {
    let mut registry = read_registry(deployments_path)?;

    Ok(NetworkContracts {
        network: network.to_string(),
        entries: network_entries(&mut registry, network)?.unwrap_or_default(),
    })
}

/// Record `address` under `name` for `network`, overwriting any previous entry.
///
/// Entries of other contracts and other networks are left untouched.
pub fn save_contract(
    deployments_path: &Path,
    network: &str,
    name: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut registry = read_registry(deployments_path)?;

    let mut entries = network_entries(&mut registry, network)?.unwrap_or_default();
    entries.insert(name.to_string(), Value::String(address.to_checksum(None)));
    registry.insert(network.to_string(), Value::Object(entries));

    let mut content = serde_json::to_string_pretty(&registry)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    content.push('\n');

    fs::write(deployments_path, content).map_err(|e| {
        ScriptError::WriteDeployments(format!("{}: {}", deployments_path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use tempfile::TempDir;

    use super::*;

    const MARKETPLACE: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    const ERC20: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");

    fn registry_path(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("deployments.json")
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);

        let err = get_contracts(&path, "localhost").unwrap().address("admin").unwrap_err();

        assert!(matches!(err, ScriptError::MissingDeployment { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn saved_address_is_resolved() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);

        save_contract(&path, "localhost", "NFTMarketplace", MARKETPLACE).unwrap();

        let contracts = get_contracts(&path, "localhost").unwrap();
        assert_eq!(contracts.address("NFTMarketplace").unwrap(), MARKETPLACE);
    }

    #[test]
    fn save_overwrites_only_the_named_entry() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);

        save_contract(&path, "localhost", "NFTMarketplace", ERC20).unwrap();
        save_contract(&path, "localhost", "mockErc20", ERC20).unwrap();
        save_contract(&path, "sepolia", "NFTMarketplace", ERC20).unwrap();
        save_contract(&path, "localhost", "NFTMarketplace", MARKETPLACE).unwrap();

        let local = get_contracts(&path, "localhost").unwrap();
        assert_eq!(local.address("NFTMarketplace").unwrap(), MARKETPLACE);
        assert_eq!(local.address("mockErc20").unwrap(), ERC20);

        let sepolia = get_contracts(&path, "sepolia").unwrap();
        assert_eq!(sepolia.address("NFTMarketplace").unwrap(), ERC20);
    }

    #[test]
    fn operator_entries_survive_a_save() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);
        fs::write(
            &path,
            r#"{ "localhost": { "taxRecipient": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8" } }"#,
        )
        .unwrap();

        save_contract(&path, "localhost", "mockErc20", ERC20).unwrap();

        let contracts = get_contracts(&path, "localhost").unwrap();
        assert_eq!(
            contracts.address("taxRecipient").unwrap(),
            address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn addresses_are_written_checksummed() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);

        save_contract(&path, "localhost", "mockErc20", ERC20).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"));
    }

    #[test]
    fn missing_entry_names_network_and_contract() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);
        save_contract(&path, "sepolia", "mockErc721", ERC20).unwrap();

        let err = get_contracts(&path, "localhost")
            .unwrap()
            .address("mockErc721")
            .unwrap_err();

        match err {
            ScriptError::MissingDeployment { network, name } => {
                assert_eq!(network, "localhost");
                assert_eq!(name, "mockErc721");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_address_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);
        fs::write(&path, r#"{ "localhost": { "admin": "0x1234" } }"#).unwrap();

        let err = get_contracts(&path, "localhost").unwrap().address("admin").unwrap_err();
        assert!(matches!(err, ScriptError::AddressParsing(_)));
    }

    #[test]
    fn unrelated_values_are_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);
        fs::write(
            &path,
            r#"{
                "localhost": { "admin": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8", "note": 1 },
                "meta": { "chainId": 31337, "verified": [true, false] },
                "version": 2
            }"#,
        )
        .unwrap();

        let contracts = get_contracts(&path, "localhost").unwrap();
        assert_eq!(
            contracts.address("admin").unwrap(),
            address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );

        save_contract(&path, "localhost", "mockErc20", ERC20).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let expected = serde_json::json!({
            "localhost": {
                "admin": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "note": 1,
                "mockErc20": "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
            },
            "meta": { "chainId": 31337, "verified": [true, false] },
            "version": 2
        });
        assert_eq!(written, expected);
    }

    #[test]
    fn non_string_entry_is_rejected_when_resolved() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);
        fs::write(&path, r#"{ "localhost": { "admin": 42 } }"#).unwrap();

        let err = get_contracts(&path, "localhost").unwrap().address("admin").unwrap_err();
        assert!(matches!(err, ScriptError::AddressParsing(_)));
    }

    #[test]
    fn network_must_hold_an_object() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);
        fs::write(&path, r#"{ "localhost": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8" }"#)
            .unwrap();

        let err = get_contracts(&path, "localhost").unwrap_err();
        assert!(matches!(err, ScriptError::ReadDeployments(_)));

        let err = save_contract(&path, "localhost", "mockErc20", ERC20).unwrap_err();
        assert!(matches!(err, ScriptError::ReadDeployments(_)));
    }

    #[test]
    fn malformed_registry_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = registry_path(&dir);
        fs::write(&path, "not json").unwrap();

        let err = get_contracts(&path, "localhost").unwrap_err();
        assert!(matches!(err, ScriptError::ReadDeployments(_)));
    }
}
