//! Utilities for the marketplace scripts.

use std::{
    path::Path,
    process::{Command, Stdio},
    str::FromStr,
    time::Duration,
};

use alloy::{
    contract::{CallBuilder, CallDecoder},
    primitives::{Address, TxHash, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::debug;

use crate::{
    constants::{
        BUILD_COMMAND, FORGE_COMMAND, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT,
        RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL_MS,
    },
    errors::ScriptError,
};

/// A signing RPC client along with the address it sends from
#[derive(Clone)]
pub struct Client {
    /// The provider, with the deployer's wallet attached
    pub provider: DynProvider,
    /// The address of the deployer
    pub deployer: Address,
}

/// Sets up the client with which the scripts send transactions.
///
/// No request is made to the node here, so a bad RPC URL only surfaces on
/// the first call.
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<Client, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let deployer = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(signer)
        .with_simple_nonce_management()
        .connect_http(url);

    Ok(Client {
        provider: DynProvider::new(provider),
        deployer,
    })
}

/// Run `cmd`, mapping a failed or non-zero exit to a compilation error
fn command_success_or(mut cmd: Command, err_msg: &str) -> Result<(), ScriptError> {
    if !cmd
        .status()
        .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?
        .success()
    {
        Err(ScriptError::ContractCompilation(String::from(err_msg)))
    } else {
        Ok(())
    }
}

/// Compiles the contracts in `project_root`.
///
/// Assumes that `forge` is locally available.
pub fn compile(project_root: &Path) -> Result<(), ScriptError> {
    debug!("Compiling contracts in {}...", project_root.display());

    let mut build_cmd = Command::new(FORGE_COMMAND);
    build_cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    build_cmd.current_dir(project_root);
    build_cmd.arg(BUILD_COMMAND);

    command_success_or(build_cmd, "Failed to compile contracts")
}

/// Send the transaction built by `call` and wait for it to be mined,
/// failing if it reverted
pub async fn send_and_confirm<P, D>(
    call: CallBuilder<P, D>,
    description: &str,
) -> Result<TransactionReceipt, ScriptError>
where
    P: Provider,
    D: CallDecoder,
{
    let pending_tx = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(format!("{description}: {e}")))?;

    wait_for_success(
        &call.provider,
        *pending_tx.tx_hash(),
        description,
        ScriptError::ContractInteraction,
    )
    .await
}

/// Poll for the receipt of `tx_hash` until the transaction is mined.
///
/// Fails with `to_err` if the transaction reverted, or if no receipt shows
/// up within [`RECEIPT_POLL_ATTEMPTS`] polls.
pub async fn wait_for_success<P: Provider>(
    provider: &P,
    tx_hash: TxHash,
    description: &str,
    to_err: fn(String) -> ScriptError,
) -> Result<TransactionReceipt, ScriptError> {
    // One `eth_getTransactionReceipt` request per poll
    for _ in 0..RECEIPT_POLL_ATTEMPTS {
        let receipt = provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| to_err(format!("{description}: {e}")))?;

        match receipt {
            Some(receipt) if !receipt.status() => {
                let msg = format!("{description}: transaction {tx_hash:#x} reverted");
                return Err(to_err(msg));
            }
            Some(receipt) => {
                debug!("{description} confirmed in tx {tx_hash:#x}");
                return Ok(receipt);
            }
            None => tokio::time::sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await,
        }
    }

    Err(to_err(format!(
        "{description}: no receipt for transaction {tx_hash:#x} after {RECEIPT_POLL_ATTEMPTS} polls"
    )))
}

/// Read an address stored in the given storage slot of `contract`
pub async fn read_address_slot(
    client: &Client,
    contract: Address,
    slot: B256,
) -> Result<Address, ScriptError> {
    let word = client
        .provider
        .get_storage_at(contract, U256::from_be_bytes(slot.0))
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(address_from_word(word))
}

/// Take the low-order 20 bytes of a storage word as an address
fn address_from_word(word: U256) -> Address {
    let bytes = word.to_be_bytes::<NUM_BYTES_STORAGE_SLOT>();
    Address::from_slice(&bytes[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..NUM_BYTES_STORAGE_SLOT])
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    /// The first default account of an Anvil node
    const DEFAULT_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn client_uses_the_key_address() {
        let client = setup_client(DEFAULT_PKEY, "http://127.0.0.1:8545").unwrap();
        assert_eq!(
            client.deployer,
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn bad_private_key_is_rejected() {
        let err = setup_client("0xdeadbeef", "http://127.0.0.1:8545").err().unwrap();
        assert!(matches!(err, ScriptError::ClientInitialization(_)));
    }

    #[test]
    fn bad_rpc_url_is_rejected() {
        let err = setup_client(DEFAULT_PKEY, "not a url").err().unwrap();
        assert!(matches!(err, ScriptError::ClientInitialization(_)));
    }

    #[test]
    fn address_is_taken_from_the_low_bytes() {
        let admin = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
        let mut word = [0xffu8; NUM_BYTES_STORAGE_SLOT];
        word[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..].copy_from_slice(admin.as_slice());

        assert_eq!(address_from_word(U256::from_be_bytes(word)), admin);
    }
}
