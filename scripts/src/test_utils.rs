//! Helpers for running the scripts against a mocked RPC node.
//!
//! The mocked client has no fillers, so every provider call the scripts make
//! maps to exactly one JSON-RPC request, and the queued responses are
//! consumed in the order the scripts issue those requests.

use alloy::{
    primitives::{address, Address, Bloom, Bytes, B256, U256},
    providers::{DynProvider, ProviderBuilder},
    transports::mock::Asserter,
};
use serde_json::{json, Value};

use crate::utils::Client;

/// The first default account of an Anvil node
pub const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// A client whose requests are answered by the responses queued on `asserter`
pub fn mocked_client(asserter: &Asserter) -> Client {
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter.clone());

    Client {
        provider: DynProvider::new(provider),
        deployer: DEPLOYER,
    }
}

/// Queue the responses to sending a transaction and polling for its receipt
pub fn push_transaction(
    asserter: &Asserter,
    tx_hash: B256,
    contract_address: Option<Address>,
    success: bool,
) {
    asserter.push_success(&tx_hash);
    asserter.push_success(&receipt(tx_hash, contract_address, success));
}

/// Queue the responses to a successful contract deployment
pub fn push_deployment(asserter: &Asserter, tx_hash: B256, contract_address: Address) {
    push_transaction(asserter, tx_hash, Some(contract_address), true);
}

/// Queue the response to reading a storage slot that holds `address`
pub fn push_address_slot(asserter: &Asserter, address: Address) {
    asserter.push_success(&U256::from_be_bytes(address.into_word().0));
}

/// Queue the response to an `eth_call` returning the raw `output`
pub fn push_call_output(asserter: &Asserter, output: &[u8]) {
    asserter.push_success(&Bytes::copy_from_slice(output));
}

/// A mined EIP-1559 receipt for `tx_hash`
fn receipt(tx_hash: B256, contract_address: Option<Address>, success: bool) -> Value {
    // Contract creations have no recipient
    let to = match contract_address {
        Some(_) => Value::Null,
        None => json!(Address::repeat_byte(0x22)),
    };

    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0x11),
        "blockNumber": "0x1",
        "from": DEPLOYER,
        "to": to,
        "contractAddress": contract_address,
        "gasUsed": "0x5208",
        "cumulativeGasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "logs": [],
        "logsBloom": Bloom::ZERO,
    })
}
