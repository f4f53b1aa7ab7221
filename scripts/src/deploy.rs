//! Deployment of plain contracts and transparent upgradeable proxies.
//!
//! Proxies are OpenZeppelin [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy)s,
//! each of which deploys its own `ProxyAdmin` owned by the deployer.
//! Upgrades go through that `ProxyAdmin`, whose address is read from the
//! proxy's EIP1967 admin slot.

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes},
    providers::Provider,
    rpc::types::TransactionRequest,
    sol_types::SolValue,
};
use tracing::{debug, info};

use crate::{
    artifacts::ContractArtifact,
    constants::{INITIALIZER_NAME, PROXY_ADMIN_STORAGE_SLOT, PROXY_IMPLEMENTATION_STORAGE_SLOT},
    errors::ScriptError,
    solidity::IProxyAdmin,
    utils::{read_address_slot, send_and_confirm, wait_for_success, Client},
};

/// The addresses produced by a proxy deployment
#[derive(Debug, Clone, Copy)]
pub struct ProxyDeployment {
    /// The proxy, i.e. the address users interact with
    pub proxy: Address,
    /// The `ProxyAdmin` allowed to upgrade the proxy
    pub proxy_admin: Address,
    /// The implementation the proxy delegates to
    pub implementation: Address,
}

/// Deploy `artifact` with the given ABI-encoded constructor arguments,
/// returning the address of the new contract once the deployment is mined
pub async fn deploy_contract(
    client: &Client,
    artifact: &ContractArtifact,
    constructor_args: &[u8],
) -> Result<Address, ScriptError> {
    debug!("Deploying {}...", artifact.name);

    let tx = TransactionRequest::default()
        .with_from(client.deployer)
        .with_deploy_code(artifact.deploy_code(constructor_args));

    let pending_tx = client
        .provider
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(format!("{}: {}", artifact.name, e)))?;
    let receipt = wait_for_success(
        &client.provider,
        *pending_tx.tx_hash(),
        &artifact.name,
        ScriptError::ContractDeployment,
    )
    .await?;

    let address = receipt.contract_address.ok_or_else(|| {
        let msg = format!("{}: receipt has no contract address", artifact.name);
        ScriptError::ContractDeployment(msg)
    })?;

    debug!("{} deployed at {:#x}", artifact.name, address);
    Ok(address)
}

/// Deploy `implementation` behind a new transparent upgradeable proxy.
///
/// The proxy constructor invokes the implementation's initializer with
/// `init_calldata`, and makes the deployer the owner of the proxy admin.
pub async fn deploy_proxy(
    client: &Client,
    implementation: &ContractArtifact,
    proxy: &ContractArtifact,
    init_calldata: Bytes,
) -> Result<ProxyDeployment, ScriptError> {
    if !implementation.has_function(INITIALIZER_NAME) {
        return Err(ScriptError::CalldataConstruction(format!(
            "{} has no `{}` function",
            implementation.name, INITIALIZER_NAME
        )));
    }

    let implementation_address = deploy_contract(client, implementation, &[]).await?;

    let proxy_args = proxy_constructor_args(implementation_address, client.deployer, init_calldata);
    let proxy_address = deploy_contract(client, proxy, &proxy_args).await?;

    // This is the recommended way to get the proxy admin address:
    // https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
    let proxy_admin = read_address_slot(client, proxy_address, PROXY_ADMIN_STORAGE_SLOT).await?;

    Ok(ProxyDeployment {
        proxy: proxy_address,
        proxy_admin,
        implementation: implementation_address,
    })
}

/// ABI-encode the arguments of
/// `constructor(address _logic, address initialOwner, bytes memory _data)`
fn proxy_constructor_args(
    implementation: Address,
    owner: Address,
    init_calldata: Bytes,
) -> Vec<u8> {
    (implementation, owner, init_calldata).abi_encode_params()
}

/// Point the proxy at `proxy` to a freshly deployed `implementation`,
/// returning the new implementation address
pub async fn upgrade_proxy(
    client: &Client,
    proxy: Address,
    implementation: &ContractArtifact,
) -> Result<Address, ScriptError> {
    let proxy_admin = read_address_slot(client, proxy, PROXY_ADMIN_STORAGE_SLOT).await?;
    if proxy_admin.is_zero() {
        return Err(ScriptError::ContractInteraction(format!(
            "{:#x} has no proxy admin, is it a transparent proxy?",
            proxy
        )));
    }

    let implementation_address = deploy_contract(client, implementation, &[]).await?;

    let admin = IProxyAdmin::new(proxy_admin, client.provider.clone());
    send_and_confirm(
        admin.upgradeAndCall(proxy, implementation_address, Bytes::new()),
        "upgradeAndCall",
    )
    .await?;

    let current = read_address_slot(client, proxy, PROXY_IMPLEMENTATION_STORAGE_SLOT).await?;
    if current != implementation_address {
        return Err(ScriptError::ContractInteraction(format!(
            "proxy {:#x} points to {:#x} after upgrade, expected {:#x}",
            proxy, current, implementation_address
        )));
    }

    info!("Upgraded proxy {:#x} via proxy admin {:#x}", proxy, proxy_admin);
    Ok(implementation_address)
}
