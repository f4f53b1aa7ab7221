//! Implementations of the various deploy and administration scripts.
//!
//! Every script reads the registry entries it depends on before compiling or
//! sending anything, and records its result in the registry only after all
//! of its transactions have been confirmed.

use std::path::PathBuf;

use alloy::{primitives::Address, sol_types::SolCall};
use tracing::{debug, info, warn};

use crate::{
    artifacts::ContractArtifact,
    cli::ArtifactNames,
    constants::{ADMIN_KEY, MOCK_ERC20_KEY, MOCK_ERC721_KEY, NFT_MARKETPLACE_KEY, TAX_RECIPIENT_KEY},
    deploy::{deploy_contract, deploy_proxy, upgrade_proxy, ProxyDeployment},
    deployments::{get_contracts, save_contract, NetworkContracts},
    errors::ScriptError,
    solidity::{IMockERC721, INFTMarketplace},
    utils::{compile, send_and_confirm, Client},
};

/// Everything a script needs to run: the client plus where to find
/// the registry and the compiled contracts
pub struct ScriptContext {
    /// The client used to send transactions
    pub client: Client,
    /// The network registry entries are scoped to
    pub network: String,
    /// Path to the deployments registry
    pub deployments_path: PathBuf,
    /// Directory containing the compiled artifacts
    pub artifacts_path: PathBuf,
    /// Root of the contracts project
    pub project_root: PathBuf,
    /// Whether to use the existing artifacts as-is
    pub skip_compile: bool,
    /// The artifacts to deploy
    pub artifact_names: ArtifactNames,
}

impl ScriptContext {
    /// The registry entries for the current network
    fn contracts(&self) -> Result<NetworkContracts, ScriptError> {
        get_contracts(&self.deployments_path, &self.network)
    }

    /// Compile the contracts, unless asked not to
    fn compile(&self) -> Result<(), ScriptError> {
        if self.skip_compile {
            debug!("Skipping compilation");
            return Ok(());
        }

        compile(&self.project_root)
    }

    /// Load the compiled artifact identified by `identifier`
    fn artifact(&self, identifier: &str) -> Result<ContractArtifact, ScriptError> {
        ContractArtifact::load(&self.artifacts_path, identifier)
    }

    /// Record `address` under `name` for the current network
    fn save(&self, name: &str, address: Address) -> Result<(), ScriptError> {
        save_contract(&self.deployments_path, &self.network, name, address)?;
        debug!(
            "Saved {} = {:#x} for network {} in {}",
            name,
            address,
            self.network,
            self.deployments_path.display()
        );
        Ok(())
    }
}

// ---------------
// | Marketplace |
// ---------------

/// Deploy the NFT marketplace behind a proxy, initialised with the
/// configured tax recipient, and grant `MARKET_ADMIN` to the configured admin
pub async fn deploy_marketplace(ctx: &ScriptContext) -> Result<(), ScriptError> {
    let contracts = ctx.contracts()?;
    let tax_recipient = contracts.address(TAX_RECIPIENT_KEY)?;
    let admin = contracts.address(ADMIN_KEY)?;

    ctx.compile()?;
    let implementation = ctx.artifact(&ctx.artifact_names.marketplace_artifact)?;
    let proxy = ctx.artifact(&ctx.artifact_names.proxy_artifact)?;

    let init_calldata = INFTMarketplace::initializeCall {
        taxRecipient: tax_recipient,
    }
    .abi_encode();
    let deployment =
        deploy_proxy(&ctx.client, &implementation, &proxy, init_calldata.into()).await?;
    log_proxy_deployment(NFT_MARKETPLACE_KEY, &deployment);

    let marketplace = INFTMarketplace::new(deployment.proxy, ctx.client.provider.clone());
    let market_admin = marketplace
        .MARKET_ADMIN()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    send_and_confirm(marketplace.grantRole(market_admin, admin), "grantRole").await?;
    info!("Granted MARKET_ADMIN to {:#x}", admin);

    ctx.save(NFT_MARKETPLACE_KEY, deployment.proxy)
}

/// Upgrade the NFT marketplace proxy to the freshly compiled implementation
pub async fn upgrade_marketplace(ctx: &ScriptContext) -> Result<(), ScriptError> {
    upgrade(ctx, NFT_MARKETPLACE_KEY, &ctx.artifact_names.marketplace_artifact).await
}

/// Allow the mock ERC721 to be listed on the marketplace
pub async fn allow_token(ctx: &ScriptContext) -> Result<(), ScriptError> {
    let contracts = ctx.contracts()?;
    let marketplace_address = contracts.address(NFT_MARKETPLACE_KEY)?;
    let token = contracts.address(MOCK_ERC721_KEY)?;

    ctx.compile()?;
    let marketplace = INFTMarketplace::new(marketplace_address, ctx.client.provider.clone());
    send_and_confirm(marketplace.allowToken(token), "allowToken").await?;

    info!("Allowed token {:#x} for NFTMarketplace", token);
    Ok(())
}

/// Allow the mock ERC20 to be used as payment on the marketplace
pub async fn allow_currency(ctx: &ScriptContext) -> Result<(), ScriptError> {
    let contracts = ctx.contracts()?;
    let marketplace_address = contracts.address(NFT_MARKETPLACE_KEY)?;
    let currency = contracts.address(MOCK_ERC20_KEY)?;

    ctx.compile()?;
    let marketplace = INFTMarketplace::new(marketplace_address, ctx.client.provider.clone());
    send_and_confirm(marketplace.allowCurrency(currency), "allowCurrency").await?;

    info!("Allowed currency {:#x} for NFTMarketplace", currency);
    Ok(())
}

// ---------
// | Mocks |
// ---------

/// Deploy the mock ERC20 token
pub async fn deploy_mock_erc20(ctx: &ScriptContext) -> Result<(), ScriptError> {
    let artifact_name = &ctx.artifact_names.mock_erc20_artifact;
    warn!("Deploying `{artifact_name}` - THIS SHOULD ONLY BE DONE FOR TESTING");

    ctx.compile()?;
    let artifact = ctx.artifact(artifact_name)?;

    let address = deploy_contract(&ctx.client, &artifact, &[]).await?;
    info!("Deployed mockErc20 to {:#x}", address);

    ctx.save(MOCK_ERC20_KEY, address)
}

/// Deploy the mock ERC721 token behind a proxy
pub async fn deploy_mock_erc721(ctx: &ScriptContext) -> Result<(), ScriptError> {
    let artifact_name = &ctx.artifact_names.mock_erc721_artifact;
    warn!("Deploying `{artifact_name}` - THIS SHOULD ONLY BE DONE FOR TESTING");

    ctx.compile()?;
    let implementation = ctx.artifact(artifact_name)?;
    let proxy = ctx.artifact(&ctx.artifact_names.proxy_artifact)?;

    let init_calldata = IMockERC721::initializeCall {}.abi_encode();
    let deployment =
        deploy_proxy(&ctx.client, &implementation, &proxy, init_calldata.into()).await?;
    log_proxy_deployment(MOCK_ERC721_KEY, &deployment);

    ctx.save(MOCK_ERC721_KEY, deployment.proxy)
}

/// Upgrade the mock ERC721 proxy to the freshly compiled implementation
pub async fn upgrade_mock_erc721(ctx: &ScriptContext) -> Result<(), ScriptError> {
    upgrade(ctx, MOCK_ERC721_KEY, &ctx.artifact_names.mock_erc721_artifact).await
}

// -----------
// | Helpers |
// -----------

/// Upgrade the proxy recorded under `key` to the implementation compiled
/// from `artifact_name`, then record the proxy again
async fn upgrade(ctx: &ScriptContext, key: &str, artifact_name: &str) -> Result<(), ScriptError> {
    let proxy = ctx.contracts()?.address(key)?;

    ctx.compile()?;
    let implementation = ctx.artifact(artifact_name)?;

    let implementation_address = upgrade_proxy(&ctx.client, proxy, &implementation).await?;
    info!("Upgraded {} at {:#x} to implementation {:#x}", key, proxy, implementation_address);

    ctx.save(key, proxy)
}

/// Report the addresses produced by deploying `key` behind a proxy
fn log_proxy_deployment(key: &str, deployment: &ProxyDeployment) {
    info!("Deployed {} to {:#x}", key, deployment.proxy);
    info!(
        "{} implementation at {:#x}, proxy admin at {:#x}",
        key, deployment.implementation, deployment.proxy_admin
    );
}
