//! Definitions of CLI arguments and commands for the marketplace scripts

use std::path::PathBuf;

use clap::{error::ErrorKind, Args, Parser, Subcommand};

use crate::{
    commands::{
        allow_currency, allow_token, deploy_marketplace, deploy_mock_erc20, deploy_mock_erc721,
        upgrade_marketplace, upgrade_mock_erc721, ScriptContext,
    },
    constants::{
        DEFAULT_ARTIFACTS_PATH, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_NETWORK, DEFAULT_RPC_URL,
        MOCK_ERC20_ARTIFACT, MOCK_ERC721_ARTIFACT, NFT_MARKETPLACE_ARTIFACT, PROXY_ARTIFACT,
    },
    errors::ScriptError,
};

/// Deploy and administer the NFT marketplace contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Name of the network, used to scope entries in the deployments file
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Path to the deployments file
    #[arg(short, long, env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, env = "ARTIFACTS_PATH", default_value = DEFAULT_ARTIFACTS_PATH)]
    pub artifacts_path: PathBuf,

    /// Root of the contracts project, where the compiler is invoked
    #[arg(long, env = "PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Use the existing artifacts instead of compiling the contracts first
    #[arg(long)]
    pub skip_compile: bool,

    /// Which compiled artifacts to deploy
    #[command(flatten)]
    pub artifact_names: ArtifactNames,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The artifacts deployed by the scripts.
///
/// Each is a contract name, or `<Source>.sol:<Name>` when several compiled
/// contracts share the name.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// Artifact of the NFT marketplace implementation
    #[arg(long, env = "MARKETPLACE_ARTIFACT", default_value = NFT_MARKETPLACE_ARTIFACT)]
    pub marketplace_artifact: String,

    /// Artifact of the mock ERC20 token
    #[arg(long, env = "MOCK_ERC20_ARTIFACT", default_value = MOCK_ERC20_ARTIFACT)]
    pub mock_erc20_artifact: String,

    /// Artifact of the mock ERC721 implementation
    #[arg(long, env = "MOCK_ERC721_ARTIFACT", default_value = MOCK_ERC721_ARTIFACT)]
    pub mock_erc721_artifact: String,

    /// Artifact of the transparent upgradeable proxy
    #[arg(long, env = "PROXY_ARTIFACT", default_value = PROXY_ARTIFACT)]
    pub proxy_artifact: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            marketplace_artifact: NFT_MARKETPLACE_ARTIFACT.to_string(),
            mock_erc20_artifact: MOCK_ERC20_ARTIFACT.to_string(),
            mock_erc721_artifact: MOCK_ERC721_ARTIFACT.to_string(),
            proxy_artifact: PROXY_ARTIFACT.to_string(),
        }
    }
}

/// The process exit code for a failed argument parse.
///
/// Help and version requests succeed; every other parse error is a failed
/// run like any other.
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// The scripts, one per deployment or administration step
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Deploy the NFT marketplace behind an upgradeable proxy and grant
    /// `MARKET_ADMIN` to the configured admin
    DeployMarketplace,
    /// Upgrade the NFT marketplace proxy to the current implementation
    UpgradeMarketplace,
    /// Allow the mock ERC721 token to be traded on the marketplace
    AllowToken,
    /// Allow the mock ERC20 token to be used as currency on the marketplace
    AllowCurrency,
    /// Deploy the mock ERC20 token
    DeployMockErc20,
    /// Deploy the mock ERC721 token behind an upgradeable proxy
    DeployMockErc721,
    /// Upgrade the mock ERC721 proxy to the current implementation
    UpgradeMockErc721,
}

impl Command {
    /// Run the script against the given context
    pub async fn run(self, ctx: &ScriptContext) -> Result<(), ScriptError> {
        match self {
            Command::DeployMarketplace => deploy_marketplace(ctx).await,
            Command::UpgradeMarketplace => upgrade_marketplace(ctx).await,
            Command::AllowToken => allow_token(ctx).await,
            Command::AllowCurrency => allow_currency(ctx).await,
            Command::DeployMockErc20 => deploy_mock_erc20(ctx).await,
            Command::DeployMockErc721 => deploy_mock_erc721(ctx).await,
            Command::UpgradeMockErc721 => upgrade_mock_erc721(ctx).await,
        }
    }
}
