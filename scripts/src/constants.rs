//! Constants used in the deploy scripts

use alloy::primitives::{b256, B256};

// -------------------
// | Registry Layout |
// -------------------

/// The default path of the deployments registry file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default network under which registry entries are scoped
pub const DEFAULT_NETWORK: &str = "localhost";

/// The default RPC URL, a local Anvil / Hardhat node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The NFT marketplace proxy key in the deployments registry
pub const NFT_MARKETPLACE_KEY: &str = "NFTMarketplace";

/// The mock ERC20 key in the deployments registry
pub const MOCK_ERC20_KEY: &str = "mockErc20";

/// The mock ERC721 proxy key in the deployments registry
pub const MOCK_ERC721_KEY: &str = "mockErc721";

/// The marketplace tax recipient key in the deployments registry.
///
/// This entry is provided by the operator, not written by any script.
pub const TAX_RECIPIENT_KEY: &str = "taxRecipient";

/// The marketplace admin key in the deployments registry.
///
/// This entry is provided by the operator, not written by any script.
pub const ADMIN_KEY: &str = "admin";

// -------------
// | Artifacts |
// -------------

/// The default directory holding compiled contract artifacts
pub const DEFAULT_ARTIFACTS_PATH: &str = "out";

/// The artifact name of the NFT marketplace implementation
pub const NFT_MARKETPLACE_ARTIFACT: &str = "NFTMarketplace";

/// The artifact name of the mock ERC20 token
pub const MOCK_ERC20_ARTIFACT: &str = "MockERC20";

/// The artifact name of the mock ERC721 implementation
pub const MOCK_ERC721_ARTIFACT: &str = "MockERC721";

/// The artifact name of the OpenZeppelin transparent upgradeable proxy
pub const PROXY_ARTIFACT: &str = "TransparentUpgradeableProxy";

/// The extension of a compiled artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// Separates the source path from the contract name in a qualified
/// artifact identifier, e.g. `src/mocks/MockERC20.sol:MockERC20`
pub const ARTIFACT_SOURCE_SEPARATOR: char = ':';

/// Directories under the artifacts path which never hold contract artifacts
pub const IGNORED_ARTIFACT_DIRS: [&str; 2] = ["build-info", "cache"];

/// The name of the initializer every proxied implementation must expose
pub const INITIALIZER_NAME: &str = "initialize";

// ---------------
// | Compilation |
// ---------------

/// The name of the Foundry command used to compile the contracts
pub const FORGE_COMMAND: &str = "forge";

/// The name of the build command
pub const BUILD_COMMAND: &str = "build";

// ----------------
// | Transactions |
// ----------------

/// How many times to poll for a transaction receipt before giving up
pub const RECEIPT_POLL_ATTEMPTS: usize = 120;

/// The delay between two polls for a transaction receipt, in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 1000;

// ---------
// | Proxy |
// ---------

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The storage slot containing the implementation address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const PROXY_IMPLEMENTATION_STORAGE_SLOT: B256 =
    b256!("360894a13ba1a3210667c828492db98dca3e2076c3bbf5eb1a52e7aac8ed1a9b");

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

// -----------
// | Logging |
// -----------

/// The log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";
