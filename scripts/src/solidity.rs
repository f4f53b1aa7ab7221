//! Definitions of Solidity functions called by the scripts

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface INFTMarketplace {
        function initialize(address taxRecipient) external;
        function MARKET_ADMIN() external view returns (bytes32);
        function grantRole(bytes32 role, address account) external;
        function allowToken(address token) external;
        function allowCurrency(address currency) external;
    }

    #[sol(rpc)]
    interface IMockERC721 {
        function initialize() external;
    }

    #[sol(rpc)]
    interface IProxyAdmin {
        function upgradeAndCall(address proxy, address implementation, bytes memory data) external payable;
    }
}
