pub mod abi;
pub mod contract_caller;
pub mod jsonrpc;

pub use contract_caller::ContractCaller;
pub use jsonrpc::{JsonRpcClient, RpcRequest, RpcResponse};
