//! Contains the error types for the rollup deployer.

use alloy_primitives::B256;
use alloy_transport::{RpcError, TransportErrorKind};
use core::time::Duration;
use thiserror::Error;

/// A [Result] type for the [DeployerError].
pub type DeployerResult<T> = Result<T, DeployerError>;

/// An error returned by a [RollupCreator] session.
///
/// Errors are surfaced as soon as they occur. The session performs no retries and no
/// compensating actions, so a nonce consumed by a failed submission is not released.
///
/// [RollupCreator]: crate::RollupCreator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeployerError {
    /// The node could not be reached, or its endpoint is invalid.
    #[error("Node connection error: {0}")]
    Connection(String),
    /// The private key is malformed.
    #[error("Invalid private key: {0}")]
    Key(String),
    /// A node query or transaction submission failed.
    #[error("RPC error: {0}")]
    Rpc(String),
    /// No factory contract is known for the chain.
    #[error("No RollupCreator address known for chain {0}")]
    UnknownChain(u64),
    /// The deployment transaction could not be built or signed.
    #[error("Failed to encode deployment transaction: {0}")]
    Encoding(String),
    /// The receipt of a submitted transaction could not be retrieved.
    #[error("Failed to fetch receipt: {0}")]
    Receipt(String),
    /// The receipt does not carry a well formed `RollupCreated` event.
    #[error("Failed to decode RollupCreated event: {0}")]
    Decode(String),
    /// The deployment transaction was mined but reverted.
    #[error("Deployment transaction {0} reverted")]
    Reverted(B256),
    /// The transaction was not mined before the confirmation deadline.
    #[error("Transaction not confirmed within {0:?}")]
    Timeout(Duration),
    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,
}

/// An error returned by a [RollupNode].
///
/// [RollupNode]: crate::RollupNode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The transport failed before the node produced a response.
    #[error("Node unreachable: {0}")]
    Unreachable(String),
    /// The node answered with an error, or with a response that could not be decoded.
    #[error("{0}")]
    Rpc(String),
}

impl From<RpcError<TransportErrorKind>> for NodeError {
    fn from(e: RpcError<TransportErrorKind>) -> Self {
        match e {
            RpcError::Transport(TransportErrorKind::Custom(err)) => {
                Self::Unreachable(err.to_string())
            }
            RpcError::Transport(TransportErrorKind::BackendGone) => {
                Self::Unreachable("backend connection task has stopped".to_string())
            }
            other => Self::Rpc(other.to_string()),
        }
    }
}

impl From<NodeError> for DeployerError {
    fn from(e: NodeError) -> Self {
        match e {
            NodeError::Unreachable(msg) => Self::Connection(msg),
            NodeError::Rpc(msg) => Self::Rpc(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_error_conversion() {
        let err: DeployerError = NodeError::Unreachable("refused".to_string()).into();
        assert_eq!(err, DeployerError::Connection("refused".to_string()));

        let err: DeployerError = NodeError::Rpc("nonce too low".to_string()).into();
        assert_eq!(err, DeployerError::Rpc("nonce too low".to_string()));
    }

    #[test]
    fn test_transport_error_is_unreachable() {
        let err = RpcError::<TransportErrorKind>::Transport(TransportErrorKind::BackendGone);
        assert!(matches!(NodeError::from(err), NodeError::Unreachable(_)));

        let err = RpcError::<TransportErrorKind>::NullResp;
        assert!(matches!(NodeError::from(err), NodeError::Rpc(_)));
    }
}
