//! The transaction signing context of a deployer session.

use crate::{DeployerError, DeployerResult};
use alloy_consensus::{SignableTransaction, TxEnvelope};
use alloy_eips::eip2718::Encodable2718;
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use core::str::FromStr;

/// Parses a hex encoded secp256k1 private key, with or without a `0x` prefix.
pub fn parse_private_key(key: &str) -> DeployerResult<PrivateKeySigner> {
    PrivateKeySigner::from_str(key.trim()).map_err(|e| DeployerError::Key(e.to_string()))
}

/// The per-submission values of a transaction.
///
/// A fresh [TxParams] is derived for every submission, so the [SigningContext] itself is never
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxParams {
    /// Nonce of the transaction.
    pub nonce: u64,
    /// Value attached to the call, in wei.
    pub value: U256,
    /// Gas limit of the transaction.
    pub gas_limit: u64,
}

/// A signed, EIP-2718 encoded transaction, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Hash of the signed transaction.
    pub hash: B256,
    /// Nonce the transaction was signed with.
    pub nonce: u64,
    /// The encoded transaction.
    pub raw: Bytes,
}

/// Signs legacy (EIP-155) transactions for a single key on a single chain.
#[derive(Debug, Clone)]
pub struct SigningContext {
    signer: PrivateKeySigner,
    chain_id: u64,
    gas_price: u128,
    gas_limit: u64,
}

impl SigningContext {
    /// Creates a new [SigningContext].
    ///
    /// `gas_limit` is the fallback used when a [TxParams] carries a zero gas limit.
    pub const fn new(
        signer: PrivateKeySigner,
        chain_id: u64,
        gas_price: u128,
        gas_limit: u64,
    ) -> Self {
        Self { signer, chain_id, gas_price, gas_limit }
    }

    /// Returns the address of the signing key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Returns the chain id transactions are bound to.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Returns the gas price transactions are signed with.
    pub const fn gas_price(&self) -> u128 {
        self.gas_price
    }

    /// Returns the default gas limit.
    pub const fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Signs a call to `to` with the given calldata.
    pub fn sign(
        &self,
        to: Address,
        input: Bytes,
        params: TxParams,
    ) -> DeployerResult<SignedTransaction> {
        let gas_limit = if params.gas_limit == 0 { self.gas_limit } else { params.gas_limit };
        let request = TransactionRequest::default()
            .with_from(self.address())
            .with_to(to)
            .with_input(input)
            .with_value(params.value)
            .with_nonce(params.nonce)
            .with_gas_limit(gas_limit)
            .with_gas_price(self.gas_price)
            .with_chain_id(self.chain_id);

        let tx = request.build_typed_tx().map_err(|req| {
            DeployerError::Encoding(format!("incomplete transaction request: {req:?}"))
        })?;
        let signature = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| DeployerError::Encoding(e.to_string()))?;
        let envelope = TxEnvelope::from(tx.into_signed(signature));

        Ok(SignedTransaction {
            hash: *envelope.tx_hash(),
            nonce: params.nonce,
            raw: envelope.encoded_2718().into(),
        })
    }
}
