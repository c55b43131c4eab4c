//! Known deployments of the `RollupCreator` factory contract.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ethereum mainnet.
pub const MAINNET_ROLLUP_CREATOR: Address = address!("90d68b056c411015eae3ec0b98ad94e2c91419f1");
/// Arbitrum One.
pub const ARBITRUM_ONE_ROLLUP_CREATOR: Address =
    address!("9cad81628ab7d8e239f1a5b497313341578c5f71");
/// Arbitrum Nova.
pub const ARBITRUM_NOVA_ROLLUP_CREATOR: Address =
    address!("9cad81628ab7d8e239f1a5b497313341578c5f71");
/// Base.
pub const BASE_ROLLUP_CREATOR: Address = address!("850f050c65b34966895ada26a4d06923901916db");
/// Sepolia.
pub const SEPOLIA_ROLLUP_CREATOR: Address = address!("fb774ea8a92ae528a596c8d90cbcf1bdbc4cee79");
/// Holesky.
pub const HOLESKY_ROLLUP_CREATOR: Address = address!("b512078282f462ba104231ad856464ceb0a7747e");
/// Arbitrum Sepolia.
pub const ARBITRUM_SEPOLIA_ROLLUP_CREATOR: Address =
    address!("06e341073b2749e0bb9912461351f716decda9b0");
/// Base Sepolia.
pub const BASE_SEPOLIA_ROLLUP_CREATOR: Address =
    address!("1e0921818df948c338380e722c8ae91bb285763c");
/// nitro-testnode parent chain.
pub const NITRO_TESTNODE_L1_ROLLUP_CREATOR: Address =
    address!("596eabe0291d4cdafac7ef53d16c92bf6922b5e0");
/// nitro-testnode child chain.
pub const NITRO_TESTNODE_L2_ROLLUP_CREATOR: Address =
    address!("3baf9f08bad68869eedea90f2cc546bd80f1a651");

/// A lookup table from chain id to the `RollupCreator` deployed on that chain.
///
/// The table is built once and handed to the session as part of the
/// [DeployerConfig](crate::DeployerConfig). Callers targeting a chain that is not listed must
/// register it with [FactoryTable::insert] before deploying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactoryTable(BTreeMap<u64, Address>);

impl FactoryTable {
    /// Returns an empty table.
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the factory address registered for `chain_id`.
    pub fn get(&self, chain_id: u64) -> Option<Address> {
        self.0.get(&chain_id).copied()
    }

    /// Registers `factory` for `chain_id`, returning the previous entry.
    pub fn insert(&mut self, chain_id: u64, factory: Address) -> Option<Address> {
        self.0.insert(chain_id, factory)
    }

    /// Builder-style [FactoryTable::insert].
    pub fn with_factory(mut self, chain_id: u64, factory: Address) -> Self {
        self.insert(chain_id, factory);
        self
    }

    /// Merges `other` into this table. Entries in `other` win.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Returns the number of registered chains.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no chain is registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(chain_id, factory)` pairs in chain id order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, Address)> + '_ {
        self.0.iter().map(|(id, addr)| (*id, *addr))
    }
}

impl Default for FactoryTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            (1, MAINNET_ROLLUP_CREATOR),
            (1337, NITRO_TESTNODE_L1_ROLLUP_CREATOR),
            (8453, BASE_ROLLUP_CREATOR),
            (17000, HOLESKY_ROLLUP_CREATOR),
            (42161, ARBITRUM_ONE_ROLLUP_CREATOR),
            (42170, ARBITRUM_NOVA_ROLLUP_CREATOR),
            (84532, BASE_SEPOLIA_ROLLUP_CREATOR),
            (412346, NITRO_TESTNODE_L2_ROLLUP_CREATOR),
            (421614, ARBITRUM_SEPOLIA_ROLLUP_CREATOR),
            (11155111, SEPOLIA_ROLLUP_CREATOR),
        ]))
    }
}

impl FromIterator<(u64, Address)> for FactoryTable {
    fn from_iter<T: IntoIterator<Item = (u64, Address)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_lookups() {
        let table = FactoryTable::default();
        assert_eq!(table.get(42161), Some(ARBITRUM_ONE_ROLLUP_CREATOR));
        assert_eq!(table.get(11155111), Some(SEPOLIA_ROLLUP_CREATOR));
        assert_eq!(table.get(999), None);
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn test_insert_overrides() {
        let custom = Address::repeat_byte(0x42);
        let mut table = FactoryTable::empty().with_factory(1, MAINNET_ROLLUP_CREATOR);
        assert_eq!(table.insert(1, custom), Some(MAINNET_ROLLUP_CREATOR));
        assert_eq!(table.get(1), Some(custom));
    }

    #[test]
    fn test_extend_prefers_other() {
        let custom = Address::repeat_byte(0x42);
        let mut table = FactoryTable::default();
        table.extend([(42161, custom), (999, custom)].into_iter().collect());
        assert_eq!(table.get(42161), Some(custom));
        assert_eq!(table.get(999), Some(custom));
        assert_eq!(table.get(1), Some(MAINNET_ROLLUP_CREATOR));
    }

    #[test]
    fn test_json_keys_are_chain_ids() {
        let json = r#"{"999":"0x4242424242424242424242424242424242424242"}"#;
        let table: FactoryTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.get(999), Some(Address::repeat_byte(0x42)));
        assert_eq!(serde_json::to_string(&table).unwrap(), json);
    }
}
