//! Ledger configuration.
//!
//! Every node of a network must run with the same values: capacity and the
//! default stake feed block validation and the validator election.

use {
    crate::amount::{coins, Amount},
    serde::{Deserialize, Serialize},
    std::path::{Path, PathBuf},
    thiserror::Error,
};

/// Configuration shared by all nodes of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Maximum number of transactions per block. Minting starts once the pool
    /// holds this many.
    /// Default: 3.
    pub capacity: usize,

    /// Stake attributed to a participant that never sent a stake transaction.
    /// Default: 10 coins.
    pub default_stake: Amount,

    /// Genesis credit per expected node.
    /// Default: 1000 coins.
    pub genesis_allocation_per_node: Amount,

    /// Number of nodes the genesis allocation is sized for.
    /// Default: 5.
    pub total_nodes: u64,

    /// Credit the bootstrap node sends to each newly registered node.
    /// Default: 1000 coins.
    pub welcome_allocation: Amount,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            default_stake: coins(10),
            genesis_allocation_per_node: coins(1000),
            total_nodes: 5,
            welcome_allocation: coins(1000),
        }
    }
}

impl LedgerConfig {
    /// Small network used by unit tests.
    #[cfg(test)]
    pub fn dev_default() -> Self {
        Self {
            capacity: 2,
            total_nodes: 3,
            ..Self::default()
        }
    }

    /// Total credit of the genesis transaction.
    pub fn genesis_allocation(&self) -> Result<Amount, ConfigError> {
        self.genesis_allocation_per_node
            .checked_mul(self.total_nodes)
            .ok_or(ConfigError::AllocationOverflow {
                per_node: self.genesis_allocation_per_node,
                nodes: self.total_nodes,
            })
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if self.default_stake == 0 {
            return Err(ConfigError::InvalidDefaultStake);
        }
        if self.total_nodes == 0 {
            return Err(ConfigError::InvalidTotalNodes);
        }
        self.genesis_allocation()?;
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Errors in ledger configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("capacity must be > 0")]
    InvalidCapacity,
    #[error("default_stake must be > 0")]
    InvalidDefaultStake,
    #[error("total_nodes must be > 0")]
    InvalidTotalNodes,
    #[error("genesis allocation {per_node} x {nodes} overflows")]
    AllocationOverflow { per_node: Amount, nodes: u64 },
    #[error("invalid config: {0}")]
    Parse(String),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn kind(&self) -> crate::error::ErrorKind {
        crate::error::ErrorKind::InvalidConfig
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, std::io::Write};

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.default_stake, 1_000);
        assert_eq!(config.genesis_allocation().unwrap(), coins(5000));
        assert_eq!(config.welcome_allocation, coins(1000));
        assert!(config.validate().is_ok());
        assert!(LedgerConfig::dev_default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_capacity() {
        let config = LedgerConfig {
            capacity: 0,
            ..LedgerConfig::default()
        };
        assert_matches!(config.validate(), Err(ConfigError::InvalidCapacity));
    }

    #[test]
    fn test_validate_zero_default_stake() {
        let config = LedgerConfig {
            default_stake: 0,
            ..LedgerConfig::default()
        };
        assert_matches!(config.validate(), Err(ConfigError::InvalidDefaultStake));
    }

    #[test]
    fn test_validate_allocation_overflow() {
        let config = LedgerConfig {
            genesis_allocation_per_node: Amount::MAX,
            total_nodes: 2,
            ..LedgerConfig::default()
        };
        assert_matches!(config.validate(), Err(ConfigError::AllocationOverflow { .. }));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = LedgerConfig::from_toml_str("capacity = 5\ntotal_nodes = 10\n").unwrap();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.total_nodes, 10);
        assert_eq!(config.default_stake, coins(10));
    }

    #[test]
    fn test_toml_rejects_unknown_and_invalid() {
        assert_matches!(
            LedgerConfig::from_toml_str("block_size = 5\n"),
            Err(ConfigError::Parse(_))
        );
        assert_matches!(
            LedgerConfig::from_toml_str("capacity = 0\n"),
            Err(ConfigError::InvalidCapacity)
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capacity = 4").unwrap();
        writeln!(file, "welcome_allocation = 250").unwrap();
        let config = LedgerConfig::load(file.path()).unwrap();
        assert_eq!(config.capacity, 4);
        assert_eq!(config.welcome_allocation, 250);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LedgerConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert_matches!(err, ConfigError::Read { .. });
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidConfig);
    }
}
