//! Gateway startup configuration
//!
//! A JSON file holding the listen address, the per-symbol tick/lot table,
//! and the fan-out tuning knobs. The engine trades exactly the symbols
//! listed here; there is no runtime symbol creation.

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

use types::instrument::{InstrumentSpec, InstrumentTable};

#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentEntry {
    pub symbol: String,
    /// Minimum price increment
    pub tick: Decimal,
    /// Minimum quantity increment
    pub lot: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    pub instruments: Vec<InstrumentEntry>,
    /// Bounded fan-out queue size per subscriber
    #[serde(default = "default_queue_capacity")]
    pub subscriber_queue_capacity: usize,
    /// Depth of book snapshots in events and default queries
    #[serde(default = "default_snapshot_depth")]
    pub snapshot_depth: usize,
    /// Per-symbol public trade history size
    #[serde(default = "default_trade_history")]
    pub trade_history: usize,
}

fn default_listen_addr() -> SocketAddr {
    ([0, 0, 0, 0], 8080).into()
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_snapshot_depth() -> usize {
    10
}

fn default_trade_history() -> usize {
    1000
}

impl GatewayConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: GatewayConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        if config.instruments.is_empty() {
            anyhow::bail!("config lists no instruments");
        }
        Ok(config)
    }

    /// Load `path`, falling back to the built-in development instrument set
    /// when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(
                path = %path.display(),
                "config file not found; using built-in defaults"
            );
            Ok(Self::default_dev())
        }
    }

    /// Development defaults: two symbols on a cent tick
    pub fn default_dev() -> Self {
        let tick = Decimal::new(1, 2); // 0.01
        let lot = Decimal::new(1, 3); // 0.001
        Self {
            listen_addr: default_listen_addr(),
            instruments: vec![
                InstrumentEntry {
                    symbol: "BTC-USD".to_string(),
                    tick,
                    lot,
                },
                InstrumentEntry {
                    symbol: "ETH-USD".to_string(),
                    tick,
                    lot,
                },
            ],
            subscriber_queue_capacity: default_queue_capacity(),
            snapshot_depth: default_snapshot_depth(),
            trade_history: default_trade_history(),
        }
    }

    pub fn instrument_table(&self) -> InstrumentTable {
        InstrumentTable::new(
            self.instruments
                .iter()
                .map(|entry| InstrumentSpec::new(entry.symbol.as_str(), entry.tick, entry.lot)),
        )
    }
}
