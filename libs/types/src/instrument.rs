//! Per-symbol trading parameters
//!
//! Every tradable symbol carries a tick (minimum price increment) and a
//! lot (minimum quantity increment). The table is fixed at startup; the
//! engine refuses orders for symbols it does not hold.

use crate::ids::Symbol;
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trading parameters for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub symbol: Symbol,
    /// Minimum price increment; prices must be exact multiples
    pub tick: Decimal,
    /// Minimum quantity increment; quantities must be exact multiples
    pub lot: Decimal,
}

impl InstrumentSpec {
    pub fn new(symbol: impl Into<Symbol>, tick: Decimal, lot: Decimal) -> Self {
        assert!(tick > Decimal::ZERO, "tick must be positive");
        assert!(lot > Decimal::ZERO, "lot must be positive");
        Self {
            symbol: symbol.into(),
            tick,
            lot,
        }
    }

    /// Whether `price` sits on this instrument's tick grid
    pub fn price_on_tick(&self, price: Price) -> bool {
        price.is_multiple_of(self.tick)
    }

    /// Whether `quantity` sits on this instrument's lot grid
    pub fn quantity_on_lot(&self, quantity: Quantity) -> bool {
        quantity.is_multiple_of(self.lot)
    }
}

/// The set of instruments the venue trades
///
/// BTreeMap keyed by symbol string for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct InstrumentTable {
    specs: BTreeMap<String, InstrumentSpec>,
}

impl InstrumentTable {
    pub fn new(specs: impl IntoIterator<Item = InstrumentSpec>) -> Self {
        Self {
            specs: specs
                .into_iter()
                .map(|spec| (spec.symbol.as_str().to_string(), spec))
                .collect(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentSpec> {
        self.specs.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.specs.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.specs.values().map(|spec| &spec.symbol)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
