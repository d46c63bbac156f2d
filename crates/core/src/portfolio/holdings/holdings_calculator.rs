use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::trace;

use super::holdings_model::{Holding, PositionState};
use crate::transactions::{sort_for_replay, Transaction};

/// Folds a user's ledger into per-symbol positions as of a date.
///
/// The calculator owns a replay-ordered copy of the ledger and a cursor into
/// it. [`advance_to`](Self::advance_to) applies every transaction dated on or
/// before the target, so walking dates forward costs one pass over the ledger
/// in total while giving exactly the state a full replay of that prefix would.
/// Moving backwards resets and replays from the start.
#[derive(Debug, Clone)]
pub struct HoldingsCalculator {
    transactions: Vec<Transaction>,
    cursor: usize,
    as_of: Option<NaiveDate>,
    positions: BTreeMap<String, PositionState>,
}

impl HoldingsCalculator {
    pub fn new(transactions: &[Transaction]) -> Self {
        let mut transactions = transactions.to_vec();
        sort_for_replay(&mut transactions);
        Self {
            transactions,
            cursor: 0,
            as_of: None,
            positions: BTreeMap::new(),
        }
    }

    /// Applies transactions up to and including `date`.
    pub fn advance_to(&mut self, date: NaiveDate) -> &BTreeMap<String, PositionState> {
        if self.as_of.is_some_and(|current| date < current) {
            self.cursor = 0;
            self.positions.clear();
        }

        while let Some(transaction) = self.transactions.get(self.cursor) {
            if transaction.transaction_date > date {
                break;
            }
            trace!(
                "Applying {} {} {} on {}",
                transaction.side,
                transaction.shares,
                transaction.symbol,
                transaction.transaction_date
            );
            self.positions
                .entry(transaction.symbol.clone())
                .or_default()
                .apply(
                    transaction.side,
                    transaction.shares,
                    transaction.price_per_share,
                );
            self.cursor += 1;
        }

        self.as_of = Some(date);
        &self.positions
    }

    /// Applies the whole ledger.
    pub fn advance_to_end(&mut self) -> &BTreeMap<String, PositionState> {
        match self.transactions.last().map(|t| t.transaction_date) {
            Some(last) => self.advance_to(last),
            None => &self.positions,
        }
    }

    /// Every symbol seen so far, including closed and over-sold ones.
    pub fn positions(&self) -> &BTreeMap<String, PositionState> {
        &self.positions
    }

    /// Open positions only, ordered by symbol.
    pub fn open_holdings(&self) -> Vec<Holding> {
        self.positions
            .iter()
            .filter(|(_, position)| position.is_open())
            .map(|(symbol, position)| Holding::from_position(symbol, position))
            .collect()
    }
}

fn replayed(transactions: &[Transaction], as_of: Option<NaiveDate>) -> HoldingsCalculator {
    let mut calculator = HoldingsCalculator::new(transactions);
    match as_of {
        Some(date) => calculator.advance_to(date),
        None => calculator.advance_to_end(),
    };
    calculator
}

/// Per-symbol state after replaying transactions dated on or before `as_of`
/// (all of them when `None`).
pub fn calculate_positions(
    transactions: &[Transaction],
    as_of: Option<NaiveDate>,
) -> BTreeMap<String, PositionState> {
    replayed(transactions, as_of).positions
}

/// Open holdings as of `as_of` (all transactions when `None`), ordered by symbol.
pub fn calculate_holdings(transactions: &[Transaction], as_of: Option<NaiveDate>) -> Vec<Holding> {
    replayed(transactions, as_of).open_holdings()
}
