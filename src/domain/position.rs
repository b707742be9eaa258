//! Open position and closed trade records.

use chrono::NaiveDateTime;

/// A long position held by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub entry_index: usize,
    pub entry_timestamp: NaiveDateTime,
    pub entry_price: f64,
}

impl OpenPosition {
    /// Close at bar `exit_index`, producing the trade record.
    pub fn close(self, exit_index: usize, exit_timestamp: NaiveDateTime, exit_price: f64) -> Trade {
        Trade {
            entry_index: self.entry_index,
            exit_index,
            entry_timestamp: self.entry_timestamp,
            exit_timestamp,
            entry_price: self.entry_price,
            exit_price,
            pnl: exit_price - self.entry_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_timestamp: NaiveDateTime,
    pub exit_timestamp: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn bars_held(&self) -> usize {
        self.exit_index - self.entry_index
    }

    /// pnl relative to the entry price, in percent.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 {
            0.0
        } else {
            self.pnl / self.entry_price * 100.0
        }
    }
}
