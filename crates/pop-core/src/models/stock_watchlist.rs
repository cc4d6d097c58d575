//! Named stock watchlists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    #[serde(default)]
    pub exchange: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub stocks: Vec<Stock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockWatchlist {
    pub watchlists: Vec<Watchlist>,
}

impl Document for StockWatchlist {
    const KEY: &'static str = keys::STOCK_WATCHLIST;
}

impl StockWatchlist {
    pub fn create_watchlist(&mut self, name: String, now: DateTime<Utc>) -> Watchlist {
        let watchlist = Watchlist {
            id: new_id(),
            name,
            created_at: now,
            stocks: Vec::new(),
        };
        self.watchlists.push(watchlist.clone());
        watchlist
    }

    /// Add a stock to a watchlist; duplicates by symbol are a no-op.
    pub fn add_stock(
        &mut self,
        watchlist_id: &str,
        symbol: String,
        exchange: Option<String>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(watchlist) = self.watchlists.iter_mut().find(|w| w.id == watchlist_id) else {
            return false;
        };
        if watchlist.stocks.iter().any(|s| s.symbol == symbol) {
            return false;
        }
        watchlist.stocks.push(Stock { symbol, exchange, added_at: now });
        true
    }
}
