//! Net-worth snapshots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub assets: HashMap<String, f64>,
    pub liabilities: HashMap<String, f64>,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetWorth {
    pub entries: Vec<NetWorthEntry>,
    pub asset_categories: Vec<String>,
    pub liability_categories: Vec<String>,
}

impl Default for NetWorth {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            asset_categories: ["cash", "investments", "property", "other"]
                .map(String::from)
                .to_vec(),
            liability_categories: ["creditCard", "loans", "mortgage", "other"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl Document for NetWorth {
    const KEY: &'static str = keys::NET_WORTH;
}

impl NetWorth {
    pub fn add_entry(
        &mut self,
        assets: HashMap<String, f64>,
        liabilities: HashMap<String, f64>,
        now: DateTime<Utc>,
    ) -> NetWorthEntry {
        let total_assets: f64 = assets.values().sum();
        let total_liabilities: f64 = liabilities.values().sum();
        let entry = NetWorthEntry {
            id: new_id(),
            date: now,
            assets,
            liabilities,
            total_assets,
            total_liabilities,
            net_worth: total_assets - total_liabilities,
        };
        self.entries.insert(0, entry.clone());
        entry
    }
}
