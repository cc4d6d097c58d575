//! Income/expense ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::keys;
use crate::store::Document;

use super::new_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionCategories {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl Default for TransactionCategories {
    fn default() -> Self {
        Self {
            income: ["Salary", "Freelance", "Investments", "Gifts", "Other"]
                .map(String::from)
                .to_vec(),
            expense: [
                "Rent",
                "Utilities",
                "Groceries",
                "Transportation",
                "Entertainment",
                "Dining",
                "Healthcare",
                "Shopping",
                "Other",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CashFlow {
    pub transactions: Vec<Transaction>,
    pub categories: TransactionCategories,
}

impl Document for CashFlow {
    const KEY: &'static str = keys::CASH_FLOW;
}

impl CashFlow {
    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        category: String,
        description: String,
        date: DateTime<Utc>,
    ) -> Transaction {
        let transaction = Transaction {
            id: new_id(),
            kind,
            amount,
            category,
            description,
            date,
        };
        self.transactions.insert(0, transaction.clone());
        transaction
    }

    pub fn delete_transaction(&mut self, id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        self.transactions.len() != before
    }
}
