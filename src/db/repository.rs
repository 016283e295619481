use crate::db::query::TransactionQuery;
use crate::error::StoreError;
use crate::models::transaction::Transaction;
use async_trait::async_trait;

/// Read access to wherever transactions live. The view only ever holds one of
/// these behind an `Arc`, so tests can hand it something other than the
/// remote client.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, StoreError>;
}

#[cfg(test)]
pub struct MemoryStore {
    rows: Vec<Transaction>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }
}

#[cfg(test)]
#[async_trait]
impl TransactionStore for MemoryStore {
    async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(query.apply(self.rows.clone()))
    }
}

/// Always answers like a store that is down.
#[cfg(test)]
pub struct UnreachableStore;

#[cfg(test)]
#[async_trait]
impl TransactionStore for UnreachableStore {
    async fn fetch_transactions(
        &self,
        _query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, StoreError> {
        Err(StoreError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

#[cfg(test)]
pub fn create_test_transaction(id: &str, title: &str, date: &str, kind: &str) -> Transaction {
    use crate::models::transaction::{parse_timestamp, TransactionType};

    Transaction {
        id: id.to_string(),
        title: title.to_string(),
        amount: 12345,
        transaction_type: TransactionType::from_label(kind),
        date: parse_timestamp(date).unwrap(),
        category: "Food".to_string(),
        payment_method: "UPI".to_string(),
        account: "Savings".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_applies_query() {
        let rows = (1..=12)
            .map(|day| {
                create_test_transaction(&day.to_string(), "Chai", &format!("2024-05-{:02}", day), "expense")
            })
            .collect();
        let store = MemoryStore::new(rows);

        let result = store.fetch_transactions(&TransactionQuery::recent()).await.unwrap();
        assert_eq!(result.len(), 10);
        assert_eq!(result[0].id, "12");
    }

    #[tokio::test]
    async fn test_unreachable_store_fails() {
        let result = UnreachableStore
            .fetch_transactions(&TransactionQuery::recent())
            .await;
        assert!(matches!(result, Err(StoreError::Status { status: 503, .. })));
    }
}
