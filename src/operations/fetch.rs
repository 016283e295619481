use crate::db::query::TransactionQuery;
use crate::db::repository::TransactionStore;
use crate::error::StoreError;
use crate::models::transaction::Transaction;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

type FetchResult = Result<Vec<Transaction>, StoreError>;

/// A single store read running in the background, polled from the UI loop.
/// Dropping it aborts the request.
pub struct PendingFetch {
    task: JoinHandle<()>,
    receiver: oneshot::Receiver<FetchResult>,
}

impl PendingFetch {
    pub fn spawn(runtime: &Handle, store: Arc<dyn TransactionStore>, query: TransactionQuery) -> Self {
        let (sender, receiver) = oneshot::channel();
        let task = runtime.spawn(async move {
            info!(limit = query.limit, order = %query.order_param(), "fetching transactions");
            let result = store.fetch_transactions(&query).await;
            // Receiver gone means the view was closed.
            let _ = sender.send(result);
        });

        Self { task, receiver }
    }

    /// `None` while the request is still in flight.
    pub fn poll(&mut self) -> Option<FetchResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(StoreError::Cancelled)),
        }
    }
}

impl Drop for PendingFetch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// One-shot read for non-interactive callers. Failures are logged and
/// read as an empty list, the same way the view treats them.
pub async fn load_recent(store: &dyn TransactionStore, query: &TransactionQuery) -> Vec<Transaction> {
    match store.fetch_transactions(query).await {
        Ok(rows) => {
            let rows = query.apply(rows);
            info!(count = rows.len(), "transactions loaded");
            rows
        }
        Err(e) => {
            warn!(error = %e, "failed to load transactions");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{create_test_transaction, MemoryStore, UnreachableStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Never answers; records when its request started and when it was torn down.
    struct HangingStore {
        started: Arc<AtomicBool>,
        dropped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl TransactionStore for HangingStore {
        async fn fetch_transactions(
            &self,
            _query: &TransactionQuery,
        ) -> Result<Vec<Transaction>, StoreError> {
            let _guard = DropFlag(self.dropped.clone());
            self.started.store(true, Ordering::SeqCst);
            std::future::pending::<()>().await;
            Ok(Vec::new())
        }
    }

    async fn wait_for(mut fetch: PendingFetch) -> FetchResult {
        loop {
            if let Some(result) = fetch.poll() {
                return result;
            }
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_fetch_delivers_rows() {
        let store = Arc::new(MemoryStore::new(vec![
            create_test_transaction("1", "Tea", "2024-01-01", "expense"),
            create_test_transaction("2", "Salary", "2024-01-02", "income"),
        ]));

        let fetch = PendingFetch::spawn(&Handle::current(), store, TransactionQuery::recent());
        let rows = wait_for(fetch).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "2");
    }

    #[tokio::test]
    async fn test_fetch_delivers_error() {
        let fetch = PendingFetch::spawn(
            &Handle::current(),
            Arc::new(UnreachableStore),
            TransactionQuery::recent(),
        );
        let result = wait_for(fetch).await;
        assert!(matches!(result, Err(StoreError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_dropping_fetch_aborts_request() {
        let started = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicBool::new(false));
        let store = Arc::new(HangingStore {
            started: started.clone(),
            dropped: dropped.clone(),
        });

        let mut fetch = PendingFetch::spawn(&Handle::current(), store, TransactionQuery::recent());
        while !started.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        assert!(fetch.poll().is_none());

        drop(fetch);
        for _ in 0..100 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_load_recent_swallows_failure() {
        let rows = load_recent(&UnreachableStore, &TransactionQuery::recent()).await;
        assert!(rows.is_empty());
    }
}
