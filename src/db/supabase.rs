use crate::db::query::TransactionQuery;
use crate::db::repository::TransactionStore;
use crate::error::StoreError;
use crate::models::transaction::Transaction;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client as HttpClient;
use tracing::debug;

/// PostgREST client for a Supabase project.
pub struct SupabaseStore {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    const REST_PATH: &'static str = "/rest/v1";
    pub const TRANSACTIONS_TABLE: &'static str = "transactions";

    pub fn new(http_client: HttpClient, base_url: &str, api_key: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn table_url(&self) -> String {
        format!("{}{}/{}", self.base_url, Self::REST_PATH, Self::TRANSACTIONS_TABLE)
    }

    /// Supabase wants the key twice: as `apikey` and as a bearer token.
    fn create_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl TransactionStore for SupabaseStore {
    async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, StoreError> {
        let url = self.table_url();
        debug!(%url, order = %query.order_param(), limit = query.limit, "querying remote store");

        let response = self
            .http_client
            .get(&url)
            .headers(self.create_headers()?)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers exactly one request with the given status and body, and hands
    /// back the raw request head it received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn test_client() -> HttpClient {
        HttpClient::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let store = SupabaseStore::new(test_client(), "https://abc.supabase.co/", "key");
        assert_eq!(store.table_url(), "https://abc.supabase.co/rest/v1/transactions");
    }

    #[tokio::test]
    async fn test_fetch_sends_recent_query_and_keys() {
        let body = r#"[{"id":1,"title":"Rent","amount":2500000,"type":"expense","date":"2024-01-05","category":"Home","payment_method":"NEFT","account":"HDFC"}]"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let store = SupabaseStore::new(test_client(), &base_url, "secret-key");

        let rows = store
            .fetch_transactions(&TransactionQuery::recent())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Rent");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /rest/v1/transactions?"));
        assert!(request.contains("select=*"));
        assert!(request.contains("order=date.desc%2ctitle.asc"));
        assert!(request.contains("limit=10"));
        assert!(request.contains("apikey: secret-key"));
        assert!(request.contains("authorization: bearer secret-key"));
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status() {
        let (base_url, server) = serve_once("401 Unauthorized", r#"{"message":"Invalid API key"}"#).await;
        let store = SupabaseStore::new(test_client(), &base_url, "wrong");

        let result = store.fetch_transactions(&TransactionQuery::recent()).await;
        server.await.unwrap();
        match result {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_reports_bad_payload() {
        let (base_url, server) = serve_once("200 OK", r#"{"not":"a list"}"#).await;
        let store = SupabaseStore::new(test_client(), &base_url, "key");

        let result = store.fetch_transactions(&TransactionQuery::recent()).await;
        server.await.unwrap();
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_key_with_newline() {
        let store = SupabaseStore::new(test_client(), "http://127.0.0.1:9", "bad\nkey");

        let result = store.fetch_transactions(&TransactionQuery::recent()).await;
        assert!(matches!(result, Err(StoreError::Header(_))));
    }
}
