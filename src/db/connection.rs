use crate::config::Config;
use crate::db::supabase::SupabaseStore;
use crate::error::StoreError;
use std::time::Duration;
use tracing::info;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn establish_connection(config: &Config) -> Result<SupabaseStore, StoreError> {
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("fino-feed/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;

    info!(url = %config.store_url, "remote store client ready");
    Ok(SupabaseStore::new(http_client, &config.store_url, &config.store_key))
}
