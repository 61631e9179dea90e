use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    cache::{self, CredentialRecord},
    config::ProfileConfig,
    constants::SESSION_DURATION_SECONDS,
    sts::{ExchangeRequest, TokenExchange},
};

/// Orchestrates cache lookup, expiry evaluation, and the refresh-or-reuse
/// decision for one invocation
pub struct CredentialBroker<'a, E: TokenExchange> {
    exchange: &'a E,
    cache_dir: PathBuf,
    grace_seconds: i64,
}

impl<'a, E: TokenExchange> CredentialBroker<'a, E> {
    pub fn new(exchange: &'a E, cache_dir: PathBuf, grace_seconds: i64) -> Self {
        Self {
            exchange,
            cache_dir,
            grace_seconds,
        }
    }

    /// Return cached credentials while they remain fresh, otherwise perform
    /// one token exchange and overwrite the cache.
    ///
    /// Concurrent invocations may race on the cache file; last writer wins.
    pub async fn obtain(&self, config: &ProfileConfig) -> Result<CredentialRecord> {
        let path = cache_path_for(&self.cache_dir, config);

        if let Some(record) = cache::store::load(&path).await {
            if cache::is_valid(&record, Utc::now(), self.grace_seconds) {
                debug!("Using cached credentials from {}", path.display());
                return Ok(record);
            }
            debug!("Cached credentials expire within the grace window, refreshing");
        }

        let session_name = config
            .role_session_name
            .clone()
            .unwrap_or_else(|| format!("AWS-Profile-session-{}", Utc::now().timestamp()));

        let request = ExchangeRequest {
            role_arn: config.role_arn.clone(),
            session_name,
            duration_seconds: SESSION_DURATION_SECONDS,
            mfa_serial: config.mfa_serial.clone(),
        };

        let record = self.exchange.assume_role(&request).await?;

        cache::store::save(&path, &record)
            .await
            .with_context(|| format!("Failed to write credential cache: {}", path.display()))?;

        info!("Credentials refreshed for role: {}", config.role_arn);
        Ok(record)
    }

}

/// Resolve the on-disk cache path for a profile under `cache_dir`
pub fn cache_path_for(cache_dir: &Path, config: &ProfileConfig) -> PathBuf {
    let key = cache::derive_key(
        &config.profile_name,
        &config.role_arn,
        config.role_session_name.as_deref(),
    );
    cache_dir.join(format!("{key}.json"))
}
