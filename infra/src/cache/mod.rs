//! Cache module for one-time code storage
//!
//! This module provides the two `CodeStore` backends and the factory that
//! picks one from configuration:
//! - `RedisCodeStore`: shared across processes, decisions made in Lua scripts
//! - `MemoryCodeStore`: single process, guarded by a mutex

pub mod memory_code_store;
pub mod redis_client;
pub mod redis_code_store;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use otp_core::domain::value_objects::CodePolicy;
use otp_core::services::CodeStore;
use otp_shared::{StoreBackendKind, VerificationConfig};

use crate::InfrastructureError;

pub use memory_code_store::MemoryCodeStore;
pub use redis_client::RedisClient;
pub use redis_code_store::RedisCodeStore;

// Re-export commonly used types
pub use otp_shared::config::cache::CacheConfig;

/// Build the code store selected by `verification.backend`
///
/// When Redis is selected but unreachable and `fallback_to_memory` is set,
/// an in-memory store is returned instead. That store is only correct for a
/// single process, so the fallback is logged loudly.
pub async fn create_code_store(
    cache: &CacheConfig,
    verification: &VerificationConfig,
) -> Result<Arc<dyn CodeStore>, InfrastructureError> {
    let policy = CodePolicy::try_from(verification)
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    match verification.backend {
        StoreBackendKind::Memory => Ok(create_memory_store(policy, verification)),
        StoreBackendKind::Redis => match RedisClient::new(cache.clone()).await {
            Ok(client) => {
                tracing::info!("Using Redis code store");
                Ok(Arc::new(RedisCodeStore::new(client, policy)))
            }
            Err(e) if verification.fallback_to_memory => {
                tracing::error!("Failed to initialize Redis code store: {}", e);
                tracing::warn!("Falling back to in-memory code store; limits are no longer shared across instances");
                Ok(create_memory_store(policy, verification))
            }
            Err(e) => Err(e),
        },
    }
}

fn create_memory_store(policy: CodePolicy, verification: &VerificationConfig) -> Arc<dyn CodeStore> {
    tracing::info!("Using in-memory code store");
    let store = Arc::new(MemoryCodeStore::new(policy));

    if verification.cleanup_interval_seconds > 0 {
        store
            .clone()
            .start_cleanup_task(Duration::from_secs(verification.cleanup_interval_seconds));
    }

    store
}
