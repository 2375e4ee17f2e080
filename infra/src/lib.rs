//! # Infrastructure Layer
//!
//! Concrete implementations behind the core `CodeStore` and
//! `SmsServiceTrait` seams.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: the Redis code store (Lua scripted) and the in-memory store
//! - **SMS**: a mock delivery service for development and tests
//!
//! `initialize()` wires configuration, the selected code store and the
//! verification service together.

use std::sync::Arc;

use otp_core::services::{CodeStore, SmsServiceTrait, VerificationService, VerificationServiceConfig};

// Re-export core types for convenience
pub use otp_core::errors::*;

/// Cache module - Redis client and code stores
pub mod cache;

/// SMS service module
pub mod sms;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services
    //!
    //! Handles:
    //! - Redis configuration
    //! - Code store backend and policy
    //! - Environment-specific settings

    use otp_shared::{CacheConfig, Environment, LoggingConfig, VerificationConfig};
    use serde::{Deserialize, Serialize};

    // Re-export shared configs
    pub use otp_shared::config::{CacheConfig as InfraCacheConfig, VerificationConfig as InfraVerificationConfig};

    /// Infrastructure configuration settings
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct InfrastructureConfig {
        /// Deployment environment
        pub environment: Environment,
        /// Redis cache configuration
        pub cache: CacheConfig,
        /// Code store and verification policy
        pub verification: VerificationConfig,
        /// Logging settings for binaries built on this crate
        pub logging: LoggingConfig,
    }
}

/// Verification service over type-erased store and delivery
pub type DynVerificationService = VerificationService<dyn SmsServiceTrait, dyn CodeStore>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Selected code store
    pub code_store: Arc<dyn CodeStore>,
    /// SMS delivery
    pub sms_service: Arc<dyn SmsServiceTrait>,
    /// Verification service built over both
    pub verification: Arc<DynVerificationService>,
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - Configuration from `.env` files and the process environment
/// - The code store (Redis, or memory when selected or as a fallback)
/// - The SMS service
/// - The verification service
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let config = load_config()?;
    let services = build_services(&config).await?;

    tracing::info!(
        backend = %services.code_store.backend(),
        "Infrastructure services initialized successfully"
    );

    Ok(services)
}

/// Build the services from an already loaded configuration
pub async fn build_services(
    config: &config::InfrastructureConfig,
) -> Result<InfrastructureServices, InfrastructureError> {
    let service_config = VerificationServiceConfig::try_from(&config.verification)
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    let code_store = cache::create_code_store(&config.cache, &config.verification).await?;
    let sms_service = sms::create_sms_service(&config.verification.sms_provider);

    let verification = Arc::new(VerificationService::new(
        sms_service.clone(),
        code_store.clone(),
        service_config,
    ));

    Ok(InfrastructureServices {
        code_store,
        sms_service,
        verification,
    })
}

/// Load infrastructure configuration from environment
pub fn load_config() -> Result<config::InfrastructureConfig, InfrastructureError> {
    let environment = otp_shared::Environment::from_env();
    // Environment-specific file first, then the generic one; neither is required
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let app = otp_shared::AppConfig::from_env();

    Ok(config::InfrastructureConfig {
        environment: app.environment,
        cache: app.cache,
        verification: app.verification,
        logging: app.logging,
    })
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Redis did not answer in time
    #[error("Cache timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for CodeError {
    fn from(err: InfrastructureError) -> Self {
        CodeError::storage(err)
    }
}
