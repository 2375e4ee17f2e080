//! Example: issuing and verifying codes through the verification service
//!
//! Uses Redis when `REDIS_URL` points at a running server and falls back to
//! the in-memory store otherwise.
//!
//! Run with: cargo run --example code_store_demo -p otp_infra

use otp_core::errors::DomainError;
use otp_shared::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = otp_infra::load_config()?;
    init_tracing(&config.logging);

    let services = otp_infra::build_services(&config).await?;
    println!("Code store backend: {}", services.code_store.backend());

    let phone = "+15551234567";
    let sent = services.verification.send_code("login", phone).await?;
    println!("Code sent (message {}), valid until {}", sent.message_id, sent.expires_at);

    // A second request inside the cooldown is refused
    match services.verification.send_code("login", phone).await {
        Err(DomainError::Code(e)) => println!("Resend refused: {}", e),
        other => println!("Unexpected resend result: {:?}", other.map(|r| r.message_id)),
    }

    for guess in ["000000", "111111", "222222", "333333"] {
        match services.verification.verify_code("login", phone, guess).await {
            Ok(result) if result.success => println!("{} accepted", guess),
            Ok(result) => println!(
                "{} rejected, {} attempts left",
                guess,
                result.remaining_attempts.unwrap_or(0)
            ),
            Err(e) => println!("{} refused: {}", guess, e),
        }
    }

    services.verification.clear_code("login", phone).await?;
    Ok(())
}
