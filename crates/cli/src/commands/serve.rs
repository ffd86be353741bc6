//! `outly serve`: Start the HTTP API server.

use outly_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("⛅ Outly Gateway");
    println!("   Listening:  {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:      {}", config.model);
    println!(
        "   Rate limit: {} requests / {} ms per client",
        config.rate_limit.limit, config.rate_limit.window_ms
    );

    outly_gateway::start(config).await?;

    Ok(())
}
