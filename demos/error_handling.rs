//! Shows how each error variant surfaces.
//!
//! Run with: `CIRCLECI_TOKEN=... cargo run --example error_handling`

use circleci_client::{Client, ClientBuilder, Error};
use serde::Deserialize;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("circleci_client=info")
        .init();

    println!("=== Example 1: Missing Token ===");
    // No request leaves the process without a token.
    let anonymous = Client::builder().build()?;
    match anonymous.projects().get("gh/acme/widgets").await {
        Err(Error::Configuration(msg)) => println!("Configuration error: {}", msg),
        other => println!("Unexpected: {:?}", other.map(|p| p.name)),
    }
    println!();

    let client = ClientBuilder::from_env()?.build()?;

    println!("=== Example 2: API Errors ===");
    match client.projects().get("gh/acme/does-not-exist").await {
        Ok(project) => println!("Found {}", project.name),
        Err(Error::Api {
            status,
            message,
            raw_response,
        }) => {
            println!("API Error!");
            println!("  Status: {}", status);
            println!("  Message: {}", message);
            println!("  Raw response: {}", raw_response);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 3: Decode Errors ===");
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct WrongSchema {
        nonexistent_field: String,
    }

    match client.get::<WrongSchema>("/me").await {
        Ok(_) => println!("Unexpected success"),
        Err(Error::Decode {
            raw_response,
            serde_error,
            status,
        }) => {
            println!("Decode failed (status {})", status);
            println!("  Serde error: {}", serde_error);
            println!(
                "  Raw response (first 200 chars): {}",
                raw_response.chars().take(200).collect::<String>()
            );
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 4: Transport Errors ===");
    let unreachable = Client::builder()
        .token("unused")
        .base_url("https://this-domain-does-not-exist-12345.com")?
        .build()?;

    match unreachable.projects().get("gh/acme/widgets").await {
        Err(Error::Transport(e)) => {
            println!("Transport Error!");
            println!("  Error: {}", e);
            println!("  Is connect error: {}", e.is_connect());
        }
        other => println!("Unexpected: {:?}", other.map(|p| p.name)),
    }

    Ok(())
}
