// ABOUTME: Lists recent Linear issues through the gateway.
// ABOUTME: Shows retry configuration for a flaky network.

use std::time::Duration;

use anyhow::Result;
use serde_json::{Value, json};

use datagen::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::builder()
        .max_retries(2)
        .backoff_base(Duration::from_millis(500))
        .build()?;
    let client = DatagenClient::with_config(config)?;

    let issues = client
        .execute(
            "mcp_Linear_list_issues",
            json!({"limit": 10, "order_by": "createdAt", "order_direction": "DESC"}),
        )
        .await?;

    // The tool returns a list whose first element holds the issues.
    let block = issues[0].as_array().cloned().unwrap_or_default();
    println!("Issues returned: {}", block.len());
    for issue in &block {
        let status = match &issue["status"] {
            Value::String(s) => s.as_str(),
            other => other["name"].as_str().unwrap_or("?"),
        };
        println!(
            "- {}: {} [status: {}] created: {}",
            issue["identifier"].as_str().unwrap_or("?"),
            issue["title"].as_str().unwrap_or("(no title)"),
            status,
            issue["createdAt"].as_str().unwrap_or("?"),
        );
    }

    Ok(())
}
