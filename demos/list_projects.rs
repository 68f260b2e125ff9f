// ABOUTME: Lists Linear projects through the gateway.
// ABOUTME: Run with `cargo run --example list_projects` and DATAGEN_API_KEY set.

use anyhow::Result;
use serde_json::{Value, json};

use datagen::prelude::*;

fn status_name(project: &Value) -> Option<&str> {
    match &project["status"] {
        Value::String(s) => Some(s.as_str()),
        Value::Object(o) => o.get("name").and_then(Value::as_str),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let client = DatagenClient::from_env()?;
    let projects = client
        .execute("mcp_Linear_list_projects", json!({"limit": 20}))
        .await?;

    let content = projects[0]["content"].as_array().cloned().unwrap_or_default();
    println!("Projects returned: {}", content.len());
    for project in &content {
        println!(
            "- {} (id: {}) status: {}",
            project["name"].as_str().unwrap_or("?"),
            project["id"].as_str().unwrap_or("?"),
            status_name(project).unwrap_or("unknown"),
        );
    }

    Ok(())
}
