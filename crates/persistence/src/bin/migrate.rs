#![deny(warnings)]

use persistence::{default_sqlite_url, init_db, list_scenarios};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| default_sqlite_url().to_string());
    // Ensure directory exists
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"));
    if let Some(path) = path {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    let pool = init_db(&url).await?;
    let existing = list_scenarios(&pool).await?;
    println!("Scenario DB ready at {} ({} saved)", url, existing.len());
    Ok(())
}
