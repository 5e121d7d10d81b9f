use anyhow::{Context, Result};

const USER_AGENT: &str = "herodex/0.1 (character wiki tool)";

/// Build the shared HTTP client. One client per batch run, so all
/// fetches reuse its connection pool.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch a page and return its body as text.
///
/// Any transport failure or non-success status is an error; the caller
/// decides whether that is fatal for the run.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to fetch page")?;

    let status = response.status();
    anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");

    response.text().await.context("Failed to read response body")
}
