use std::time::Duration;

use anyhow::Context;

const USER_AGENT: &str = concat!("codeyatri-dashboard/", env!("CARGO_PKG_VERSION"));

/// Shared client construction for every HTTP adapter.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if !timeout.is_zero() {
        builder = builder.timeout(timeout);
    }
    builder.build().context("build http client failed")
}
