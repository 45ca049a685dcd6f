// SPDX-License-Identifier: Apache-2.0

//! Outbound fetch restricted to the allowed hosts.

use anyhow::{Context, Result};
use reqguard_core::{AllowedHostSet, GuardConfig, build_http_client, check_outbound, fingerprint};
use reqwest::header::{CONTENT_TYPE, HeaderName, LOCATION};
use tracing::{debug, instrument};

use super::types::FetchResult;

/// GET `url` if its host is allowed. Redirect responses are reported, not followed.
#[instrument(skip_all)]
pub async fn run(url: &str, config: &GuardConfig) -> Result<FetchResult> {
    let allowed = AllowedHostSet::new(&config.allowed_hosts)?;
    let target = check_outbound(url, &allowed)?;
    let client = build_http_client(&config.transport)?;

    debug!(host = target.host_str().unwrap_or_default(), "Fetching");
    let response = client
        .get(target.clone())
        .send()
        .await
        .with_context(|| format!("Request to {target} failed"))?;

    let status = response.status().as_u16();
    let header = |name: HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header(CONTENT_TYPE);
    let location = header(LOCATION);

    let body = response
        .bytes()
        .await
        .context("Failed to read response body")?;

    Ok(FetchResult {
        url: target.to_string(),
        status,
        content_type,
        location,
        bytes: body.len(),
        sha256: fingerprint(&body),
    })
}
