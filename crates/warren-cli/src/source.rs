//! Chamber source resolution: local file path or http(s) URL.

use anyhow::Context;
use warren_core::Chamber;

/// True when the source string parses as an http(s) URL.
fn is_url(source: &str) -> bool {
    matches!(
        reqwest::Url::parse(source),
        Ok(url) if matches!(url.scheme(), "http" | "https")
    )
}

/// Resolve a chamber source into a parsed, validated tree.
pub async fn load_chamber(source: &str) -> anyhow::Result<Chamber> {
    let bytes = if is_url(source) {
        let response = reqwest::get(source)
            .await
            .with_context(|| format!("could not fetch chamber resource {:?}", source))?
            .error_for_status()
            .with_context(|| format!("chamber resource {:?} responded with an error", source))?;
        response.bytes().await?.to_vec()
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("could not read chamber file {:?}", source))?
    };

    let chamber = Chamber::from_slice(&bytes)
        .with_context(|| format!("invalid chamber document in {:?}", source))?;
    Ok(chamber)
}
