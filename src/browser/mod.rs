use anyhow::{Context, Result};

/// Open a URL in the user's default browser
///
/// # Arguments
/// * `url` - The URL to open (e.g., a team photo)
///
/// # Errors
/// Returns error if the URL is blank or no browser can be opened
pub fn open_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("Photo has no URL");
    }
    tracing::debug!(url, "opening browser");
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_is_rejected() {
        let err = open_url("  ").unwrap_err();
        assert!(err.to_string().contains("no URL"));
    }
}
