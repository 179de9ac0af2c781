//! Byte acquisition for file and URL conversions

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Where converters get raw deck text from
pub trait ContentSource: Send + Sync {
    /// Read a local file as text
    fn read_file(&self, path: &Path) -> Result<String>;

    /// Download a remote page as text
    fn fetch_url(&self, url: &str) -> Result<String>;
}

/// Reads files from disk and URLs over HTTP(S)
#[derive(Debug, Clone)]
pub struct DefaultSource {
    timeout: Duration,
}

impl DefaultSource {
    /// Timeout applied to each HTTP request
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a source with a custom HTTP timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for DefaultSource {
    fn default() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }
}

impl ContentSource for DefaultSource {
    fn read_file(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        // Older tools write Latin-1; undecodable bytes become U+FFFD.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn fetch_url(&self, url: &str) -> Result<String> {
        let fetch_error = |message: String| Error::Fetch {
            url: url.to_string(),
            message,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| fetch_error(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP status {}", status)));
        }

        let body = response.text().map_err(|e| fetch_error(e.to_string()))?;
        debug!(url, bytes = body.len(), "fetched deck page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "4 Lightning Bolt").unwrap();

        let text = DefaultSource::default().read_file(file.path()).unwrap();
        assert_eq!(text, "4 Lightning Bolt\n");
    }

    #[test]
    fn test_read_file_lossy_on_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"1 Jot\xF6nheim Guard\n").unwrap();

        let text = DefaultSource::default().read_file(file.path()).unwrap();
        assert!(text.starts_with("1 Jot"));
        assert!(text.ends_with("nheim Guard\n"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = DefaultSource::default()
            .read_file(Path::new("/no/such/deck.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_fetch_invalid_url() {
        let err = DefaultSource::default().fetch_url("not a url").unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
