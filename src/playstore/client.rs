use crate::error::{ApkwatchError, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

const PLAY_STORE_DETAILS: &str = "https://play.google.com/store/apps/details";
// The listing only renders the English "Updated on" label for a browser-like
// client asking for an English locale.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const MAX_LISTING_BYTES: usize = 10 * 1024 * 1024;

/// Fetches the raw listing page for a package id. The resolver is the only
/// consumer; keeping it behind a trait lets tests run without a network.
pub trait ListingClient {
    fn fetch_listing(&self, package_id: &str) -> Result<String>;
}

/// Play Store listing client
pub struct PlayStoreClient {
    client: Client,
}

impl PlayStoreClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(BROWSER_USER_AGENT)
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| ApkwatchError::Io(std::io::Error::other(e)))?;

        Ok(Self { client })
    }

    fn listing_url(package_id: &str) -> Result<Url> {
        let mut url = Url::parse(PLAY_STORE_DETAILS)
            .map_err(|e| ApkwatchError::Config(format!("Invalid listing endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("id", package_id)
            .append_pair("hl", "en");
        Ok(url)
    }
}

impl ListingClient for PlayStoreClient {
    fn fetch_listing(&self, package_id: &str) -> Result<String> {
        let url = Self::listing_url(package_id)?;

        if std::env::var("APKWATCH_VERBOSE").is_ok() {
            eprintln!("[VERBOSE] Fetching: {}", url);
        }

        let response =
            self.client
                .get(url.clone())
                .send()
                .map_err(|e| ApkwatchError::Fetch {
                    package_id: package_id.to_string(),
                    reason: e.to_string(),
                })?;

        if !response.status().is_success() {
            if std::env::var("APKWATCH_VERBOSE").is_ok() {
                eprintln!("[VERBOSE] HTTP {}: {}", response.status(), url);
            }
            return Err(ApkwatchError::Fetch {
                package_id: package_id.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body = response.text().map_err(|e| ApkwatchError::Fetch {
            package_id: package_id.to_string(),
            reason: e.to_string(),
        })?;

        if body.len() > MAX_LISTING_BYTES {
            return Err(ApkwatchError::Fetch {
                package_id: package_id.to_string(),
                reason: "listing page exceeded 10MB limit".to_string(),
            });
        }

        Ok(body)
    }
}
