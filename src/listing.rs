//! Album listing
//!
//! Pages through the library API and builds a fresh [`Inventory`]. A refresh
//! replaces the stored inventory wholesale; nothing is merged.

use crate::album::{AlbumRecord, Inventory};
use crate::config::ListingConfig;
use crate::error::{Result, SweepError};
use serde::Deserialize;
use std::fs;
use std::time::Duration;
use tracing::{error, info, warn};

/// One album as reported by the listing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedAlbum {
    pub id: String,
    pub title: String,
    pub photo_count: u64,
    pub url: String,
}

/// One page of results plus the continuation token, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumPage {
    pub albums: Vec<ListedAlbum>,
    pub next_page_token: Option<String>,
}

/// Anything that can hand out album pages.
pub trait AlbumSource {
    fn fetch_page(&mut self, page_token: Option<&str>) -> Result<AlbumPage>;
}

// Library API response structures

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAlbumList {
    #[serde(default)]
    albums: Vec<ApiAlbum>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAlbum {
    id: Option<String>,
    title: Option<String>,
    product_url: Option<String>,
    /// int64 values arrive as JSON strings
    media_items_count: Option<String>,
}

impl ApiAlbumList {
    fn into_page(self) -> AlbumPage {
        let albums = self
            .albums
            .into_iter()
            .filter_map(|album| {
                let Some(id) = album.id.filter(|id| !id.is_empty()) else {
                    warn!("Listing returned an album without an ID, ignoring it");
                    return None;
                };
                let photo_count = match album.media_items_count.as_deref() {
                    None => 0,
                    Some(raw) => raw.parse().unwrap_or_else(|_| {
                        warn!(%id, raw, "Unreadable mediaItemsCount, using 0");
                        0
                    }),
                };
                Some(ListedAlbum {
                    title: album.title.unwrap_or_else(|| "Untitled".to_string()),
                    url: album.product_url.unwrap_or_default(),
                    photo_count,
                    id,
                })
            })
            .collect();
        AlbumPage {
            albums,
            next_page_token: self.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

/// Blocking client for the photo library `albums.list` endpoint.
pub struct PhotosLibraryClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    access_token: String,
    page_size: u32,
}

impl PhotosLibraryClient {
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>, page_size: u32) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            page_size,
        })
    }

    /// Build a client from the listing section, reading the token file.
    pub fn from_config(config: &ListingConfig) -> Result<Self> {
        let token = fs::read_to_string(&config.token_file).map_err(|e| {
            SweepError::config(format!(
                "cannot read access token from {}: {e}",
                config.token_file.display()
            ))
        })?;
        let token = token.trim();
        if token.is_empty() {
            return Err(SweepError::config(format!(
                "access token file {} is empty",
                config.token_file.display()
            )));
        }
        Self::new(config.endpoint.clone(), token, config.page_size)
    }

    fn albums_url(&self) -> String {
        format!("{}/v1/albums", self.endpoint)
    }
}

impl AlbumSource for PhotosLibraryClient {
    fn fetch_page(&mut self, page_token: Option<&str>) -> Result<AlbumPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("pageSize", self.page_size.to_string()),
            ("excludeNonAppCreatedData", "false".to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let response = self
            .client
            .get(self.albums_url())
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SweepError::listing(format!("HTTP {status}: {}", body.trim())));
        }
        let list: ApiAlbumList = response.json()?;
        Ok(list.into_page())
    }
}

/// Result of a listing refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingOutcome {
    pub inventory: Inventory,
    pub pages: usize,
    /// Set when paging ended on an error; `inventory` holds what was gathered
    pub error: Option<String>,
}

/// Page through `source` into a fresh inventory.
///
/// Paging stops when no continuation token is returned, or once more than
/// `limit` albums have been collected. A failed page ends the loop and the
/// albums gathered so far are still returned.
pub fn refresh_inventory(
    source: &mut dyn AlbumSource,
    limit: usize,
    page_pause: Duration,
) -> ListingOutcome {
    let mut outcome = ListingOutcome::default();
    let mut page_token: Option<String> = None;
    info!("Listing albums");

    loop {
        let page = match source.fetch_page(page_token.as_deref()) {
            Ok(page) => page,
            Err(e) => {
                error!(pages = outcome.pages, "Error listing albums: {}", e);
                outcome.error = Some(e.to_string());
                break;
            }
        };
        outcome.pages += 1;

        if page.albums.is_empty() {
            info!(page = outcome.pages, "No albums on page");
        } else {
            info!(page = outcome.pages, albums = page.albums.len(), "Page of albums received");
        }
        for album in page.albums {
            let record = AlbumRecord::new(album.id, album.title, album.photo_count, album.url);
            let id = record.id.clone();
            if !outcome.inventory.insert(record) {
                warn!(%id, "Album listed twice, keeping first occurrence");
            }
        }

        if outcome.inventory.len() > limit {
            info!(limit, "Album list length limit exceeded, stopping");
            break;
        }
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
        std::thread::sleep(page_pause);
    }

    info!(albums = outcome.inventory.len(), pages = outcome.pages, "Listing finished");
    outcome
}
