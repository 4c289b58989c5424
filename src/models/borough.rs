// src/models/borough.rs
// DOCUMENTATION: Borough article model
// PURPOSE: Row mapping, request DTOs, validation and derived fields (slug, timestamps)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::lifecycle::{borough_path, slugify, CanonicalUrl, Timestamped};
use crate::config::BoroughSettings;
use crate::errors::BoroughsError;
use crate::storage::Storage;

pub const DEFAULT_TITLE: &str = "Title of your page.";
pub const DEFAULT_ZIPCODE: i32 = 9401;
pub const DEFAULT_TRACT: &str = "010100";
pub const DEFAULT_CONTENT: &str = "Write the content of your page here.";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_zipcode() -> i32 {
    DEFAULT_ZIPCODE
}

fn default_tract() -> String {
    DEFAULT_TRACT.to_string()
}

fn default_content() -> String {
    DEFAULT_CONTENT.to_string()
}

/// A single borough page
/// DOCUMENTATION: Maps directly to the boroughs table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Borough {
    pub id: Uuid,

    /// Unique page title
    pub title: String,

    /// User that posted this article
    pub author_id: Uuid,

    /// URL path component, always slugify(title)
    pub slug: String,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,

    pub zipcode: i32,

    /// Census tract, at most 10 characters
    pub tract: String,

    pub content: String,

    /// Optional source URL
    pub sources: Option<String>,

    /// Stored names of the four optional images
    pub main_img: Option<String>,
    pub main_img2: Option<String>,
    pub main_img3: Option<String>,
    pub main_img4: Option<String>,
}

/// Which of the four image attachments an upload targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSlot {
    #[serde(rename = "main_img")]
    Main,
    #[serde(rename = "main_img2")]
    Second,
    #[serde(rename = "main_img3")]
    Third,
    #[serde(rename = "main_img4")]
    Fourth,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 4] = [
        ImageSlot::Main,
        ImageSlot::Second,
        ImageSlot::Third,
        ImageSlot::Fourth,
    ];

    /// Column holding this slot in the boroughs table
    pub fn column(self) -> &'static str {
        match self {
            ImageSlot::Main => "main_img",
            ImageSlot::Second => "main_img2",
            ImageSlot::Third => "main_img3",
            ImageSlot::Fourth => "main_img4",
        }
    }

    /// Directory (relative to the storage root) that uploads for this slot land in.
    /// The lead image is shared across pages, the others are grouped per borough.
    pub fn upload_dir(self, slug: &str) -> String {
        match self {
            ImageSlot::Main => "main_images".to_string(),
            _ => format!("main_images/{}", slug),
        }
    }
}

impl FromStr for ImageSlot {
    type Err = BoroughsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageSlot::ALL
            .into_iter()
            .find(|slot| slot.column() == s)
            .ok_or_else(|| BoroughsError::InvalidInput(format!("Unknown image slot '{}'", s)))
    }
}

/// Request DTO for creating a borough
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBoroughRequest {
    #[serde(default = "default_title")]
    pub title: String,

    pub author_id: Uuid,

    #[serde(default = "default_zipcode")]
    pub zipcode: i32,

    #[serde(default = "default_tract")]
    #[validate(length(min = 1, max = 10))]
    pub tract: String,

    #[serde(default = "default_content")]
    pub content: String,

    #[serde(default)]
    #[validate(url)]
    pub sources: Option<String>,
}

/// Request DTO for editing a borough
/// Only provided fields change; an empty `sources` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBoroughRequest {
    pub title: Option<String>,

    /// Reassign the page to another author
    pub author_id: Option<Uuid>,

    pub zipcode: Option<i32>,

    #[validate(length(min = 1, max = 10))]
    pub tract: Option<String>,

    pub content: Option<String>,

    pub sources: Option<String>,
}

/// Insert-ready borough with every derived field filled in
#[derive(Debug, Clone)]
pub struct NewBorough {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub zipcode: i32,
    pub tract: String,
    pub content: String,
    pub sources: Option<String>,
}

/// Check a title against the configured limits and return its slug
fn validated_slug(title: &str, settings: &BoroughSettings) -> Result<String, BoroughsError> {
    if title.is_empty() {
        return Err(BoroughsError::ValidationError(
            "title: must not be empty".to_string(),
        ));
    }

    let max = settings.title_max_length;
    if title.chars().count() > max {
        return Err(BoroughsError::ValidationError(format!(
            "title: must be at most {} characters",
            max
        )));
    }

    let slug = slugify(title);
    if slug.is_empty() {
        return Err(BoroughsError::ValidationError(
            "title: must contain at least one letter or digit".to_string(),
        ));
    }
    if settings.reserved_slugs.iter().any(|r| *r == slug) {
        return Err(BoroughsError::ValidationError(format!(
            "title: '{}' is reserved, choose another title",
            title
        )));
    }
    if slug.chars().count() > max {
        return Err(BoroughsError::ValidationError(format!(
            "slug: must be at most {} characters",
            max
        )));
    }

    Ok(slug)
}

fn normalize_sources(sources: Option<String>) -> Option<String> {
    sources
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl NewBorough {
    /// Validate a create request and derive slug and timestamps
    pub fn prepare(
        req: CreateBoroughRequest,
        settings: &BoroughSettings,
        now: DateTime<Utc>,
    ) -> Result<Self, BoroughsError> {
        req.validate()?;

        let title = req.title.trim().to_string();
        let slug = validated_slug(&title, settings)?;

        Ok(NewBorough {
            id: Uuid::new_v4(),
            title,
            author_id: req.author_id,
            slug,
            created_at: now,
            modified_at: now,
            zipcode: req.zipcode,
            tract: req.tract,
            content: req.content,
            sources: normalize_sources(req.sources),
        })
    }
}

impl Borough {
    /// Apply an edit, then recompute the slug and stamp `modified_at`
    pub fn apply_update(
        &mut self,
        changes: UpdateBoroughRequest,
        settings: &BoroughSettings,
        now: DateTime<Utc>,
    ) -> Result<(), BoroughsError> {
        changes.validate()?;
        if let Some(sources) = changes.sources.as_deref().map(str::trim) {
            if !sources.is_empty() && !validator::validate_url(sources) {
                return Err(BoroughsError::ValidationError(
                    "sources: must be a valid URL".to_string(),
                ));
            }
        }

        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(author_id) = changes.author_id {
            self.author_id = author_id;
        }
        if let Some(zipcode) = changes.zipcode {
            self.zipcode = zipcode;
        }
        if let Some(tract) = changes.tract {
            self.tract = tract;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if changes.sources.is_some() {
            self.sources = normalize_sources(changes.sources);
        }

        self.touch(settings, now)
    }

    /// Recompute derived fields as every save does
    pub fn touch(&mut self, settings: &BoroughSettings, now: DateTime<Utc>) -> Result<(), BoroughsError> {
        self.slug = validated_slug(&self.title, settings)?;
        self.modified_at = now;
        Ok(())
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&str> {
        match slot {
            ImageSlot::Main => self.main_img.as_deref(),
            ImageSlot::Second => self.main_img2.as_deref(),
            ImageSlot::Third => self.main_img3.as_deref(),
            ImageSlot::Fourth => self.main_img4.as_deref(),
        }
    }

    pub fn set_image(&mut self, slot: ImageSlot, name: Option<String>) {
        match slot {
            ImageSlot::Main => self.main_img = name,
            ImageSlot::Second => self.main_img2 = name,
            ImageSlot::Third => self.main_img3 = name,
            ImageSlot::Fourth => self.main_img4 = name,
        }
    }

    /// Convert into the API representation, resolving image URLs through `storage`
    pub fn to_response(&self, storage: &dyn Storage) -> BoroughResponse {
        let images = ImageSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                self.image(slot).map(|name| ImageResponse {
                    slot,
                    name: name.to_string(),
                    url: storage.url(name),
                })
            })
            .collect();

        BoroughResponse {
            id: self.id,
            title: self.title.clone(),
            author_id: self.author_id,
            slug: self.slug.clone(),
            url: self.absolute_url(),
            created_at: self.created(),
            modified_at: self.modified().unwrap_or_else(|| self.created()),
            zipcode: self.zipcode,
            tract: self.tract.clone(),
            content: self.content.clone(),
            sources: self.sources.clone(),
            images,
        }
    }

    pub fn to_summary(&self) -> BoroughSummary {
        BoroughSummary {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            url: self.absolute_url(),
            created_at: self.created(),
        }
    }
}

impl CanonicalUrl for Borough {
    fn absolute_url(&self) -> String {
        borough_path(&self.slug)
    }
}

impl Timestamped for Borough {
    fn created(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn modified(&self) -> Option<DateTime<Utc>> {
        Some(self.modified_at)
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Image attachment as exposed by the API
#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub slot: ImageSlot,
    pub name: String,
    pub url: Option<String>,
}

/// Borough DTO for API responses
#[derive(Debug, Clone, Serialize)]
pub struct BoroughResponse {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub slug: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub zipcode: i32,
    pub tract: String,
    pub content: String,
    pub sources: Option<String>,
    pub images: Vec<ImageResponse>,
}

/// Compact listing entry for the index page
#[derive(Debug, Clone, Serialize)]
pub struct BoroughSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
