// src/models/photo.rs
// DOCUMENTATION: User-submitted photos attached to a borough
// PURPOSE: Row mapping, upload form parsing and moderation helpers

use chrono::{DateTime, Utc};
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use std::io::Cursor;
use uuid::Uuid;
use validator::Validate;

use super::borough::DEFAULT_CONTENT;
use super::lifecycle::{borough_path, within_last_day, CanonicalUrl, Timestamped};
use crate::errors::BoroughsError;
use crate::storage::Storage;

/// Photo submission, joined with its borough's slug
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    /// Hidden from public pages until a moderator approves it
    pub approved: bool,

    pub borough_id: Uuid,

    /// Slug of the owning borough (from a join, not a column of photos)
    pub borough_slug: String,

    /// Stored name in the public media backend
    pub image: String,

    pub content: String,
    pub votes: i32,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Photo {
    /// True if the photo was created within the 24 hours ending at `now`.
    /// Photos dated in the future are not recent.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        within_last_day(self.created_at, now)
    }

    /// Convert database photo into API response DTO
    pub fn to_response(&self, storage: &dyn Storage, now: DateTime<Utc>) -> PhotoResponse {
        PhotoResponse {
            id: self.id,
            borough_id: self.borough_id,
            url: self.absolute_url(),
            image_url: storage.url(&self.image),
            content: self.content.clone(),
            votes: self.votes,
            approved: self.approved,
            published_recently: self.was_published_recently(now),
            submitted_by: format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string(),
            created_at: self.created(),
        }
    }
}

impl CanonicalUrl for Photo {
    /// A photo has no page of its own; it links to its borough
    fn absolute_url(&self) -> String {
        borough_path(&self.borough_slug)
    }
}

impl Timestamped for Photo {
    fn created(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Photo DTO for API responses
/// The submitter's email is never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub borough_id: Uuid,
    pub url: String,
    pub image_url: Option<String>,
    pub content: String,
    pub votes: i32,
    pub approved: bool,
    pub published_recently: bool,
    pub submitted_by: String,
    pub created_at: DateTime<Utc>,
}

/// Text fields of the upload form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PhotoSubmission {
    pub borough_id: Uuid,

    pub content: String,

    #[validate(length(min = 1, max = 35))]
    pub first_name: String,

    #[validate(length(min = 1, max = 35))]
    pub last_name: String,

    #[validate(email, length(max = 200))]
    pub email: String,
}

impl PhotoSubmission {
    /// Build a submission from raw form fields.
    /// Fields outside the form (e.g. "approved", "votes") are ignored.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, BoroughsError> {
        let field = |name: &str| fields.get(name).map(|v| v.trim().to_string());

        let borough_id = field("borough")
            .or_else(|| field("borough_id"))
            .ok_or_else(|| BoroughsError::ValidationError("borough: this field is required".into()))?;
        let borough_id = Uuid::parse_str(&borough_id)
            .map_err(|_| BoroughsError::ValidationError("borough: not a valid id".into()))?;

        let content = field("content")
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT.to_string());

        let submission = PhotoSubmission {
            borough_id,
            content,
            first_name: field("first_name").unwrap_or_default(),
            last_name: field("last_name").unwrap_or_default(),
            email: field("email").unwrap_or_default(),
        };
        submission.validate()?;
        Ok(submission)
    }
}

/// Formats an upload may be decoded as
pub const ACCEPTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// Preferred file extension for a decoded format
pub fn extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}

fn invalid_image() -> BoroughsError {
    BoroughsError::ValidationError(
        "image: upload a valid image. The file was either not an image or corrupted".into(),
    )
}

/// An uploaded image file as received from the client
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    /// Decode the upload fully; empty, truncated or non-image files are rejected
    pub fn validate(&self) -> Result<ImageFormat, BoroughsError> {
        if self.data.is_empty() {
            return Err(BoroughsError::ValidationError(
                "image: the submitted file is empty".into(),
            ));
        }

        let reader = ImageReader::new(Cursor::new(&self.data))
            .with_guessed_format()
            .map_err(|_| invalid_image())?;
        let format = reader
            .format()
            .filter(|f| ACCEPTED_FORMATS.contains(f))
            .ok_or_else(invalid_image)?;

        if let Err(e) = reader.decode() {
            log::debug!("Rejected {} upload {}: {}", extension(format), self.filename, e);
            return Err(invalid_image());
        }
        Ok(format)
    }

    /// Filename to store under, with an extension matching the detected format
    pub fn storage_name(&self, format: ImageFormat) -> String {
        let stem = self
            .filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        let has_extension = stem
            .rsplit_once('.')
            .map(|(base, ext)| !base.is_empty() && !ext.is_empty())
            .unwrap_or(false);

        match (stem.is_empty(), has_extension) {
            (true, _) => format!("upload.{}", extension(format)),
            (false, true) => stem.to_string(),
            (false, false) => format!("{}.{}", stem, extension(format)),
        }
    }
}

/// Insert-ready photo. Moderation state always starts unapproved with no votes.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub approved: bool,
    pub borough_id: Uuid,
    pub image: String,
    pub content: String,
    pub votes: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl NewPhoto {
    pub fn prepare(submission: PhotoSubmission, image: String, now: DateTime<Utc>) -> Self {
        NewPhoto {
            id: Uuid::new_v4(),
            created_at: now,
            approved: false,
            borough_id: submission.borough_id,
            image,
            content: submission.content,
            votes: 0,
            first_name: submission.first_name,
            last_name: submission.last_name,
            email: submission.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use super::samples;

    fn form(borough: Uuid) -> HashMap<String, String> {
        HashMap::from([
            ("borough".to_string(), borough.to_string()),
            ("first_name".to_string(), "Ada".to_string()),
            ("last_name".to_string(), "Lovelace".to_string()),
            ("email".to_string(), "ada@example.org".to_string()),
            ("content".to_string(), "Sunset over the bay".to_string()),
        ])
    }

    fn photo(created_at: DateTime<Utc>) -> Photo {
        Photo {
            id: Uuid::new_v4(),
            created_at,
            approved: false,
            borough_id: Uuid::new_v4(),
            borough_slug: "outer-sunset".to_string(),
            image: "photos/sunset.png".to_string(),
            content: DEFAULT_CONTENT.to_string(),
            votes: 0,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.org".to_string(),
        }
    }

    #[test]
    fn test_was_published_recently() {
        let now = Utc::now();
        assert!(photo(now - Duration::hours(1)).was_published_recently(now));
        assert!(photo(now - Duration::hours(24)).was_published_recently(now));
        assert!(!photo(now - Duration::hours(25)).was_published_recently(now));
        assert!(!photo(now + Duration::hours(1)).was_published_recently(now));
    }

    #[test]
    fn test_photo_url_points_to_borough() {
        let p = photo(Utc::now());
        assert_eq!(p.absolute_url(), "/outer-sunset/");
        assert!(p.modified().is_none());
    }

    #[test]
    fn test_submission_from_form() {
        let borough = Uuid::new_v4();
        let submission = PhotoSubmission::from_form(&form(borough)).unwrap();
        assert_eq!(submission.borough_id, borough);
        assert_eq!(submission.first_name, "Ada");
        assert_eq!(submission.content, "Sunset over the bay");
    }

    #[test]
    fn test_submission_requires_borough() {
        let mut fields = form(Uuid::new_v4());
        fields.remove("borough");
        assert!(matches!(
            PhotoSubmission::from_form(&fields),
            Err(BoroughsError::ValidationError(_))
        ));

        fields.insert("borough".to_string(), "not-a-uuid".to_string());
        assert!(PhotoSubmission::from_form(&fields).is_err());
    }

    #[test]
    fn test_submission_field_limits() {
        let mut fields = form(Uuid::new_v4());
        fields.insert("first_name".to_string(), "x".repeat(36));
        assert!(PhotoSubmission::from_form(&fields).is_err());

        let mut fields = form(Uuid::new_v4());
        fields.insert("email".to_string(), "not-an-email".to_string());
        assert!(PhotoSubmission::from_form(&fields).is_err());
    }

    #[test]
    fn test_submission_default_content() {
        let mut fields = form(Uuid::new_v4());
        fields.remove("content");
        let submission = PhotoSubmission::from_form(&fields).unwrap();
        assert_eq!(submission.content, DEFAULT_CONTENT);
    }

    #[test]
    fn test_new_photo_starts_unapproved() {
        let mut fields = form(Uuid::new_v4());
        fields.insert("approved".to_string(), "true".to_string());
        fields.insert("votes".to_string(), "99".to_string());

        let submission = PhotoSubmission::from_form(&fields).unwrap();
        let now = Utc::now();
        let new = NewPhoto::prepare(submission, "photos/a.png".to_string(), now);

        assert!(!new.approved);
        assert_eq!(new.votes, 0);
        assert_eq!(new.created_at, now);
        assert_eq!(new.image, "photos/a.png");
    }

    #[test]
    fn test_uploaded_image_validation() {
        let upload = |data: Vec<u8>| UploadedImage {
            filename: "a.png".to_string(),
            data,
        };

        assert!(upload(Vec::new()).validate().is_err());
        assert_eq!(upload(samples::png()).validate().unwrap(), ImageFormat::Png);
        assert_eq!(upload(samples::jpeg()).validate().unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_non_images_rejected() {
        let upload = |data: &[u8]| UploadedImage {
            filename: "notes.bmp".to_string(),
            data: data.to_vec(),
        };

        // Text that happens to start with a bitmap signature
        assert!(matches!(
            upload(b"BMW owners club meeting notes").validate(),
            Err(BoroughsError::ValidationError(_))
        ));
        assert!(upload(b"%PDF-1.7").validate().is_err());
        assert!(upload(b"\x89PNG\r\n\x1a\ngarbage").validate().is_err());

        let png = samples::png();
        assert!(upload(&png[..png.len() / 2]).validate().is_err());
    }

    #[test]
    fn test_storage_name() {
        let image = |name: &str| UploadedImage {
            filename: name.to_string(),
            data: samples::png(),
        };

        assert_eq!(image("sunset.png").storage_name(ImageFormat::Png), "sunset.png");
        assert_eq!(image("sunset").storage_name(ImageFormat::Png), "sunset.png");
        assert_eq!(
            image("C:\\Users\\ada\\bay.jpg").storage_name(ImageFormat::Jpeg),
            "bay.jpg"
        );
        assert_eq!(image("").storage_name(ImageFormat::Gif), "upload.gif");
        assert_eq!(image("bay").storage_name(ImageFormat::Jpeg), "bay.jpg");
    }
}

/// Small encoded images for upload tests
#[cfg(test)]
pub(crate) mod samples {
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, image::Rgb([200, 120, 40])));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).expect("encode sample image");
        buf.into_inner()
    }

    pub fn png() -> Vec<u8> {
        encode(ImageFormat::Png)
    }

    pub fn jpeg() -> Vec<u8> {
        encode(ImageFormat::Jpeg)
    }
}
