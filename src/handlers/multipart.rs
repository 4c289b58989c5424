// src/handlers/multipart.rs
// DOCUMENTATION: multipart/form-data parsing for upload endpoints
// PURPOSE: Collect text fields and files while enforcing the upload size limit

use actix_multipart::Multipart;
use futures_util::StreamExt;
use std::collections::HashMap;

use crate::errors::BoroughsError;
use crate::models::UploadedImage;

/// A fully read multipart form
#[derive(Debug, Default)]
pub struct MultipartForm {
    /// Text fields by name
    pub fields: HashMap<String, String>,
    /// File fields by name
    pub files: HashMap<String, UploadedImage>,
}

impl MultipartForm {
    /// Take a required file field
    pub fn take_file(&mut self, name: &str) -> Result<UploadedImage, BoroughsError> {
        self.files
            .remove(name)
            .ok_or_else(|| BoroughsError::ValidationError(format!("{}: this field is required", name)))
    }
}

/// Read every part of `payload`, failing once more than `max_bytes` arrive in total
pub async fn read_form(mut payload: Multipart, max_bytes: usize) -> Result<MultipartForm, BoroughsError> {
    let mut form = MultipartForm::default();
    let mut total = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| BoroughsError::InvalidInput(e.to_string()))?;

        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| BoroughsError::InvalidInput(e.to_string()))?;
            total += chunk.len();
            if total > max_bytes {
                log::warn!("Rejected upload larger than {} bytes", max_bytes);
                return Err(BoroughsError::PayloadTooLarge(max_bytes));
            }
            data.extend_from_slice(&chunk);
        }

        if name.is_empty() {
            continue;
        }

        match filename {
            Some(filename) => {
                form.files.insert(name, UploadedImage { filename, data });
            }
            None => {
                let text = String::from_utf8(data).map_err(|_| {
                    BoroughsError::InvalidInput(format!("{}: not valid UTF-8", name))
                })?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}
