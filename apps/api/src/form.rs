//! The inbound form submission and its Axum extractor.
//!
//! Both `application/x-www-form-urlencoded` and `multipart/form-data` bodies
//! are accepted. A submission carries at most one file; further file parts
//! are ignored.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;
use crate::pipeline::fields::Field;

/// A file part of a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name of the form control that carried the file.
    pub field: String,
    /// File name as sent by the client, unsanitized.
    pub file_name: String,
    pub bytes: Bytes,
}

/// Immutable field-name to value mapping for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl FormSubmission {
    #[cfg(test)]
    pub fn new(fields: HashMap<String, String>, file: Option<UploadedFile>) -> Self {
        Self { fields, file }
    }

    pub fn field(&self, name: &str) -> Field<'_> {
        Field::new(self.fields.get(name).map(String::as_str))
    }

    /// The uploaded file, if it was sent under the control named `field`.
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.file.as_ref().filter(|f| f.field == field)
    }

    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut fields = HashMap::new();
        let mut file = None;

        while let Some(part) = multipart.next_field().await.map_err(multipart_error)? {
            let name = part.name().unwrap_or_default().to_string();
            match part.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = part.bytes().await.map_err(multipart_error)?;
                    if file.is_some() {
                        debug!("Ignoring extra file part '{name}'");
                        continue;
                    }
                    file = Some(UploadedFile {
                        field: name,
                        file_name,
                        bytes,
                    });
                }
                None => {
                    let value = part.text().await.map_err(multipart_error)?;
                    // first value wins for repeated controls
                    fields.entry(name).or_insert(value);
                }
            }
        }

        Ok(Self { fields, file })
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(err.body_text())
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Self::from_multipart(multipart).await;
        }

        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|e| match e.status() {
                StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
                _ => AppError::Validation(e.body_text()),
            })?;

        let mut fields = HashMap::new();
        for (name, value) in pairs {
            // first value wins, as for multipart bodies
            fields.entry(name).or_insert(value);
        }
        Ok(Self { fields, file: None })
    }
}
