use super::error::ApiError;
use axum::extract::Multipart;
use std::collections::HashMap;

/// Collected multipart form: text fields plus raw file payloads.
#[derive(Default)]
pub(crate) struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| ApiError::Validation(format!("Malformed multipart body: {err}")))?
        {
            let name = match field.name() {
                Some(name) => name.to_owned(),
                None => continue,
            };
            if field.file_name().is_some() {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::Validation(format!("Malformed multipart body: {err}")))?;
                form.files.insert(name, bytes.to_vec());
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|err| ApiError::Validation(format!("Malformed multipart body: {err}")))?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Trimmed text field; empty values count as absent.
    pub fn trimmed(&self, name: &str) -> Option<&str> {
        self.text(name).map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn file(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }
}
