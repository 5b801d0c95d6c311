//! Attachment operations
//!
//! Downloading attachment content is not offered: Trello serves uploads only
//! to browser sessions. Attaching a URL is the supported way to link content.

use std::path::Path;

use super::{deleted, failure, list, object, ApiRequest, FileUpload, TrelloClient, Transport};
use crate::app::envelope::Envelope;
use crate::app::error_code::ErrorCode;
use crate::app::models::Attachment;
use crate::errors::ApiError;

/// Content type for an upload, from the file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "zip" => "application/zip",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

impl<'a, T: Transport> TrelloClient<'a, T> {
    pub async fn list_attachments(&self, card_id: &str) -> Envelope<Vec<Attachment>> {
        let request = ApiRequest::get(["cards", card_id, "attachments"]);
        list(self.fetch(request).await, "Card not found")
    }

    pub async fn get_attachment(&self, card_id: &str, attachment_id: &str) -> Envelope<Attachment> {
        let request = ApiRequest::get(["cards", card_id, "attachments", attachment_id]);
        object(
            self.fetch(request).await,
            "Attachment not found",
            ("Attachment not found", ErrorCode::NotFound),
        )
    }

    /// Uploads a local file as one multipart request
    ///
    /// `name` replaces the file name shown in Trello when given.
    pub async fn upload_attachment(
        &self,
        card_id: &str,
        file_path: &Path,
        name: Option<&str>,
    ) -> Envelope<Attachment> {
        if !file_path.is_file() {
            return Envelope::fail(
                format!("File not found: {}", file_path.display()),
                ErrorCode::FileNotFound,
            );
        }

        let bytes = match tokio::fs::read(file_path).await {
            Ok(bytes) => bytes,
            Err(e) => return failure(ApiError::Io(e), "Card not found"),
        };

        let name = name.filter(|n| !n.is_empty());
        let file_name = name.map(str::to_string).unwrap_or_else(|| {
            file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string())
        });
        tracing::debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let upload = FileUpload {
            file_name,
            mime_type: mime_type_for(file_path).to_string(),
            bytes,
        };
        let fields = name
            .map(|n| vec![("name".to_string(), n.to_string())])
            .unwrap_or_default();

        let request = ApiRequest::post(["cards", card_id, "attachments"]).multipart(upload, fields);
        object(
            self.fetch(request).await,
            "Card not found",
            ("Failed to upload attachment", ErrorCode::UploadFailed),
        )
    }

    /// Attaches a link to a card
    pub async fn attach_url(&self, card_id: &str, url: &str, name: Option<&str>) -> Envelope<Attachment> {
        let mut fields = vec![("url".to_string(), url.to_string())];
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            fields.push(("name".to_string(), name.to_string()));
        }

        let request = ApiRequest::post(["cards", card_id, "attachments"]).form(fields);
        object(
            self.fetch(request).await,
            "Card not found",
            ("Failed to attach URL", ErrorCode::AttachFailed),
        )
    }

    pub async fn delete_attachment(&self, card_id: &str, attachment_id: &str) -> Envelope<bool> {
        let request = ApiRequest::delete(["cards", card_id, "attachments", attachment_id]);
        deleted(self.execute(request).await, "Attachment not found")
    }
}
