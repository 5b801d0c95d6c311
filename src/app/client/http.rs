//! Transport seam between resource operations and the network
//!
//! Resource operations describe a call as an [`ApiRequest`] and hand it to a
//! [`Transport`]. The transport returns whatever status and body the server
//! produced; deciding what a status means is left to the caller.

use reqwest::{Client, Method};
use url::Url;

use crate::errors::{ApiError, ApiResult};

/// File part of a multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Request body encodings used by the Trello API
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// `multipart/form-data` with one file part named `file` plus text fields
    Multipart {
        file: FileUpload,
        fields: Vec<(String, String)>,
    },
}

/// One outbound API call, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    pub fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PUT, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    /// Appends a query-string parameter
    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    /// Sets a form-encoded body
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Sets a multipart body
    pub fn multipart(mut self, file: FileUpload, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Multipart { file, fields };
        self
    }

    /// Slash-joined path, for logging and assertions
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Value of the first query parameter named `name`
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Form fields of a form or multipart body
    pub fn form_fields(&self) -> &[(String, String)] {
        match &self.body {
            RequestBody::Form(fields) | RequestBody::Multipart { fields, .. } => fields,
            RequestBody::Empty => &[],
        }
    }

    /// Value of the first form field named `name`
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form_fields()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Resolves the request against `base`
    ///
    /// Each segment is percent-encoded, so identifiers containing `/` or `?`
    /// cannot escape their position in the path.
    pub fn url(&self, base: &Url) -> ApiResult<Url> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty();
            path.extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Status and body as received from the server
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and reports the raw outcome
///
/// `Err` means no response was obtained at all. Any HTTP status, including
/// 4xx and 5xx, is an `Ok`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse>;
}

/// Production transport backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_multipart(
        file: FileUpload,
        fields: Vec<(String, String)>,
    ) -> ApiResult<reqwest::multipart::Form> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)?;

        let mut form = reqwest::multipart::Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text(name, value);
        }
        Ok(form)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse> {
        let url = request.url(&self.base_url)?;
        tracing::debug!("{} {}", request.method, request.path());

        let builder = self.client.request(request.method, url);
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart { file, fields } => {
                builder.multipart(Self::build_multipart(file, fields)?)
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!("Response status {} ({} bytes)", status, body.len());
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.trello.com/1").unwrap()
    }

    #[test]
    fn test_url_keeps_base_path() {
        let request = ApiRequest::get(["cards", "abc"]).query("fields", "id,name");
        let url = request.url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.trello.com/1/cards/abc?fields=id%2Cname"
        );
    }

    #[test]
    fn test_url_with_trailing_slash_base() {
        let base = Url::parse("http://127.0.0.1:8080/1/").unwrap();
        let url = ApiRequest::get(["boards"]).url(&base).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/1/boards");
    }

    #[test]
    fn test_url_encodes_segments() {
        let url = ApiRequest::get(["cards", "a/b?c"]).url(&base()).unwrap();
        assert_eq!(url.path(), "/1/cards/a%2Fb%3Fc");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_request_accessors() {
        let request = ApiRequest::put(["cards", "c1"])
            .query("key", "k")
            .form(vec![("idList".into(), "l2".into())]);

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path(), "/cards/c1");
        assert_eq!(request.query_value("key"), Some("k"));
        assert_eq!(request.form_value("idList"), Some("l2"));
        assert_eq!(request.form_value("name"), None);
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(404, "").is_success());
    }

    #[test]
    fn test_multipart_rejects_bad_mime() {
        let file = FileUpload {
            file_name: "a.txt".into(),
            mime_type: "not a mime".into(),
            bytes: vec![1, 2, 3],
        };
        assert!(HttpTransport::build_multipart(file, Vec::new()).is_err());
    }
}
