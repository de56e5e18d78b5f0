use reqwest::Response;

use crate::error::BoxError;

use super::HttpResponse;

/// A `reqwest` response read to the end, ready for classification.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    code: u16,
    message: String,
    body: Option<Vec<u8>>,
}

impl BufferedResponse {
    /// Drain `response`. The reason phrase is the canonical one for the
    /// status code, since HTTP/2 carries none.
    pub async fn read(response: Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let bytes = response.bytes().await?;
        Ok(Self {
            code: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
            body: (!bytes.is_empty()).then(|| bytes.to_vec()),
        })
    }
}

impl HttpResponse for BufferedResponse {
    fn code(&self) -> u16 {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn error_body(&self) -> Result<String, BoxError> {
        let body = self.body.as_deref().unwrap_or_default();
        Ok(String::from_utf8(body.to_vec())?)
    }
}
