//! Azure Computer Vision Read API (v3.2) integration
//!
//! Submission: `POST {endpoint}/vision/v3.2/read/analyze?language=..` with a
//! JSON body `{"url": ..}`. The service answers 202 and points at the
//! operation through the `Operation-Location` header.
//! Status: `GET {endpoint}/vision/v3.2/read/analyzeResults/{id}`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::domain::{OcrError, ReadOperation, ReadService, ReadStatus, TextBlock, TextLine};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";
const ANALYZE_PATH: &str = "vision/v3.2/read/analyze";
const RESULTS_PATH: &str = "vision/v3.2/read/analyzeResults/";
const USER_AGENT: &str = concat!("readlens/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReadOperationResponse {
    status: ReadStatus,
    #[serde(rename = "analyzeResult")]
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(rename = "readResults", default)]
    read_results: Vec<ReadResult>,
}

#[derive(Debug, Deserialize)]
struct ReadResult {
    #[serde(default)]
    lines: Vec<Line>,
}

#[derive(Debug, Deserialize)]
struct Line {
    text: String,
}

impl From<ReadOperationResponse> for ReadOperation {
    fn from(resp: ReadOperationResponse) -> Self {
        let blocks = resp
            .analyze_result
            .map(|result| {
                result
                    .read_results
                    .into_iter()
                    .map(|page| TextBlock {
                        lines: page
                            .lines
                            .into_iter()
                            .map(|line| TextLine { text: line.text })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        ReadOperation {
            status: resp.status,
            blocks,
        }
    }
}

/// Read API client bound to one endpoint and subscription key
pub struct AzureReadClient {
    client: reqwest::Client,
    endpoint: Url,
    key: SecretString,
}

impl AzureReadClient {
    /// `endpoint` must end with `/` so relative API paths join underneath it.
    pub fn new(endpoint: Url, key: SecretString, timeout: Duration) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| OcrError::Client(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            key,
        })
    }

    fn api_url(&self, path: &str) -> Result<Url, OcrError> {
        self.endpoint
            .join(path)
            .map_err(|e| OcrError::Client(format!("Invalid API path '{}': {}", path, e)))
    }
}

/// Turn a non-success response into a service error, keeping the body as message
async fn service_error(resp: reqwest::Response) -> OcrError {
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    OcrError::Service { status, message }
}

#[async_trait]
impl ReadService for AzureReadClient {
    async fn submit(&self, image_url: &str, language: &str) -> Result<String, OcrError> {
        let url = self.api_url(ANALYZE_PATH)?;

        let resp = self
            .client
            .post(url)
            .query(&[("language", language)])
            .header(SUBSCRIPTION_KEY_HEADER, self.key.expose_secret().as_str())
            .json(&AnalyzeRequest { url: image_url })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(service_error(resp).await);
        }

        let header = resp
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .ok_or(OcrError::MissingOperationLocation)?;
        let location = header.to_str().map_err(|_| {
            let lossy = String::from_utf8_lossy(header.as_bytes()).into_owned();
            OcrError::InvalidOperationLocation(lossy)
        })?;

        Ok(location.to_string())
    }

    async fn fetch_result(&self, operation_id: &str) -> Result<ReadOperation, OcrError> {
        let url = self.api_url(&format!("{}{}", RESULTS_PATH, operation_id))?;

        let resp = self
            .client
            .get(url)
            .header(SUBSCRIPTION_KEY_HEADER, self.key.expose_secret().as_str())
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(service_error(resp).await);
        }

        let body = resp.text().await?;
        let parsed: ReadOperationResponse =
            serde_json::from_str(&body).map_err(|e| OcrError::Decode(e.to_string()))?;

        Ok(parsed.into())
    }
}
