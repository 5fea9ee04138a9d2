use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Request, StatusCode, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::connector::{DockerConnector, DockerEndpoint};
use super::{ContainerRecord, ContainerRuntime, Error, Result};

/// Docker Engine API version requested on every call; never negotiated.
pub const DOCKER_API_VERSION: &str = "1.38";

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error("invalid request uri `{uri}`: {source}")]
    Uri {
        uri: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },
    #[error("failed to build request: {0}")]
    Build(#[source] hyper::http::Error),
    #[error("request to `{endpoint}` failed: {source}")]
    Send {
        endpoint: DockerEndpoint,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
    #[error("failed to read response body: {0}")]
    Body(#[source] hyper::Error),
    #[error("unexpected status {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("failed to decode container list: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<RequestError> for Error {
    fn from(err: RequestError) -> Self {
        Error::unavailable(err)
    }
}

/// Container entry of `GET /containers/json`; unknown fields are ignored.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ContainerSummary {
    id: Option<String>,
    names: Option<Vec<String>>,
    image: Option<String>,
    status: Option<String>,
    state: Option<String>,
}

impl From<ContainerSummary> for ContainerRecord {
    fn from(summary: ContainerSummary) -> Self {
        Self {
            id: summary.id.unwrap_or_default(),
            names: summary.names.unwrap_or_default(),
            image: summary.image.unwrap_or_default(),
            status: summary.status.unwrap_or_default(),
            state: summary.state.unwrap_or_default(),
        }
    }
}

/// Client for the Docker Engine HTTP API.
///
/// Holds one pooled HTTP client; cloning shares the pool.
#[derive(Debug, Clone)]
pub struct DockerClient {
    endpoint: DockerEndpoint,
    client: Client<DockerConnector, Empty<Bytes>>,
}

impl DockerClient {
    pub fn new(endpoint: DockerEndpoint) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .build::<_, Empty<Bytes>>(DockerConnector::new(endpoint.clone()));
        Self { endpoint, client }
    }

    async fn get(&self, path_and_query: &str) -> std::result::Result<Bytes, RequestError> {
        let uri = format!(
            "http://{}/v{}{}",
            self.endpoint.authority(),
            DOCKER_API_VERSION,
            path_and_query
        );
        let uri = uri
            .parse::<Uri>()
            .map_err(|source| RequestError::Uri { uri, source })?;
        let request = Request::get(uri)
            .body(Empty::new())
            .map_err(RequestError::Build)?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|source| RequestError::Send {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(RequestError::Body)?
            .to_bytes();

        if !status.is_success() {
            return Err(RequestError::Status {
                status,
                message: error_message(&body),
            });
        }

        Ok(body)
    }
}

/// Extracts `message` from a Docker error body, falling back to the raw body.
fn error_message(body: &[u8]) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorResponse {
        message: String,
    }

    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(err) => err.message,
        Err(_) => String::from_utf8_lossy(body).trim().to_owned(),
    }
}

fn decode_containers(body: &[u8]) -> std::result::Result<Vec<ContainerRecord>, RequestError> {
    let summaries: Vec<ContainerSummary> =
        serde_json::from_slice(body).map_err(RequestError::Decode)?;
    Ok(summaries.into_iter().map(ContainerRecord::from).collect())
}

impl ContainerRuntime for DockerClient {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerRecord>> {
        let query = if all { "?all=1" } else { "" };
        let body = self.get(&format!("/containers/json{query}")).await?;
        let containers = decode_containers(&body)?;
        log::trace!("Listed {} containers from {}", containers.len(), self.endpoint);

        Ok(containers)
    }
}
