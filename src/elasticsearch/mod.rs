use log::{debug, trace, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

mod cluster_settings;
mod decoder;
mod error;
mod headers;
mod transport;
pub mod uritemplates;

pub use cluster_settings::{
    ClusterSettingsOperation, ClusterSettingsResponse, ClusterSettingsUpdate,
    ElasticsearchClusterSettingsRequest,
};
pub use decoder::{Decoder, DefaultDecoder};
pub use error::{ElasticsearchError, ErrorDetails};
pub use headers::Headers;
pub use transport::{HttpRequest, HttpResponse, Method, Transport, UreqTransport};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How to reach an Elasticsearch cluster.  Deserializable, so it can be
/// lifted straight out of a config file:
///
/// ```toml
/// url = "http://localhost:9200/"
/// connect_timeout = "5s"
/// request_timeout = "2m"
///
/// [headers]
/// x-opaque-id = "nightly-reindex"
/// ```
#[derive(Clone, Deserialize)]
pub struct ElasticsearchOptions {
    pub url: String,

    #[serde(
        default = "default_connect_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub connect_timeout: Duration,

    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,

    /// sent with every request, underneath any per-request headers
    #[serde(default, deserialize_with = "deserialize_headers")]
    pub headers: Headers,
}

impl ElasticsearchOptions {
    pub fn new(url: &str) -> Self {
        ElasticsearchOptions {
            url: url.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            headers: Headers::default(),
        }
    }
}

impl std::fmt::Debug for ElasticsearchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let url = match url::Url::parse(&self.url) {
            Ok(url) => redacted(&url),
            Err(_) => self.url.clone(),
        };
        f.debug_struct("ElasticsearchOptions")
            .field("url", &url)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("headers", &self.headers)
            .finish()
    }
}

/// `url` with any password masked, for logs and `Debug` output
fn redacted(url: &url::Url) -> String {
    let mut url = url.clone();
    if url.password().is_some() {
        // only fails for urls that cannot carry credentials in the first place
        let _ = url.set_password(Some("xxxxx"));
    }
    url.to_string()
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let value = String::deserialize(deserializer)?;
    humantime::parse_duration(&value).map_err(serde::de::Error::custom)
}

fn deserialize_headers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Headers, D::Error> {
    let map = indexmap::IndexMap::<String, String>::deserialize(deserializer)?;
    Ok(map.into_iter().collect())
}

/// Query string parameters.  Keys are kept sorted so the encoded query
/// string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    pub fn new() -> Self {
        RequestParams::default()
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_owned(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|value| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// serialized to JSON right before the request is sent
    Json(serde_json::Value),

    /// sent exactly as given
    Raw(String),
}

impl RequestBody {
    fn into_string(self) -> Result<String, ElasticsearchError> {
        match self {
            RequestBody::Json(value) => {
                serde_json::to_string(&value).map_err(ElasticsearchError::Encode)
            }
            RequestBody::Raw(body) => Ok(body),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PerformRequestOptions {
    pub method: Method,
    pub path: String,
    pub params: RequestParams,
    pub body: Option<RequestBody>,
    pub headers: Option<Headers>,
}

#[derive(Clone)]
pub struct Elasticsearch {
    url: url::Url,
    options: Arc<ElasticsearchOptions>,
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn Decoder>,
}

impl std::fmt::Debug for Elasticsearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Elasticsearch")
            .field("url", &redacted(&self.url))
            .field("options", &self.options)
            .finish()
    }
}

impl Elasticsearch {
    pub fn new(url: &str) -> Result<Self, ElasticsearchError> {
        Elasticsearch::from_options(ElasticsearchOptions::new(url))
    }

    pub fn from_options(options: ElasticsearchOptions) -> Result<Self, ElasticsearchError> {
        let url = url::Url::parse(&options.url)?;
        if url.cannot_be_a_base() {
            return Err(ElasticsearchError::InvalidOption(format!(
                "`{}` cannot be used as a base url",
                options.url
            )));
        }
        let transport = UreqTransport::from_options(&options)?;

        Ok(Elasticsearch {
            url,
            options: Arc::new(options),
            transport: Arc::new(transport),
            decoder: Arc::new(DefaultDecoder),
        })
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn options(&self) -> &ElasticsearchOptions {
        &self.options
    }

    pub fn cluster_settings(&self) -> ElasticsearchClusterSettingsRequest {
        ElasticsearchClusterSettingsRequest::new(self)
    }

    /// A cluster settings request that can only read
    pub fn get_cluster_settings(&self) -> ElasticsearchClusterSettingsRequest {
        ElasticsearchClusterSettingsRequest::new(self).read_only()
    }

    pub fn update_cluster_settings(
        &self,
        update: ClusterSettingsUpdate,
    ) -> ElasticsearchClusterSettingsRequest {
        ElasticsearchClusterSettingsRequest::new(self).update(update)
    }

    /// Sends one request and hands back the raw response.  Any non-2xx
    /// status comes back as [`ElasticsearchError::Status`].
    pub fn perform_request(
        &self,
        request: PerformRequestOptions,
    ) -> Result<HttpResponse, ElasticsearchError> {
        let url = self.request_url(&request.path, &request.params);

        let mut headers = self.options.headers.clone();
        if let Some(request_headers) = &request.headers {
            headers.extend(request_headers);
        }

        let body = match request.body {
            Some(body) => {
                if !headers.contains("content-type") {
                    headers.set("content-type", "application/json");
                }
                Some(body.into_string()?)
            }
            None => None,
        };

        debug!("{} {}", request.method, redacted(&url));
        if let Some(body) = &body {
            trace!("request body: {}", body);
        }

        let method = request.method;
        let response = self.transport.send(HttpRequest {
            method,
            url,
            headers,
            body,
        })?;
        trace!("response {}: {}", response.status, response.body);

        if !response.is_success() {
            warn!(
                "{} {} failed with status {}",
                method, request.path, response.status
            );
            return Err(ElasticsearchError::from_status(
                response.status,
                response.body,
            ));
        }

        Ok(response)
    }

    /// Decodes a response body into `T` through the configured [`Decoder`]
    pub fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T, ElasticsearchError> {
        let value = self.decoder.decode(body)?;
        serde_json::from_value(value).map_err(ElasticsearchError::Decode)
    }

    fn request_url(&self, path: &str, params: &RequestParams) -> url::Url {
        let mut url = self.url.clone();

        // keep any path prefix the cluster lives under, e.g. behind a proxy
        let prefix = self.url.path().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        url.set_path(&format!("{}/{}", prefix, path));

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&params.encode()));
        }
        url
    }
}
