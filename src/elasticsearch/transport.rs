use crate::elasticsearch::{ElasticsearchError, ElasticsearchOptions, Headers};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-resolved request, ready to go over the wire
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: url::Url,
    pub headers: Headers,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves a request to Elasticsearch and brings back whatever it answered.
///
/// Implementations return non-2xx responses as `Ok`.  Turning a status into
/// an error is [`Elasticsearch::perform_request`](crate::elasticsearch::Elasticsearch::perform_request)'s job.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ElasticsearchError>;
}

/// The default transport, a blocking `ureq` agent
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(agent: ureq::Agent) -> Self {
        UreqTransport { agent }
    }

    pub fn from_options(options: &ElasticsearchOptions) -> Result<Self, ElasticsearchError> {
        let builder = ureq::AgentBuilder::new()
            .timeout_connect(options.connect_timeout)
            .timeout(options.request_timeout);

        #[cfg(feature = "native_tls")]
        let builder = builder.tls_connector(std::sync::Arc::new(
            native_tls::TlsConnector::new()
                .map_err(|e| ElasticsearchError::Transport(e.to_string()))?,
        ));

        Ok(UreqTransport::new(builder.build()))
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ElasticsearchError> {
        let mut ureq_request = self
            .agent
            .request_url(request.method.as_str(), &request.url);
        for (name, values) in request.headers.iter_grouped() {
            // ureq keeps one value per name, so repeated headers go out comma-joined
            ureq_request = ureq_request.set(name, &values.join(", "));
        }

        let result = match &request.body {
            Some(body) => ureq_request.send_string(body),
            None => ureq_request.call(),
        };

        let response = match result {
            Ok(response) => response,
            // ureq treats 4xx/5xx as errors, but the body still belongs to the caller
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(ElasticsearchError::Transport(transport.to_string()))
            }
        };

        let status = response.status();
        let body = response.into_string()?;
        Ok(HttpResponse { status, body })
    }
}
