use crate::elasticsearch::{ElasticsearchError, HttpRequest, HttpResponse, Transport};
use std::sync::{Arc, Mutex};

enum Canned {
    Response(HttpResponse),
    Error(String),
}

/// A `Transport` that never touches the network.  It remembers every request
/// it was handed and answers each one the same way.
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    answer: Canned,
}

impl RecordingTransport {
    pub(crate) fn responding(status: u16, body: &str) -> Arc<Self> {
        Arc::new(RecordingTransport {
            requests: Mutex::new(Vec::new()),
            answer: Canned::Response(HttpResponse {
                status,
                body: body.to_owned(),
            }),
        })
    }

    pub(crate) fn failing(message: &str) -> Arc<Self> {
        Arc::new(RecordingTransport {
            requests: Mutex::new(Vec::new()),
            answer: Canned::Error(message.to_owned()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ElasticsearchError> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);

        match &self.answer {
            Canned::Response(response) => Ok(response.clone()),
            Canned::Error(message) => Err(ElasticsearchError::Transport(message.clone())),
        }
    }
}
