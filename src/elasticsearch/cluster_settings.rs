use crate::elasticsearch::uritemplates;
use crate::elasticsearch::{
    Elasticsearch, ElasticsearchError, Headers, Method, PerformRequestOptions, RequestBody,
    RequestParams,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Reads or updates cluster-wide settings through `/_cluster/settings`.
///
/// Without a body the request is a `GET` and returns the current settings.
/// With a body, set through [`body_json`](Self::body_json),
/// [`body_string`](Self::body_string) or [`update`](Self::update), it is a
/// `PUT` that applies the body.  A request obtained from
/// [`Elasticsearch::get_cluster_settings`] is pinned to a read and refuses
/// to execute if a body was attached anyway.
pub struct ElasticsearchClusterSettingsRequest {
    elasticsearch: Elasticsearch,

    pretty: Option<bool>,
    human: Option<bool>,
    error_trace: Option<bool>,
    filter_path: Vec<String>,
    headers: Option<Headers>,

    include_defaults: Option<bool>,
    flat_settings: Option<bool>,
    master_timeout: Option<String>,
    timeout: Option<String>,

    body_json: Option<Value>,
    body_string: Option<String>,

    read_only: bool,
}

/// What a cluster settings request will do once executed
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterSettingsOperation {
    Read,
    Update(RequestBody),
}

impl ClusterSettingsOperation {
    pub fn method(&self) -> Method {
        match self {
            ClusterSettingsOperation::Read => Method::Get,
            ClusterSettingsOperation::Update(_) => Method::Put,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClusterSettingsResponse {
    #[serde(default)]
    pub acknowledged: bool,

    #[serde(default)]
    pub shards_acknowledged: bool,

    #[serde(default)]
    pub persistent: Option<Map<String, Value>>,

    #[serde(default)]
    pub transient: Option<Map<String, Value>>,

    /// only present when `include_defaults` was requested
    #[serde(default)]
    pub defaults: Option<Map<String, Value>>,
}

impl ClusterSettingsResponse {
    /// Looks up a setting by its dotted name, such as
    /// `cluster.routing.allocation.enable`.
    ///
    /// Transient settings win over persistent ones, which win over defaults.
    /// Works whether or not the response was requested with `flat_settings`.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        [&self.transient, &self.persistent, &self.defaults]
            .into_iter()
            .flatten()
            .find_map(|settings| lookup(settings, key))
    }
}

fn lookup<'a>(settings: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = settings.get(key) {
        return Some(value);
    }

    // nested form: try every split point, since a key segment may itself hold dots
    let mut search = 0;
    while let Some(idx) = key[search..].find('.') {
        let split = search + idx;
        if let Some(Value::Object(inner)) = settings.get(&key[..split]) {
            if let Some(value) = lookup(inner, &key[split + 1..]) {
                return Some(value);
            }
        }
        search = split + 1;
    }
    None
}

/// A typed body for updating cluster settings.
///
/// ```
/// use zdb_elasticsearch::ClusterSettingsUpdate;
/// use serde_json::json;
///
/// let update = ClusterSettingsUpdate::new()
///     .persistent("cluster.routing.allocation.enable", json!("primaries"))
///     .reset_transient("indices.recovery.max_bytes_per_sec");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSettingsUpdate {
    persistent: Map<String, Value>,
    transient: Map<String, Value>,
}

impl ClusterSettingsUpdate {
    pub fn new() -> Self {
        ClusterSettingsUpdate::default()
    }

    /// A setting that survives a full cluster restart
    pub fn persistent(mut self, key: &str, value: Value) -> Self {
        self.persistent.insert(key.to_owned(), value);
        self
    }

    /// A setting that is lost on a full cluster restart
    pub fn transient(mut self, key: &str, value: Value) -> Self {
        self.transient.insert(key.to_owned(), value);
        self
    }

    /// Puts a persistent setting back to its default
    pub fn reset_persistent(self, key: &str) -> Self {
        self.persistent(key, Value::Null)
    }

    /// Puts a transient setting back to its default
    pub fn reset_transient(self, key: &str) -> Self {
        self.transient(key, Value::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.persistent.is_empty() && self.transient.is_empty()
    }
}

impl From<ClusterSettingsUpdate> for Value {
    fn from(update: ClusterSettingsUpdate) -> Self {
        let mut body = Map::new();
        if !update.persistent.is_empty() {
            body.insert("persistent".into(), Value::Object(update.persistent));
        }
        if !update.transient.is_empty() {
            body.insert("transient".into(), Value::Object(update.transient));
        }
        Value::Object(body)
    }
}

impl ElasticsearchClusterSettingsRequest {
    pub fn new(elasticsearch: &Elasticsearch) -> Self {
        ElasticsearchClusterSettingsRequest {
            elasticsearch: elasticsearch.clone(),
            pretty: None,
            human: None,
            error_trace: None,
            filter_path: Vec::new(),
            headers: None,
            include_defaults: None,
            flat_settings: None,
            master_timeout: None,
            timeout: None,
            body_json: None,
            body_string: None,
            read_only: false,
        }
    }

    /// Pins this request to a `GET`, whatever body setters are called later
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Ask Elasticsearch to indent the JSON it returns
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    /// Ask for human readable values, e.g. "7.5mb"
    pub fn human(mut self, human: bool) -> Self {
        self.human = Some(human);
        self
    }

    /// Include the stack trace of returned errors
    pub fn error_trace(mut self, error_trace: bool) -> Self {
        self.error_trace = Some(error_trace);
        self
    }

    /// Filters that reduce the response to the named fields
    pub fn filter_path<I, S>(mut self, filter_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_path = filter_path.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a header.  Adding the same name again keeps both values.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .add(name, value);
        self
    }

    /// Replaces every header set so far
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Also return settings that were never explicitly set
    pub fn include_defaults(mut self, include_defaults: bool) -> Self {
        self.include_defaults = Some(include_defaults);
        self
    }

    /// Return settings as `"a.b.c": value` instead of nested objects
    pub fn flat_settings(mut self, flat_settings: bool) -> Self {
        self.flat_settings = Some(flat_settings);
        self
    }

    /// How long to wait for the master node, as an Elasticsearch time unit like `30s`
    pub fn master_timeout(mut self, master_timeout: &str) -> Self {
        self.master_timeout = Some(master_timeout.to_owned());
        self
    }

    /// How long to wait for the update to be acknowledged, e.g. `30s`
    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_owned());
        self
    }

    pub fn body(self, body: &str) -> Self {
        self.body_string(body)
    }

    /// A pre-formed JSON body, sent exactly as given
    pub fn body_string(mut self, body: &str) -> Self {
        self.body_string = Some(body.to_owned());
        self
    }

    /// A JSON body.  Takes precedence over [`body_string`](Self::body_string).
    pub fn body_json(mut self, body: impl Into<Value>) -> Self {
        self.body_json = Some(body.into());
        self
    }

    pub fn update(self, update: ClusterSettingsUpdate) -> Self {
        self.body_json(update)
    }

    pub fn validate(&self) -> Result<(), ElasticsearchError> {
        if self.read_only && (self.body_json.is_some() || self.body_string.is_some()) {
            return Err(ElasticsearchError::Validation(
                "a read-only cluster settings request cannot carry a body".into(),
            ));
        }
        Ok(())
    }

    /// The path and query string parameters for this request.  Only options
    /// that were explicitly set show up as parameters.
    pub fn build_request(&self) -> Result<(String, RequestParams), ElasticsearchError> {
        let path = uritemplates::expand("/_cluster/settings", &[])?;

        let mut params = RequestParams::new();
        if let Some(pretty) = self.pretty {
            params.set("pretty", pretty);
        }
        if let Some(human) = self.human {
            params.set("human", human);
        }
        if let Some(error_trace) = self.error_trace {
            params.set("error_trace", error_trace);
        }
        if !self.filter_path.is_empty() {
            params.set("filter_path", self.filter_path.join(","));
        }
        if let Some(include_defaults) = self.include_defaults {
            params.set("include_defaults", include_defaults);
        }
        if let Some(flat_settings) = self.flat_settings {
            params.set("flat_settings", flat_settings);
        }
        if let Some(master_timeout) = &self.master_timeout {
            params.set("master_timeout", master_timeout);
        }
        if let Some(timeout) = &self.timeout {
            params.set("timeout", timeout);
        }

        Ok((path, params))
    }

    /// Whether this request reads or updates.  A JSON body beats a string
    /// body when both were given.
    pub fn operation(&self) -> ClusterSettingsOperation {
        if self.read_only {
            return ClusterSettingsOperation::Read;
        }

        match (&self.body_json, &self.body_string) {
            (Some(json), _) => ClusterSettingsOperation::Update(RequestBody::Json(json.clone())),
            (None, Some(body)) => ClusterSettingsOperation::Update(RequestBody::Raw(body.clone())),
            (None, None) => ClusterSettingsOperation::Read,
        }
    }

    pub fn execute(self) -> Result<ClusterSettingsResponse, ElasticsearchError> {
        self.validate()?;
        let (path, params) = self.build_request()?;

        let operation = self.operation();
        let method = operation.method();
        let body = match operation {
            ClusterSettingsOperation::Read => None,
            ClusterSettingsOperation::Update(body) => Some(body),
        };

        let response = self.elasticsearch.perform_request(PerformRequestOptions {
            method,
            path,
            params,
            body,
            headers: self.headers,
        })?;

        self.elasticsearch.decode(&response.body)
    }
}
