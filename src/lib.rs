//! A blocking client for Elasticsearch's cluster settings API.
//!
//! ```no_run
//! use zdb_elasticsearch::{ClusterSettingsUpdate, Elasticsearch};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), zdb_elasticsearch::ElasticsearchError> {
//! let elasticsearch = Elasticsearch::new("http://localhost:9200/")?;
//!
//! let current = elasticsearch
//!     .get_cluster_settings()
//!     .flat_settings(true)
//!     .execute()?;
//! println!("{:?}", current.setting("cluster.routing.allocation.enable"));
//!
//! let update = ClusterSettingsUpdate::new()
//!     .transient("cluster.routing.allocation.enable", json!("primaries"));
//! let response = elasticsearch.update_cluster_settings(update).execute()?;
//! assert!(response.acknowledged);
//! # Ok(())
//! # }
//! ```

pub mod elasticsearch;

#[cfg(test)]
mod testing;

pub use elasticsearch::{
    ClusterSettingsOperation, ClusterSettingsResponse, ClusterSettingsUpdate, Elasticsearch,
    ElasticsearchClusterSettingsRequest, ElasticsearchError, ElasticsearchOptions, Headers,
};
