// Orgo Connector - webhook trigger for the Orgo platform
//
// This library wires configuration, the REST client and the webhook crate
// together. The `orgo` binary is a thin command layer on top of it.

pub mod connector;

pub use connector::{
    ConnectorError, build_trigger, http_client, open_store, target_url, trigger_options,
};

// Re-export member crates
pub use orgo_config;
pub use orgo_http_client;
pub use orgo_webhooks;
