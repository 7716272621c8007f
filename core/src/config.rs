//! Executor configuration.
//!
//! # Design
//! The base URL lives here rather than in a process-wide constant, so each
//! executor instance targets exactly one API host and tests can point at a
//! local server. Nothing in `ServiceConfig` changes after construction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Host used when no base URL is supplied.
pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";

/// What to do when parameter or header encoding fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingPolicy {
    /// Return the encoding error and dispatch nothing.
    #[default]
    Strict,
    /// Log the failure, skip the failing step, and dispatch anyway.
    BestEffort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Whole-request timeout. `None` leaves the transport default in place.
    #[serde(with = "optional_secs")]
    pub timeout: Option<Duration>,
    pub encoding_policy: EncodingPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            encoding_policy: EncodingPolicy::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_encoding_policy(mut self, policy: EncodingPolicy) -> Self {
        self.encoding_policy = policy;
        self
    }
}

mod optional_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(d)?;
        secs.map(|s| Duration::try_from_secs_f64(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
