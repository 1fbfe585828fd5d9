// Remote model descriptors
// Fetches the classifier's topology and metadata from its base URL

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classifier::backend::{ClassifierError, ClassifierLoader};
use crate::classifier::bridge::{BridgedClassifier, FrameBridge};

pub const TOPOLOGY_FILE: &str = "model.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Contents of `metadata.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfjs_speech_commands_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,

    /// Class labels in output order
    pub word_labels: Vec<String>,
}

/// Both descriptor resources of a loaded model
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub base_url: Url,
    pub metadata: ModelMetadata,

    /// Raw `model.json`; only checked for a `modelTopology` entry, the host
    /// fetches its own copy to run inference
    pub topology: Value,
}

impl ModelDescriptor {
    pub fn word_labels(&self) -> &[String] {
        &self.metadata.word_labels
    }
}

/// Parse a base location, making sure relative joins stay inside it
pub fn parse_base_url(base: &str) -> Result<Url, ClassifierError> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };

    Url::parse(&normalized).map_err(|e| ClassifierError::InvalidBaseUrl(format!("{}: {}", base, e)))
}

fn malformed(url: &Url, reason: impl Into<String>) -> ClassifierError {
    ClassifierError::MalformedResource {
        url: url.to_string(),
        reason: reason.into(),
    }
}

/// Validate a topology document
pub fn check_topology(url: &Url, topology: &Value) -> Result<(), ClassifierError> {
    match topology.get("modelTopology") {
        Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(malformed(url, "modelTopology is not an object")),
        None => Err(malformed(url, "missing modelTopology")),
    }
}

/// Parse and validate a metadata document
pub fn parse_metadata(url: &Url, metadata: Value) -> Result<ModelMetadata, ClassifierError> {
    let metadata: ModelMetadata =
        serde_json::from_value(metadata).map_err(|e| malformed(url, e.to_string()))?;

    if metadata.word_labels.is_empty() {
        return Err(malformed(url, "wordLabels is empty"));
    }

    Ok(metadata)
}

/// Loads model descriptors over HTTP and hands out a bridged classifier
#[derive(Debug, Clone)]
pub struct HttpModelLoader {
    base_url: Url,
    client: reqwest::Client,
    bridge: FrameBridge,
}

impl HttpModelLoader {
    pub fn new(base_url: &str, bridge: FrameBridge) -> Result<Self, ClassifierError> {
        Ok(HttpModelLoader {
            base_url: parse_base_url(base_url)?,
            client: reqwest::Client::new(),
            bridge,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch_json(&self, name: &str) -> Result<(Url, Value), ClassifierError> {
        let url = self
            .base_url
            .join(name)
            .map_err(|e| ClassifierError::InvalidBaseUrl(e.to_string()))?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ClassifierError::Unreachable {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| malformed(&url, e.to_string()))?;

        Ok((url, body))
    }

    /// Fetch and validate both descriptor resources
    pub async fn fetch_descriptor(&self) -> Result<ModelDescriptor, ClassifierError> {
        let (topology_url, topology) = self.fetch_json(TOPOLOGY_FILE).await?;
        check_topology(&topology_url, &topology)?;

        let (metadata_url, metadata) = self.fetch_json(METADATA_FILE).await?;
        let metadata = parse_metadata(&metadata_url, metadata)?;

        Ok(ModelDescriptor {
            base_url: self.base_url.clone(),
            metadata,
            topology,
        })
    }
}

impl ClassifierLoader for HttpModelLoader {
    type Classifier = BridgedClassifier;

    async fn load(&self) -> Result<Self::Classifier, ClassifierError> {
        let descriptor = self.fetch_descriptor().await.map_err(|e| {
            log::error!("Failed to load model from {}: {}", self.base_url, e);
            e
        })?;

        log::info!(
            "Loaded model {} with {} labels",
            descriptor.metadata.model_name.as_deref().unwrap_or("<unnamed>"),
            descriptor.word_labels().len()
        );

        Ok(BridgedClassifier::new(
            descriptor.metadata.word_labels,
            self.bridge.clone(),
        ))
    }
}
