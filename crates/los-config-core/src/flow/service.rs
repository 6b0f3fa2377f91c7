use serde::{Deserialize, Serialize};
use std::fmt;

/// What the screen does when a service call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceErrorPolicy {
    /// Stop the user on the screen
    Block,
    /// Ignore the failure
    Continue,
    /// Retry the call
    Retry,
}

/// A side-effecting call made by a screen. Informational to validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<ServiceErrorPolicy>,
}

impl ServiceCall {
    /// Call to `endpoint` that blocks on failure
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            name: None,
            endpoint: Some(endpoint.into()),
            method: None,
            on_error: Some(ServiceErrorPolicy::Block),
        }
    }

    /// Non-blank endpoint, if any
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// The three service buckets of a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceBucket {
    PreLoad,
    OnSubmit,
    Background,
}

impl ServiceBucket {
    /// All buckets in declaration order
    pub const ALL: [ServiceBucket; 3] = [ServiceBucket::PreLoad, ServiceBucket::OnSubmit, ServiceBucket::Background];

    /// Wire name of the bucket
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceBucket::PreLoad => "preLoad",
            ServiceBucket::OnSubmit => "onSubmit",
            ServiceBucket::Background => "background",
        }
    }
}

impl fmt::Display for ServiceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenServices {
    #[serde(default)]
    pub pre_load: Vec<ServiceCall>,

    #[serde(default)]
    pub on_submit: Vec<ServiceCall>,

    #[serde(default)]
    pub background: Vec<ServiceCall>,
}

impl ScreenServices {
    /// Calls in one bucket
    pub fn bucket(&self, bucket: ServiceBucket) -> &[ServiceCall] {
        match bucket {
            ServiceBucket::PreLoad => &self.pre_load,
            ServiceBucket::OnSubmit => &self.on_submit,
            ServiceBucket::Background => &self.background,
        }
    }

    pub(crate) fn bucket_mut(&mut self, bucket: ServiceBucket) -> &mut Vec<ServiceCall> {
        match bucket {
            ServiceBucket::PreLoad => &mut self.pre_load,
            ServiceBucket::OnSubmit => &mut self.on_submit,
            ServiceBucket::Background => &mut self.background,
        }
    }

    /// Total calls across all buckets
    pub fn len(&self) -> usize {
        self.pre_load.len() + self.on_submit.len() + self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
