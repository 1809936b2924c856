//! Synchronization options

/// Options tuning diagram synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "interchange",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SyncOptions {
    /// Mapping name suffix identifying compartment mappings
    pub compartment_suffix: String,
    /// How many semantic container levels an edge drop may display to
    /// materialize an endpoint (0 = endpoints must already be displayed)
    pub endpoint_container_depth: usize,
    /// Copy element names into node and edge labels on refresh
    pub synchronize_labels: bool,
    /// Remove views whose semantic element no longer exists on refresh
    pub prune_orphan_views: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            compartment_suffix: "_CompartmentNode".to_string(),
            endpoint_container_depth: 1,
            synchronize_labels: true,
            prune_orphan_views: true,
        }
    }
}

impl SyncOptions {
    pub fn with_compartment_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.compartment_suffix = suffix.into();
        self
    }

    pub fn with_endpoint_container_depth(mut self, depth: usize) -> Self {
        self.endpoint_container_depth = depth;
        self
    }

    pub fn with_label_synchronization(mut self, enabled: bool) -> Self {
        self.synchronize_labels = enabled;
        self
    }

    pub fn with_orphan_pruning(mut self, enabled: bool) -> Self {
        self.prune_orphan_views = enabled;
        self
    }
}
