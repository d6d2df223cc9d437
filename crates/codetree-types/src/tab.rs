//! Workspace tab items.

/// What a workspace tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TabKind {
    /// A collection of codelists.
    CodelistCollection,
    /// A collection of phenotypes.
    PhenotypeCollection,
    /// A single phenotype.
    Phenotype,
}

/// A tab in the workspace tab strip.
///
/// Tabs are identified by `id`; two items with the same id are the same tab
/// even if their labels differ.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabItem {
    /// Stable tab id.
    pub id: String,
    /// Kind of object shown.
    pub kind: TabKind,
    /// Whether the tab holds an unsaved object.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transient: bool,
    /// Optional display label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
}

impl TabItem {
    /// Creates a persisted tab without a label.
    pub fn new(id: impl Into<String>, kind: TabKind) -> Self {
        Self {
            id: id.into(),
            kind,
            transient: false,
            label: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
