//! Enumeration types for tree annotations and pane filters.

use std::fmt;

/// How a selection set intersects a code's strict descendants.
///
/// # Examples
///
/// ```
/// use codetree_types::Classification;
///
/// assert_eq!(Classification::from_name("PARTIAL"), Some(Classification::Partial));
/// assert_eq!(Classification::Full.as_str(), "FULL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Classification {
    /// No descendant is selected (always the case for leaves).
    #[default]
    None,
    /// Some but not all descendants are selected.
    Partial,
    /// Every descendant is selected.
    Full,
}

impl Classification {
    /// Parses the upper-case wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NONE" => Some(Self::None),
            "PARTIAL" => Some(Self::Partial),
            "FULL" => Some(Self::Full),
            _ => None,
        }
    }

    /// Returns the upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Partial => "PARTIAL",
            Self::Full => "FULL",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the independently toggleable pane filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FilterFlag {
    /// Keep codes selected in any codelist, plus their ancestors.
    ShowOnlySelected,
    /// Keep codes selected in every codelist, plus their ancestors.
    ShowOnlyOverlapping,
    /// Keep codes selected in some but not all codelists, plus their ancestors.
    ShowDiffering,
}
