//! Pane filter flags.

use crate::FilterFlag;

/// The filter flags of one tree pane.
///
/// Enabled flags are combined with AND; with no flag enabled every code
/// reachable through open nodes (and the search restriction) is shown.
///
/// # Examples
///
/// ```
/// use codetree_types::{FilterFlag, PaneFilters};
///
/// let mut filters = PaneFilters::default();
/// filters.toggle(FilterFlag::ShowOnlyOverlapping);
/// filters.toggle(FilterFlag::ShowDiffering);
///
/// assert!(filters.show_differing);
/// assert!(!filters.show_only_overlapping);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PaneFilters {
    /// Only codes selected in some codelist.
    pub show_only_selected: bool,
    /// Only codes selected in every codelist.
    pub show_only_overlapping: bool,
    /// Only codes whose selection differs between codelists.
    pub show_differing: bool,
}

impl PaneFilters {
    /// Filters with only `flag` enabled.
    pub fn only(flag: FilterFlag) -> Self {
        let mut filters = Self::default();
        filters.set(flag, true);
        filters
    }

    /// Returns whether `flag` is enabled.
    pub fn is_enabled(&self, flag: FilterFlag) -> bool {
        match flag {
            FilterFlag::ShowOnlySelected => self.show_only_selected,
            FilterFlag::ShowOnlyOverlapping => self.show_only_overlapping,
            FilterFlag::ShowDiffering => self.show_differing,
        }
    }

    /// Sets `flag` without touching the others.
    pub fn set(&mut self, flag: FilterFlag, enabled: bool) {
        match flag {
            FilterFlag::ShowOnlySelected => self.show_only_selected = enabled,
            FilterFlag::ShowOnlyOverlapping => self.show_only_overlapping = enabled,
            FilterFlag::ShowDiffering => self.show_differing = enabled,
        }
    }

    /// Flips `flag` the way the pane toolbar does.
    ///
    /// Overlapping and differing are complementary views: switching one on
    /// switches the other off.
    pub fn toggle(&mut self, flag: FilterFlag) {
        let enabled = !self.is_enabled(flag);
        self.set(flag, enabled);
        if enabled {
            match flag {
                FilterFlag::ShowDiffering => self.show_only_overlapping = false,
                FilterFlag::ShowOnlyOverlapping => self.show_differing = false,
                FilterFlag::ShowOnlySelected => {}
            }
        }
    }

    /// Iterates the enabled flags.
    pub fn enabled(&self) -> impl Iterator<Item = FilterFlag> + '_ {
        [
            FilterFlag::ShowOnlySelected,
            FilterFlag::ShowOnlyOverlapping,
            FilterFlag::ShowDiffering,
        ]
        .into_iter()
        .filter(|flag| self.is_enabled(*flag))
    }

    /// Returns true if no flag is enabled.
    pub fn is_empty(&self) -> bool {
        self.enabled().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_selected_is_independent() {
        let mut filters = PaneFilters::only(FilterFlag::ShowDiffering);
        filters.toggle(FilterFlag::ShowOnlySelected);
        assert!(filters.show_only_selected);
        assert!(filters.show_differing);

        filters.toggle(FilterFlag::ShowOnlySelected);
        assert!(!filters.show_only_selected);
    }

    #[test]
    fn test_toggle_overlapping_clears_differing() {
        let mut filters = PaneFilters::only(FilterFlag::ShowDiffering);
        filters.toggle(FilterFlag::ShowOnlyOverlapping);
        assert!(filters.show_only_overlapping);
        assert!(!filters.show_differing);
    }

    #[test]
    fn test_toggle_off_keeps_other_flags() {
        let mut filters = PaneFilters {
            show_only_selected: true,
            show_only_overlapping: true,
            show_differing: false,
        };
        filters.toggle(FilterFlag::ShowOnlyOverlapping);
        assert!(filters.show_only_selected);
        assert!(!filters.show_only_overlapping);
        assert!(!filters.show_differing);
    }

    #[test]
    fn test_enabled_flags() {
        assert!(PaneFilters::default().is_empty());
        let filters = PaneFilters {
            show_only_selected: true,
            show_only_overlapping: false,
            show_differing: true,
        };
        let enabled: Vec<_> = filters.enabled().collect();
        assert_eq!(
            enabled,
            vec![FilterFlag::ShowOnlySelected, FilterFlag::ShowDiffering]
        );
    }
}
