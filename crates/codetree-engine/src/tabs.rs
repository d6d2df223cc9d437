//! Tab strip overflow.
//!
//! Splits tabs into the ones shown in the strip and the ones moved into the
//! overflow dropdown, guaranteeing that the active tab is always shown.

use codetree_types::{Code, CodeId, TabItem};

/// Width of one tab in pixels.
pub const TAB_WIDTH: u32 = 168;

/// Space reserved for the overflow dropdown button, in pixels.
pub const DROPDOWN_WIDTH: u32 = 24;

/// Items compared by identity rather than by value.
pub trait Keyed {
    /// Identity type.
    type Key: PartialEq + ?Sized;

    /// The item's identity.
    fn key(&self) -> &Self::Key;
}

impl Keyed for TabItem {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Code {
    type Key = CodeId;

    fn key(&self) -> &CodeId {
        &self.id
    }
}

/// Splits `items` into `(visible, overflow)` at `capacity`.
///
/// If `active` is given and not among the visible items, the last visible
/// item is moved to the end of the overflow and `active` takes its place;
/// `active` is removed from the overflow. With a capacity of zero and an
/// active item, the active item is shown alone and nothing is moved.
///
/// # Examples
///
/// ```
/// use codetree_engine::partition;
/// use codetree_types::{TabItem, TabKind};
///
/// let tabs: Vec<_> = ["a", "b", "c", "d"]
///     .into_iter()
///     .map(|id| TabItem::new(id, TabKind::Phenotype))
///     .collect();
///
/// let (visible, overflow) = partition(&tabs, 2, Some(&tabs[3]));
/// let ids = |items: &[TabItem]| items.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
/// assert_eq!(ids(&visible), vec!["a", "d"]);
/// assert_eq!(ids(&overflow), vec!["c", "b"]);
/// ```
pub fn partition<T>(items: &[T], capacity: usize, active: Option<&T>) -> (Vec<T>, Vec<T>)
where
    T: Keyed + Clone,
{
    let split = capacity.min(items.len());
    let mut visible = items[..split].to_vec();
    let mut overflow = items[split..].to_vec();

    let Some(active) = active else {
        return (visible, overflow);
    };
    if visible.iter().any(|item| item.key() == active.key()) {
        return (visible, overflow);
    }

    let bumped = visible.pop();
    visible.push(active.clone());
    overflow.retain(|item| item.key() != active.key());
    overflow.extend(bumped);
    (visible, overflow)
}

/// Number of tabs that fit into a strip `width` pixels wide.
///
/// A width of zero means the strip has not been measured yet; one tab is
/// shown so the active tab stays reachable.
pub fn capacity_for_width(width: u32) -> usize {
    if width == 0 {
        return 1;
    }
    (width.saturating_sub(DROPDOWN_WIDTH) / TAB_WIDTH) as usize
}
