//! Code identifier type.
//!
//! Ids are assigned by pre-order numbering of an ontology, so they are dense
//! positive integers and a subtree always occupies a contiguous id range.

/// Identifier of a code within one ontology.
///
/// # Examples
///
/// ```
/// use codetree_types::CodeId;
///
/// let root: CodeId = 1;
/// let first_child: CodeId = root + 1;
/// ```
pub type CodeId = u32;
