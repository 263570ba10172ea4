//! Relationship resolution: phase two of denormalization.
//!
//! Lookups only ever return handles into an already-built index. A
//! reference to something the index does not hold (not requested via
//! `include`, or of a different type than the schema declares) resolves to
//! nothing rather than an error.

use std::sync::Arc;

use tracing::trace;

use crate::document::{Linkage, Relationships, ResourceIdentifier};
use crate::index::{IncludedIndex, Resource};
use crate::linked::Linked;

/// Resolve the to-one relationship `name`.
///
/// `None` when the relationship is missing, `null`, dangling, or not a
/// single identifier.
pub fn to_one<T: Resource>(
    index: &Arc<IncludedIndex>,
    relationships: &Relationships,
    name: &str,
) -> Option<Linked<T>> {
    match relationships.get(name)?.data.as_ref()? {
        Linkage::One(identifier) => lookup(index, identifier),
        Linkage::Many(_) => {
            trace!(relationship = name, "expected a to-one linkage, found a list");
            None
        }
    }
}

/// Resolve the to-many relationship `name`, keeping identifier order and
/// dropping identifiers that do not resolve.
///
/// `None` when the relationship is missing or `null`; `Some(vec![])` when
/// the server sent an empty list.
pub fn to_many<T: Resource>(
    index: &Arc<IncludedIndex>,
    relationships: &Relationships,
    name: &str,
) -> Option<Vec<Linked<T>>> {
    match relationships.get(name)?.data.as_ref()? {
        Linkage::Many(identifiers) => Some(
            identifiers
                .iter()
                .filter_map(|identifier| lookup(index, identifier))
                .collect(),
        ),
        Linkage::One(_) => {
            trace!(relationship = name, "expected a to-many linkage, found a single identifier");
            None
        }
    }
}

/// Every indexed resource of type `T`, in first-seen order.
pub fn all<T: Resource>(index: &Arc<IncludedIndex>) -> Vec<Linked<T>> {
    (0..index.entries::<T>().len())
        .map(|slot| Linked::new(index, slot))
        .collect()
}

fn lookup<T: Resource>(index: &Arc<IncludedIndex>, identifier: &ResourceIdentifier) -> Option<Linked<T>> {
    if identifier.kind != T::TYPE {
        trace!(expected = T::TYPE, found = %identifier.kind, id = %identifier.id, "relationship points at another type");
        return None;
    }
    match index.slot(identifier) {
        Some(slot) => Some(Linked::new(index, slot)),
        None => {
            trace!(resource_type = %identifier.kind, id = %identifier.id, "dangling reference");
            None
        }
    }
}
