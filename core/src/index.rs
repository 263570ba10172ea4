//! The included-resource index: phase one of denormalization.
//!
//! # Design
//! Every resource of a compound document is decoded into a typed table
//! before any relationship is looked at, because a relationship may point at
//! a resource that appears anywhere in `included`. The index is an arena:
//! one `Table` per resource type plus a `(type, id) -> slot` map. Phase two
//! (`resolve`) only ever hands out handles to slots that already exist here,
//! so cyclic references cannot cause recursion.
//!
//! Duplicate identities are not an error. The later resource replaces the
//! earlier one in place, keeping the earlier one's position.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::document::{RawResource, Relationships, ResourceIdentifier};
use crate::error::DecodeError;
use crate::types::{
    AddressAttributes, BenefitAttributes, CampaignAttributes, DeliverableAttributes, GoalAttributes,
    MediaAttributes, MemberAttributes, OAuthClientAttributes, TierAttributes, UserAttributes,
    WebhookAttributes,
};

/// An attribute schema bound to its wire `type` tag and its table in the
/// index.
pub trait Resource: DeserializeOwned + Clone + 'static {
    const TYPE: &'static str;

    fn table(index: &IncludedIndex) -> &Table<Self>;
    fn table_mut(index: &mut IncludedIndex) -> &mut Table<Self>;
}

/// A decoded resource: typed attributes plus its still-unresolved
/// relationship block.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub id: String,
    pub attributes: T,
    pub relationships: Relationships,
}

impl<T: Resource> Entry<T> {
    /// Decode the attributes of `raw` as `T`. The caller has already
    /// matched `raw.kind` against `T::TYPE`.
    pub fn decode(raw: RawResource) -> Result<Self, DecodeError> {
        let attributes = serde_json::from_value(Value::Object(raw.attributes)).map_err(|source| {
            DecodeError::Resource {
                resource_type: raw.kind.clone(),
                id: raw.id.clone(),
                source,
            }
        })?;
        Ok(Self {
            id: raw.id,
            attributes,
            relationships: raw.relationships,
        })
    }
}

/// All resources of one type, in first-seen order.
#[derive(Debug)]
pub struct Table<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

/// Typed `(type, id) -> resource` lookup table for one response.
#[derive(Debug, Default)]
pub struct IncludedIndex {
    slots: HashMap<ResourceIdentifier, usize>,
    addresses: Table<AddressAttributes>,
    benefits: Table<BenefitAttributes>,
    campaigns: Table<CampaignAttributes>,
    deliverables: Table<DeliverableAttributes>,
    goals: Table<GoalAttributes>,
    media: Table<MediaAttributes>,
    members: Table<MemberAttributes>,
    clients: Table<OAuthClientAttributes>,
    tiers: Table<TierAttributes>,
    users: Table<UserAttributes>,
    webhooks: Table<WebhookAttributes>,
}

macro_rules! resources {
    ($($variant:ident => $attributes:ty, $tag:literal, $table:ident;)+) => {
        /// Resource types this crate knows how to decode. Anything else is skipped.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ResourceType {
            $($variant,)+
        }

        impl ResourceType {
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// The wire `type` tag.
            pub fn tag(self) -> &'static str {
                match self {
                    $(Self::$variant => <$attributes as Resource>::TYPE,)+
                }
            }
        }

        $(
            impl Resource for $attributes {
                const TYPE: &'static str = $tag;

                fn table(index: &IncludedIndex) -> &Table<Self> {
                    &index.$table
                }

                fn table_mut(index: &mut IncludedIndex) -> &mut Table<Self> {
                    &mut index.$table
                }
            }
        )+

        impl IncludedIndex {
            fn store_as(&mut self, kind: ResourceType, raw: RawResource) -> Result<(), DecodeError> {
                match kind {
                    $(ResourceType::$variant => self.store(Entry::<$attributes>::decode(raw)?),)+
                }
                Ok(())
            }
        }
    };
}

resources! {
    Address => AddressAttributes, "address", addresses;
    Benefit => BenefitAttributes, "benefit", benefits;
    Campaign => CampaignAttributes, "campaign", campaigns;
    Deliverable => DeliverableAttributes, "deliverable", deliverables;
    Goal => GoalAttributes, "goal", goals;
    Media => MediaAttributes, "media", media;
    Member => MemberAttributes, "member", members;
    OAuthClient => OAuthClientAttributes, "client", clients;
    Tier => TierAttributes, "tier", tiers;
    User => UserAttributes, "user", users;
    Webhook => WebhookAttributes, "webhook", webhooks;
}

impl IncludedIndex {
    /// Decode every resource of an `included` array into the index.
    pub fn build(included: Vec<RawResource>) -> Result<Self, DecodeError> {
        let mut index = Self::default();
        for raw in included {
            index.insert(raw)?;
        }
        Ok(index)
    }

    /// Decode one resource by its type tag and store it, replacing any
    /// earlier resource with the same identity.
    pub fn insert(&mut self, raw: RawResource) -> Result<(), DecodeError> {
        let Some(kind) = ResourceType::from_tag(&raw.kind) else {
            debug!(resource_type = %raw.kind, id = %raw.id, "skipping resource of unknown type");
            return Ok(());
        };
        self.store_as(kind, raw)
    }

    /// Store a primary resource so included resources can point back at it.
    /// An included resource with the same identity takes precedence.
    pub fn register<T: Resource>(&mut self, entry: Entry<T>) {
        let key = ResourceIdentifier::new(T::TYPE, entry.id.clone());
        if self.slots.contains_key(&key) {
            return;
        }
        let table = T::table_mut(self);
        table.entries.push(entry);
        let slot = table.entries.len() - 1;
        self.slots.insert(key, slot);
    }

    fn store<T: Resource>(&mut self, entry: Entry<T>) {
        let key = ResourceIdentifier::new(T::TYPE, entry.id.clone());
        match self.slots.get(&key).copied() {
            Some(slot) => {
                trace!(resource_type = T::TYPE, id = %entry.id, "duplicate resource replaces earlier one");
                T::table_mut(self).entries[slot] = entry;
            }
            None => {
                let table = T::table_mut(self);
                table.entries.push(entry);
                let slot = table.entries.len() - 1;
                self.slots.insert(key, slot);
            }
        }
    }

    /// Slot of `identifier` within its type's table.
    pub fn slot(&self, identifier: &ResourceIdentifier) -> Option<usize> {
        self.slots.get(identifier).copied()
    }

    pub fn get<T: Resource>(&self, id: &str) -> Option<&Entry<T>> {
        let slot = self.slot(&ResourceIdentifier::new(T::TYPE, id))?;
        T::table(self).entries.get(slot)
    }

    /// Every resource of type `T`, in first-seen order.
    pub fn entries<T: Resource>(&self) -> &[Entry<T>] {
        &T::table(self).entries
    }

    pub(crate) fn entry<T: Resource>(&self, slot: usize) -> &Entry<T> {
        &T::table(self).entries[slot]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
