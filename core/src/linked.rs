//! Handles into a response's resource arena.
//!
//! A `Linked<T>` is a shared reference to one decoded resource. Every edge
//! that points at the same `(type, id)` yields a handle to the same entry,
//! and following an edge is a lookup, never a fresh decode. Back-references
//! such as tier to campaign to tier are therefore just more lookups.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use crate::document::{Relationships, ResourceIdentifier};
use crate::index::{Entry, IncludedIndex, Resource};
use crate::resolve;
use crate::types::{
    AddressAttributes, BenefitAttributes, CampaignAttributes, DeliverableAttributes, GoalAttributes,
    MediaAttributes, MemberAttributes, OAuthClientAttributes, TierAttributes, UserAttributes,
    WebhookAttributes,
};

pub struct Linked<T> {
    index: Arc<IncludedIndex>,
    slot: usize,
    kind: PhantomData<fn() -> T>,
}

pub type AddressRef = Linked<AddressAttributes>;
pub type BenefitRef = Linked<BenefitAttributes>;
pub type CampaignRef = Linked<CampaignAttributes>;
pub type DeliverableRef = Linked<DeliverableAttributes>;
pub type GoalRef = Linked<GoalAttributes>;
pub type MediaRef = Linked<MediaAttributes>;
pub type MemberRef = Linked<MemberAttributes>;
pub type OAuthClientRef = Linked<OAuthClientAttributes>;
pub type TierRef = Linked<TierAttributes>;
pub type UserRef = Linked<UserAttributes>;
pub type WebhookRef = Linked<WebhookAttributes>;

impl<T: Resource> Linked<T> {
    /// `slot` must address an existing entry in `T`'s table.
    pub(crate) fn new(index: &Arc<IncludedIndex>, slot: usize) -> Self {
        Self {
            index: Arc::clone(index),
            slot,
            kind: PhantomData,
        }
    }

    fn entry(&self) -> &Entry<T> {
        self.index.entry(self.slot)
    }

    pub fn id(&self) -> &str {
        &self.entry().id
    }

    pub fn attributes(&self) -> &T {
        &self.entry().attributes
    }

    /// The raw relationship block, for relationships without a typed
    /// accessor.
    pub fn relationships(&self) -> &Relationships {
        &self.entry().relationships
    }

    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(T::TYPE, self.id())
    }

    fn one<U: Resource>(&self, name: &str) -> Option<Linked<U>> {
        resolve::to_one(&self.index, self.relationships(), name)
    }

    fn many<U: Resource>(&self, name: &str) -> Option<Vec<Linked<U>>> {
        resolve::to_many(&self.index, self.relationships(), name)
    }
}

impl<T: Resource> Deref for Linked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.attributes()
    }
}

impl<T> Clone for Linked<T> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            slot: self.slot,
            kind: PhantomData,
        }
    }
}

/// Two handles are equal when they point at the same entry of the same
/// response.
impl<T> PartialEq for Linked<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.index, &other.index) && self.slot == other.slot
    }
}

impl<T> Eq for Linked<T> {}

// Prints only the identity: following edges here could loop forever.
impl<T: Resource> fmt::Debug for Linked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linked")
            .field("type", &T::TYPE)
            .field("id", &self.id())
            .finish()
    }
}

impl AddressRef {
    pub fn user(&self) -> Option<UserRef> {
        self.one("user")
    }

    /// Campaigns that have access to the address.
    pub fn campaigns(&self) -> Option<Vec<CampaignRef>> {
        self.many("campaigns")
    }
}

impl BenefitRef {
    pub fn tiers(&self) -> Option<Vec<TierRef>> {
        self.many("tiers")
    }

    pub fn deliverables(&self) -> Option<Vec<DeliverableRef>> {
        self.many("deliverables")
    }

    pub fn campaign(&self) -> Option<CampaignRef> {
        self.one("campaign")
    }
}

impl CampaignRef {
    pub fn tiers(&self) -> Option<Vec<TierRef>> {
        self.many("tiers")
    }

    pub fn creator(&self) -> Option<UserRef> {
        self.one("creator")
    }

    pub fn benefits(&self) -> Option<Vec<BenefitRef>> {
        self.many("benefits")
    }

    pub fn goals(&self) -> Option<Vec<GoalRef>> {
        self.many("goals")
    }
}

impl DeliverableRef {
    pub fn campaign(&self) -> Option<CampaignRef> {
        self.one("campaign")
    }

    pub fn benefit(&self) -> Option<BenefitRef> {
        self.one("benefit")
    }

    pub fn member(&self) -> Option<MemberRef> {
        self.one("member")
    }

    pub fn user(&self) -> Option<UserRef> {
        self.one("user")
    }
}

impl GoalRef {
    pub fn campaign(&self) -> Option<CampaignRef> {
        self.one("campaign")
    }
}

impl MemberRef {
    /// Requires the `campaigns.members.address` scope.
    pub fn address(&self) -> Option<AddressRef> {
        self.one("address")
    }

    pub fn campaign(&self) -> Option<CampaignRef> {
        self.one("campaign")
    }

    pub fn currently_entitled_tiers(&self) -> Option<Vec<TierRef>> {
        self.many("currently_entitled_tiers")
    }

    pub fn user(&self) -> Option<UserRef> {
        self.one("user")
    }
}

impl OAuthClientRef {
    pub fn user(&self) -> Option<UserRef> {
        self.one("user")
    }

    pub fn campaign(&self) -> Option<CampaignRef> {
        self.one("campaign")
    }
}

impl TierRef {
    pub fn campaign(&self) -> Option<CampaignRef> {
        self.one("campaign")
    }

    pub fn tier_image(&self) -> Option<MediaRef> {
        self.one("tier_image")
    }

    pub fn benefits(&self) -> Option<Vec<BenefitRef>> {
        self.many("benefits")
    }
}

impl UserRef {
    pub fn memberships(&self) -> Option<Vec<MemberRef>> {
        self.many("memberships")
    }

    pub fn campaign(&self) -> Option<CampaignRef> {
        self.one("campaign")
    }
}

impl WebhookRef {
    pub fn client(&self) -> Option<OAuthClientRef> {
        self.one("client")
    }

    pub fn campaign(&self) -> Option<CampaignRef> {
        self.one("campaign")
    }
}
