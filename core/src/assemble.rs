//! Top-level entities returned by the fetch operations.
//!
//! # Design
//! An assembler builds one index per response, registers the primary
//! resources into it, then resolves the relationships each entity declares.
//! List endpoints share that single index across all elements. To-many
//! fields are `Option<Vec<_>>`: `None` means the relationship was absent or
//! `null`, `Some(vec![])` means it was present and empty.

use std::ops::Deref;
use std::sync::Arc;

use tracing::debug;

use crate::document::{Document, RawResource};
use crate::error::DecodeError;
use crate::index::{Entry, IncludedIndex, Resource};
use crate::linked::{AddressRef, BenefitRef, CampaignRef, GoalRef, MemberRef, TierRef, UserRef};
use crate::resolve;
use crate::types::{CampaignAttributes, MemberAttributes, TierAttributes, UserAttributes};

/// The user an access token belongs to.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub attributes: UserAttributes,
    pub campaign: Option<CampaignRef>,
    /// Usually zero or one membership to the token creator's campaign; all
    /// memberships with the `identity.memberships` scope.
    pub memberships: Option<Vec<MemberRef>>,
}

#[derive(Debug, Clone)]
pub struct Campaign {
    pub id: String,
    pub attributes: CampaignAttributes,
    pub creator: Option<UserRef>,
    pub benefits: Option<Vec<BenefitRef>>,
    pub goals: Option<Vec<GoalRef>>,
    pub tiers: Option<Vec<TierRef>>,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub id: String,
    pub attributes: MemberAttributes,
    pub address: Option<AddressRef>,
    pub campaign: Option<CampaignRef>,
    pub user: Option<UserRef>,
    pub currently_entitled_tiers: Option<Vec<TierRef>>,
}

impl Deref for User {
    type Target = UserAttributes;

    fn deref(&self) -> &UserAttributes {
        &self.attributes
    }
}

impl Deref for Campaign {
    type Target = CampaignAttributes;

    fn deref(&self) -> &CampaignAttributes {
        &self.attributes
    }
}

impl Deref for Member {
    type Target = MemberAttributes;

    fn deref(&self) -> &MemberAttributes {
        &self.attributes
    }
}

/// Where a member's entitled tiers come from when its relationship block
/// does not mention `currently_entitled_tiers` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntitledTiers {
    /// Use the relationship only.
    Explicit,
    /// Fall back to every included tier. Single-member responses from the
    /// API can carry the tiers in `included` without linking them.
    IncludedFallback,
}

impl User {
    fn assemble(entry: Entry<UserAttributes>, index: &Arc<IncludedIndex>) -> Self {
        Self {
            campaign: resolve::to_one(index, &entry.relationships, "campaign"),
            memberships: resolve::to_many(index, &entry.relationships, "memberships"),
            id: entry.id,
            attributes: entry.attributes,
        }
    }
}

impl Campaign {
    fn assemble(entry: Entry<CampaignAttributes>, index: &Arc<IncludedIndex>) -> Self {
        let relationships = &entry.relationships;
        Self {
            creator: resolve::to_one(index, relationships, "creator"),
            benefits: resolve::to_many(index, relationships, "benefits"),
            goals: resolve::to_many(index, relationships, "goals"),
            tiers: resolve::to_many(index, relationships, "tiers"),
            id: entry.id,
            attributes: entry.attributes,
        }
    }
}

impl Member {
    fn assemble(entry: Entry<MemberAttributes>, index: &Arc<IncludedIndex>, tiers: EntitledTiers) -> Self {
        let relationships = &entry.relationships;
        let currently_entitled_tiers = if tiers == EntitledTiers::IncludedFallback
            && !relationships.contains("currently_entitled_tiers")
        {
            let included = resolve::all::<TierAttributes>(index);
            (!included.is_empty()).then_some(included)
        } else {
            resolve::to_many(index, relationships, "currently_entitled_tiers")
        };
        Self {
            address: resolve::to_one(index, relationships, "address"),
            campaign: resolve::to_one(index, relationships, "campaign"),
            user: resolve::to_one(index, relationships, "user"),
            currently_entitled_tiers,
            id: entry.id,
            attributes: entry.attributes,
        }
    }
}

pub fn identity(document: Document<RawResource>) -> Result<User, DecodeError> {
    let (index, mut entries) = link::<UserAttributes>(vec![document.data], document.included)?;
    Ok(User::assemble(entries.remove(0), &index))
}

pub fn campaign(document: Document<RawResource>) -> Result<Campaign, DecodeError> {
    let (index, mut entries) = link::<CampaignAttributes>(vec![document.data], document.included)?;
    Ok(Campaign::assemble(entries.remove(0), &index))
}

pub fn campaigns(document: Document<Vec<RawResource>>) -> Result<Vec<Campaign>, DecodeError> {
    let (index, entries) = link::<CampaignAttributes>(document.data, document.included)?;
    Ok(entries
        .into_iter()
        .map(|entry| Campaign::assemble(entry, &index))
        .collect())
}

pub fn member(document: Document<RawResource>) -> Result<Member, DecodeError> {
    let (index, mut entries) = link::<MemberAttributes>(vec![document.data], document.included)?;
    Ok(Member::assemble(entries.remove(0), &index, EntitledTiers::IncludedFallback))
}

pub fn members(document: Document<Vec<RawResource>>) -> Result<Vec<Member>, DecodeError> {
    let (index, entries) = link::<MemberAttributes>(document.data, document.included)?;
    Ok(entries
        .into_iter()
        .map(|entry| Member::assemble(entry, &index, EntitledTiers::Explicit))
        .collect())
}

/// Build the index for one response and decode its primary resources,
/// which must all be of type `T`.
fn link<T: Resource>(
    primary: Vec<RawResource>,
    included: Vec<RawResource>,
) -> Result<(Arc<IncludedIndex>, Vec<Entry<T>>), DecodeError> {
    let included_count = included.len();
    let mut index = IncludedIndex::build(included)?;
    let mut entries = Vec::with_capacity(primary.len());
    for raw in primary {
        if raw.kind != T::TYPE {
            return Err(DecodeError::UnexpectedType {
                expected: T::TYPE,
                found: raw.kind,
                id: raw.id,
            });
        }
        let entry = Entry::<T>::decode(raw)?;
        index.register(entry.clone());
        entries.push(entry);
    }
    debug!(
        resource_type = T::TYPE,
        primary = entries.len(),
        included = included_count,
        indexed = index.len(),
        "assembling response"
    );
    Ok((Arc::new(index), entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(json: &str) -> Document<RawResource> {
        serde_json::from_str(json).unwrap()
    }

    fn list(json: &str) -> Document<Vec<RawResource>> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn campaign_creator_resolves_from_included() {
        let campaign = campaign(single(
            r#"{"data":{"type":"campaign","id":"1","relationships":{"creator":{"data":{"type":"user","id":"9"}}}},
                "included":[{"type":"user","id":"9","attributes":{"full_name":"Alice"}}]}"#,
        ))
        .unwrap();
        assert_eq!(campaign.id, "1");
        assert_eq!(campaign.creator.unwrap().full_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn campaign_creator_absent_when_not_included() {
        let campaign = campaign(single(
            r#"{"data":{"type":"campaign","id":"1","relationships":{"creator":{"data":{"type":"user","id":"9"}}}},
                "included":[]}"#,
        ))
        .unwrap();
        assert!(campaign.creator.is_none());
        assert!(campaign.tiers.is_none());
    }

    #[test]
    fn primary_attributes_are_copied_verbatim() {
        let campaign = campaign(single(
            r#"{"data":{"type":"campaign","id":"1","attributes":{"summary":"Hello","patron_count":12,"is_monthly":true}}}"#,
        ))
        .unwrap();
        assert_eq!(campaign.summary.as_deref(), Some("Hello"));
        assert_eq!(campaign.patron_count, Some(12));
        assert_eq!(campaign.is_monthly, Some(true));
    }

    #[test]
    fn campaign_tier_back_reference_reaches_primary() {
        let campaign = campaign(single(
            r#"{"data":{"type":"campaign","id":"1","attributes":{"vanity":"me"},
                        "relationships":{"tiers":{"data":[{"type":"tier","id":"t"}]}}},
                "included":[{"type":"tier","id":"t","relationships":{"campaign":{"data":{"type":"campaign","id":"1"}}}}]}"#,
        ))
        .unwrap();
        let tier = &campaign.tiers.as_ref().unwrap()[0];
        let back = tier.campaign().unwrap();
        assert_eq!(back.vanity.as_deref(), Some("me"));
        assert_eq!(back.tiers().unwrap()[0], *tier);
    }

    #[test]
    fn campaign_list_shares_one_index() {
        let campaigns = campaigns(list(
            r#"{"data":[
                  {"type":"campaign","id":"1","relationships":{"creator":{"data":{"type":"user","id":"9"}},
                                                                "goals":{"data":[{"type":"goal","id":"g"}]}}},
                  {"type":"campaign","id":"2","relationships":{"creator":{"data":{"type":"user","id":"9"}},
                                                                "goals":{"data":[]}}}],
                "included":[{"type":"user","id":"9","attributes":{"full_name":"Alice"}},
                            {"type":"goal","id":"g","attributes":{"amount_cents":5000}}]}"#,
        ))
        .unwrap();
        assert_eq!(campaigns.len(), 2);
        assert_eq!(campaigns[0].creator, campaigns[1].creator);
        assert_eq!(campaigns[0].goals.as_ref().unwrap()[0].amount_cents, Some(5000));
        assert_eq!(campaigns[1].goals.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn identity_resolves_campaign_and_memberships() {
        let user = identity(single(
            r#"{"data":{"type":"user","id":"9","attributes":{"full_name":"Alice"},
                        "relationships":{"campaign":{"data":{"type":"campaign","id":"1"}},
                                         "memberships":{"data":[{"type":"member","id":"m1"},{"type":"member","id":"m2"}]}}},
                "included":[{"type":"campaign","id":"1","attributes":{"vanity":"alice"}},
                            {"type":"member","id":"m2","attributes":{"patron_status":"active_patron"}}]}"#,
        ))
        .unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Alice"));
        assert_eq!(user.campaign.as_ref().unwrap().vanity.as_deref(), Some("alice"));
        let memberships = user.memberships.unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].id(), "m2");
        assert_eq!(memberships[0].patron_status.as_deref(), Some("active_patron"));
    }

    #[test]
    fn member_resolves_declared_relationships() {
        let member = member(single(
            r#"{"data":{"type":"member","id":"m","attributes":{"full_name":"Pat","currently_entitled_amount_cents":500},
                        "relationships":{"address":{"data":{"type":"address","id":"a"}},
                                         "campaign":{"data":{"type":"campaign","id":"1"}},
                                         "user":{"data":{"type":"user","id":"u"}},
                                         "currently_entitled_tiers":{"data":[{"type":"tier","id":"t2"}]}}},
                "included":[{"type":"address","id":"a","attributes":{"city":"Lisbon"}},
                            {"type":"campaign","id":"1"},
                            {"type":"user","id":"u","attributes":{"full_name":"Pat"}},
                            {"type":"tier","id":"t1","attributes":{"title":"Bronze"}},
                            {"type":"tier","id":"t2","attributes":{"title":"Silver"}}]}"#,
        ))
        .unwrap();
        assert_eq!(member.currently_entitled_amount_cents, Some(500));
        assert_eq!(member.address.unwrap().city.as_deref(), Some("Lisbon"));
        assert_eq!(member.campaign.unwrap().id(), "1");
        assert_eq!(member.user.unwrap().id(), "u");
        let tiers = member.currently_entitled_tiers.unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].title.as_deref(), Some("Silver"));
    }

    #[test]
    fn member_falls_back_to_included_tiers_when_relationship_missing() {
        let member = member(single(
            r#"{"data":{"type":"member","id":"m","relationships":{"user":{"data":{"type":"user","id":"u"}}}},
                "included":[{"type":"tier","id":"t1","attributes":{"title":"Bronze"}},
                            {"type":"tier","id":"t2","attributes":{"title":"Silver"}}]}"#,
        ))
        .unwrap();
        let titles: Vec<_> = member
            .currently_entitled_tiers
            .unwrap()
            .iter()
            .map(|t| t.title.clone().unwrap())
            .collect();
        assert_eq!(titles, ["Bronze", "Silver"]);
    }

    #[test]
    fn member_empty_relationship_does_not_fall_back() {
        let member = member(single(
            r#"{"data":{"type":"member","id":"m","relationships":{"currently_entitled_tiers":{"data":[]}}},
                "included":[{"type":"tier","id":"t1"}]}"#,
        ))
        .unwrap();
        assert_eq!(member.currently_entitled_tiers.map(|t| t.len()), Some(0));
    }

    #[test]
    fn member_without_tiers_anywhere_has_none() {
        let member = member(single(r#"{"data":{"type":"member","id":"m"}}"#)).unwrap();
        assert!(member.currently_entitled_tiers.is_none());
    }

    #[test]
    fn member_list_does_not_fall_back() {
        let members = members(list(
            r#"{"data":[{"type":"member","id":"m1"},
                        {"type":"member","id":"m2","relationships":{"currently_entitled_tiers":{"data":[{"type":"tier","id":"t1"}]}}}],
                "included":[{"type":"tier","id":"t1"}]}"#,
        ))
        .unwrap();
        assert!(members[0].currently_entitled_tiers.is_none());
        assert_eq!(members[1].currently_entitled_tiers.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn duplicate_included_resource_uses_later_attributes() {
        let campaign = campaign(single(
            r#"{"data":{"type":"campaign","id":"1","relationships":{"creator":{"data":{"type":"user","id":"9"}}}},
                "included":[{"type":"user","id":"9","attributes":{"full_name":"First"}},
                            {"type":"user","id":"9","attributes":{"full_name":"Second"}}]}"#,
        ))
        .unwrap();
        assert_eq!(campaign.creator.unwrap().full_name.as_deref(), Some("Second"));
    }

    #[test]
    fn wrong_primary_type_is_rejected() {
        let err = campaign(single(r#"{"data":{"type":"user","id":"9"}}"#)).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedType { expected: "campaign", ref found, .. } if found == "user"
        ));
    }

    #[test]
    fn malformed_included_attributes_abort_assembly() {
        let err = campaign(single(
            r#"{"data":{"type":"campaign","id":"1"},
                "included":[{"type":"goal","id":"g","attributes":{"amount_cents":"lots"}}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, DecodeError::Resource { ref resource_type, ref id, .. } if resource_type == "goal" && id == "g"));
    }
}
