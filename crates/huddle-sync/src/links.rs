//! Link reconstruction.
//!
//! The link set is fully derived state: each run recomputes it from the
//! boxes' linked-key lists and diffs the result against what the store
//! holds. An assertion from either side is enough to keep a link alive;
//! a link disappears only when neither box still lists the other.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use huddle_core::{Link, Member, Organization};
use huddle_tracker::RemoteBox;

/// Check whether a pair of boxes asserts a relationship.
///
/// Linked-key lists are not guaranteed symmetric; the tracker's UI can
/// leave one side stale. The union of both directions is authoritative.
#[must_use]
pub fn either_side_asserts(organization_box: &RemoteBox, member_box: &RemoteBox) -> bool {
    organization_box.links_to(&member_box.key) || member_box.links_to(&organization_box.key)
}

/// Planned mutations to the link set.
#[derive(Debug, Clone, Default)]
pub struct LinkPlan {
    /// Links asserted remotely but absent locally.
    pub creates: Vec<Link>,
    /// Local links no longer asserted by either side.
    pub removes: Vec<Link>,
}

impl LinkPlan {
    /// Check whether the plan changes nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.creates.is_empty() && self.removes.is_empty()
    }
}

/// Diff the derived link set against the store's current one.
///
/// Entity reconciliation runs first, so every box key resolves to a
/// local record unless its box was skipped for validation on creation.
/// An assertion involving such a box is deferred: the record does not
/// exist yet, and neither does any link to it.
#[must_use]
pub fn plan_links(
    organization_boxes: &[RemoteBox],
    member_boxes: &[RemoteBox],
    organizations: &[Organization],
    members: &[Member],
    current: &[Link],
) -> LinkPlan {
    let organization_ids: HashMap<&str, _> = organizations
        .iter()
        .filter_map(|o| o.external_key.as_deref().map(|k| (k, o.id)))
        .collect();
    let member_ids: HashMap<&str, _> = members
        .iter()
        .filter_map(|m| m.external_key.as_deref().map(|k| (k, m.id)))
        .collect();

    let mut desired = HashSet::new();
    for organization_box in organization_boxes {
        for member_box in member_boxes {
            if !either_side_asserts(organization_box, member_box) {
                continue;
            }
            match (
                organization_ids.get(organization_box.key.as_str()),
                member_ids.get(member_box.key.as_str()),
            ) {
                (Some(&organization), Some(&member)) => {
                    desired.insert(Link::new(organization, member));
                }
                _ => debug!(
                    organization_box = %organization_box.key,
                    member_box = %member_box.key,
                    "link endpoint has no local record yet, deferring"
                ),
            }
        }
    }

    let current_set: HashSet<Link> = current.iter().copied().collect();
    let creates = desired
        .iter()
        .filter(|l| !current_set.contains(l))
        .copied()
        .collect();
    let removes = current_set
        .iter()
        .filter(|l| !desired.contains(l))
        .copied()
        .collect();

    LinkPlan { creates, removes }
}
