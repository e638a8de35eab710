//! Entity synchronizer.
//!
//! Reconciles one local collection against the freshly fetched box list
//! for its pipeline. Planning is separated from application: this module
//! computes the creates, updates and deletes; the orchestrator applies
//! them through the store after all reads have completed.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use huddle_core::{Coordinates, Member, Organization, ValidationError};
use huddle_tracker::RemoteBox;

use crate::fields::{member_fields, organization_fields};
use crate::geocode::Geocoder;
use crate::report::{EntityCounts, EntityVariant, RecordFailure};

/// An entity variant the synchronizer can reconcile against a pipeline.
pub trait SyncTarget: Clone + PartialEq + Send + Sync {
    /// Local identifier type.
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;

    /// Which variant this is, for reporting.
    fn variant() -> EntityVariant;

    /// Local identifier.
    fn id(&self) -> Self::Id;

    /// Join key against the box list. `None` for records that have never
    /// been through a sync run.
    fn external_key(&self) -> Option<&str>;

    /// Current street address.
    fn address(&self) -> Option<&str>;

    /// Set the derived coordinates.
    fn set_coordinates(&mut self, coordinates: Option<Coordinates>);

    /// Build a new record from a box. Fails validation if the decoded
    /// attributes are not acceptable (e.g. empty name).
    fn create_from(remote: &RemoteBox) -> Result<Self, ValidationError>;

    /// Overwrite the simple mapped attributes (name plus the decoded
    /// patch) from a box. Coordinates are not touched here.
    fn apply_box(&mut self, remote: &RemoteBox);

    /// Validate required fields.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl SyncTarget for Organization {
    type Id = huddle_core::OrganizationId;

    fn variant() -> EntityVariant {
        EntityVariant::Organization
    }

    fn id(&self) -> Self::Id {
        self.id
    }

    fn external_key(&self) -> Option<&str> {
        self.external_key.as_deref()
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.coordinates = coordinates;
    }

    fn create_from(remote: &RemoteBox) -> Result<Self, ValidationError> {
        let mut organization = Organization::new(remote.name.clone());
        organization.external_key = Some(remote.key.clone());
        organization_fields::from_fields(&remote.fields).apply_to(&mut organization);
        organization.validate()?;
        Ok(organization)
    }

    fn apply_box(&mut self, remote: &RemoteBox) {
        self.name = remote.name.clone();
        organization_fields::from_fields(&remote.fields).apply_to(self);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Organization::validate(self)
    }
}

impl SyncTarget for Member {
    type Id = huddle_core::MemberId;

    fn variant() -> EntityVariant {
        EntityVariant::Member
    }

    fn id(&self) -> Self::Id {
        self.id
    }

    fn external_key(&self) -> Option<&str> {
        self.external_key.as_deref()
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.coordinates = coordinates;
    }

    fn create_from(remote: &RemoteBox) -> Result<Self, ValidationError> {
        let mut member = Member::new(remote.name.clone());
        member.external_key = Some(remote.key.clone());
        member_fields::from_fields(&remote.fields).apply_to(&mut member);
        member.validate()?;
        Ok(member)
    }

    fn apply_box(&mut self, remote: &RemoteBox) {
        self.name = remote.name.clone();
        member_fields::from_fields(&remote.fields).apply_to(self);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Member::validate(self)
    }
}

/// Planned mutations for one entity variant.
#[derive(Debug, Clone)]
pub struct EntityPlan<E: SyncTarget> {
    /// New records to insert.
    pub creates: Vec<E>,
    /// Changed records to write back.
    pub updates: Vec<E>,
    /// Records to delete (their external key vanished from the box list).
    pub deletes: Vec<E::Id>,
    /// Boxes skipped because their decoded attributes failed validation.
    pub failures: Vec<RecordFailure>,
}

impl<E: SyncTarget> EntityPlan<E> {
    fn new() -> Self {
        Self {
            creates: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Counters for the run report.
    #[must_use]
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            created: self.creates.len() as u32,
            updated: self.updates.len() as u32,
            deleted: self.deletes.len() as u32,
        }
    }
}

/// Decide whether coordinates must be recomputed after an update.
///
/// Only an actual address change triggers geocoding. When this returns
/// false the stored coordinates must stay exactly as they were, even if
/// the remote box carries different coordinate field values. Losing the
/// address does not clear coordinates either; the last derived position
/// is kept.
#[must_use]
pub fn should_refresh_coordinates(previous: Option<&str>, current: Option<&str>) -> bool {
    current.is_some() && previous != current
}

/// Compute the reconciliation plan for one entity variant.
///
/// A validation failure skips the single offending box and records it;
/// it never aborts planning. Geocode failures are logged and absorbed.
pub async fn plan_entities<E: SyncTarget>(
    locals: &[E],
    boxes: &[RemoteBox],
    geocoder: &dyn Geocoder,
) -> EntityPlan<E> {
    let mut plan = EntityPlan::new();

    let by_key: HashMap<&str, &E> = locals
        .iter()
        .filter_map(|e| e.external_key().map(|k| (k, e)))
        .collect();
    let fresh_keys: HashSet<&str> = boxes.iter().map(|b| b.key.as_str()).collect();

    for remote in boxes {
        match by_key.get(remote.key.as_str()) {
            None => match E::create_from(remote) {
                Ok(mut created) => {
                    if let Some(address) = created.address().map(str::to_string) {
                        match geocoder.geocode(&address).await {
                            Ok(coordinates) => created.set_coordinates(Some(coordinates)),
                            Err(e) => warn!(
                                box_key = %remote.key,
                                variant = %E::variant(),
                                error = %e,
                                "geocoding failed for new record, coordinates left unset"
                            ),
                        }
                    }
                    plan.creates.push(created);
                }
                Err(e) => {
                    warn!(
                        box_key = %remote.key,
                        variant = %E::variant(),
                        error = %e,
                        "skipping box, validation failed"
                    );
                    plan.failures
                        .push(RecordFailure::new(E::variant(), &remote.key, e.to_string()));
                }
            },
            Some(local) => {
                let mut updated = (*local).clone();
                let previous_address = updated.address().map(str::to_string);
                updated.apply_box(remote);

                if let Err(e) = updated.validate() {
                    warn!(
                        box_key = %remote.key,
                        variant = %E::variant(),
                        error = %e,
                        "skipping box, updated record failed validation"
                    );
                    plan.failures
                        .push(RecordFailure::new(E::variant(), &remote.key, e.to_string()));
                    continue;
                }

                if should_refresh_coordinates(previous_address.as_deref(), updated.address()) {
                    if let Some(address) = updated.address().map(str::to_string) {
                        match geocoder.geocode(&address).await {
                            Ok(coordinates) => updated.set_coordinates(Some(coordinates)),
                            Err(e) => warn!(
                                box_key = %remote.key,
                                variant = %E::variant(),
                                error = %e,
                                "geocoding failed, keeping previous coordinates"
                            ),
                        }
                    }
                }

                if updated != **local {
                    plan.updates.push(updated);
                }
            }
        }
    }

    for local in locals {
        // Records with no external key have never been through a sync
        // run; absence from the box list says nothing about them.
        if let Some(key) = local.external_key() {
            if !fresh_keys.contains(key) {
                plan.deletes.push(local.id());
            }
        }
    }

    plan
}
