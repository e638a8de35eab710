//! Run orchestration.
//!
//! A run proceeds linearly through its states: fetch both pipelines,
//! reconcile organizations, reconcile members, recompute links. All
//! tracker reads complete before the first store write so that a partial
//! fetch can never be mistaken for remote deletions. Store writes are
//! applied sequentially.

use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use huddle_core::{Member, Organization};
use huddle_tracker::{BoxFetcher, RemoteBox, TrackerError};

use crate::config::SyncConfig;
use crate::entity::plan_entities;
use crate::error::{SyncError, SyncResult};
use crate::geocode::Geocoder;
use crate::links::plan_links;
use crate::report::{EntityCounts, EntityVariant, RunReport, RunState};
use crate::store::SyncStore;

/// The reconciliation engine.
///
/// Owns its collaborators; at most one run executes at a time. A second
/// [`run_sync`](SyncEngine::run_sync) while one is in flight fails fast
/// with [`SyncError::AlreadyRunning`] instead of queueing, because two
/// interleaved diffs could each treat the other's writes as deletions.
pub struct SyncEngine<F, G, S> {
    config: SyncConfig,
    fetcher: F,
    geocoder: G,
    store: S,
    running: Mutex<()>,
}

impl<F, G, S> SyncEngine<F, G, S>
where
    F: BoxFetcher,
    G: Geocoder,
    S: SyncStore,
{
    /// Create an engine from its configuration and collaborators.
    pub fn new(config: SyncConfig, fetcher: F, geocoder: G, store: S) -> Self {
        Self {
            config,
            fetcher,
            geocoder,
            store,
            running: Mutex::new(()),
        }
    }

    /// Execute one sync run and return its report.
    ///
    /// Returns `Err` only when another run is already in progress. Every
    /// other failure is folded into the report: the run moves to the
    /// failed state, keeps whatever steps already committed, and carries
    /// the error message. Callers retry by scheduling the next run.
    #[instrument(skip(self), fields(
        organization_pipeline = %self.config.organization_pipeline,
        member_pipeline = %self.config.member_pipeline,
    ))]
    pub async fn run_sync(&self) -> SyncResult<RunReport> {
        let _guard = self
            .running
            .try_lock()
            .map_err(|_| SyncError::AlreadyRunning)?;

        let mut report = RunReport::started();
        match self.execute(&mut report).await {
            Ok(()) => {
                report.complete();
                info!(
                    outcome = %report.outcome,
                    organizations_created = report.organizations.created,
                    organizations_updated = report.organizations.updated,
                    organizations_deleted = report.organizations.deleted,
                    members_created = report.members.created,
                    members_updated = report.members.updated,
                    members_deleted = report.members.deleted,
                    links_created = report.links_created,
                    links_removed = report.links_removed,
                    failures = report.failures.len(),
                    "sync run finished"
                );
            }
            Err(e) => {
                error!(state = %report.state, error = %e, "sync run aborted");
                report.fail(e.to_string());
            }
        }
        Ok(report)
    }

    async fn execute(&self, report: &mut RunReport) -> SyncResult<()> {
        if self.config.organization_pipeline == self.config.member_pipeline {
            return Err(SyncError::invalid_configuration(
                "organization and member pipelines must differ",
            ));
        }

        let (organization_boxes, member_boxes) = self.fetch_all().await?;

        report.state = RunState::SyncingOrganizations;
        let counts = self.sync_organizations(&organization_boxes, report).await?;
        report.organizations = counts;

        report.state = RunState::SyncingMembers;
        let counts = self.sync_members(&member_boxes, report).await?;
        report.members = counts;

        report.state = RunState::SyncingRelationships;
        self.sync_links(&organization_boxes, &member_boxes, report)
            .await?;

        Ok(())
    }

    /// Fetch pipeline metadata and both box lists concurrently, bounded
    /// by the configured timeout.
    async fn fetch_all(&self) -> SyncResult<(Vec<RemoteBox>, Vec<RemoteBox>)> {
        let fetch = async {
            let pipelines = tokio::try_join!(
                self.fetcher
                    .fetch_pipeline(&self.config.organization_pipeline),
                self.fetcher.fetch_pipeline(&self.config.member_pipeline),
            )?;
            let boxes = tokio::try_join!(
                self.fetcher.fetch_boxes(&self.config.organization_pipeline),
                self.fetcher.fetch_boxes(&self.config.member_pipeline),
            )?;
            Ok::<_, TrackerError>((pipelines, boxes))
        };

        let ((organization_pipeline, member_pipeline), (organization_boxes, member_boxes)) =
            match tokio::time::timeout(self.config.fetch_timeout, fetch).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(SyncError::Fetch(TrackerError::timeout(
                        self.config.fetch_timeout.as_secs(),
                    )))
                }
            };

        if organization_pipeline.key != self.config.organization_pipeline {
            return Err(SyncError::invalid_configuration(format!(
                "organization pipeline resolved to {} instead of {}",
                organization_pipeline.key, self.config.organization_pipeline,
            )));
        }
        if member_pipeline.key != self.config.member_pipeline {
            return Err(SyncError::invalid_configuration(format!(
                "member pipeline resolved to {} instead of {}",
                member_pipeline.key, self.config.member_pipeline,
            )));
        }

        debug!(
            organization_pipeline = %organization_pipeline.name,
            member_pipeline = %member_pipeline.name,
            organization_boxes = organization_boxes.len(),
            member_boxes = member_boxes.len(),
            "pipelines resolved and box lists fetched"
        );
        Ok((organization_boxes, member_boxes))
    }

    async fn sync_organizations(
        &self,
        boxes: &[RemoteBox],
        report: &mut RunReport,
    ) -> SyncResult<EntityCounts> {
        let locals = self.store.organizations().await?;
        let plan = plan_entities::<Organization>(&locals, boxes, &self.geocoder).await;
        let counts = plan.counts();
        self.note_skipped(EntityVariant::Organization, plan.failures.len());
        report.failures.extend(plan.failures);

        for organization in plan.creates.into_iter().chain(plan.updates) {
            self.store.upsert_organization(organization).await?;
        }
        for id in plan.deletes {
            self.store.delete_organization(id).await?;
        }
        Ok(counts)
    }

    async fn sync_members(
        &self,
        boxes: &[RemoteBox],
        report: &mut RunReport,
    ) -> SyncResult<EntityCounts> {
        let locals = self.store.members().await?;
        let plan = plan_entities::<Member>(&locals, boxes, &self.geocoder).await;
        let counts = plan.counts();
        self.note_skipped(EntityVariant::Member, plan.failures.len());
        report.failures.extend(plan.failures);

        for member in plan.creates.into_iter().chain(plan.updates) {
            self.store.upsert_member(member).await?;
        }
        for id in plan.deletes {
            self.store.delete_member(id).await?;
        }
        Ok(counts)
    }

    async fn sync_links(
        &self,
        organization_boxes: &[RemoteBox],
        member_boxes: &[RemoteBox],
        report: &mut RunReport,
    ) -> SyncResult<()> {
        let organizations = self.store.organizations().await?;
        let members = self.store.members().await?;
        let current = self.store.links().await?;

        let plan = plan_links(
            organization_boxes,
            member_boxes,
            &organizations,
            &members,
            &current,
        );
        report.links_created = plan.creates.len() as u32;
        report.links_removed = plan.removes.len() as u32;

        for link in plan.creates {
            self.store.insert_link(link).await?;
        }
        for link in &plan.removes {
            self.store.remove_link(link).await?;
        }
        Ok(())
    }

    fn note_skipped(&self, variant: EntityVariant, skipped: usize) {
        if skipped > 0 {
            warn!(variant = %variant, skipped, "some boxes were skipped this run");
        }
    }
}
