//! Flow editing session
//!
//! Wires a [`FlowComposer`] to its external collaborators: the process
//! catalog it selects from, the repository it commits to, and the
//! notifier that surfaces rejections and failures to the operator. One
//! session edits one flow; there is no concurrent multi-editor model.

use crate::catalog::{CatalogFilter, ProcessCatalog};
use crate::composer::{AggregateRoot, FlowComposer};
use crate::errors::FlowResult;
use crate::notification::{Notifier, Severity};
use crate::persistence::{FlowRepository, PersistedAssignment};
use tracing::{debug, info};

/// One operator's editing session over one flow
pub struct FlowEditingSession<C, R, N> {
    composer: FlowComposer,
    catalog: C,
    repository: R,
    notifier: N,
}

impl<C, R, N> FlowEditingSession<C, R, N>
where
    C: ProcessCatalog,
    R: FlowRepository,
    N: Notifier,
{
    /// Create a session over an existing composer
    pub fn new(composer: FlowComposer, catalog: C, repository: R, notifier: N) -> Self {
        Self {
            composer,
            catalog,
            repository,
            notifier,
        }
    }

    /// The composer, for reads
    pub fn composer(&self) -> &FlowComposer {
        &self.composer
    }

    /// The composer, for issuing commands directly
    pub fn composer_mut(&mut self) -> &mut FlowComposer {
        &mut self.composer
    }

    /// Load the selection pool from the catalog
    ///
    /// Done once per editing session; replacing the pool discards any
    /// selection into the previous one.
    pub async fn load_catalog(&mut self, filter: &CatalogFilter) -> FlowResult<usize> {
        let page = self.catalog.list_process_definitions(filter).await?;
        info!(
            flow_id = %self.composer.id(),
            loaded = page.items.len(),
            total = page.total,
            "catalog pool loaded"
        );
        self.composer.set_pool(page.items);
        Ok(page.total)
    }

    /// Insert the currently selected pool entries into the flow
    ///
    /// An equipment-linked rejection is surfaced to the operator as a
    /// warning and returned; the working set is unchanged.
    pub fn add_selected(&mut self) -> FlowResult<()> {
        let outcome = self.composer.add_selected().map(|steps| steps.len());
        match outcome {
            Ok(_) => Ok(()),
            Err(err) => {
                if err.is_rejection() {
                    self.notifier.notify(&err.to_string(), Severity::Warning);
                }
                Err(err)
            }
        }
    }

    /// Commit the working set to the backing store
    ///
    /// On success, merges the returned persisted IDs into the working set
    /// and reports accumulated removals for deletion. On failure, the
    /// working set is exactly as it was before the call (the composer
    /// performs no optimistic mutation), so the caller can simply retry.
    pub async fn save(&mut self) -> FlowResult<Vec<PersistedAssignment>> {
        let flow_id = self.composer.id();

        let committed = self
            .repository
            .commit_flow(flow_id, self.composer.steps())
            .await;
        let assignments = match committed {
            Ok(assignments) => assignments,
            Err(err) => {
                self.notifier.notify(&err.to_string(), Severity::Error);
                return Err(err);
            }
        };

        self.composer.merge_persisted(&assignments)?;

        let removals = self.composer.take_pending_removals();
        if !removals.is_empty() {
            debug!(%flow_id, removed = removals.len(), "reporting removed persisted steps");
            if let Err(err) = self.repository.delete_steps(flow_id, &removals).await {
                self.notifier.notify(&err.to_string(), Severity::Error);
                return Err(err);
            }
        }

        info!(
            %flow_id,
            steps = self.composer.steps().len(),
            newly_persisted = assignments.len(),
            "flow committed"
        );
        Ok(assignments)
    }
}
