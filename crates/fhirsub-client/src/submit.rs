//! The submission orchestrator.
//!
//! Resources reference each other by server-assigned identifiers, so each
//! subject tree is walked in strict dependency order: patient, then each
//! specimen, then the specimen's observations, then its derived diagnostic
//! report. References extracted from accepted responses are recorded in a
//! [`RefTable`] side table and injected into descendant documents at render
//! time; the input tree itself is never mutated.
//!
//! Failures are contained at the failing resource's subtree: siblings
//! continue, nothing is retried, and only a failed patient submission stops
//! the whole subject (there is no subject reference to propagate).

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::{StreamExt, stream};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use fhirsub_core::{
    RefTable, Reference, ReportOutcome, ReportStatus, Specimen, Subject, correlation_key,
};
use fhirsub_render::{Node, RenderContext, ResourceKind, render};

use crate::error::{ClientError, Result};
use crate::graph::ResultGraph;
use crate::transport::{Endpoint, SendResponse, Transport};

/// Width of the per-specimen observation worker pool.
pub const DEFAULT_CONCURRENCY: usize = 6;

pub struct Submitter<T: Transport> {
    transport: T,
    endpoint: Endpoint,
    concurrency: usize,
}

impl<T: Transport> Submitter<T> {
    pub fn new(transport: T, endpoint: Endpoint) -> Self {
        Self {
            transport,
            endpoint,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Overrides the observation worker-pool width.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits one subject tree, returning the result graph for it.
    pub async fn submit(&self, subject: &Subject) -> ResultGraph {
        let graph = ResultGraph::new();
        self.submit_into(subject, &graph).await;
        graph
    }

    /// Submits one subject tree, appending one outcome per specimen to
    /// `graph`. Returns the side table of assigned references, including
    /// each observation's backfilled result reference.
    pub async fn submit_into(&self, subject: &Subject, graph: &ResultGraph) -> RefTable {
        let subject_key = subject.identifier.composite_key();
        let mut refs = RefTable::new();

        let patient = match render(
            ResourceKind::Patient,
            &Node::Subject(subject),
            &RenderContext::default(),
        ) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(subject = %subject_key, error = %e, "failed to render subject");
                return refs;
            }
        };
        // Hard dependency: without a subject reference, descendants cannot
        // be submitted at all.
        match self.send_resource(ResourceKind::Patient, &patient).await {
            Ok(reference) => refs.set_subject(reference),
            Err(e) => {
                warn!(subject = %subject_key, error = %e,
                    "subject submission failed, skipping descendants");
                return refs;
            }
        }

        for specimen in &subject.specimens {
            self.submit_specimen(specimen, &mut refs, graph).await;
        }
        refs
    }

    async fn submit_specimen(&self, specimen: &Specimen, refs: &mut RefTable, graph: &ResultGraph) {
        let key = specimen.identifier.composite_key();

        let doc = {
            let ctx = RenderContext {
                subject_ref: refs.subject(),
                ..Default::default()
            };
            match render(ResourceKind::Specimen, &Node::Specimen(specimen), &ctx) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(specimen = %key, error = %e, "failed to render specimen");
                    graph.insert(key, ReportOutcome::error());
                    return;
                }
            }
        };
        match self.send_resource(ResourceKind::Specimen, &doc).await {
            Ok(reference) => refs.set_specimen(&key, reference),
            Err(e) => {
                warn!(specimen = %key, error = %e,
                    "specimen submission failed, skipping its observations");
                graph.insert(key, ReportOutcome::error());
                return;
            }
        }

        // Sibling observations carry no dependencies on each other, so they
        // go through a bounded pool; collecting the batch is the barrier
        // both the backfill and the report wait on.
        let result_refs = self.submit_observations(specimen, refs).await;

        for observation in &specimen.observations {
            let obs_key = observation.identifier.composite_key();
            match result_refs.get(correlation_key(&observation.glstring)) {
                Some(reference) => refs.set_result(&obs_key, reference.clone()),
                // No correlation match: the result stays unset.
                None => debug!(observation = %obs_key, "no correlation match, result left unset"),
            }
        }

        let outcome = self.submit_report(specimen, refs).await;
        graph.insert(key, outcome);
    }

    /// Sends all observations of one specimen through the bounded pool and
    /// maps each accepted one's correlation key to its assigned reference.
    /// On key collision the first accepted entry wins.
    async fn submit_observations(
        &self,
        specimen: &Specimen,
        refs: &RefTable,
    ) -> HashMap<String, Reference> {
        let specimen_ref = refs.specimen(&specimen.identifier.composite_key());

        // Materialized up front so each future captures a concrete borrow
        // of its observation rather than a higher-ranked one.
        let sends: Vec<_> = specimen
            .observations
            .iter()
            .map(|observation| {
                let ctx = RenderContext {
                    specimen_ref,
                    ..Default::default()
                };
                let doc = render(ResourceKind::Observation, &Node::Observation(observation), &ctx);
                async move {
                    let obs_key = observation.identifier.composite_key();
                    let doc = match doc {
                        Ok(doc) => doc,
                        Err(e) => {
                            warn!(observation = %obs_key, error = %e, "failed to render observation");
                            return None;
                        }
                    };
                    match self.send_resource(ResourceKind::Observation, &doc).await {
                        Ok(reference) => {
                            Some((correlation_key(&observation.glstring).to_string(), reference))
                        }
                        Err(e) => {
                            warn!(observation = %obs_key, error = %e, "observation submission failed");
                            None
                        }
                    }
                }
            })
            .collect();

        let accepted: Vec<Option<(String, Reference)>> = stream::iter(sends)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut map = HashMap::new();
        for (key, reference) in accepted.into_iter().flatten() {
            map.entry(key).or_insert(reference);
        }
        map
    }

    async fn submit_report(&self, specimen: &Specimen, refs: &RefTable) -> ReportOutcome {
        let key = specimen.identifier.composite_key();
        let ctx = RenderContext {
            subject_ref: refs.subject(),
            specimen_ref: refs.specimen(&key),
            issued: Some(OffsetDateTime::now_utc()),
            ..Default::default()
        };
        let doc = match render(ResourceKind::DiagnosticReport, &Node::Specimen(specimen), &ctx) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(specimen = %key, error = %e, "failed to render diagnostic report");
                return ReportOutcome::error();
            }
        };
        let url = self.endpoint.url_for(ResourceKind::DiagnosticReport);
        match self.transport.send(&doc, &url).await {
            Ok(resp) => {
                let status = ReportStatus::from_status_code(resp.status);
                let result = Reference::from_response(&resp.body, self.endpoint.base_url())
                    .ok()
                    .and_then(|reference| reference.display);
                ReportOutcome { status, result }
            }
            Err(e) => {
                warn!(specimen = %key, error = %e, "diagnostic report submission failed");
                ReportOutcome::error()
            }
        }
    }

    /// Sends one rendered resource and extracts its assigned reference.
    async fn send_resource(&self, kind: ResourceKind, doc: &Value) -> Result<Reference> {
        let url = self.endpoint.url_for(kind);
        let resp = self.transport.send(doc, &url).await?;
        self.extract_reference(kind, &resp)
    }

    fn extract_reference(&self, kind: ResourceKind, resp: &SendResponse) -> Result<Reference> {
        if !resp.is_success() {
            return Err(ClientError::unexpected_status(kind.as_str(), resp.status));
        }
        let reference = Reference::from_response(&resp.body, self.endpoint.base_url())?;
        debug!(kind = %kind, reference = %reference.reference, "resource accepted");
        Ok(reference)
    }
}

impl<T: Transport + 'static> Submitter<T> {
    /// Processes subjects fully in parallel; per-subject work stays
    /// sequential because of the identifier-dependency chain.
    pub async fn submit_all(self: Arc<Self>, subjects: Vec<Subject>) -> Arc<ResultGraph> {
        let graph = Arc::new(ResultGraph::new());
        let mut tasks = JoinSet::new();
        for subject in subjects {
            let submitter = Arc::clone(&self);
            let graph = Arc::clone(&graph);
            tasks.spawn(async move {
                submitter.submit_into(&subject, &graph).await;
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "subject task failed to join");
            }
        }
        graph
    }
}
