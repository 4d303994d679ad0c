//! Document renderers, one per resource kind.
//!
//! Rendering is a pure function of the domain object and the reference
//! values currently in context: given identical input and an identical
//! context, the output is identical. Dispatch is by the explicit
//! [`ResourceKind`] tag.
//!
//! Cross-reference fields are always written wholesale: a subject or
//! specimen link replaces any prior value with a structure containing only
//! the reference, never merged.

use fhirsub_core::{CoreError, Observation, Reference, Result, Specimen, Subject};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::kind::ResourceKind;

const LOINC_SYSTEM: &str = "http://loinc.org";
const HLA_CLASS_I_CODE: &str = "13303-3";
const HLA_CLASS_I_DISPLAY: &str = "HLA-A+B+C (class I) [Type]";
const PERFORMER_REFERENCE: &str = "urn:uuid:9243cc20-27bd-4f87-ba90-0328ed474950";
const PERFORMER_DISPLAY: &str = "Typing Laboratory";

/// One domain object to render.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Subject(&'a Subject),
    Specimen(&'a Specimen),
    Observation(&'a Observation),
}

/// Reference values consulted by the renderers.
///
/// The orchestrator fills these from the side table as resources are
/// accepted; the bundle assembler fills them with client-generated tokens
/// up front. `issued` stamps a diagnostic report's issuance time; left
/// unset, the report carries no timestamps (offline bundles are replayed
/// later).
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub subject_ref: Option<&'a Reference>,
    pub specimen_ref: Option<&'a Reference>,
    pub result_ref: Option<&'a Reference>,
    pub issued: Option<OffsetDateTime>,
}

/// Renders one domain object into its exchange-schema document.
pub fn render(kind: ResourceKind, node: &Node<'_>, ctx: &RenderContext<'_>) -> Result<Value> {
    match (kind, node) {
        (ResourceKind::Patient, Node::Subject(subject)) => Ok(render_patient(subject)),
        (ResourceKind::Specimen, Node::Specimen(specimen)) => Ok(render_specimen(specimen, ctx)),
        (ResourceKind::Observation, Node::Observation(observation)) => {
            Ok(render_observation(observation, ctx))
        }
        (ResourceKind::DiagnosticReport, Node::Specimen(specimen)) => {
            render_diagnostic_report(specimen, ctx)
        }
        (kind, _) => Err(CoreError::invalid_input(format!(
            "no renderer for {kind} on this node"
        ))),
    }
}

/// Replaces any prior link value wholesale.
fn set_link(doc: &mut Value, field: &str, reference: &Reference) {
    doc[field] = json!({ "reference": reference.reference });
}

fn render_patient(subject: &Subject) -> Value {
    json!({
        "resourceType": ResourceKind::Patient.as_str(),
        "identifier": { "value": subject.identifier.display_value() },
    })
}

fn render_specimen(specimen: &Specimen, ctx: &RenderContext<'_>) -> Value {
    let mut doc = json!({
        "resourceType": ResourceKind::Specimen.as_str(),
        "identifier": { "value": specimen.identifier.display_value() },
    });
    if let Some(subject) = ctx.subject_ref {
        set_link(&mut doc, "subject", subject);
    }
    doc
}

fn render_observation(observation: &Observation, ctx: &RenderContext<'_>) -> Value {
    let mut doc = json!({
        "resourceType": ResourceKind::Observation.as_str(),
        "status": "final",
        "identifier": { "value": observation.identifier.display_value() },
        "valueString": observation.glstring,
    });
    if let Some(specimen) = ctx.specimen_ref {
        set_link(&mut doc, "specimen", specimen);
    }
    if let Some(result) = ctx.result_ref {
        // The observation's own assigned reference, backfilled after submission.
        doc["result"] = json!({
            "reference": result.reference,
            "display": result.display.clone().unwrap_or_default(),
        });
    }
    doc
}

fn render_diagnostic_report(specimen: &Specimen, ctx: &RenderContext<'_>) -> Result<Value> {
    let results: Vec<Value> = specimen
        .observations
        .iter()
        .map(|observation| {
            json!({
                "value": observation.glstring,
                "display": observation.glstring,
            })
        })
        .collect();

    let mut doc = json!({
        "resourceType": ResourceKind::DiagnosticReport.as_str(),
        "status": "final",
        "code": {
            "coding": {
                "system": LOINC_SYSTEM,
                "code": HLA_CLASS_I_CODE,
                "display": HLA_CLASS_I_DISPLAY,
            },
        },
        "basedOn": { "reference": "", "display": "" },
        "performer": {
            "reference": PERFORMER_REFERENCE,
            "display": PERFORMER_DISPLAY,
        },
        "results": results,
    });

    if let Some(issued) = ctx.issued {
        doc["effectiveDateTime"] = json!(issued.date().to_string());
        doc["issued"] = json!(issued.format(&Rfc3339)?);
    }
    if let Some(subject) = ctx.subject_ref {
        doc["subject"] = json!({ "reference": subject.reference, "display": "" });
    }
    if let Some(specimen_ref) = ctx.specimen_ref {
        doc["specimen"] = json!({ "reference": specimen_ref.reference, "display": "" });
    }

    Ok(doc)
}
