//! The offline bundle assembler.
//!
//! Builds one self-contained collection document per subject without any
//! network round-trip: every entry gets a fresh client-generated
//! `urn:uuid:` token as its `fullUrl`, and cross-references between
//! entries are carried as entry-level links against those tokens. The
//! resources themselves are rendered without any reference context, so
//! their content depends only on the input tree. Each entry also carries
//! a request descriptor (method + resource kind), making the document
//! replayable as a batch of submissions.

use serde_json::{Map, Value, json};

use fhirsub_core::{Reference, Subject};
use fhirsub_render::{Node, RenderContext, ResourceKind, render};

use crate::error::Result;

/// Assembly options.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Emit structurally valid placeholder entries for empty rendered
    /// resources instead of dropping them. Entry counts per specimen are
    /// positional for some consumers, so this defaults to true.
    pub include_empty_entries: bool,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            include_empty_entries: true,
        }
    }
}

/// Assembles one subject tree into a self-contained collection bundle.
pub fn assemble(subject: &Subject, options: &BundleOptions) -> Result<Value> {
    let mut entries = Vec::new();

    let subject_ref = Reference::urn();
    let patient = render(
        ResourceKind::Patient,
        &Node::Subject(subject),
        &RenderContext::default(),
    )?;
    push_entry(
        &mut entries,
        patient,
        ResourceKind::Patient,
        &subject_ref,
        None,
        None,
        options,
    );

    for specimen in &subject.specimens {
        let specimen_ref = Reference::urn();
        // Generated tokens never leak into resource content; they live on
        // the entry only, keeping the rendered bytes run-independent.
        let doc = render(
            ResourceKind::Specimen,
            &Node::Specimen(specimen),
            &RenderContext::default(),
        )?;
        push_entry(
            &mut entries,
            doc,
            ResourceKind::Specimen,
            &specimen_ref,
            Some(&subject_ref),
            None,
            options,
        );

        let report_ref = Reference::urn();
        let report = render(
            ResourceKind::DiagnosticReport,
            &Node::Specimen(specimen),
            &RenderContext::default(),
        )?;
        push_entry(
            &mut entries,
            report,
            ResourceKind::DiagnosticReport,
            &report_ref,
            Some(&subject_ref),
            Some(&specimen_ref),
            options,
        );

        for observation in &specimen.observations {
            let observation_ref = Reference::urn();
            let doc = render(
                ResourceKind::Observation,
                &Node::Observation(observation),
                &RenderContext::default(),
            )?;
            // An observation entry's subject-link is its owning specimen.
            push_entry(
                &mut entries,
                doc,
                ResourceKind::Observation,
                &observation_ref,
                Some(&specimen_ref),
                None,
                options,
            );
        }
    }

    Ok(json!({
        "resourceType": ResourceKind::Bundle.as_str(),
        "type": "collection",
        "entry": entries,
    }))
}

/// Assembles every subject into its own bundle document.
pub fn assemble_all(subjects: &[Subject], options: &BundleOptions) -> Result<Vec<Value>> {
    subjects
        .iter()
        .map(|subject| assemble(subject, options))
        .collect()
}

fn push_entry(
    entries: &mut Vec<Value>,
    resource: Value,
    kind: ResourceKind,
    full_url: &Reference,
    subject_link: Option<&Reference>,
    specimen_link: Option<&Reference>,
    options: &BundleOptions,
) {
    if resource_is_empty(&resource) {
        if options.include_empty_entries {
            entries.push(Value::Object(Map::new()));
        }
        return;
    }

    let mut entry = json!({
        "fullUrl": full_url.reference,
        "resource": resource,
        "request": { "method": "POST", "url": kind.as_str() },
    });
    // Links are set wholesale; any prior value would be replaced, never
    // merged.
    if let Some(reference) = subject_link {
        entry["subject"] = json!({ "reference": reference.reference });
    }
    if let Some(reference) = specimen_link {
        entry["specimen"] = json!({ "reference": reference.reference });
    }
    entries.push(entry);
}

fn resource_is_empty(resource: &Value) -> bool {
    match resource {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resource_yields_placeholder_entry() {
        let mut entries = Vec::new();
        push_entry(
            &mut entries,
            Value::Object(Map::new()),
            ResourceKind::Specimen,
            &Reference::urn(),
            None,
            None,
            &BundleOptions::default(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], json!({}));
    }

    #[test]
    fn test_empty_resource_skipped_when_configured() {
        let mut entries = Vec::new();
        push_entry(
            &mut entries,
            Value::Null,
            ResourceKind::Specimen,
            &Reference::urn(),
            None,
            None,
            &BundleOptions {
                include_empty_entries: false,
            },
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn test_entry_carries_request_descriptor_and_links() {
        let mut entries = Vec::new();
        let full_url = Reference::urn();
        let subject_ref = Reference::urn();
        let specimen_ref = Reference::urn();
        push_entry(
            &mut entries,
            json!({"resourceType": "DiagnosticReport"}),
            ResourceKind::DiagnosticReport,
            &full_url,
            Some(&subject_ref),
            Some(&specimen_ref),
            &BundleOptions::default(),
        );
        let entry = &entries[0];
        assert_eq!(entry["fullUrl"], full_url.reference);
        assert_eq!(entry["request"]["method"], "POST");
        assert_eq!(entry["request"]["url"], "DiagnosticReport");
        assert_eq!(entry["subject"]["reference"], subject_ref.reference);
        assert_eq!(entry["specimen"]["reference"], specimen_ref.reference);
    }
}
