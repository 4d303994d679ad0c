//! Assembler properties: entry counts, reference wiring, idempotence.

use std::collections::HashSet;

use serde_json::Value;

use fhirsub_client::{BundleOptions, assemble, assemble_all};
use fhirsub_core::{Identifier, Observation, Specimen, Subject, URN_PREFIX};

fn subject(n_specimens: usize, m_observations: usize) -> Subject {
    Subject {
        identifier: Identifier::new("urn:nmdp", "p1"),
        specimens: (0..n_specimens)
            .map(|s| Specimen {
                identifier: Identifier::new("urn:nmdp", format!("s{s}")),
                observations: (0..m_observations)
                    .map(|o| Observation {
                        identifier: Identifier::new("urn:nmdp", format!("s{s}-o{o}")),
                        glstring: format!("A*{s:02}:{o:02}"),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn entries(bundle: &Value) -> &Vec<Value> {
    bundle["entry"].as_array().unwrap()
}

#[test]
fn entry_count_is_one_plus_two_n_plus_nm() {
    for (n, m) in [(0, 0), (1, 0), (2, 3), (3, 1)] {
        let bundle = assemble(&subject(n, m), &BundleOptions::default()).unwrap();
        assert_eq!(bundle["resourceType"], "Bundle");
        assert_eq!(bundle["type"], "collection");
        assert_eq!(entries(&bundle).len(), 1 + 2 * n + n * m, "n={n} m={m}");
    }
}

#[test]
fn every_link_equals_the_parents_generated_token() {
    let bundle = assemble(&subject(2, 2), &BundleOptions::default()).unwrap();
    let entries = entries(&bundle);

    let patient_url = entries[0]["fullUrl"].as_str().unwrap();
    assert!(patient_url.starts_with(URN_PREFIX));
    assert_eq!(entries[0]["resource"]["resourceType"], "Patient");

    // Layout per specimen: specimen entry, report entry, then observations.
    let mut i = 1;
    for _ in 0..2 {
        let specimen_entry = &entries[i];
        let specimen_url = specimen_entry["fullUrl"].as_str().unwrap();
        assert_eq!(specimen_entry["resource"]["resourceType"], "Specimen");
        assert_eq!(specimen_entry["subject"]["reference"], patient_url);

        let report_entry = &entries[i + 1];
        assert_eq!(report_entry["resource"]["resourceType"], "DiagnosticReport");
        assert_eq!(report_entry["subject"]["reference"], patient_url);
        assert_eq!(report_entry["specimen"]["reference"], specimen_url);

        for o in 0..2 {
            let observation_entry = &entries[i + 2 + o];
            assert_eq!(observation_entry["resource"]["resourceType"], "Observation");
            // An observation entry's subject-link is its owning specimen.
            assert_eq!(observation_entry["subject"]["reference"], specimen_url);
        }
        i += 4;
    }
}

#[test]
fn every_entry_is_replayable_as_a_post_request() {
    let bundle = assemble(&subject(1, 2), &BundleOptions::default()).unwrap();
    for entry in entries(&bundle) {
        assert_eq!(entry["request"]["method"], "POST");
        let url = entry["request"]["url"].as_str().unwrap();
        let resource_type = entry["resource"]["resourceType"].as_str().unwrap();
        assert_eq!(url, resource_type);
    }
}

#[test]
fn generated_tokens_are_unique_within_a_bundle() {
    let bundle = assemble(&subject(3, 2), &BundleOptions::default()).unwrap();
    let urls: HashSet<&str> = entries(&bundle)
        .iter()
        .map(|entry| entry["fullUrl"].as_str().unwrap())
        .collect();
    assert_eq!(urls.len(), entries(&bundle).len());
}

#[test]
fn generated_tokens_never_appear_inside_resource_content() {
    let bundle = assemble(&subject(2, 2), &BundleOptions::default()).unwrap();
    for entry in entries(&bundle) {
        let body = serde_json::to_string(&entry["resource"]).unwrap();
        assert!(!body.contains(URN_PREFIX), "token leaked into {body}");
    }
}

#[test]
fn assembly_is_idempotent_up_to_generated_ids() {
    let input = subject(2, 2);
    let options = BundleOptions::default();
    let first = assemble(&input, &options).unwrap();
    let second = assemble(&input, &options).unwrap();

    let first_entries = entries(&first);
    let second_entries = entries(&second);
    assert_eq!(first_entries.len(), second_entries.len());

    for (a, b) in first_entries.iter().zip(second_entries.iter()) {
        // Generated tokens differ between runs...
        assert_ne!(a["fullUrl"], b["fullUrl"]);
        // ...but they live only on the entry: resource content is
        // byte-identical across runs.
        assert_eq!(
            serde_json::to_string(&a["resource"]).unwrap(),
            serde_json::to_string(&b["resource"]).unwrap(),
        );
    }
}

#[test]
fn assemble_all_produces_one_bundle_per_subject() {
    let subjects = vec![subject(1, 1), subject(2, 0)];
    let bundles = assemble_all(&subjects, &BundleOptions::default()).unwrap();
    assert_eq!(bundles.len(), 2);
    assert_eq!(entries(&bundles[0]).len(), 4);
    assert_eq!(entries(&bundles[1]).len(), 5);
}
