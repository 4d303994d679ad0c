use std::fs;
use std::io::Read;

use anyhow::{Context, Result};
use serde_json::Value;

use fhirsub_core::Subject;

/// Reads subjects from a JSON file or stdin. Accepts either an array of
/// subjects or a single subject object.
pub fn read_subjects(file: Option<&str>) -> Result<Vec<Subject>> {
    let content = match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read from stdin")?;
            buf
        }
    };

    let value: Value = serde_json::from_str(&content).context("Input is not valid JSON")?;
    let subjects = match value {
        Value::Array(_) => {
            serde_json::from_value(value).context("Input is not an array of subjects")?
        }
        Value::Object(_) => {
            let subject: Subject =
                serde_json::from_value(value).context("Input is not a subject")?;
            vec![subject]
        }
        _ => anyhow::bail!("Input must be a subject object or an array of subjects"),
    };
    Ok(subjects)
}
