use crate::criteria::{EXISTS, RawCriteria};
use crate::error::{CheckError, Result};
use serde_json::Value;

/// Parses `key=value;key=value` into a raw criteria map.
///
/// The value is everything after the first `=`, so values may contain `=`
/// but not `;`. `exists` is the only bare token; any other one is most likely
/// the tail of a value that contained `;` and is rejected. Empty segments are
/// skipped. A later duplicate key replaces an earlier one.
pub fn parse_criteria_spec(spec: &str) -> Result<RawCriteria> {
    let mut raw = RawCriteria::new();

    for segment in spec.split(';') {
        if segment.trim().is_empty() {
            continue;
        }

        let (key, value) = match segment.split_once('=') {
            Some((key, value)) => (key.trim(), Value::String(value.to_string())),
            None if segment.trim() == EXISTS => (EXISTS, Value::Bool(true)),
            None => {
                return Err(CheckError::Config(format!(
                    "criteria segment {segment:?} has no value (values cannot contain ';')"
                )));
            }
        };

        if key.is_empty() {
            return Err(CheckError::Config(format!(
                "criteria segment {segment:?} has no key"
            )));
        }

        raw.insert(key.to_string(), value);
    }

    Ok(raw)
}
