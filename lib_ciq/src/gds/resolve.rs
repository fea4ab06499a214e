//! # GDS Response Resolver
//!
//! Maps the flat `GDSSDKResponse` records back to the caller's return keys.
//!
//! The only subtle case is a mnemonic requested more than once in a single
//! batch with different property sets (the same data field over two date
//! ranges, say). The service echoes each record's applied properties, so the
//! resolver keeps, per mnemonic, the ordered list of (return key, properties)
//! candidates registered by the caller and picks the first candidate whose
//! stored properties cover every returned property pair. Property names
//! compare case-insensitively and returned values carry `+` in place of
//! spaces, so values compare after that substitution.

use std::collections::HashMap;

use serde::Serialize;
use tracing::error;

use super::error::CiqError;
use super::query::PropertyMap;
use super::wire::GdsRecord;

/// One resolved value slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CiqValue {
    /// Marker for a per-record service error; serializes as JSON `null`.
    Null,
    /// Single value of a point-in-time shaped query.
    Scalar(String),
    /// Ordered rows of a time-series shaped query.
    Rows(Vec<Vec<String>>),
}

/// Nested result: identifier -> (return key -> value).
pub type ResultMap = HashMap<String, HashMap<String, CiqValue>>;

/// One (return key, properties) registration for a mnemonic.
#[derive(Debug, Clone)]
struct KeyCandidate {
    key: String,
    properties: PropertyMap,
}

/// Per-call index from mnemonic to its return-key candidates, in the order
/// the caller registered them.
#[derive(Debug, Clone)]
pub struct MnemonicKeyIndex {
    entries: HashMap<String, Vec<KeyCandidate>>,
}

impl MnemonicKeyIndex {
    /// Builds the index from the parallel mnemonic/return-key/property lists.
    /// `properties` must already be the merged per-entry maps, so that stored
    /// candidates carry the same STARTDATE/ENDDATE/FREQUENCY values the
    /// service will echo back.
    ///
    /// # Panics
    /// Panics when `return_keys` or `properties` is shorter than `mnemonics`.
    /// The client validates the list lengths (a caller contract violation)
    /// before building the index; validate the same way when calling this
    /// directly.
    pub fn build(
        mnemonics: &[&str],
        return_keys: &[&str],
        properties: &[PropertyMap],
    ) -> MnemonicKeyIndex {
        let mut entries: HashMap<String, Vec<KeyCandidate>> = HashMap::new();
        for (i, mnemonic) in mnemonics.iter().enumerate() {
            entries
                .entry((*mnemonic).to_string())
                .or_default()
                .push(KeyCandidate {
                    key: return_keys[i].to_string(),
                    properties: properties[i].clone(),
                });
        }
        MnemonicKeyIndex { entries }
    }

    /// Resolves one record's mnemonic to a return key.
    ///
    /// A mnemonic with a single candidate resolves unconditionally, without
    /// consulting the returned properties. With multiple candidates, the
    /// first registration whose stored properties superset-match
    /// `returned_properties` wins.
    ///
    /// # Errors
    /// `UnresolvedMnemonic` when the mnemonic is unknown or no candidate
    /// matches.
    pub fn resolve(
        &self,
        mnemonic: &str,
        returned_properties: &HashMap<String, String>,
    ) -> Result<&str, CiqError> {
        let candidates = self
            .entries
            .get(mnemonic)
            .ok_or_else(|| CiqError::UnresolvedMnemonic {
                mnemonic: mnemonic.to_string(),
            })?;

        if candidates.len() == 1 {
            return Ok(&candidates[0].key);
        }

        candidates
            .iter()
            .find(|candidate| superset_matches(&candidate.properties, returned_properties))
            .map(|candidate| candidate.key.as_str())
            .ok_or_else(|| CiqError::UnresolvedMnemonic {
                mnemonic: mnemonic.to_string(),
            })
    }
}

/// Whether `stored` covers every (name, value) pair of `returned`: same name
/// under case-insensitive comparison, same value after replacing spaces with
/// `+` in the returned value.
fn superset_matches(stored: &PropertyMap, returned: &HashMap<String, String>) -> bool {
    returned.iter().all(|(name, value)| {
        let normalized = value.replace(' ', "+");
        stored
            .iter()
            .any(|(stored_name, stored_value)| {
                stored_name.eq_ignore_ascii_case(name) && *stored_value == normalized
            })
    })
}

/// Reshapes the flat response records into the nested `ResultMap`.
///
/// Per-record service errors become a `CiqValue::Null` slot plus one logged
/// error event and never abort the call; a single record carrying nothing but
/// `ErrMsg` is a service-wide failure and aborts before any partial result.
///
/// # Errors
/// `Service` on the service-wide error shape, `UnresolvedMnemonic` on an
/// unresolvable record, `MalformedResponse` on records that break the
/// envelope contract.
pub fn resolve_records(
    records: &[GdsRecord],
    index: &MnemonicKeyIndex,
    multiple_results_expected: bool,
) -> Result<ResultMap, CiqError> {
    // Service-wide failures (e.g. the daily request limit) come back as a
    // lone record with only an error message.
    if records.len() == 1 && records[0].identifier.is_none() && records[0].mnemonic.is_none() {
        let message = records[0]
            .err_msg
            .clone()
            .unwrap_or_else(|| "service returned an empty error record".to_string());
        return Err(CiqError::Service(message));
    }

    let mut resolved: ResultMap = HashMap::new();

    for record in records {
        let identifier = record.identifier.as_deref().ok_or_else(|| {
            CiqError::MalformedResponse("data record without an Identifier".to_string())
        })?;
        let mnemonic = record.mnemonic.as_deref().ok_or_else(|| {
            CiqError::MalformedResponse(format!("record for '{identifier}' without a Mnemonic"))
        })?;

        let return_key = index.resolve(mnemonic, &record.properties)?.to_string();
        let slots = resolved.entry(identifier.to_string()).or_default();

        // An empty-but-present ErrMsg counts as "no error".
        if let Some(message) = record.err_msg.as_deref().filter(|m| !m.is_empty()) {
            error!(identifier, mnemonic, message, "Cap IQ error for query");
            slots.insert(return_key, CiqValue::Null);
            continue;
        }

        if multiple_results_expected {
            // One list per record; a record without headers carries no data
            // and leaves the slot unset.
            if !record.headers.is_empty() {
                let rows = record.rows.iter().map(|r| r.row.clone()).collect();
                slots.insert(return_key, CiqValue::Rows(rows));
            }
        } else {
            for (header_index, _header) in record.headers.iter().enumerate() {
                let cell = record
                    .rows
                    .get(header_index)
                    .and_then(|r| r.row.first())
                    .ok_or_else(|| {
                        CiqError::MalformedResponse(format!(
                            "record for '{identifier}'/'{mnemonic}' has fewer rows than headers"
                        ))
                    })?;
                slots.insert(return_key.clone(), CiqValue::Scalar(cell.clone()));
            }
        }
    }

    Ok(resolved)
}
