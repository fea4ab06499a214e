//! # GDS Query Builder
//!
//! Turns the caller's (identifiers, mnemonics, properties) lists into the
//! flat `inputRequests` batch sent in one POST. Call-level date options are
//! merged into a fresh copy of each per-mnemonic property map; the caller's
//! maps are never mutated.

use std::collections::HashMap;

use serde::Serialize;

use super::error::CiqError;

/// Option-name to value mapping attached to one elementary query.
pub type PropertyMap = HashMap<String, String>;

/// The six GDS function kinds exposed by the clientservice API.
///
/// The kinds only differ in their wire tag, whether the service answers with
/// multiple dated rows, and which call-level date options apply, so the whole
/// call surface funnels through one pipeline parameterized by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Point-in-time data point (current or historical).
    Gdsp,
    /// Point-in-time data point with a value variant.
    Gdspv,
    /// Time series over a date range, with a sampling frequency.
    Gdst,
    /// Historical end-of-day values over a date range.
    Gdshe,
    /// Historical snapshot value at a date.
    Gdshv,
    /// Grouped/list lookup for group mnemonics.
    Gdsg,
}

impl QueryKind {
    /// The function tag sent verbatim in each elementary query.
    pub fn function(self) -> &'static str {
        match self {
            QueryKind::Gdsp => "GDSP",
            QueryKind::Gdspv => "GDSPV",
            QueryKind::Gdst => "GDST",
            QueryKind::Gdshe => "GDSHE",
            QueryKind::Gdshv => "GDSHV",
            QueryKind::Gdsg => "GDSG",
        }
    }

    /// Whether the service answers this kind with an ordered list of rows
    /// (time-series shaped) rather than a single value per mnemonic.
    pub fn expects_multiple_rows(self) -> bool {
        matches!(self, QueryKind::Gdst | QueryKind::Gdshe)
    }

    /// Whether call-level STARTDATE/ENDDATE arguments apply to this kind.
    pub fn takes_date_range(self) -> bool {
        matches!(self, QueryKind::Gdst | QueryKind::Gdshe | QueryKind::Gdshv)
    }

    /// Whether the call-level FREQUENCY argument applies to this kind.
    pub fn takes_frequency(self) -> bool {
        matches!(self, QueryKind::Gdst)
    }
}

/// Call-level date-range and frequency arguments for date-ranged kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateArgs<'a> {
    /// Range start, service date format (e.g. `05/23/2017`).
    pub start_date: Option<&'a str>,
    /// Range end.
    pub end_date: Option<&'a str>,
    /// Sampling frequency code (e.g. `D`, `W`, `M`).
    pub frequency: Option<&'a str>,
}

/// One elementary query record of the batched payload. Immutable once built;
/// one per (identifier, mnemonic) pair.
#[derive(Debug, Clone, Serialize)]
pub struct ElementaryQuery {
    /// The GDS function tag.
    pub function: &'static str,
    /// The security/entity identifier.
    pub identifier: String,
    /// The data-field mnemonic.
    pub mnemonic: String,
    /// Per-query options, already merged with call-level date options.
    pub properties: PropertyMap,
}

/// Computes the effective per-mnemonic property maps for one call.
///
/// Each entry is a fresh copy of the caller's map (empty when none were
/// supplied) with the applicable call-level date options merged in.
/// Call-level arguments take precedence over per-entry keys of the same name.
///
/// # Errors
/// `ContractViolation` when `properties` is supplied with a length different
/// from `mnemonic_count`.
pub fn effective_properties(
    kind: QueryKind,
    mnemonic_count: usize,
    properties: Option<&[PropertyMap]>,
    dates: DateArgs<'_>,
) -> Result<Vec<PropertyMap>, CiqError> {
    let mut merged: Vec<PropertyMap> = match properties {
        Some(entries) => {
            if entries.len() != mnemonic_count {
                return Err(CiqError::ContractViolation(format!(
                    "properties list has {} entries for {} mnemonics",
                    entries.len(),
                    mnemonic_count
                )));
            }
            entries.to_vec()
        }
        None => vec![PropertyMap::new(); mnemonic_count],
    };

    for entry in &mut merged {
        if kind.takes_frequency() {
            if let Some(frequency) = dates.frequency {
                entry.insert("FREQUENCY".to_string(), frequency.to_string());
            }
        }
        if kind.takes_date_range() {
            if let Some(start_date) = dates.start_date {
                entry.insert("STARTDATE".to_string(), start_date.to_string());
            }
            if let Some(end_date) = dates.end_date {
                entry.insert("ENDDATE".to_string(), end_date.to_string());
            }
        }
    }

    Ok(merged)
}

/// Builds the flat batch: for every identifier, one elementary query per
/// mnemonic, pairing the mnemonic at position `i` with `properties[i]`.
///
/// Mnemonic legality is not checked here; unknown mnemonics travel verbatim
/// and are rejected (or not) by the remote service.
pub fn build_input_requests(
    kind: QueryKind,
    identifiers: &[&str],
    mnemonics: &[&str],
    properties: &[PropertyMap],
) -> Vec<ElementaryQuery> {
    let mut batch = Vec::with_capacity(identifiers.len() * mnemonics.len());
    for identifier in identifiers {
        for (i, mnemonic) in mnemonics.iter().enumerate() {
            batch.push(ElementaryQuery {
                function: kind.function(),
                identifier: (*identifier).to_string(),
                mnemonic: (*mnemonic).to_string(),
                properties: properties[i].clone(),
            });
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn cross_product_order_and_count() {
        let properties = vec![PropertyMap::new(), PropertyMap::new()];
        let batch = build_input_requests(
            QueryKind::Gdsp,
            &["TRIP", "MSFT"],
            &["IQ_CLOSEPRICE", "IQ_TOTAL_REV"],
            &properties,
        );

        assert_eq!(batch.len(), 4);
        assert_eq!(batch[0].identifier, "TRIP");
        assert_eq!(batch[0].mnemonic, "IQ_CLOSEPRICE");
        assert_eq!(batch[1].identifier, "TRIP");
        assert_eq!(batch[1].mnemonic, "IQ_TOTAL_REV");
        assert_eq!(batch[2].identifier, "MSFT");
        assert!(batch.iter().all(|q| q.function == "GDSP"));
    }

    #[test]
    fn merge_does_not_mutate_caller_maps() {
        let caller = vec![props(&[("PERIODTYPE", "IQ_FQ")])];
        let merged = effective_properties(
            QueryKind::Gdst,
            1,
            Some(&caller),
            DateArgs {
                start_date: Some("12/19/1980"),
                end_date: Some("12/19/2000"),
                frequency: Some("M"),
            },
        )
        .unwrap();

        assert_eq!(merged[0].get("STARTDATE").unwrap(), "12/19/1980");
        assert_eq!(merged[0].get("ENDDATE").unwrap(), "12/19/2000");
        assert_eq!(merged[0].get("FREQUENCY").unwrap(), "M");
        assert_eq!(merged[0].get("PERIODTYPE").unwrap(), "IQ_FQ");
        // The caller's map is untouched by the merge.
        assert_eq!(caller[0].len(), 1);
    }

    #[test]
    fn call_level_dates_override_entry_keys() {
        let caller = vec![props(&[("STARTDATE", "01/01/1999")])];
        let merged = effective_properties(
            QueryKind::Gdshe,
            1,
            Some(&caller),
            DateArgs {
                start_date: Some("05/16/2017"),
                ..DateArgs::default()
            },
        )
        .unwrap();

        assert_eq!(merged[0].get("STARTDATE").unwrap(), "05/16/2017");
    }

    #[test]
    fn date_options_ignored_for_point_in_time_kinds() {
        let merged = effective_properties(
            QueryKind::Gdsp,
            1,
            None,
            DateArgs {
                start_date: Some("05/16/2017"),
                frequency: Some("D"),
                ..DateArgs::default()
            },
        )
        .unwrap();

        assert!(merged[0].is_empty());
    }

    #[test]
    fn short_properties_list_is_a_contract_violation() {
        let caller = vec![PropertyMap::new()];
        let err = effective_properties(QueryKind::Gdsp, 2, Some(&caller), DateArgs::default())
            .unwrap_err();
        assert!(matches!(err, CiqError::ContractViolation(_)));
    }
}
