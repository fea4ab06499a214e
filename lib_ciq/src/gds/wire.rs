//! # GDS Wire Formats
//!
//! Serde models for the clientservice JSON. The request is a raw-JSON POST of
//! `{"inputRequests": [...]}`; the response is a `GDSSDKResponse` array whose
//! records carry more padding fields than we consume (NumRows, Frequency,
//! CacheExpiryTime, ...); unknown fields are ignored and the fields we do
//! read all tolerate being absent, because the service-level error shape is a
//! single record carrying nothing but `ErrMsg`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::query::ElementaryQuery;

/// The batched request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct GdsRequest {
    /// The flat elementary-query batch.
    #[serde(rename = "inputRequests")]
    pub input_requests: Vec<ElementaryQuery>,
}

/// The response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GdsResponse {
    /// One record per elementary query, in service order, or a single
    /// error-only record on a service-wide failure.
    #[serde(rename = "GDSSDKResponse")]
    pub records: Vec<GdsRecord>,
}

/// One elementary result record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GdsRecord {
    /// The identifier echoed back by the service (absent in the
    /// service-level error shape).
    #[serde(rename = "Identifier")]
    pub identifier: Option<String>,

    /// The mnemonic echoed back by the service.
    #[serde(rename = "Mnemonic")]
    pub mnemonic: Option<String>,

    /// Per-record error message; `null` or empty means no error.
    #[serde(rename = "ErrMsg")]
    pub err_msg: Option<String>,

    /// Ordered column headers.
    #[serde(rename = "Headers")]
    pub headers: Vec<String>,

    /// Ordered result rows.
    #[serde(rename = "Rows")]
    pub rows: Vec<GdsRow>,

    /// The properties the service applied, possibly partial and with `+`
    /// standing in for spaces in values.
    #[serde(rename = "Properties")]
    pub properties: HashMap<String, String>,
}

/// One result row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GdsRow {
    /// Ordered cell values for this row.
    #[serde(rename = "Row", default)]
    pub row: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_padded_data_record() {
        let raw = r#"{"GDSSDKResponse": [{
            "Headers": ["IQ_CLOSEPRICE"],
            "Rows": [{"Row": ["46.80"]}],
            "NumCols": 1,
            "Seniority": "",
            "Mnemonic": "IQ_CLOSEPRICE",
            "Function": "GDSP",
            "ErrMsg": null,
            "Properties": {},
            "StartDate": "",
            "NumRows": 1,
            "CacheExpiryTime": "0",
            "SnapType": "",
            "Frequency": "",
            "Identifier": "TRIP:",
            "Limit": ""
        }]}"#;

        let parsed: GdsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.records.len(), 1);
        let record = &parsed.records[0];
        assert_eq!(record.identifier.as_deref(), Some("TRIP:"));
        assert_eq!(record.mnemonic.as_deref(), Some("IQ_CLOSEPRICE"));
        assert!(record.err_msg.is_none());
        assert_eq!(record.headers, vec!["IQ_CLOSEPRICE"]);
        assert_eq!(record.rows[0].row, vec!["46.80"]);
    }

    #[test]
    fn decodes_the_error_only_shape() {
        let raw = r#"{"GDSSDKResponse": [{"ErrMsg": "Daily Request Limit of 10000 Exceeded"}]}"#;
        let parsed: GdsResponse = serde_json::from_str(raw).unwrap();
        let record = &parsed.records[0];
        assert!(record.identifier.is_none());
        assert!(record.mnemonic.is_none());
        assert_eq!(
            record.err_msg.as_deref(),
            Some("Daily Request Limit of 10000 Exceeded")
        );
    }

    #[test]
    fn request_envelope_serializes_with_wire_names() {
        let request = GdsRequest {
            input_requests: vec![ElementaryQuery {
                function: "GDSP",
                identifier: "TRIP".to_string(),
                mnemonic: "IQ_CLOSEPRICE".to_string(),
                properties: HashMap::new(),
            }],
        };
        let body = serde_json::to_string(&request).unwrap();
        assert!(body.contains("\"inputRequests\""));
        assert!(body.contains("\"function\":\"GDSP\""));
        assert!(body.contains("\"identifier\":\"TRIP\""));
    }
}
