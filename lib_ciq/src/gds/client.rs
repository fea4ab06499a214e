//! # Capital IQ Client
//!
//! The public call surface: one method per GDS function kind, all funneling
//! through the same build-POST-resolve pipeline. The client owns the
//! transport, an optional response cache, and an optional daily request
//! counter.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::counters::request_count::RequestCounter;
use crate::retrieve::gds_http::GdsHttp;

use super::cache::ResponseCache;
use super::error::CiqError;
use super::query::{build_input_requests, effective_properties, DateArgs, PropertyMap, QueryKind};
use super::resolve::{resolve_records, MnemonicKeyIndex, ResultMap};
use super::wire::{GdsRequest, GdsResponse};

/// The production clientservice endpoint (GDS API v3).
pub const ENDPOINT: &str =
    "https://api-ciq.marketintelligence.spglobal.com/gdsapi/rest/v3/clientservice.json";

/// Construction options for `CiqClient`.
#[derive(Debug, Clone)]
pub struct CiqClientOptions {
    /// The clientservice endpoint URL. Overridable for tests and staging.
    pub endpoint: String,
    /// TLS certificate verification. Set to `false` to avoid SSL blocking in
    /// secured networks.
    pub verify: bool,
    /// When `true`, raw response bodies are logged at debug level.
    pub debug: bool,
}

impl Default for CiqClientOptions {
    fn default() -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            verify: true,
            debug: false,
        }
    }
}

/// A client for the GDS clientservice API.
///
/// Each public method issues one batched POST and returns a nested mapping of
/// identifier to (return key -> value). Per-record service errors land as
/// `CiqValue::Null` in the mapping and are logged; service-wide errors and
/// contract violations abort the call.
pub struct CiqClient {
    http: GdsHttp,
    cache: Option<Arc<dyn ResponseCache>>,
    counter: Option<Mutex<RequestCounter>>,
    debug: bool,
}

impl CiqClient {
    /// Creates a client for the production endpoint with default options.
    ///
    /// # Errors
    /// `Http` when the underlying client cannot be constructed.
    pub fn new(username: &str, password: &str) -> Result<Self, CiqError> {
        Self::with_options(username, password, CiqClientOptions::default())
    }

    /// Creates a client with explicit options.
    ///
    /// # Errors
    /// `Endpoint` on an invalid endpoint URL, `Http` on client construction
    /// failure.
    pub fn with_options(
        username: &str,
        password: &str,
        options: CiqClientOptions,
    ) -> Result<Self, CiqError> {
        let http = GdsHttp::new(&options.endpoint, username, password, options.verify)?;
        Ok(Self {
            http,
            cache: None,
            counter: None,
            debug: options.debug,
        })
    }

    /// Attaches a response cache consulted before each POST and filled after
    /// each round trip. Cache hits skip the network and the request counter.
    pub fn with_response_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Enables the day-scoped request counter persisted at `path`.
    ///
    /// # Errors
    /// `Counter` when the counter file cannot be read or created.
    pub fn with_request_counter(mut self, path: impl Into<PathBuf>) -> Result<Self, CiqError> {
        self.counter = Some(Mutex::new(RequestCounter::load(path)?));
        Ok(self)
    }

    /// The number of elementary queries issued today, when counting is on.
    pub fn request_count(&self) -> Option<u64> {
        self.counter
            .as_ref()
            .map(|c| c.lock().unwrap_or_else(|e| e.into_inner()).count())
    }

    /// Point-in-time lookup: one value per identifier and mnemonic, current
    /// or historical depending on the per-mnemonic properties.
    ///
    /// `return_keys` must parallel `mnemonics`; `properties`, when supplied,
    /// must as well.
    pub async fn gdsp(
        &self,
        identifiers: &[&str],
        mnemonics: &[&str],
        return_keys: &[&str],
        properties: Option<&[PropertyMap]>,
    ) -> Result<ResultMap, CiqError> {
        self.make_request(
            QueryKind::Gdsp,
            identifiers,
            mnemonics,
            return_keys,
            properties,
            DateArgs::default(),
        )
        .await
    }

    /// Point-in-time lookup with a value variant.
    pub async fn gdspv(
        &self,
        identifiers: &[&str],
        mnemonics: &[&str],
        return_keys: &[&str],
        properties: Option<&[PropertyMap]>,
    ) -> Result<ResultMap, CiqError> {
        self.make_request(
            QueryKind::Gdspv,
            identifiers,
            mnemonics,
            return_keys,
            properties,
            DateArgs::default(),
        )
        .await
    }

    /// Time-series lookup over a date range. Either per-mnemonic properties
    /// or a call-level `start_date` must be supplied; call-level
    /// `start_date`/`end_date`/`frequency` take precedence over per-entry
    /// keys of the same name.
    #[allow(clippy::too_many_arguments)]
    pub async fn gdst(
        &self,
        identifiers: &[&str],
        mnemonics: &[&str],
        return_keys: &[&str],
        start_date: Option<&str>,
        end_date: Option<&str>,
        frequency: Option<&str>,
        properties: Option<&[PropertyMap]>,
    ) -> Result<ResultMap, CiqError> {
        if properties.is_none() && start_date.is_none() {
            return Err(CiqError::ContractViolation(
                "GDST requires per-mnemonic properties or a start date".to_string(),
            ));
        }
        self.make_request(
            QueryKind::Gdst,
            identifiers,
            mnemonics,
            return_keys,
            properties,
            DateArgs {
                start_date,
                end_date,
                frequency,
            },
        )
        .await
    }

    /// Historical end-of-day lookup over a date range; time-series shaped.
    pub async fn gdshe(
        &self,
        identifiers: &[&str],
        mnemonics: &[&str],
        return_keys: &[&str],
        start_date: Option<&str>,
        end_date: Option<&str>,
        properties: Option<&[PropertyMap]>,
    ) -> Result<ResultMap, CiqError> {
        self.make_request(
            QueryKind::Gdshe,
            identifiers,
            mnemonics,
            return_keys,
            properties,
            DateArgs {
                start_date,
                end_date,
                frequency: None,
            },
        )
        .await
    }

    /// Historical snapshot value at a date; point-in-time shaped.
    pub async fn gdshv(
        &self,
        identifiers: &[&str],
        mnemonics: &[&str],
        return_keys: &[&str],
        start_date: Option<&str>,
        end_date: Option<&str>,
        properties: Option<&[PropertyMap]>,
    ) -> Result<ResultMap, CiqError> {
        self.make_request(
            QueryKind::Gdshv,
            identifiers,
            mnemonics,
            return_keys,
            properties,
            DateArgs {
                start_date,
                end_date,
                frequency: None,
            },
        )
        .await
    }

    /// Grouped/list lookup for group mnemonics.
    pub async fn gdsg(
        &self,
        identifiers: &[&str],
        group_mnemonics: &[&str],
        return_keys: &[&str],
        properties: Option<&[PropertyMap]>,
    ) -> Result<ResultMap, CiqError> {
        self.make_request(
            QueryKind::Gdsg,
            identifiers,
            group_mnemonics,
            return_keys,
            properties,
            DateArgs::default(),
        )
        .await
    }

    /// The shared pipeline: contract checks, property merge, index build,
    /// batch build, POST (or cache hit), service-level check, resolve.
    async fn make_request(
        &self,
        kind: QueryKind,
        identifiers: &[&str],
        mnemonics: &[&str],
        return_keys: &[&str],
        properties: Option<&[PropertyMap]>,
        dates: DateArgs<'_>,
    ) -> Result<ResultMap, CiqError> {
        if mnemonics.len() != return_keys.len() {
            return Err(CiqError::ContractViolation(format!(
                "{} return keys for {} mnemonics",
                return_keys.len(),
                mnemonics.len()
            )));
        }

        let merged = effective_properties(kind, mnemonics.len(), properties, dates)?;
        let index = MnemonicKeyIndex::build(mnemonics, return_keys, &merged);
        let batch = build_input_requests(kind, identifiers, mnemonics, &merged);
        let batch_size = batch.len() as u64;
        let body = serde_json::to_string(&GdsRequest {
            input_requests: batch,
        })?;

        let cached = self.cache.as_ref().and_then(|c| c.get(&body));
        let from_cache = cached.is_some();
        let raw = match cached {
            Some(hit) => hit,
            None => {
                let raw = self.http.post_json(body.clone()).await?;
                if let Some(cache) = &self.cache {
                    cache.put(&body, &raw);
                }
                raw
            }
        };

        if self.debug {
            debug!(from_cache, response = %raw, "Cap IQ response");
        }

        if !from_cache {
            if let Some(counter) = &self.counter {
                counter
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .add(batch_size)?;
            }
        }

        let parsed: GdsResponse = serde_json::from_str(&raw)?;
        resolve_records(&parsed.records, &index, kind.expects_multiple_rows())
    }
}
