//! Test utilities for oraq.
//!
//! Provides address fixtures, canned oracle responses, a recording
//! [`QueryService`], ANSI helpers and a temporary directory helper.
//!
//! # Usage
//!
//! ```rust,ignore
//! use oraq::core::router::{QueryKind, QueryRouter};
//! use oraq::test_utils::*;
//!
//! let router = QueryRouter::new(RecordingQueryService::new());
//! let response = router.run(QueryKind::Miss, &[TEST_VALOPER.to_string()], "kujiravaloper").await?;
//! assert_eq!(router.service().calls()[0].method, "MissCounter");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, PoisonError};

use async_trait::async_trait;
use regex::Regex;

use crate::core::router::{QueryService, ServiceError};
use crate::proto::oracle::{
    AggregateExchangeRatePrevote, AggregateExchangeRateVote, DecCoin, Denom, ExchangeRateTuple,
    Params, QueryActivesRequest, QueryActivesResponse, QueryAggregatePrevoteRequest,
    QueryAggregatePrevoteResponse, QueryAggregatePrevotesRequest, QueryAggregatePrevotesResponse,
    QueryAggregateVoteRequest, QueryAggregateVoteResponse, QueryAggregateVotesRequest,
    QueryAggregateVotesResponse, QueryExchangeRateRequest, QueryExchangeRateResponse,
    QueryExchangeRatesRequest, QueryExchangeRatesResponse, QueryFeederDelegationRequest,
    QueryFeederDelegationResponse, QueryMissCounterRequest, QueryMissCounterResponse,
    QueryParamsRequest, QueryParamsResponse,
};

/// Serializes tests that mutate the process environment.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

// =============================================================================
// Address Fixtures
// =============================================================================

/// Valid validator operator address (payload bytes `0x01..=0x14`).
pub const TEST_VALOPER: &str = "kujiravaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5fla4he";

/// Account address with the same payload as [`TEST_VALOPER`].
pub const TEST_ACCOUNT: &str = "kujira1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5w2wxtk";

/// Operator address with the same payload under the `cosmosvaloper` prefix.
pub const TEST_COSMOS_VALOPER: &str = "cosmosvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc56kct20";

/// Payload bytes of the test addresses.
#[must_use]
pub fn test_address_bytes() -> Vec<u8> {
    (1..=20).collect()
}

// =============================================================================
// Response Factories
// =============================================================================

/// `Dec` wire string for a whole number of units.
#[must_use]
pub fn dec_units(units: u64) -> String {
    format!("{units}000000000000000000")
}

/// Oracle params resembling mainnet.
#[must_use]
pub fn make_test_params() -> Params {
    Params {
        vote_period: 14,
        vote_threshold: "500000000000000000".to_string(),
        reward_band: "20000000000000000".to_string(),
        whitelist: vec![
            Denom {
                name: "KUJI".to_string(),
            },
            Denom {
                name: "USK".to_string(),
            },
        ],
        slash_fraction: "1000000000000000".to_string(),
        slash_window: 3600,
        min_valid_per_window: "50000000000000000".to_string(),
    }
}

/// An aggregate vote from `voter` with one KUJI rate.
#[must_use]
pub fn make_test_vote(voter: &str) -> AggregateExchangeRateVote {
    AggregateExchangeRateVote {
        exchange_rate_tuples: vec![ExchangeRateTuple {
            denom: "KUJI".to_string(),
            exchange_rate: dec_units(2),
        }],
        voter: voter.to_string(),
    }
}

/// An aggregate prevote from `voter`.
#[must_use]
pub fn make_test_prevote(voter: &str) -> AggregateExchangeRatePrevote {
    AggregateExchangeRatePrevote {
        hash: "19c8a1f4e2b3d5c6a7b8c9d0e1f2a3b4c5d6e7f8".to_string(),
        voter: voter.to_string(),
        submit_block: 1_234_567,
    }
}

// =============================================================================
// Recording Query Service
// =============================================================================

/// One call observed by [`RecordingQueryService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// RPC method name, e.g. `MissCounter`.
    pub method: &'static str,
    /// `denom` request field, for `ExchangeRate`.
    pub denom: Option<String>,
    /// `validator_addr` request field, for validator-scoped RPCs.
    pub validator_addr: Option<String>,
}

impl RecordedCall {
    const fn plain(method: &'static str) -> Self {
        Self {
            method,
            denom: None,
            validator_addr: None,
        }
    }

    fn validator(method: &'static str, validator_addr: &str) -> Self {
        Self {
            validator_addr: Some(validator_addr.to_string()),
            ..Self::plain(method)
        }
    }
}

/// In-memory [`QueryService`] that records every call.
///
/// Answers with canned responses, or with a fixed [`ServiceError`] when
/// built with [`RecordingQueryService::failing`].
#[derive(Debug, Default)]
pub struct RecordingQueryService {
    calls: Mutex<Vec<RecordedCall>>,
    failure: Option<ServiceError>,
}

impl RecordingQueryService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A service whose every call fails with `error`.
    #[must_use]
    pub fn failing(error: ServiceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn record(&self, call: RecordedCall) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueryService for RecordingQueryService {
    async fn exchange_rate(
        &self,
        request: QueryExchangeRateRequest,
    ) -> Result<QueryExchangeRateResponse, ServiceError> {
        self.record(RecordedCall {
            denom: Some(request.denom),
            ..RecordedCall::plain("ExchangeRate")
        })?;
        Ok(QueryExchangeRateResponse {
            exchange_rate: "1500000000000000000".to_string(),
        })
    }

    async fn exchange_rates(
        &self,
        _request: QueryExchangeRatesRequest,
    ) -> Result<QueryExchangeRatesResponse, ServiceError> {
        self.record(RecordedCall::plain("ExchangeRates"))?;
        Ok(QueryExchangeRatesResponse {
            exchange_rates: vec![
                DecCoin {
                    denom: "KUJI".to_string(),
                    amount: "1500000000000000000".to_string(),
                },
                DecCoin {
                    denom: "USK".to_string(),
                    amount: dec_units(1),
                },
            ],
        })
    }

    async fn actives(
        &self,
        _request: QueryActivesRequest,
    ) -> Result<QueryActivesResponse, ServiceError> {
        self.record(RecordedCall::plain("Actives"))?;
        Ok(QueryActivesResponse {
            actives: vec!["KUJI".to_string(), "USK".to_string()],
        })
    }

    async fn feeder_delegation(
        &self,
        request: QueryFeederDelegationRequest,
    ) -> Result<QueryFeederDelegationResponse, ServiceError> {
        self.record(RecordedCall::validator("FeederDelegation", &request.validator_addr))?;
        Ok(QueryFeederDelegationResponse {
            feeder_addr: TEST_ACCOUNT.to_string(),
        })
    }

    async fn miss_counter(
        &self,
        request: QueryMissCounterRequest,
    ) -> Result<QueryMissCounterResponse, ServiceError> {
        self.record(RecordedCall::validator("MissCounter", &request.validator_addr))?;
        Ok(QueryMissCounterResponse { miss_counter: 3 })
    }

    async fn aggregate_prevote(
        &self,
        request: QueryAggregatePrevoteRequest,
    ) -> Result<QueryAggregatePrevoteResponse, ServiceError> {
        self.record(RecordedCall::validator("AggregatePrevote", &request.validator_addr))?;
        Ok(QueryAggregatePrevoteResponse {
            aggregate_prevote: Some(make_test_prevote(&request.validator_addr)),
        })
    }

    async fn aggregate_prevotes(
        &self,
        _request: QueryAggregatePrevotesRequest,
    ) -> Result<QueryAggregatePrevotesResponse, ServiceError> {
        self.record(RecordedCall::plain("AggregatePrevotes"))?;
        Ok(QueryAggregatePrevotesResponse {
            aggregate_prevotes: vec![make_test_prevote(TEST_VALOPER)],
        })
    }

    async fn aggregate_vote(
        &self,
        request: QueryAggregateVoteRequest,
    ) -> Result<QueryAggregateVoteResponse, ServiceError> {
        self.record(RecordedCall::validator("AggregateVote", &request.validator_addr))?;
        Ok(QueryAggregateVoteResponse {
            aggregate_vote: Some(make_test_vote(&request.validator_addr)),
        })
    }

    async fn aggregate_votes(
        &self,
        _request: QueryAggregateVotesRequest,
    ) -> Result<QueryAggregateVotesResponse, ServiceError> {
        self.record(RecordedCall::plain("AggregateVotes"))?;
        Ok(QueryAggregateVotesResponse {
            aggregate_votes: vec![make_test_vote(TEST_VALOPER)],
        })
    }

    async fn params(&self, _request: QueryParamsRequest) -> Result<QueryParamsResponse, ServiceError> {
        self.record(RecordedCall::plain("Params"))?;
        Ok(QueryParamsResponse {
            params: Some(make_test_params()),
        })
    }
}

// =============================================================================
// Temporary Directories
// =============================================================================

/// Temporary directory for test files, removed on drop.
///
/// ```rust,ignore
/// let dir = TestDir::new();
/// let config = dir.create_file("config.toml", "[node]\ntimeout_seconds = 5\n");
/// ```
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Write `content` to `name` and return the file's path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.inner.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ANSI Helpers
// =============================================================================

static ANSI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("ANSI pattern compiles"));

/// Remove ANSI SGR escape sequences from rendered output.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI_REGEX.replace_all(text, "").into_owned()
}

/// Whether `text` carries any ANSI escape sequence.
#[must_use]
pub fn contains_ansi(text: &str) -> bool {
    text.contains("\x1b[")
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert that a string contains a substring.
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}
