//! Query routing: command name + positional arguments to one RPC call.
//!
//! Every command is parsed into an [`OracleQuery`] before anything touches
//! the network. Argument count is checked first, then validator addresses
//! are decoded and canonicalized. Only a fully valid query reaches
//! [`QueryRouter::dispatch`], which makes exactly one call on the injected
//! [`QueryService`].

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tonic::{Code, Status};

use super::address::ValAddress;
use crate::error::{OraqError, Result};
use crate::proto::oracle::{
    QueryActivesRequest, QueryActivesResponse, QueryAggregatePrevoteRequest,
    QueryAggregatePrevoteResponse, QueryAggregatePrevotesRequest, QueryAggregatePrevotesResponse,
    QueryAggregateVoteRequest, QueryAggregateVoteResponse, QueryAggregateVotesRequest,
    QueryAggregateVotesResponse, QueryExchangeRateRequest, QueryExchangeRateResponse,
    QueryExchangeRatesRequest, QueryExchangeRatesResponse, QueryFeederDelegationRequest,
    QueryFeederDelegationResponse, QueryMissCounterRequest, QueryMissCounterResponse,
    QueryParamsRequest, QueryParamsResponse,
};

// =============================================================================
// Commands
// =============================================================================

/// The query sub-commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    ExchangeRates,
    Actives,
    Params,
    Feeder,
    Miss,
    AggregatePrevotes,
    AggregateVotes,
}

impl QueryKind {
    /// All commands in help order.
    pub const ALL: &'static [Self] = &[
        Self::ExchangeRates,
        Self::Actives,
        Self::Params,
        Self::Feeder,
        Self::Miss,
        Self::AggregatePrevotes,
        Self::AggregateVotes,
    ];

    /// Command name as typed on the command line.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::ExchangeRates => "exchange-rates",
            Self::Actives => "actives",
            Self::Params => "params",
            Self::Feeder => "feeder",
            Self::Miss => "miss",
            Self::AggregatePrevotes => "aggregate-prevotes",
            Self::AggregateVotes => "aggregate-votes",
        }
    }

    /// Look up a command by name.
    #[must_use]
    pub fn from_command(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.command() == name)
    }

    /// How many positional arguments the command takes.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::Actives | Self::Params => Arity::None,
            Self::ExchangeRates | Self::AggregatePrevotes | Self::AggregateVotes => Arity::Optional,
            Self::Feeder | Self::Miss => Arity::Exactly1,
        }
    }

    /// Whether the positional argument is a validator address.
    #[must_use]
    pub const fn takes_validator(self) -> bool {
        matches!(
            self,
            Self::Feeder | Self::Miss | Self::AggregatePrevotes | Self::AggregateVotes
        )
    }

    /// One-line usage, e.g. `exchange-rates [denom]`.
    #[must_use]
    pub fn usage(self) -> String {
        let arg = if self.takes_validator() { "validator" } else { "denom" };
        match self.arity() {
            Arity::None => self.command().to_string(),
            Arity::Optional => format!("{} [{arg}]", self.command()),
            Arity::Exactly1 => format!("{} <{arg}>", self.command()),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Positional argument count accepted by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    None,
    Optional,
    Exactly1,
}

impl Arity {
    /// Whether `count` arguments are acceptable.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::None => count == 0,
            Self::Optional => count <= 1,
            Self::Exactly1 => count == 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("0"),
            Self::Optional => f.write_str("between 0 and 1"),
            Self::Exactly1 => f.write_str("1"),
        }
    }
}

// =============================================================================
// Parsed query
// =============================================================================

/// What a query is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// No argument: list every entry.
    All,
    /// A denom, passed through untouched.
    Denom(String),
    /// A decoded validator operator address.
    Validator(ValAddress),
}

/// A validated command, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleQuery {
    pub kind: QueryKind,
    pub target: QueryTarget,
}

impl OracleQuery {
    /// Validate positional arguments for `kind`.
    ///
    /// Fails with [`OraqError::WrongArgCount`] before looking at the values,
    /// then with [`OraqError::InvalidAddress`] if a validator argument does
    /// not decode under `valoper_prefix`.
    pub fn parse(kind: QueryKind, args: &[String], valoper_prefix: &str) -> Result<Self> {
        let arity = kind.arity();
        if !arity.accepts(args.len()) {
            return Err(OraqError::WrongArgCount {
                command: kind.command().to_string(),
                expected: arity,
                received: args.len(),
            });
        }

        let target = match args.first() {
            None => QueryTarget::All,
            Some(arg) if kind.takes_validator() => {
                let addr = ValAddress::from_bech32(arg, valoper_prefix).map_err(|source| {
                    OraqError::InvalidAddress {
                        input: arg.clone(),
                        source,
                    }
                })?;
                QueryTarget::Validator(addr)
            }
            Some(arg) => QueryTarget::Denom(arg.clone()),
        };

        Ok(Self { kind, target })
    }

    /// Name of the RPC this query maps to.
    #[must_use]
    pub const fn rpc_method(&self) -> &'static str {
        let single = !matches!(self.target, QueryTarget::All);
        match self.kind {
            QueryKind::ExchangeRates if single => "ExchangeRate",
            QueryKind::ExchangeRates => "ExchangeRates",
            QueryKind::Actives => "Actives",
            QueryKind::Params => "Params",
            QueryKind::Feeder => "FeederDelegation",
            QueryKind::Miss => "MissCounter",
            QueryKind::AggregatePrevotes if single => "AggregatePrevote",
            QueryKind::AggregatePrevotes => "AggregatePrevotes",
            QueryKind::AggregateVotes if single => "AggregateVote",
            QueryKind::AggregateVotes => "AggregateVotes",
        }
    }
}

// =============================================================================
// Service boundary
// =============================================================================

/// A failed remote call, as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rpc error: code = {code:?} desc = {message}")]
pub struct ServiceError {
    /// RPC method name, e.g. `ExchangeRate`.
    pub method: String,
    pub code: Code,
    pub message: String,
}

impl ServiceError {
    #[must_use]
    pub fn new(method: impl Into<String>, code: Code, message: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            code,
            message: message.into(),
        }
    }

    /// Wrap a gRPC status returned by `method`.
    #[must_use]
    pub fn from_status(method: impl Into<String>, status: &Status) -> Self {
        Self::new(method, status.code(), status.message())
    }
}

/// The `kujira.oracle.Query` service, one method per RPC.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn exchange_rate(
        &self,
        request: QueryExchangeRateRequest,
    ) -> std::result::Result<QueryExchangeRateResponse, ServiceError>;

    async fn exchange_rates(
        &self,
        request: QueryExchangeRatesRequest,
    ) -> std::result::Result<QueryExchangeRatesResponse, ServiceError>;

    async fn actives(
        &self,
        request: QueryActivesRequest,
    ) -> std::result::Result<QueryActivesResponse, ServiceError>;

    async fn feeder_delegation(
        &self,
        request: QueryFeederDelegationRequest,
    ) -> std::result::Result<QueryFeederDelegationResponse, ServiceError>;

    async fn miss_counter(
        &self,
        request: QueryMissCounterRequest,
    ) -> std::result::Result<QueryMissCounterResponse, ServiceError>;

    async fn aggregate_prevote(
        &self,
        request: QueryAggregatePrevoteRequest,
    ) -> std::result::Result<QueryAggregatePrevoteResponse, ServiceError>;

    async fn aggregate_prevotes(
        &self,
        request: QueryAggregatePrevotesRequest,
    ) -> std::result::Result<QueryAggregatePrevotesResponse, ServiceError>;

    async fn aggregate_vote(
        &self,
        request: QueryAggregateVoteRequest,
    ) -> std::result::Result<QueryAggregateVoteResponse, ServiceError>;

    async fn aggregate_votes(
        &self,
        request: QueryAggregateVotesRequest,
    ) -> std::result::Result<QueryAggregateVotesResponse, ServiceError>;

    async fn params(
        &self,
        request: QueryParamsRequest,
    ) -> std::result::Result<QueryParamsResponse, ServiceError>;
}

/// Response of whichever RPC a query was routed to.
///
/// Serializes as the inner message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    ExchangeRate(QueryExchangeRateResponse),
    ExchangeRates(QueryExchangeRatesResponse),
    Actives(QueryActivesResponse),
    FeederDelegation(QueryFeederDelegationResponse),
    MissCounter(QueryMissCounterResponse),
    AggregatePrevote(QueryAggregatePrevoteResponse),
    AggregatePrevotes(QueryAggregatePrevotesResponse),
    AggregateVote(QueryAggregateVoteResponse),
    AggregateVotes(QueryAggregateVotesResponse),
    Params(QueryParamsResponse),
}

// =============================================================================
// Router
// =============================================================================

/// Routes validated queries to a [`QueryService`].
#[derive(Debug, Clone)]
pub struct QueryRouter<S> {
    service: S,
}

impl<S: QueryService> QueryRouter<S> {
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// The wrapped service.
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Make the single RPC call `query` maps to.
    pub async fn dispatch(
        &self,
        query: &OracleQuery,
    ) -> std::result::Result<QueryResponse, ServiceError> {
        tracing::debug!(
            command = query.kind.command(),
            method = query.rpc_method(),
            target = ?query.target,
            "Dispatching oracle query"
        );

        let service = &self.service;
        let response = match (query.kind, &query.target) {
            (QueryKind::ExchangeRates, QueryTarget::Denom(denom)) => service
                .exchange_rate(QueryExchangeRateRequest {
                    denom: denom.clone(),
                })
                .await
                .map(QueryResponse::ExchangeRate)?,
            (QueryKind::ExchangeRates, _) => service
                .exchange_rates(QueryExchangeRatesRequest {})
                .await
                .map(QueryResponse::ExchangeRates)?,
            (QueryKind::Actives, _) => service
                .actives(QueryActivesRequest {})
                .await
                .map(QueryResponse::Actives)?,
            (QueryKind::Params, _) => service
                .params(QueryParamsRequest {})
                .await
                .map(QueryResponse::Params)?,
            (QueryKind::Feeder, target) => service
                .feeder_delegation(QueryFeederDelegationRequest {
                    validator_addr: validator_addr(target),
                })
                .await
                .map(QueryResponse::FeederDelegation)?,
            (QueryKind::Miss, target) => service
                .miss_counter(QueryMissCounterRequest {
                    validator_addr: validator_addr(target),
                })
                .await
                .map(QueryResponse::MissCounter)?,
            (QueryKind::AggregatePrevotes, QueryTarget::Validator(addr)) => service
                .aggregate_prevote(QueryAggregatePrevoteRequest {
                    validator_addr: addr.to_string(),
                })
                .await
                .map(QueryResponse::AggregatePrevote)?,
            (QueryKind::AggregatePrevotes, _) => service
                .aggregate_prevotes(QueryAggregatePrevotesRequest {})
                .await
                .map(QueryResponse::AggregatePrevotes)?,
            (QueryKind::AggregateVotes, QueryTarget::Validator(addr)) => service
                .aggregate_vote(QueryAggregateVoteRequest {
                    validator_addr: addr.to_string(),
                })
                .await
                .map(QueryResponse::AggregateVote)?,
            (QueryKind::AggregateVotes, _) => service
                .aggregate_votes(QueryAggregateVotesRequest {})
                .await
                .map(QueryResponse::AggregateVotes)?,
        };

        tracing::debug!(method = query.rpc_method(), "Oracle query succeeded");
        Ok(response)
    }

    /// Parse `args` for `kind` and dispatch.
    ///
    /// Validation errors return before the service is called.
    pub async fn run(
        &self,
        kind: QueryKind,
        args: &[String],
        valoper_prefix: &str,
    ) -> Result<QueryResponse> {
        let query = OracleQuery::parse(kind, args, valoper_prefix)?;
        Ok(self.dispatch(&query).await?)
    }
}

/// Canonical address for commands that always carry a validator.
///
/// `OracleQuery::parse` guarantees `Validator` for those commands; an
/// empty string only shows up for hand-built queries.
fn validator_addr(target: &QueryTarget) -> String {
    match target {
        QueryTarget::Validator(addr) => addr.to_string(),
        QueryTarget::Denom(raw) => raw.clone(),
        QueryTarget::All => String::new(),
    }
}
