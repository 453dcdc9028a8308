//! gRPC-backed [`QueryService`].
//!
//! The channel is created lazily, so building the service never touches the
//! network. The first RPC opens the connection.

use std::time::Duration;

use async_trait::async_trait;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Code, Request, Response, Status};
use tracing::debug;

use super::router::{QueryService, ServiceError};
use crate::proto::QueryClient;
use crate::proto::oracle::{
    QueryActivesRequest, QueryActivesResponse, QueryAggregatePrevoteRequest,
    QueryAggregatePrevoteResponse, QueryAggregatePrevotesRequest, QueryAggregatePrevotesResponse,
    QueryAggregateVoteRequest, QueryAggregateVoteResponse, QueryAggregateVotesRequest,
    QueryAggregateVotesResponse, QueryExchangeRateRequest, QueryExchangeRateResponse,
    QueryExchangeRatesRequest, QueryExchangeRatesResponse, QueryFeederDelegationRequest,
    QueryFeederDelegationResponse, QueryMissCounterRequest, QueryMissCounterResponse,
    QueryParamsRequest, QueryParamsResponse,
};

/// Request metadata key selecting the block height to query at.
pub const BLOCK_HEIGHT_METADATA: &str = "x-cosmos-block-height";

/// Where and how to reach the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpcSettings {
    pub url: String,
    pub timeout: Duration,
    /// Block height to query at; `None` means latest.
    pub height: Option<u64>,
}

/// Query service talking to a node over gRPC.
#[derive(Debug, Clone)]
pub struct GrpcQueryService {
    client: QueryClient,
    height: Option<u64>,
}

impl GrpcQueryService {
    /// Configure a lazily-connected channel to `settings.url`.
    ///
    /// `https` URLs use TLS with the webpki root store. Must be called from
    /// within a tokio runtime.
    pub fn connect_lazy(settings: &GrpcSettings) -> Result<Self, ServiceError> {
        if !(settings.url.starts_with("http://") || settings.url.starts_with("https://")) {
            return Err(ServiceError::new(
                "Connect",
                Code::InvalidArgument,
                format!(
                    "invalid gRPC endpoint {}: expected an http:// or https:// URL",
                    settings.url
                ),
            ));
        }

        let endpoint = Endpoint::from_shared(settings.url.clone())
            .map_err(|e| {
                ServiceError::new(
                    "Connect",
                    Code::InvalidArgument,
                    format!("invalid gRPC endpoint {}: {e}", settings.url),
                )
            })?
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout);

        let endpoint = if settings.url.starts_with("https://") {
            endpoint
                .tls_config(ClientTlsConfig::new().with_webpki_roots())
                .map_err(|e| {
                    ServiceError::new("Connect", Code::Unavailable, format!("TLS setup failed: {e}"))
                })?
        } else {
            endpoint
        };

        debug!(
            url = %settings.url,
            timeout_secs = settings.timeout.as_secs(),
            height = ?settings.height,
            "Configured gRPC channel"
        );

        Ok(Self::from_channel(endpoint.connect_lazy(), settings.height))
    }

    /// Wrap an existing channel.
    #[must_use]
    pub fn from_channel(channel: Channel, height: Option<u64>) -> Self {
        Self {
            client: QueryClient::new(channel),
            height: height.filter(|h| *h > 0),
        }
    }

    /// Build a request carrying the height metadata, if any.
    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        if let Some(height) = self.height {
            request
                .metadata_mut()
                .insert(BLOCK_HEIGHT_METADATA, MetadataValue::from(height));
        }
        request
    }

    fn client(&self) -> QueryClient {
        self.client.clone()
    }
}

/// Convert a failed call into a [`ServiceError`].
///
/// tonic reports its own request timeout as `Cancelled`; that is surfaced
/// as `DeadlineExceeded` so callers see one timeout kind.
fn status_error(method: &str, status: &Status) -> ServiceError {
    debug!(method, code = ?status.code(), message = status.message(), "RPC failed");
    if status.code() == Code::Cancelled && status.message().contains("Timeout expired") {
        return ServiceError::new(method, Code::DeadlineExceeded, status.message());
    }
    ServiceError::from_status(method, status)
}

fn finish<T>(method: &str, result: Result<Response<T>, Status>) -> Result<T, ServiceError> {
    result
        .map(Response::into_inner)
        .map_err(|status| status_error(method, &status))
}

#[async_trait]
impl QueryService for GrpcQueryService {
    async fn exchange_rate(
        &self,
        request: QueryExchangeRateRequest,
    ) -> Result<QueryExchangeRateResponse, ServiceError> {
        let result = self.client().exchange_rate(self.request(request)).await;
        finish("ExchangeRate", result)
    }

    async fn exchange_rates(
        &self,
        request: QueryExchangeRatesRequest,
    ) -> Result<QueryExchangeRatesResponse, ServiceError> {
        let result = self.client().exchange_rates(self.request(request)).await;
        finish("ExchangeRates", result)
    }

    async fn actives(
        &self,
        request: QueryActivesRequest,
    ) -> Result<QueryActivesResponse, ServiceError> {
        let result = self.client().actives(self.request(request)).await;
        finish("Actives", result)
    }

    async fn feeder_delegation(
        &self,
        request: QueryFeederDelegationRequest,
    ) -> Result<QueryFeederDelegationResponse, ServiceError> {
        let result = self.client().feeder_delegation(self.request(request)).await;
        finish("FeederDelegation", result)
    }

    async fn miss_counter(
        &self,
        request: QueryMissCounterRequest,
    ) -> Result<QueryMissCounterResponse, ServiceError> {
        let result = self.client().miss_counter(self.request(request)).await;
        finish("MissCounter", result)
    }

    async fn aggregate_prevote(
        &self,
        request: QueryAggregatePrevoteRequest,
    ) -> Result<QueryAggregatePrevoteResponse, ServiceError> {
        let result = self.client().aggregate_prevote(self.request(request)).await;
        finish("AggregatePrevote", result)
    }

    async fn aggregate_prevotes(
        &self,
        request: QueryAggregatePrevotesRequest,
    ) -> Result<QueryAggregatePrevotesResponse, ServiceError> {
        let result = self.client().aggregate_prevotes(self.request(request)).await;
        finish("AggregatePrevotes", result)
    }

    async fn aggregate_vote(
        &self,
        request: QueryAggregateVoteRequest,
    ) -> Result<QueryAggregateVoteResponse, ServiceError> {
        let result = self.client().aggregate_vote(self.request(request)).await;
        finish("AggregateVote", result)
    }

    async fn aggregate_votes(
        &self,
        request: QueryAggregateVotesRequest,
    ) -> Result<QueryAggregateVotesResponse, ServiceError> {
        let result = self.client().aggregate_votes(self.request(request)).await;
        finish("AggregateVotes", result)
    }

    async fn params(&self, request: QueryParamsRequest) -> Result<QueryParamsResponse, ServiceError> {
        let result = self.client().params(self.request(request)).await;
        finish("Params", result)
    }
}
