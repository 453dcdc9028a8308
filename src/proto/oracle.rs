//! `kujira.oracle` messages and the `Query` service client.

use serde::Serialize;

use super::json;

/// Fully qualified gRPC service name.
pub const SERVICE_NAME: &str = "kujira.oracle.Query";

// =============================================================================
// Shared types
// =============================================================================

/// A coin amount with a decimal amount (`cosmos.base.v1beta1.DecCoin`).
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct DecCoin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    #[serde(serialize_with = "json::dec")]
    pub amount: String,
}

/// A denom tracked by the oracle whitelist.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct Denom {
    #[prost(string, tag = "1")]
    pub name: String,
}

/// A denom and the rate a validator voted for it.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct ExchangeRateTuple {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    #[serde(serialize_with = "json::dec")]
    pub exchange_rate: String,
}

/// Hash commitment submitted in the prevote phase.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct AggregateExchangeRatePrevote {
    #[prost(string, tag = "1")]
    pub hash: String,
    #[prost(string, tag = "2")]
    pub voter: String,
    #[prost(uint64, tag = "3")]
    #[serde(serialize_with = "json::u64_string")]
    pub submit_block: u64,
}

/// Rates revealed in the vote phase.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct AggregateExchangeRateVote {
    #[prost(message, repeated, tag = "1")]
    pub exchange_rate_tuples: Vec<ExchangeRateTuple>,
    #[prost(string, tag = "2")]
    pub voter: String,
}

/// Oracle module parameters.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct Params {
    #[prost(uint64, tag = "1")]
    #[serde(serialize_with = "json::u64_string")]
    pub vote_period: u64,
    #[prost(string, tag = "2")]
    #[serde(serialize_with = "json::dec")]
    pub vote_threshold: String,
    #[prost(string, tag = "3")]
    #[serde(serialize_with = "json::dec")]
    pub reward_band: String,
    #[prost(message, repeated, tag = "4")]
    pub whitelist: Vec<Denom>,
    #[prost(string, tag = "5")]
    #[serde(serialize_with = "json::dec")]
    pub slash_fraction: String,
    #[prost(uint64, tag = "6")]
    #[serde(serialize_with = "json::u64_string")]
    pub slash_window: u64,
    #[prost(string, tag = "7")]
    #[serde(serialize_with = "json::dec")]
    pub min_valid_per_window: String,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryExchangeRateRequest {
    #[prost(string, tag = "1")]
    pub denom: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct QueryExchangeRatesRequest {}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct QueryActivesRequest {}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryFeederDelegationRequest {
    #[prost(string, tag = "1")]
    pub validator_addr: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryMissCounterRequest {
    #[prost(string, tag = "1")]
    pub validator_addr: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryAggregatePrevoteRequest {
    #[prost(string, tag = "1")]
    pub validator_addr: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct QueryAggregatePrevotesRequest {}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct QueryAggregateVoteRequest {
    #[prost(string, tag = "1")]
    pub validator_addr: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct QueryAggregateVotesRequest {}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct QueryParamsRequest {}

// =============================================================================
// Responses
// =============================================================================

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryExchangeRateResponse {
    #[prost(string, tag = "1")]
    #[serde(serialize_with = "json::dec")]
    pub exchange_rate: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryExchangeRatesResponse {
    #[prost(message, repeated, tag = "1")]
    pub exchange_rates: Vec<DecCoin>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryActivesResponse {
    #[prost(string, repeated, tag = "1")]
    pub actives: Vec<String>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryFeederDelegationResponse {
    #[prost(string, tag = "1")]
    pub feeder_addr: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryMissCounterResponse {
    #[prost(uint64, tag = "1")]
    #[serde(serialize_with = "json::u64_string")]
    pub miss_counter: u64,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryAggregatePrevoteResponse {
    #[prost(message, optional, tag = "1")]
    pub aggregate_prevote: Option<AggregateExchangeRatePrevote>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryAggregatePrevotesResponse {
    #[prost(message, repeated, tag = "1")]
    pub aggregate_prevotes: Vec<AggregateExchangeRatePrevote>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryAggregateVoteResponse {
    #[prost(message, optional, tag = "1")]
    pub aggregate_vote: Option<AggregateExchangeRateVote>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryAggregateVotesResponse {
    #[prost(message, repeated, tag = "1")]
    pub aggregate_votes: Vec<AggregateExchangeRateVote>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize)]
pub struct QueryParamsResponse {
    #[prost(message, optional, tag = "1")]
    pub params: Option<Params>,
}

// =============================================================================
// Client
// =============================================================================

/// Client for the `kujira.oracle.Query` service.
pub mod query_client {
    use tonic::codec::ProstCodec;
    use tonic::codegen::GrpcMethod;
    use tonic::codegen::http::uri::PathAndQuery;
    use tonic::transport::Channel;
    use tonic::{Request, Response, Status};

    use super::{
        QueryActivesRequest, QueryActivesResponse, QueryAggregatePrevoteRequest,
        QueryAggregatePrevoteResponse, QueryAggregatePrevotesRequest,
        QueryAggregatePrevotesResponse, QueryAggregateVoteRequest, QueryAggregateVoteResponse,
        QueryAggregateVotesRequest, QueryAggregateVotesResponse, QueryExchangeRateRequest,
        QueryExchangeRateResponse, QueryExchangeRatesRequest, QueryExchangeRatesResponse,
        QueryFeederDelegationRequest, QueryFeederDelegationResponse, QueryMissCounterRequest,
        QueryMissCounterResponse, QueryParamsRequest, QueryParamsResponse, SERVICE_NAME,
    };

    #[derive(Debug, Clone)]
    pub struct QueryClient {
        inner: tonic::client::Grpc<Channel>,
    }

    impl QueryClient {
        #[must_use]
        pub fn new(channel: Channel) -> Self {
            Self {
                inner: tonic::client::Grpc::new(channel),
            }
        }

        async fn unary<Req, Resp>(
            &mut self,
            request: Request<Req>,
            path: &'static str,
            method: &'static str,
        ) -> Result<Response<Resp>, Status>
        where
            Req: prost::Message + Send + Sync + 'static,
            Resp: prost::Message + Default + Send + Sync + 'static,
        {
            self.inner
                .ready()
                .await
                .map_err(|e| Status::unavailable(format!("Service was not ready: {e}")))?;
            let codec = ProstCodec::<Req, Resp>::default();
            let path = PathAndQuery::from_static(path);
            let mut request = request;
            request
                .extensions_mut()
                .insert(GrpcMethod::new(SERVICE_NAME, method));
            self.inner.unary(request, path, codec).await
        }

        pub async fn exchange_rate(
            &mut self,
            request: Request<QueryExchangeRateRequest>,
        ) -> Result<Response<QueryExchangeRateResponse>, Status> {
            self.unary(request, "/kujira.oracle.Query/ExchangeRate", "ExchangeRate")
                .await
        }

        pub async fn exchange_rates(
            &mut self,
            request: Request<QueryExchangeRatesRequest>,
        ) -> Result<Response<QueryExchangeRatesResponse>, Status> {
            self.unary(request, "/kujira.oracle.Query/ExchangeRates", "ExchangeRates")
                .await
        }

        pub async fn actives(
            &mut self,
            request: Request<QueryActivesRequest>,
        ) -> Result<Response<QueryActivesResponse>, Status> {
            self.unary(request, "/kujira.oracle.Query/Actives", "Actives")
                .await
        }

        pub async fn feeder_delegation(
            &mut self,
            request: Request<QueryFeederDelegationRequest>,
        ) -> Result<Response<QueryFeederDelegationResponse>, Status> {
            self.unary(
                request,
                "/kujira.oracle.Query/FeederDelegation",
                "FeederDelegation",
            )
            .await
        }

        pub async fn miss_counter(
            &mut self,
            request: Request<QueryMissCounterRequest>,
        ) -> Result<Response<QueryMissCounterResponse>, Status> {
            self.unary(request, "/kujira.oracle.Query/MissCounter", "MissCounter")
                .await
        }

        pub async fn aggregate_prevote(
            &mut self,
            request: Request<QueryAggregatePrevoteRequest>,
        ) -> Result<Response<QueryAggregatePrevoteResponse>, Status> {
            self.unary(
                request,
                "/kujira.oracle.Query/AggregatePrevote",
                "AggregatePrevote",
            )
            .await
        }

        pub async fn aggregate_prevotes(
            &mut self,
            request: Request<QueryAggregatePrevotesRequest>,
        ) -> Result<Response<QueryAggregatePrevotesResponse>, Status> {
            self.unary(
                request,
                "/kujira.oracle.Query/AggregatePrevotes",
                "AggregatePrevotes",
            )
            .await
        }

        pub async fn aggregate_vote(
            &mut self,
            request: Request<QueryAggregateVoteRequest>,
        ) -> Result<Response<QueryAggregateVoteResponse>, Status> {
            self.unary(request, "/kujira.oracle.Query/AggregateVote", "AggregateVote")
                .await
        }

        pub async fn aggregate_votes(
            &mut self,
            request: Request<QueryAggregateVotesRequest>,
        ) -> Result<Response<QueryAggregateVotesResponse>, Status> {
            self.unary(request, "/kujira.oracle.Query/AggregateVotes", "AggregateVotes")
                .await
        }

        pub async fn params(
            &mut self,
            request: Request<QueryParamsRequest>,
        ) -> Result<Response<QueryParamsResponse>, Status> {
            self.unary(request, "/kujira.oracle.Query/Params", "Params")
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn exchange_rate_request_encodes_denom_as_field_one() {
        let request = QueryExchangeRateRequest {
            denom: "KUJI".to_string(),
        };
        // tag 1, wire type 2 (length-delimited), length 4, "KUJI"
        assert_eq!(request.encode_to_vec(), vec![0x0a, 4, b'K', b'U', b'J', b'I']);
    }

    #[test]
    fn empty_requests_encode_to_nothing() {
        assert!(QueryExchangeRatesRequest {}.encode_to_vec().is_empty());
        assert!(QueryParamsRequest {}.encode_to_vec().is_empty());
    }

    #[test]
    fn miss_counter_serializes_as_string() {
        let response = QueryMissCounterResponse { miss_counter: 7 };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json, serde_json::json!({ "miss_counter": "7" }));
    }

    #[test]
    fn exchange_rates_serialize_with_decimal_point() {
        let response = QueryExchangeRatesResponse {
            exchange_rates: vec![DecCoin {
                denom: "KUJI".to_string(),
                amount: "1250000000000000000".to_string(),
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "exchange_rates": [{ "denom": "KUJI", "amount": "1.250000000000000000" }]
            })
        );
    }

    #[test]
    fn missing_prevote_serializes_as_null() {
        let response = QueryAggregatePrevoteResponse::default();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "aggregate_prevote": null }));
    }

    #[test]
    fn decodes_params_response() {
        let params = Params {
            vote_period: 14,
            vote_threshold: "500000000000000000".to_string(),
            reward_band: "20000000000000000".to_string(),
            whitelist: vec![Denom {
                name: "BTC".to_string(),
            }],
            slash_fraction: "1000000000000000".to_string(),
            slash_window: 201_600,
            min_valid_per_window: "50000000000000000".to_string(),
        };
        let bytes = QueryParamsResponse {
            params: Some(params.clone()),
        }
        .encode_to_vec();

        let decoded = QueryParamsResponse::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.params, Some(params));
    }
}
