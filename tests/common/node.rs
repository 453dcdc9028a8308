//! In-process `kujira.oracle.Query` node.
//!
//! Serves the canned answers of [`RecordingQueryService`] over real gRPC on a
//! loopback port, and records the block-height header of every request.
//! The node runs on its own runtime thread so blocking `assert_cmd` calls
//! can talk to it.
#![allow(dead_code)]

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use oraq::core::grpc::BLOCK_HEIGHT_METADATA;
use oraq::core::router::{QueryService, ServiceError};
use oraq::proto::oracle::SERVICE_NAME;
use oraq::test_utils::{RecordedCall, RecordingQueryService};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{Body, BoxFuture, Service, StdError, http};
use tonic::server::{Grpc, NamedService, UnaryService};
use tonic::transport::Server;
use tonic::{Request, Response, Status};

type Answer<T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send>>;

/// State shared between the test and the serving runtime.
#[derive(Debug)]
struct NodeState {
    service: RecordingQueryService,
    heights: Mutex<Vec<Option<String>>>,
}

/// A running oracle node; stops when dropped.
pub struct OracleNode {
    url: String,
    state: Arc<NodeState>,
    _runtime: Runtime,
}

impl OracleNode {
    /// Node answering every RPC with the canned responses.
    #[must_use]
    pub fn start() -> Self {
        Self::serve(RecordingQueryService::new())
    }

    /// Node failing every RPC with `error`.
    #[must_use]
    pub fn failing(error: ServiceError) -> Self {
        Self::serve(RecordingQueryService::failing(error))
    }

    fn serve(service: RecordingQueryService) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("node runtime starts");
        let listener = runtime
            .block_on(TcpListener::bind("127.0.0.1:0"))
            .expect("loopback port is free");
        let addr = listener.local_addr().expect("listener has an address");

        let state = Arc::new(NodeState {
            service,
            heights: Mutex::new(Vec::new()),
        });
        let router = Server::builder().add_service(OracleService {
            state: Arc::clone(&state),
        });
        runtime.spawn(router.serve_with_incoming(TcpListenerStream::new(listener)));

        Self {
            url: format!("http://{addr}"),
            state,
            _runtime: runtime,
        }
    }

    /// `http://127.0.0.1:<port>`
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.service.calls()
    }

    /// `x-cosmos-block-height` of each received request, in order.
    #[must_use]
    pub fn heights(&self) -> Vec<Option<String>> {
        self.state
            .heights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// =============================================================================
// Service plumbing
// =============================================================================

#[derive(Debug, Clone)]
struct OracleService {
    state: Arc<NodeState>,
}

impl NamedService for OracleService {
    const NAME: &'static str = SERVICE_NAME;
}

/// One unary method: records the height header, then asks the recording
/// service for the answer.
struct Method<Req, Resp> {
    state: Arc<NodeState>,
    answer: fn(Arc<NodeState>, Req) -> Answer<Resp>,
}

impl<Req, Resp> UnaryService<Req> for Method<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    type Response = Resp;
    type Future = BoxFuture<Response<Resp>, Status>;

    fn call(&mut self, request: Request<Req>) -> Self::Future {
        let height = request
            .metadata()
            .get(BLOCK_HEIGHT_METADATA)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.state
            .heights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(height);

        let answer = (self.answer)(Arc::clone(&self.state), request.into_inner());
        Box::pin(async move {
            answer
                .await
                .map(Response::new)
                .map_err(|e| Status::new(e.code, e.message))
        })
    }
}

fn unary<B, Req, Resp>(
    state: &Arc<NodeState>,
    request: http::Request<B>,
    answer: fn(Arc<NodeState>, Req) -> Answer<Resp>,
) -> BoxFuture<http::Response<BoxBody>, Infallible>
where
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
    Req: prost::Message + Default + Send + 'static,
    Resp: prost::Message + Send + 'static,
{
    let method = Method {
        state: Arc::clone(state),
        answer,
    };
    Box::pin(async move {
        let mut grpc = Grpc::new(ProstCodec::<Resp, Req>::default());
        Ok(grpc.unary(method, request).await)
    })
}

impl<B> Service<http::Request<B>> for OracleService
where
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<B>) -> Self::Future {
        use oraq::proto::oracle::*;

        let state = &self.state;
        match request.uri().path() {
            "/kujira.oracle.Query/ExchangeRate" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryExchangeRateRequest| -> Answer<QueryExchangeRateResponse> {
                    Box::pin(async move { node.service.exchange_rate(req).await })
                },
            ),
            "/kujira.oracle.Query/ExchangeRates" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryExchangeRatesRequest| -> Answer<QueryExchangeRatesResponse> {
                    Box::pin(async move { node.service.exchange_rates(req).await })
                },
            ),
            "/kujira.oracle.Query/Actives" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryActivesRequest| -> Answer<QueryActivesResponse> {
                    Box::pin(async move { node.service.actives(req).await })
                },
            ),
            "/kujira.oracle.Query/FeederDelegation" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryFeederDelegationRequest| -> Answer<QueryFeederDelegationResponse> {
                    Box::pin(async move { node.service.feeder_delegation(req).await })
                },
            ),
            "/kujira.oracle.Query/MissCounter" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryMissCounterRequest| -> Answer<QueryMissCounterResponse> {
                    Box::pin(async move { node.service.miss_counter(req).await })
                },
            ),
            "/kujira.oracle.Query/AggregatePrevote" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryAggregatePrevoteRequest| -> Answer<QueryAggregatePrevoteResponse> {
                    Box::pin(async move { node.service.aggregate_prevote(req).await })
                },
            ),
            "/kujira.oracle.Query/AggregatePrevotes" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryAggregatePrevotesRequest| -> Answer<QueryAggregatePrevotesResponse> {
                    Box::pin(async move { node.service.aggregate_prevotes(req).await })
                },
            ),
            "/kujira.oracle.Query/AggregateVote" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryAggregateVoteRequest| -> Answer<QueryAggregateVoteResponse> {
                    Box::pin(async move { node.service.aggregate_vote(req).await })
                },
            ),
            "/kujira.oracle.Query/AggregateVotes" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryAggregateVotesRequest| -> Answer<QueryAggregateVotesResponse> {
                    Box::pin(async move { node.service.aggregate_votes(req).await })
                },
            ),
            "/kujira.oracle.Query/Params" => unary(
                state,
                request,
                |node: Arc<NodeState>, req: QueryParamsRequest| -> Answer<QueryParamsResponse> {
                    Box::pin(async move { node.service.params(req).await })
                },
            ),
            // Anything else answers Unimplemented, as a real node would.
            _ => unary(
                state,
                request,
                |_: Arc<NodeState>, _: QueryParamsRequest| -> Answer<QueryParamsResponse> {
                    Box::pin(async {
                        Err(ServiceError::new(
                            "Unknown",
                            tonic::Code::Unimplemented,
                            "unknown method",
                        ))
                    })
                },
            ),
        }
    }
}
