//! Core query logic: address codec, routing, and the gRPC service.

pub mod address;
pub mod grpc;
pub mod logging;
pub mod router;

pub use address::{AddressError, DEFAULT_VALOPER_PREFIX, ValAddress, canonicalize_valoper};
pub use grpc::{GrpcQueryService, GrpcSettings};
pub use router::{
    Arity, OracleQuery, QueryKind, QueryResponse, QueryRouter, QueryService, QueryTarget,
    ServiceError,
};
