//! Protobuf types and gRPC client for the `kujira.oracle` query service.
//!
//! The message and client code mirrors what `tonic-build` emits for
//! `kujira/oracle/query.proto`, checked in so the build does not need `protoc`.
//! Field tags and RPC paths follow `proto/kujira/oracle/query.proto` and
//! `proto/kujira/oracle/oracle.proto` in `github.com/Team-Kujira/core`, the
//! module whose `x/oracle` query commands this CLI reproduces. `DecCoin` is
//! `cosmos/base/v1beta1/coin.proto` from the Cosmos SDK. When those files
//! change, regenerate with `tonic-build` (`build_server(false)`) and re-add
//! the `Serialize` derives.
//!
//! Response types additionally derive `Serialize` using the proto-JSON
//! conventions the chain's own CLI prints: snake_case names, `uint64` as
//! strings and `Dec` values with 18 fractional digits.

pub mod dec;
pub mod oracle;

pub use oracle::query_client::QueryClient;

/// Serde helpers shared by the response types.
pub(crate) mod json {
    use serde::Serializer;

    use super::dec;

    /// Serialize a `uint64` the way proto-JSON does: as a decimal string.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn u64_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Serialize a wire-format `Dec` as its human decimal form.
    pub fn dec<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dec::format_dec(value))
    }
}
