//! Oracle query commands.

use crate::core::grpc::{GrpcQueryService, GrpcSettings};
use crate::core::router::{OracleQuery, QueryKind, QueryRouter};
use crate::error::Result;
use crate::render;
use crate::storage::config::ResolvedConfig;

/// Run one query command and print the response to stdout.
///
/// Arguments are validated before the client is built, so a bad argument
/// never causes a connection attempt. Nothing is printed unless the call
/// succeeds.
pub async fn execute(kind: QueryKind, args: &[String], config: &ResolvedConfig) -> Result<()> {
    let query = OracleQuery::parse(kind, args, &config.valoper_prefix)?;

    let settings = GrpcSettings {
        url: config.node_url.clone(),
        timeout: config.timeout,
        height: config.height,
    };
    let router = QueryRouter::new(GrpcQueryService::connect_lazy(&settings)?);
    let response = router.dispatch(&query).await?;

    let output = render::render_response(
        &response,
        kind,
        config.format,
        config.pretty,
        config.no_color,
    )?;
    println!("{output}");
    Ok(())
}
