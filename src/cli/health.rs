//! Health command implementation

use crate::api::SheSafeApi;
use crate::cli::output::{format_health, format_json};
use crate::cli::{CliResult, JsonArgs};
use serde_json::json;

/// Handle `shesafe health`
///
/// With `--json` the report is always printed; otherwise an unreachable
/// backend is an error so scripts can rely on the exit code.
pub async fn handle_health(args: &JsonArgs, api: &SheSafeApi) -> CliResult<String> {
    let report = api.check_health().await;

    if args.json {
        return Ok(format_json(&json!({
            "base_url": api.client().base_url(),
            "healthy": report.healthy,
            "latency_ms": report.latency_ms,
            "error": report.error,
        }))?);
    }

    let line = format_health(api.client().base_url(), &report);
    if report.healthy {
        Ok(line)
    } else {
        Err(line.into())
    }
}
