//! Cameras command implementation

use crate::cli::output::{format_cameras_table, format_json, CameraView};
use crate::cli::{CliResult, JsonArgs};
use crate::config::MonitorConfig;
use serde_json::json;

/// Handle `shesafe cameras`
pub fn handle_cameras(args: &JsonArgs, config: &MonitorConfig) -> CliResult<String> {
    let base_url = config.backend.normalized_base_url();
    let cameras: Vec<CameraView> = config
        .cameras
        .iter()
        .map(|camera| CameraView::new(camera, base_url))
        .collect();

    if args.json {
        return Ok(format_json(&json!({ "cameras": cameras }))?);
    }
    if cameras.is_empty() {
        return Ok("No cameras configured".to_string());
    }

    let active = cameras.iter().filter(|c| c.enabled).count();
    Ok(format!(
        "{}\n{}/{} cameras active",
        format_cameras_table(&cameras),
        active,
        cameras.len()
    ))
}
