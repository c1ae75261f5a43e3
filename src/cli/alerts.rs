//! Alert command handlers

use crate::api::{
    Alert, AlertDetailResource, AlertStatsResource, AlertType, AlertsResource,
    ScreenshotsResource, SheSafeApi,
};
use crate::cli::output::{format_alert_detail, format_alerts_table, format_json, format_stats};
use crate::cli::{
    poll_options, AlertArgs, ClearArgs, CliResult, DeleteArgs, DownloadArgs, JsonArgs, ListArgs,
};
use crate::config::MonitorConfig;
use crate::poll::{PollOptions, PollState, PollingSubscription, Resource};
use crate::view::ViewState;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

/// Settle the first fetch of a subscription.
///
/// The subscription is returned so callers can refetch or let it drop.
async fn settle<R: Resource>(
    resource: R,
    options: PollOptions,
    initial: R::Output,
) -> (PollingSubscription<R::Output>, PollState<R::Output>) {
    let subscription = PollingSubscription::start(Arc::new(resource), options, initial);
    let state = subscription.wait_until(PollState::is_settled).await;
    (subscription, state)
}

fn render_list(view: ViewState<Alert>, args: &ListArgs, empty_message: &str) -> CliResult<String> {
    let filter = args.alert_type.map(AlertType::from);
    let (items, stale) = match view {
        ViewState::Loading => return Err("Backend did not answer".into()),
        ViewState::Error(message) => return Err(message.into()),
        ViewState::Empty => (Vec::new(), None),
        ViewState::Ready { items, stale } => (items, stale),
    };
    let items: Vec<Alert> = items
        .into_iter()
        .filter(|alert| filter.is_none_or(|t| alert.alert_type == t))
        .collect();

    if args.json {
        return Ok(format_json(&items)?);
    }
    if items.is_empty() {
        return Ok(empty_message.to_string());
    }

    let mut output = format_alerts_table(&items);
    if let Some(warning) = stale {
        output.push_str(&format!("\n{} {}", "Showing stale data:".yellow(), warning));
    }
    Ok(output)
}

/// Handle `shesafe alerts`
pub async fn handle_alerts(
    args: &ListArgs,
    api: &SheSafeApi,
    config: &MonitorConfig,
) -> CliResult<String> {
    let (_subscription, state) = settle(
        AlertsResource::new(api.clone()),
        poll_options(config, config.polling.alerts_ms),
        Vec::new(),
    )
    .await;
    render_list(ViewState::from_poll(&state), args, "No alerts")
}

/// Handle `shesafe screenshots`
pub async fn handle_screenshots(
    args: &ListArgs,
    api: &SheSafeApi,
    config: &MonitorConfig,
) -> CliResult<String> {
    let (_subscription, state) = settle(
        ScreenshotsResource::new(api.clone()),
        poll_options(config, config.polling.screenshots_ms),
        Vec::new(),
    )
    .await;
    render_list(ViewState::from_poll(&state), args, "No screenshots")
}

/// Handle `shesafe alert <id>`
pub async fn handle_alert(
    args: &AlertArgs,
    api: &SheSafeApi,
    config: &MonitorConfig,
) -> CliResult<String> {
    let (_subscription, state) = settle(
        AlertDetailResource::new(api.clone(), args.id),
        poll_options(config, config.polling.alert_detail_ms),
        None,
    )
    .await;
    if let Some(error) = state.error {
        return Err(error.message.into());
    }
    let alert = state
        .data
        .ok_or_else(|| format!("Alert {} not found", args.id))?;

    if args.json {
        return Ok(format_json(&alert)?);
    }
    Ok(format_alert_detail(&alert, &api.alert_image_url(alert.id)))
}

/// Handle `shesafe stats`
pub async fn handle_stats(
    args: &JsonArgs,
    api: &SheSafeApi,
    config: &MonitorConfig,
) -> CliResult<String> {
    let (_subscription, state) = settle(
        AlertStatsResource::new(api.clone()),
        poll_options(config, config.polling.alert_stats_ms),
        Default::default(),
    )
    .await;
    if let Some(error) = state.error {
        return Err(error.message.into());
    }

    if args.json {
        return Ok(format_json(&state.data)?);
    }
    Ok(format_stats(&state.data))
}

fn confirm(prompt: String, skip: bool) -> CliResult<bool> {
    if skip {
        return Ok(true);
    }
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Refetch the alert list after a delete and describe what is left.
async fn refresh_remaining(
    alerts: &PollingSubscription<Vec<Alert>>,
    before: PollState<Vec<Alert>>,
) -> String {
    let after = alerts.refetch_and_wait().await.unwrap_or(before);
    match &after.error {
        Some(error) => format!("could not refresh list: {}", error.message),
        None => format!("{} alert(s) remaining", after.data.len()),
    }
}

/// Handle `shesafe delete <id>`
///
/// The alert list is refetched after a successful delete. A failed delete
/// leaves the list untouched and is returned as an error.
pub async fn handle_delete(
    args: &DeleteArgs,
    api: &SheSafeApi,
    config: &MonitorConfig,
) -> CliResult<String> {
    let (alerts, before) = settle(
        AlertsResource::new(api.clone()),
        poll_options(config, 0),
        Vec::new(),
    )
    .await;

    if !confirm(format!("Delete alert #{}?", args.id), args.yes)? {
        return Ok("Cancelled".to_string());
    }

    api.delete_alert(args.id).await?;

    let remaining = refresh_remaining(&alerts, before).await;
    Ok(format!("{} Deleted alert #{} ({})", "✓".green(), args.id, remaining))
}

/// Handle `shesafe clear`
///
/// Like `delete`, the alert list is refetched once the backend confirms.
pub async fn handle_clear(
    args: &ClearArgs,
    api: &SheSafeApi,
    config: &MonitorConfig,
) -> CliResult<String> {
    let (alerts, before) = settle(
        AlertsResource::new(api.clone()),
        poll_options(config, 0),
        Vec::new(),
    )
    .await;

    let prompt = match &before.error {
        Some(_) => "Delete ALL alerts? This action cannot be undone.".to_string(),
        None => format!(
            "Delete ALL {} alerts? This action cannot be undone.",
            before.data.len()
        ),
    };
    if !confirm(prompt, args.yes)? {
        return Ok("Cancelled".to_string());
    }

    let result = api.delete_all_alerts().await?;

    let remaining = refresh_remaining(&alerts, before).await;
    Ok(format!(
        "{} Deleted {} alert(s) ({})",
        "✓".green(),
        result.deleted_count,
        remaining
    ))
}

/// Handle `shesafe download <id>`
pub async fn handle_download(args: &DownloadArgs, api: &SheSafeApi) -> CliResult<String> {
    let (dir, filename) = match &args.output {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            (dir.to_path_buf(), path.file_name().and_then(|n| n.to_str()))
        }
        None => (Path::new(".").to_path_buf(), None),
    };

    let image = api.download_image(args.id, filename, &dir).await?;
    Ok(format!(
        "{} Saved {} ({} bytes)",
        "✓".green(),
        image.path.display(),
        image.bytes.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AlertTypeArg, ConnectionArgs};
    use crate::client::ApiError;
    use crate::poll::PollError;
    use std::path::PathBuf;

    fn list_args(json: bool, alert_type: Option<AlertTypeArg>) -> ListArgs {
        ListArgs {
            json,
            alert_type,
            connection: ConnectionArgs {
                config: PathBuf::from("shesafe.toml"),
                backend_url: None,
            },
        }
    }

    fn alert(id: i64, alert_type: AlertType) -> Alert {
        Alert {
            id,
            alert_type,
            timestamp: None,
            gesture: None,
            male_count: 0,
            female_count: 1,
            latitude: None,
            longitude: None,
            confidence: None,
            frame_path: None,
        }
    }

    #[test]
    fn test_render_list_filters_by_type() {
        let view = ViewState::Ready {
            items: vec![alert(1, AlertType::Distress), alert(2, AlertType::LoneWomanNight)],
            stale: None,
        };
        let args = list_args(true, Some(AlertTypeArg::LoneWomanNight));
        let output = render_list(view, &args, "No alerts").unwrap();
        let parsed: Vec<Alert> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, 2);
    }

    #[test]
    fn test_render_list_empty_and_error() {
        let empty = render_list(ViewState::Empty, &list_args(false, None), "No alerts").unwrap();
        assert_eq!(empty, "No alerts");

        let err = render_list(
            ViewState::Error("Failed to fetch".to_string()),
            &list_args(false, None),
            "No alerts",
        );
        assert_eq!(err.unwrap_err().to_string(), "Failed to fetch");
    }

    #[test]
    fn test_render_list_stale_warning() {
        let mut state = PollState::initial(vec![alert(1, AlertType::Distress)]);
        state.loading = false;
        state.error = Some(PollError::from(&ApiError::Timeout(5000)));
        let output = render_list(ViewState::from_poll(&state), &list_args(false, None), "No alerts")
            .unwrap();
        assert!(output.contains("stale"));
        assert!(output.contains("Distress Signal"));
    }
}
