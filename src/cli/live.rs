//! Live views: headcount, gesture detection and the watch dashboard.

use crate::api::{
    Alert, AlertsResource, GenderCount, GenderCountResource, GestureStatus,
    GestureStatusResource, HealthReport, HealthResource, SheSafeApi,
};
use crate::cli::output::{format_gesture_history, format_json, format_person_count};
use crate::cli::{poll_options, CliResult, FollowArgs, JsonArgs};
use crate::config::MonitorConfig;
use crate::poll::{PollPhase, PollState, PollingSubscription};
use crate::view::{alert_title, format_ist, gesture_label, GestureHistory, PersonCount};
use colored::Colorize;
use std::sync::Arc;
use tokio::sync::watch;

/// Handle `shesafe count`
pub async fn handle_count(args: &JsonArgs, api: &SheSafeApi) -> CliResult<String> {
    let count = PersonCount::from(api.fetch_gender_count().await?);
    if args.json {
        return Ok(format_json(&count)?);
    }
    Ok(format_person_count(&count))
}

/// Wait for the next settled state, or `None` on Ctrl-C or shutdown.
async fn next_settled<T: Clone>(rx: &mut watch::Receiver<PollState<T>>) -> Option<PollState<T>> {
    loop {
        tokio::select! {
            changed = rx.changed() => changed.ok()?,
            _ = tokio::signal::ctrl_c() => return None,
        }
        let state = rx.borrow_and_update().clone();
        if state.phase == PollPhase::Settled {
            return Some(state);
        }
    }
}

/// Render the gesture panel for one poll result.
pub fn render_gesture_frame(state: &PollState<GestureStatus>, history: &GestureHistory) -> String {
    let status = &state.data;
    let headline = match (&state.error, status.detected, status.gesture) {
        (Some(error), _, _) => format!("{} {}", "Detector unavailable:".red(), error.message),
        (None, true, Some(gesture)) => format!(
            "{} {} ({:.0}%, {} hand(s))",
            "Detected".green().bold(),
            gesture_label(gesture),
            status.confidence * 100.0,
            status.hands_count
        ),
        _ => "No gesture".dimmed().to_string(),
    };
    format!(
        "{}\nRecent detections:\n{}",
        headline,
        format_gesture_history(history.iter())
    )
}

/// Handle `shesafe gestures`
///
/// Polls the live detector and keeps the latest detections, newest first.
pub async fn handle_gestures(
    args: &FollowArgs,
    api: &SheSafeApi,
    config: &MonitorConfig,
) -> CliResult<()> {
    let subscription = PollingSubscription::start(
        Arc::new(GestureStatusResource::new(api.clone())),
        poll_options(config, config.polling.gesture_ms),
        GestureStatus::default(),
    );
    let mut rx = subscription.watch();
    let mut history = GestureHistory::new();
    let mut ticks = 0u32;

    while let Some(state) = next_settled(&mut rx).await {
        if state.error.is_none() {
            if let Some(seen_at) = state.last_updated {
                history.record(&state.data, seen_at);
            }
        }
        println!("{}\n", render_gesture_frame(&state, &history));

        ticks += 1;
        if args.ticks.is_some_and(|limit| ticks >= limit) {
            break;
        }
    }
    Ok(())
}

/// Latest state of each panel on the watch dashboard.
pub struct WatchFrame<'a> {
    pub count: &'a PollState<GenderCount>,
    pub alerts: &'a PollState<Vec<Alert>>,
    pub health: &'a PollState<HealthReport>,
}

fn panel<T>(state: &PollState<T>, render: impl FnOnce(&T) -> String) -> String {
    if state.loading {
        return "loading...".dimmed().to_string();
    }
    let body = render(&state.data);
    match &state.error {
        Some(error) if state.last_updated.is_some() => {
            format!("{} {}", body, format!("(stale: {})", error.message).yellow())
        }
        Some(error) => error.message.red().to_string(),
        None => body,
    }
}

pub fn render_watch_frame(frame: &WatchFrame<'_>, now: chrono::DateTime<chrono::Utc>) -> String {
    let people = panel(frame.count, |count| {
        format_person_count(&PersonCount::from(count))
    });
    let alerts = panel(frame.alerts, |alerts| match alerts.first() {
        Some(newest) => format!(
            "{} recent, newest #{} {}",
            alerts.len(),
            newest.id,
            alert_title(newest.alert_type)
        ),
        None => "none".to_string(),
    });
    let backend = panel(frame.health, |report| {
        if report.healthy {
            format!("{} ({}ms)", "online".green(), report.latency_ms)
        } else {
            "offline".red().to_string()
        }
    });

    format!(
        "[{}]\n  People:  {}\n  Alerts:  {}\n  Backend: {}",
        format_ist(now),
        people,
        alerts,
        backend
    )
}

/// Handle `shesafe watch`
///
/// Runs one subscription per panel on its own interval and redraws
/// whenever any of them settles.
pub async fn handle_watch(
    args: &FollowArgs,
    api: &SheSafeApi,
    config: &MonitorConfig,
) -> CliResult<()> {
    let count = PollingSubscription::start(
        Arc::new(GenderCountResource::new(api.clone())),
        poll_options(config, config.polling.gender_count_ms),
        GenderCount::default(),
    );
    let alerts = PollingSubscription::start(
        Arc::new(AlertsResource::new(api.clone())),
        poll_options(config, config.polling.alerts_ms),
        Vec::new(),
    );
    let health = PollingSubscription::start(
        Arc::new(HealthResource::new(api.clone())),
        poll_options(config, config.polling.health_ms),
        HealthReport {
            healthy: false,
            latency_ms: 0,
            error: None,
        },
    );

    let mut count_rx = count.watch();
    let mut alerts_rx = alerts.watch();
    let mut health_rx = health.watch();
    let mut ticks = 0u32;

    loop {
        // Redraw only when the panel that changed has settled; each tick
        // first flips it to Fetching
        let settled = tokio::select! {
            changed = count_rx.changed() => {
                changed?;
                count_rx.borrow_and_update().phase == PollPhase::Settled
            }
            changed = alerts_rx.changed() => {
                changed?;
                alerts_rx.borrow_and_update().phase == PollPhase::Settled
            }
            changed = health_rx.changed() => {
                changed?;
                health_rx.borrow_and_update().phase == PollPhase::Settled
            }
            _ = tokio::signal::ctrl_c() => break,
        };
        if !settled {
            continue;
        }

        let (count_state, alerts_state, health_state) = (
            count_rx.borrow().clone(),
            alerts_rx.borrow().clone(),
            health_rx.borrow().clone(),
        );
        let frame = WatchFrame {
            count: &count_state,
            alerts: &alerts_state,
            health: &health_state,
        };
        println!("{}\n", render_watch_frame(&frame, chrono::Utc::now()));

        ticks += 1;
        if args.ticks.is_some_and(|limit| ticks >= limit) {
            break;
        }
    }
    Ok(())
}
