//! Single-command runs: load, act once, print the final view.

use std::path::Path;

use locfinder_core::{AppConfig, LoadState, QueryPoint};
use locfinder_ui::{Command, RecordingRenderer, Renderer, Session};

use crate::host::{start_session, HostGeolocator};
use crate::terminal;

/// Override the configured search radius from `--radius-km`.
pub(crate) fn apply_radius(config: &mut AppConfig, radius_km: Option<f64>) -> anyhow::Result<()> {
    if let Some(radius_km) = radius_km {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            anyhow::bail!("--radius-km must be a positive number, got {radius_km}");
        }
        config.search_radius_km = radius_km;
    }
    Ok(())
}

/// Start a session and wait for the dataset. A failed load ends the run.
async fn loaded_session(
    config: &AppConfig,
) -> anyhow::Result<Session<HostGeolocator, RecordingRenderer>> {
    let mut session = start_session(config, RecordingRenderer::default())?;
    session.settle().await;
    if let LoadState::Failed(reason) = session.state().store.state() {
        anyhow::bail!("failed to load dataset from {}: {reason}", config.dataset);
    }
    Ok(session)
}

pub(crate) async fn run_pins(config: &AppConfig) -> anyhow::Result<()> {
    let session = loaded_session(config).await?;
    terminal::print_markers(session.state());
    Ok(())
}

pub(crate) async fn run_search(config: &AppConfig, postal_code: &str) -> anyhow::Result<()> {
    let mut session = loaded_session(config).await?;
    session.handle(Command::SetInput(postal_code.to_string()));
    session.handle(Command::SubmitPostalCode);
    session.settle().await;
    report(&session);
    Ok(())
}

pub(crate) async fn run_near(config: &AppConfig, position: QueryPoint) -> anyhow::Result<()> {
    let config = AppConfig {
        geolocation: Some(position),
        ..config.clone()
    };
    let mut session = loaded_session(&config).await?;
    session.handle(Command::UseCurrentLocation);
    session.settle().await;
    report(&session);
    Ok(())
}

pub(crate) async fn run_convert(input: &Path, output: &Path) -> anyhow::Result<()> {
    let written = locfinder_dataset::convert_csv_file(input, output).await?;
    println!("wrote {written} record(s) to {}", output.display());
    Ok(())
}

/// Print alerts if the search failed, otherwise the result view.
fn report(session: &Session<HostGeolocator, RecordingRenderer>) {
    let alerts = &session.renderer().alerts;
    if alerts.is_empty() {
        terminal::print_view(session.state());
    } else {
        let mut out = terminal::TerminalRenderer::default();
        for alert in alerts {
            out.alert(alert);
        }
    }
}
