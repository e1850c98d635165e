//! Plain-text rendering of the presentation model.

use std::fmt::Write as _;

use locfinder_ui::{Alert, AppState, Renderer, SidePanel};

/// Prints alerts immediately and the view whenever it visibly changes.
#[derive(Debug, Default)]
pub(crate) struct TerminalRenderer {
    last_view: Option<String>,
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, state: &AppState) {
        let view = format_view(state);
        if self.last_view.as_deref() != Some(view.as_str()) {
            println!("{view}");
            self.last_view = Some(view);
        }
    }

    fn alert(&mut self, alert: &Alert) {
        println!("! {alert}");
    }
}

pub(crate) fn print_view(state: &AppState) {
    println!("{}", format_view(state));
}

pub(crate) fn print_markers(state: &AppState) {
    println!("{} location(s)", state.markers.len());
    for marker in state.markers.markers() {
        println!(
            "  {:>10.5} {:>10.5}  {}",
            marker.latitude, marker.longitude, marker.popup
        );
    }
}

/// Render the map, table, and panel as text.
pub(crate) fn format_view(state: &AppState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "map: {:.4}, {:.4} @ zoom {} [{}], {} marker(s)",
        state.map.center.latitude,
        state.map.center.longitude,
        state.map.zoom,
        state.base_layer,
        state.markers.len()
    );
    let _ = writeln!(
        out,
        "tiles: {} (subdomains {}, max zoom {}) {}",
        state.base_layer.tile_url_template(),
        state.base_layer.subdomains(),
        state.base_layer.max_zoom(),
        state.base_layer.attribution()
    );
    if let Some(marker) = state.markers.open_popup() {
        let _ = writeln!(out, "popup: {}", marker.popup);
    }

    if !state.table.is_empty() {
        let _ = writeln!(out, "nearest:");
        for row in state.table.rows() {
            let _ = writeln!(
                out,
                "  {:<30} {:<18} {:<10} {:<18} {:>10}",
                row.address, row.locality, row.postal_code, row.province, row.distance
            );
        }
    }

    let panel = match state.panel {
        SidePanel::Hidden => "hidden",
        SidePanel::Open => "open",
        SidePanel::Closing { .. } => "closing",
    };
    let _ = writeln!(out, "panel: {panel}");
    if state.panel.is_visible() {
        for (index, card) in state.cards.iter().enumerate() {
            let _ = writeln!(
                out,
                "  [{}] {} - {}, {}, {} - {} (view {})",
                index + 1,
                card.title,
                card.locality,
                card.postal_code,
                card.province,
                card.distance,
                index + 1
            );
        }
    }
    if state.controls.clear_visible {
        let _ = writeln!(out, "(type `clear` to reset)");
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use locfinder_core::{BaseLayer, Location};
    use locfinder_ui::{Command, SearchController, SearchSettings};

    use super::*;

    fn controller_with_results() -> SearchController {
        let mut controller = SearchController::new(SearchSettings::default(), BaseLayer::Light);
        controller.dispatch(Command::DatasetLoaded(Ok(vec![Location {
            latitude: -34.6037,
            longitude: -58.3816,
            address: Some("Obelisco".to_string()),
            postal_code: Some("C1043".to_string()),
            locality: Some("CABA".to_string()),
            province: None,
        }])));
        controller.dispatch(Command::SetInput("C1043".to_string()));
        controller.dispatch(Command::SubmitPostalCode);
        controller
    }

    #[test]
    fn view_lists_table_and_cards() {
        let view = format_view(controller_with_results().state());
        assert!(view.starts_with("map: -34.6037, -58.3816 @ zoom 12 [light], 1 marker(s)"));
        assert!(view.contains("light_all"));
        assert!(view.contains("nearest:"));
        assert!(view.contains("0.00 km"));
        assert!(view.contains("panel: open"));
        assert!(view.contains("[1] Obelisco - CABA, C1043, N/A - 0.00 km"));
        assert!(view.contains("clear"));
    }

    #[test]
    fn view_hides_cards_when_panel_hidden() {
        let mut controller = controller_with_results();
        controller.dispatch(Command::Clear);
        let view = format_view(controller.state());
        assert!(view.contains("panel: hidden"));
        assert!(!view.contains("[1]"));
        assert!(!view.contains("nearest:"));
    }

    #[test]
    fn renderer_skips_unchanged_views() {
        let controller = controller_with_results();
        let mut renderer = TerminalRenderer::default();
        renderer.render(controller.state());
        let first = renderer.last_view.clone();
        renderer.render(controller.state());
        assert_eq!(renderer.last_view, first);
    }
}
