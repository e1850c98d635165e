//! Event loop host for [`SearchController`].
//!
//! Commands are queued on an unbounded channel and handled one at a time, so
//! the controller is only ever touched from this loop. The fire-once async
//! operations (dataset load, geolocation request, panel hide timer) run as
//! spawned tasks that post their completion back onto the same queue.

use std::future::Future;
use std::sync::Arc;

use locfinder_core::Location;
use tokio::sync::mpsc;

use crate::command::{Command, Effect};
use crate::controller::SearchController;
use crate::geolocation::Geolocator;
use crate::render::Renderer;
use crate::state::AppState;

pub struct Session<G, R> {
    controller: SearchController,
    geolocator: Arc<G>,
    renderer: R,
    sender: mpsc::UnboundedSender<Command>,
    receiver: mpsc::UnboundedReceiver<Command>,
    /// Spawned tasks whose completion command has not been handled yet.
    in_flight: usize,
}

impl<G: Geolocator, R: Renderer> Session<G, R> {
    pub fn new(controller: SearchController, geolocator: G, renderer: R) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            controller,
            geolocator: Arc::new(geolocator),
            renderer,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// A handle for posting user commands from other tasks.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<Command> {
        self.sender.clone()
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        self.controller.state()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Number of async operations still awaiting completion.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start the one-time dataset load. Its outcome arrives as
    /// [`Command::DatasetLoaded`].
    pub fn spawn_dataset_load<F>(&mut self, load: F)
    where
        F: Future<Output = Result<Vec<Location>, String>> + Send + 'static,
    {
        self.in_flight += 1;
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = load.await;
            if sender.send(Command::DatasetLoaded(result)).is_err() {
                tracing::debug!("session closed before dataset load completed");
            }
        });
    }

    /// Dispatch one command, run its effects, and re-render.
    pub fn handle(&mut self, command: Command) {
        if matches!(
            command,
            Command::DatasetLoaded(_)
                | Command::GeolocationResolved { .. }
                | Command::PanelHideElapsed { .. }
        ) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        let effects = self.controller.dispatch(command);
        for effect in effects {
            self.run_effect(effect);
        }
        self.renderer.render(self.controller.state());
    }

    /// Wait for the next queued command and handle it.
    ///
    /// The session owns a sender of its own queue, so the queue stays open
    /// for as long as the session lives and this only returns after handling
    /// a command.
    pub async fn process_next(&mut self) {
        if let Some(command) = self.receiver.recv().await {
            self.handle(command);
        }
    }

    /// Handle queued commands until no async operation is outstanding.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            self.process_next().await;
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Alert(alert) => {
                tracing::debug!(%alert, "alert raised");
                self.renderer.alert(&alert);
            }
            Effect::RequestGeolocation { generation } => {
                self.in_flight += 1;
                let geolocator = Arc::clone(&self.geolocator);
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let result = geolocator.current_position().await;
                    if sender
                        .send(Command::GeolocationResolved { generation, result })
                        .is_err()
                    {
                        tracing::debug!(generation, "session closed before geolocation resolved");
                    }
                });
            }
            Effect::SchedulePanelHide { generation, after } => {
                self.in_flight += 1;
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    // The session may have shut down while the timer ran.
                    let _ = sender.send(Command::PanelHideElapsed { generation });
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use locfinder_core::{BaseLayer, QueryPoint};

    use super::*;
    use crate::alert::Alert;
    use crate::controller::SearchSettings;
    use crate::geolocation::{FixedGeolocator, UnavailableGeolocator};
    use crate::render::RecordingRenderer;
    use crate::view::SidePanel;

    fn locations() -> Vec<Location> {
        vec![
            Location {
                latitude: -34.6037,
                longitude: -58.3816,
                address: Some("Obelisco".to_string()),
                postal_code: Some("C1043".to_string()),
                locality: None,
                province: None,
            },
            Location {
                latitude: -34.6090,
                longitude: -58.3850,
                address: Some("Av. de Mayo 500".to_string()),
                postal_code: Some("C1084".to_string()),
                locality: None,
                province: None,
            },
        ]
    }

    fn controller() -> SearchController {
        let settings = SearchSettings {
            panel_close: Duration::from_millis(5),
            ..SearchSettings::default()
        };
        SearchController::new(settings, BaseLayer::Light)
    }

    #[tokio::test]
    async fn dataset_load_completes_through_the_queue() {
        let mut session = Session::new(
            controller(),
            UnavailableGeolocator,
            RecordingRenderer::default(),
        );
        session.spawn_dataset_load(async { Ok(locations()) });
        assert_eq!(session.in_flight(), 1);

        session.settle().await;
        assert_eq!(session.in_flight(), 0);
        assert!(session.state().store.is_loaded());
        assert_eq!(session.state().markers.len(), 2);
        assert_eq!(session.renderer().renders, 1);
    }

    #[tokio::test]
    async fn dataset_load_failure_is_alerted() {
        let mut session = Session::new(
            controller(),
            UnavailableGeolocator,
            RecordingRenderer::default(),
        );
        session.spawn_dataset_load(async { Err("connection refused".to_string()) });
        session.settle().await;

        assert_eq!(
            session.renderer().alerts,
            vec![Alert::DatasetLoadFailed("connection refused".to_string())]
        );
        assert!(session.state().store.is_empty());
    }

    #[tokio::test]
    async fn current_location_search_runs_end_to_end() {
        let user = QueryPoint::new(-34.6040, -58.3820);
        let mut session = Session::new(
            controller(),
            FixedGeolocator::new(user),
            RecordingRenderer::default(),
        );
        session.spawn_dataset_load(async { Ok(locations()) });
        session.settle().await;

        session.handle(Command::UseCurrentLocation);
        assert_eq!(session.in_flight(), 1);
        session.settle().await;

        let state = session.state();
        assert_eq!(state.results.len(), 2);
        assert_eq!(state.map.center, user);
        assert_eq!(state.panel, SidePanel::Open);
        assert!(session.renderer().alerts.is_empty());
    }

    #[tokio::test]
    async fn unavailable_geolocation_is_alerted() {
        let mut session = Session::new(
            controller(),
            UnavailableGeolocator,
            RecordingRenderer::default(),
        );
        session.spawn_dataset_load(async { Ok(locations()) });
        session.settle().await;

        session.handle(Command::UseCurrentLocation);
        session.settle().await;
        assert_eq!(
            session.renderer().alerts,
            vec![Alert::GeolocationUnavailable]
        );
    }

    #[tokio::test]
    async fn panel_hides_after_close_timer() {
        let mut session = Session::new(
            controller(),
            UnavailableGeolocator,
            RecordingRenderer::default(),
        );
        session.spawn_dataset_load(async { Ok(locations()) });
        session.settle().await;

        session.handle(Command::SetInput("C1043".to_string()));
        session.handle(Command::SubmitPostalCode);
        assert_eq!(session.state().panel, SidePanel::Open);

        session.handle(Command::ClosePanel);
        assert!(matches!(session.state().panel, SidePanel::Closing { .. }));
        session.settle().await;
        assert_eq!(session.state().panel, SidePanel::Hidden);
    }

    #[tokio::test]
    async fn commands_posted_through_sender_are_handled() {
        let mut session = Session::new(
            controller(),
            UnavailableGeolocator,
            RecordingRenderer::default(),
        );
        let sender = session.sender();
        sender
            .send(Command::SelectBaseLayer(BaseLayer::Dark))
            .unwrap();
        session.process_next().await;
        assert_eq!(session.state().base_layer, BaseLayer::Dark);
    }
}
