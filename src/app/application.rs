//! Application - App Initialization and Window Management
//!
//! Main entry point for the GPUI application.

use std::sync::Arc;

use gpui::{
    actions, px, App, AppContext, Application, Bounds, KeyBinding, SharedString,
    TitlebarOptions, WindowBounds, WindowOptions,
};
use parking_lot::Mutex;

use crate::app::entities::AppEntities;
use crate::app::workspace::Workspace;
use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::domain::config::AppConfig;
use crate::eventing::app_event::AppEvent;
use crate::features::dashboard::controller::DashboardController;
use crate::services::host_publisher::{HostPublisher, HostPublisherHandle, SystemResolver};
use crate::telemetry::TelemetryClient;
use crate::telemetry::nt4::Nt4Client;

actions!(xdash, [Quit]);

/// Run the XDash application
pub fn run_app(config: AppConfig) {
    Application::new().run(move |cx: &mut App| {
        // Create event channel for service -> UI communication
        let (event_tx, event_rx) = flume::unbounded::<AppEvent>();

        // Telemetry client, shared explicitly with everything that reads or writes topics
        let client: Arc<dyn TelemetryClient> =
            Arc::new(Nt4Client::start(config.server.clone(), event_tx.clone()));

        let controller = DashboardController::new(client.clone(), config.topics.clone());
        let fields = controller.fields();

        // Initialize global entities before any value can arrive
        let entities = AppEntities::init(&fields, cx);
        cx.set_global(entities.clone());

        controller.bind(&fields);

        let publisher = HostPublisher::new(client.clone(), config.topics.clone(), event_tx.clone());
        let host_handle: Arc<Mutex<Option<HostPublisherHandle>>> = Arc::new(Mutex::new(
            match publisher.spawn(SystemResolver, config.host.poll_interval()) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::error!("Failed to start host publisher: {}", e);
                    let _ = event_tx.send(AppEvent::error(format!(
                        "Failed to start host publisher: {e}"
                    )));
                    None
                }
            },
        ));

        let _ = event_tx.send(AppEvent::info(format!(
            "Connecting to {}",
            config.server.describe()
        )));

        // Set up action handlers
        cx.bind_keys([KeyBinding::new("secondary-q", Quit, None)]);
        let quit_handle = host_handle.clone();
        let quit_client = client.clone();
        cx.on_action(move |_: &Quit, cx: &mut App| {
            shutdown(&quit_handle, quit_client.as_ref());
            cx.quit();
        });

        // Closing the window ends the process
        cx.on_window_closed(move |cx| {
            if cx.windows().is_empty() {
                shutdown(&host_handle, client.as_ref());
                cx.quit();
            }
        })
        .detach();

        // Create main window
        let bounds = Bounds::centered(
            None,
            gpui::size(px(DEFAULT_WINDOW_WIDTH), px(DEFAULT_WINDOW_HEIGHT)),
            cx,
        );
        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some(SharedString::from("XDash")),
                ..Default::default()
            }),
            ..Default::default()
        };

        if let Err(e) = cx.open_window(window_options, |_window, cx| {
            cx.new(|cx| Workspace::new(entities.clone(), controller, event_rx, cx))
        }) {
            tracing::error!("Failed to open main window: {:#}", e);
            cx.quit();
            return;
        }

        cx.activate(true);
    });
}

/// Stop the host publisher and close the telemetry connection
fn shutdown(host_handle: &Mutex<Option<HostPublisherHandle>>, client: &dyn TelemetryClient) {
    if let Some(handle) = host_handle.lock().take() {
        handle.stop();
    }
    client.shutdown();
    tracing::info!("XDash shut down");
}
