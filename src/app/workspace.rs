//! Workspace - Main Shell with Layout and Event Pump
//!
//! The workspace holds the header, the dashboard page, and the log panel.
//! It also runs the event pump that bridges service events to UI updates.

use gpui::{
    div, App, AppContext, Context, Entity, IntoElement, ParentElement, Render, Styled, Window,
};

use crate::app::entities::AppEntities;
use crate::components::layout::header::Header;
use crate::components::layout::log_panel::LogPanel;
use crate::eventing::app_event::AppEvent;
use crate::features::dashboard::controller::DashboardController;
use crate::features::dashboard::page::DashboardPage;
use crate::theme::colors::XDashColors;

/// Main workspace containing the application layout
pub struct Workspace {
    header: Entity<Header>,
    dashboard_page: Entity<DashboardPage>,
    log_panel: Entity<LogPanel>,
}

impl Workspace {
    pub fn new(
        entities: AppEntities,
        controller: DashboardController,
        event_rx: flume::Receiver<AppEvent>,
        cx: &mut Context<Self>,
    ) -> Self {
        let header = cx.new(|cx| Header::new(entities.clone(), cx));
        let dashboard_page = cx.new(|cx| DashboardPage::new(entities.clone(), controller, cx));
        let log_panel = cx.new(|cx| LogPanel::new(entities.clone(), cx));

        Self::start_event_pump(event_rx, entities, cx);

        Self {
            header,
            dashboard_page,
            log_panel,
        }
    }

    /// Start the event pump that dispatches service events to UI
    fn start_event_pump(
        event_rx: flume::Receiver<AppEvent>,
        entities: AppEntities,
        cx: &mut Context<Self>,
    ) {
        cx.spawn(async move |_this, cx| {
            while let Ok(event) = event_rx.recv_async().await {
                let entities = entities.clone();
                if cx
                    .update(|cx: &mut App| dispatch_event(event, &entities, cx))
                    .is_err()
                {
                    break;
                }
            }
            tracing::debug!("Event pump stopped");
        })
        .detach();
    }
}

impl Render for Workspace {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(XDashColors::background())
            .child(self.header.clone())
            .child(
                div()
                    .flex_1()
                    .flex()
                    .flex_col()
                    .overflow_hidden()
                    .child(self.dashboard_page.clone()),
            )
            .child(self.log_panel.clone())
    }
}

/// Dispatch an AppEvent to the appropriate entity
fn dispatch_event(event: AppEvent, entities: &AppEntities, cx: &mut App) {
    match event {
        AppEvent::Log {
            level,
            message,
            timestamp,
        } => {
            entities.logs.update(cx, |logs, cx| {
                logs.push(level, message, timestamp);
                cx.notify();
            });
        }
        AppEvent::ConnectionChanged { connected, detail } => {
            entities.connection.update(cx, |conn, cx| {
                conn.set_status(connected, detail);
                cx.notify();
            });
            entities.dashboard.update(cx, |dashboard, cx| {
                if dashboard.set_connected(connected) {
                    cx.notify();
                }
            });
        }
        AppEvent::TopicValue { topic, value } => {
            entities.dashboard.update(cx, |dashboard, cx| {
                if dashboard.apply(&topic, &value) {
                    cx.notify();
                }
            });
        }
    }
}
