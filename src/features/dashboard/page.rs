//! Dashboard Page
//!
//! Caption/value grid of the live fields, followed by the stream restart
//! button.

use chrono::Local;
use gpui::{
    div, px, ClickEvent, Context, InteractiveElement, IntoElement, ParentElement, Render,
    StatefulInteractiveElement, Styled, Window,
};

use crate::app::entities::AppEntities;
use crate::components::primitives::button::Button;
use crate::constants::CAPTION_COLUMN_WIDTH;
use crate::features::dashboard::controller::DashboardController;
use crate::state::dashboard_state::FieldRow;
use crate::state::log_state::LogLevel;
use crate::theme::colors::XDashColors;

/// Dashboard page component
pub struct DashboardPage {
    entities: AppEntities,
    controller: DashboardController,
}

impl DashboardPage {
    pub fn new(
        entities: AppEntities,
        controller: DashboardController,
        cx: &mut Context<Self>,
    ) -> Self {
        // Observe field updates
        cx.observe(&entities.dashboard, |_this, _, cx| cx.notify())
            .detach();

        Self {
            entities,
            controller,
        }
    }

    fn restart_streaming(&mut self, cx: &mut Context<Self>) {
        let (level, message) = match self.controller.request_stream_restart() {
            Ok(count) => (LogLevel::Info, format!("Stream restart requested ({count})")),
            Err(e) => {
                tracing::error!("Stream restart failed: {}", e);
                (LogLevel::Error, format!("Stream restart failed: {e}"))
            }
        };
        self.entities.logs.update(cx, |logs, cx| {
            logs.push(level, message, Local::now());
            cx.notify();
        });
    }

    fn render_field_row(&self, row: &FieldRow) -> impl IntoElement {
        div()
            .w_full()
            .px_4()
            .py_2()
            .flex()
            .items_center()
            .gap_4()
            .border_b_1()
            .border_color(XDashColors::row_separator())
            .child(
                div()
                    .w(px(CAPTION_COLUMN_WIDTH))
                    .text_sm()
                    .text_color(XDashColors::text_secondary())
                    .child(row.caption),
            )
            .child(
                div()
                    .flex_1()
                    .text_sm()
                    .text_color(XDashColors::text_primary())
                    .child(row.text.clone()),
            )
    }
}

impl Render for DashboardPage {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let rows: Vec<FieldRow> = self.entities.dashboard.read(cx).rows().to_vec();

        div()
            .id("dashboard-page")
            .size_full()
            .flex()
            .flex_col()
            .overflow_y_scroll()
            .p_4()
            .gap_4()
            .child(
                div()
                    .w_full()
                    .bg(XDashColors::content_bg())
                    .border_1()
                    .border_color(XDashColors::border())
                    .rounded_md()
                    .overflow_hidden()
                    .flex()
                    .flex_col()
                    .children(rows.iter().map(|row| self.render_field_row(row))),
            )
            .child(
                Button::new("force-restart-streaming", "Force Restart Streaming")
                    .full_width()
                    .on_click(cx.listener(|this, _event: &ClickEvent, _window, cx| {
                        this.restart_streaming(cx);
                    })),
            )
    }
}
