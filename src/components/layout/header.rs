//! Header Component
//!
//! The application header with title and telemetry connection status.

use gpui::{div, px, Context, IntoElement, ParentElement, Render, Styled, Window};

use crate::app::entities::AppEntities;
use crate::constants::HEADER_HEIGHT;
use crate::theme::colors::XDashColors;
use crate::utils::format::truncate;

/// Longest server detail shown next to the indicator
const DETAIL_MAX_CHARS: usize = 40;

/// Header component
pub struct Header {
    entities: AppEntities,
}

impl Header {
    pub fn new(entities: AppEntities, cx: &mut Context<Self>) -> Self {
        // Observe connection changes
        cx.observe(&entities.connection, |_this, _, cx| cx.notify())
            .detach();

        Self { entities }
    }

    fn render_connection_indicator(&self, cx: &Context<Self>) -> impl IntoElement {
        let conn = self.entities.connection.read(cx);

        let (color, status) = if conn.is_connected() {
            (XDashColors::success(), "●")
        } else {
            (XDashColors::text_muted(), "○")
        };
        let detail = conn
            .detail()
            .map(|detail| truncate(detail, DETAIL_MAX_CHARS))
            .unwrap_or_else(|| "Disconnected".to_string());

        div()
            .flex()
            .items_center()
            .gap_1()
            .child(
                div()
                    .text_color(color)
                    .text_size(px(10.0))
                    .child(status),
            )
            .child(
                div()
                    .text_color(XDashColors::text_light())
                    .text_size(px(12.0))
                    .child(detail),
            )
    }
}

impl Render for Header {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .h(px(HEADER_HEIGHT))
            .w_full()
            .bg(XDashColors::header_bg())
            .flex()
            .items_center()
            .justify_between()
            .px_4()
            .child(
                div()
                    .text_color(XDashColors::text_light())
                    .text_size(px(18.0))
                    .font_weight(gpui::FontWeight::SEMIBOLD)
                    .child("XDash"),
            )
            .child(self.render_connection_indicator(cx))
    }
}
