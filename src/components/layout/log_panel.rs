//! Log Panel Component
//!
//! Displays application logs at the bottom of the window.

use gpui::{
    div, px, ClickEvent, Context, InteractiveElement, IntoElement, ParentElement, Render,
    StatefulInteractiveElement, Styled, Window,
};

use crate::app::entities::AppEntities;
use crate::constants::{LOG_PANEL_COLLAPSED_HEIGHT, LOG_PANEL_HEIGHT, LOG_VISIBLE_ENTRIES};
use crate::state::log_state::LogEntry;
use crate::theme::colors::XDashColors;
use crate::utils::format::format_time_ms;

/// Log panel component
pub struct LogPanel {
    entities: AppEntities,
    expanded: bool,
}

impl LogPanel {
    pub fn new(entities: AppEntities, cx: &mut Context<Self>) -> Self {
        // Observe log changes
        cx.observe(&entities.logs, |_this, _, cx| cx.notify())
            .detach();

        Self {
            entities,
            expanded: true,
        }
    }

    fn toggle_expanded(&mut self, cx: &mut Context<Self>) {
        self.expanded = !self.expanded;
        cx.notify();
    }

    fn render_log_entry(&self, entry: &LogEntry) -> impl IntoElement {
        div()
            .w_full()
            .flex()
            .items_center()
            .gap_2()
            .py_px()
            .child(
                div()
                    .text_color(XDashColors::text_muted())
                    .text_size(px(11.0))
                    .min_w(px(85.0))
                    .child(format_time_ms(&entry.timestamp)),
            )
            .child(
                div()
                    .text_color(entry.level.color())
                    .text_size(px(11.0))
                    .min_w(px(45.0))
                    .child(entry.level.label()),
            )
            .child(
                div()
                    .text_color(XDashColors::text_light())
                    .text_size(px(12.0))
                    .flex_1()
                    .child(entry.message.clone()),
            )
    }
}

impl Render for LogPanel {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let logs = self.entities.logs.read(cx);

        let height = if self.expanded {
            px(LOG_PANEL_HEIGHT)
        } else {
            px(LOG_PANEL_COLLAPSED_HEIGHT)
        };

        let entities = self.entities.clone();

        let mut panel = div()
            .h(height)
            .w_full()
            .bg(XDashColors::log_panel_bg())
            .flex()
            .flex_col()
            // Header
            .child(
                div()
                    .h(px(LOG_PANEL_COLLAPSED_HEIGHT))
                    .w_full()
                    .px_4()
                    .flex()
                    .items_center()
                    .justify_between()
                    .border_b_1()
                    .border_color(XDashColors::overlay())
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap_2()
                            .child(
                                div()
                                    .text_color(XDashColors::text_light())
                                    .text_size(px(13.0))
                                    .font_weight(gpui::FontWeight::MEDIUM)
                                    .child("Log"),
                            )
                            .child(
                                div()
                                    .text_color(XDashColors::text_muted())
                                    .text_size(px(11.0))
                                    .child(format!("({})", logs.len())),
                            ),
                    )
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap_2()
                            .child(
                                div()
                                    .id("clear-logs")
                                    .px_2()
                                    .py_1()
                                    .rounded_sm()
                                    .text_color(XDashColors::text_muted())
                                    .text_size(px(11.0))
                                    .cursor_pointer()
                                    .hover(|s| s.bg(XDashColors::overlay()))
                                    .on_click(move |_event: &ClickEvent, _window, cx| {
                                        entities.logs.update(cx, |logs, cx| {
                                            logs.clear();
                                            cx.notify();
                                        });
                                    })
                                    .child("Clear"),
                            )
                            .child(
                                div()
                                    .id("toggle-logs")
                                    .px_2()
                                    .py_1()
                                    .rounded_sm()
                                    .text_color(XDashColors::text_muted())
                                    .text_size(px(11.0))
                                    .cursor_pointer()
                                    .hover(|s| s.bg(XDashColors::overlay()))
                                    .on_click(cx.listener(|this, _event: &ClickEvent, _window, cx| {
                                        this.toggle_expanded(cx);
                                    }))
                                    .child(if self.expanded { "▼" } else { "▲" }),
                            ),
                    ),
            );

        if self.expanded {
            let entries: Vec<_> = logs
                .entries()
                .iter()
                .rev()
                .take(LOG_VISIBLE_ENTRIES)
                .collect();

            panel = panel.child(
                div()
                    .id("log-entries")
                    .flex_1()
                    .overflow_y_scroll()
                    .px_4()
                    .py_1()
                    .children(entries.into_iter().map(|entry| self.render_log_entry(entry))),
            );
        }

        panel
    }
}
