//! Button Component

use gpui::{
    App, ClickEvent, ElementId, InteractiveElement, IntoElement, ParentElement, RenderOnce,
    SharedString, StatefulInteractiveElement, Styled, Window, div, px,
};

use crate::theme::colors::XDashColors;

type ClickHandler = Box<dyn Fn(&ClickEvent, &mut Window, &mut App) + 'static>;

/// A styled button component
#[derive(IntoElement)]
pub struct Button {
    id: ElementId,
    label: SharedString,
    full_width: bool,
    on_click: Option<ClickHandler>,
}

impl Button {
    /// Create a new button
    pub fn new(id: impl Into<ElementId>, label: impl Into<SharedString>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            full_width: false,
            on_click: None,
        }
    }

    /// Stretch across the parent
    pub fn full_width(mut self) -> Self {
        self.full_width = true;
        self
    }

    /// Set the click handler
    pub fn on_click(
        mut self,
        handler: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }
}

impl RenderOnce for Button {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let mut element = div()
            .id(self.id)
            .px(px(16.0))
            .py(px(8.0))
            .flex()
            .justify_center()
            .bg(XDashColors::button_primary_bg())
            .text_color(XDashColors::button_primary_text())
            .text_size(px(14.0))
            .rounded_md()
            .cursor_pointer()
            .hover(|s| s.bg(XDashColors::button_primary_hover()))
            .child(self.label);

        if self.full_width {
            element = element.w_full();
        }

        if let Some(handler) = self.on_click {
            element = element.on_click(handler);
        }

        element
    }
}
