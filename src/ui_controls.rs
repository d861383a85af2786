use egui::{vec2, Color32, Frame, Margin, RichText, Rounding, Stroke, Ui, Vec2};

use crate::theme::AppTheme;

pub fn toolbar_frame(theme: &AppTheme) -> Frame {
    Frame::none()
        .fill(theme.surfaces.panel_bg)
        .inner_margin(Margin::symmetric(12.0, 8.0))
}

pub fn action_bar_frame(theme: &AppTheme) -> Frame {
    Frame::none()
        .fill(theme.surfaces.panel_bg)
        .inner_margin(Margin::symmetric(12.0, 10.0))
}

pub fn tool_chip(ui: &mut Ui, theme: &AppTheme, label: &str, selected: bool) -> egui::Response {
    let mut button = egui::Button::new(RichText::new(label).size(14.0))
        .min_size(vec2(40.0, 28.0))
        .rounding(Rounding::same(8.0));

    if selected {
        button = button
            .fill(theme.surfaces.accent_soft)
            .stroke(Stroke::new(1.0, theme.surfaces.accent));
    } else {
        button = button.fill(theme.surfaces.card_bg);
    }

    ui.add(button)
}

pub fn color_chip(ui: &mut Ui, theme: &AppTheme, color: Color32, selected: bool) -> egui::Response {
    let stroke = if selected {
        Stroke::new(2.0, theme.text.primary)
    } else {
        Stroke::new(1.0, theme.surfaces.stroke_soft)
    };
    ui.add(
        egui::Button::new("")
            .min_size(vec2(20.0, 20.0))
            .fill(color)
            .stroke(stroke)
            .rounding(Rounding::same(6.0)),
    )
}

pub fn primary_button(ui: &mut Ui, theme: &AppTheme, label: &str, min_size: Vec2) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(label).strong().color(theme.text.primary))
            .min_size(min_size)
            .fill(theme.surfaces.accent_soft)
            .stroke(Stroke::new(1.0, theme.surfaces.accent))
            .rounding(Rounding::same(8.0)),
    )
}

pub fn ghost_button(ui: &mut Ui, theme: &AppTheme, label: &str, min_size: Vec2) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(label).color(theme.text.secondary))
            .min_size(min_size)
            .fill(theme.surfaces.card_bg)
            .stroke(Stroke::new(1.0, theme.surfaces.stroke_soft))
            .rounding(Rounding::same(8.0)),
    )
}

pub fn subtle_badge(ui: &mut Ui, theme: &AppTheme, text: &str) {
    let label = RichText::new(text).size(12.0).color(theme.surfaces.accent).strong();
    Frame::none()
        .fill(Color32::from_rgba_unmultiplied(
            theme.surfaces.accent.r(),
            theme.surfaces.accent.g(),
            theme.surfaces.accent.b(),
            34,
        ))
        .rounding(Rounding::same(10.0))
        .stroke(Stroke::new(1.0, theme.surfaces.accent_soft))
        .inner_margin(Margin::symmetric(8.0, 4.0))
        .show(ui, |ui| {
            ui.label(label);
        });
}
