use egui::{Align, Layout, RichText, Ui};

use crate::element::{Color, Tool, ICON_NAMES};
use crate::state::{EditorState, COLOR_CHOICES};
use crate::theme;
use crate::ui_controls;

fn icon_label(name: &str) -> &str {
    match name {
        "semparer_de" => "S'emparer de",
        "fixer" => "Fixer",
        "detruire" => "Détruire",
        "reconnaitre" => "Reconnaître",
        other => other,
    }
}

pub fn show_toolbar(ui: &mut Ui, state: &mut EditorState) {
    let theme = theme::dark_theme();

    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        let tools = [
            (Tool::Cross, "✖"),
            (Tool::Circle, "●"),
            (Tool::Arrow, "→"),
        ];
        for (tool, label) in tools {
            let enabled = state.tool_ready(tool);
            let selected = state.active_tool == tool;
            let response = ui.add_enabled_ui(enabled, |ui| {
                ui_controls::tool_chip(ui, &theme, label, selected)
            });
            if response.inner.clicked() {
                state.set_tool(tool);
            }
        }

        group_separator(ui, &theme);

        for &name in ICON_NAMES {
            let tool = Tool::Icon(name);
            let enabled = state.tool_ready(tool);
            let selected = state.active_tool == tool;
            let response = ui.add_enabled_ui(enabled, |ui| {
                ui_controls::tool_chip(ui, &theme, icon_label(name), selected)
            });
            let mut chip = response.inner;
            if !enabled {
                chip = chip.on_disabled_hover_text("Image not available");
            }
            if chip.clicked() {
                state.set_tool(tool);
            }
        }

        group_separator(ui, &theme);

        ui.label(RichText::new("Color").color(theme.text.muted).size(12.0));
        for choice in COLOR_CHOICES {
            let selected = state.color_choice == *choice;
            let swatch = Color::for_shape(choice).color32();
            if ui_controls::color_chip(ui, &theme, swatch, selected)
                .on_hover_text(*choice)
                .clicked()
            {
                state.set_color(choice);
            }
        }
    });
}

fn group_separator(ui: &mut Ui, theme: &theme::AppTheme) {
    ui.add_space(4.0);
    ui.label(RichText::new("|").color(theme.surfaces.stroke_soft));
    ui.add_space(4.0);
}
