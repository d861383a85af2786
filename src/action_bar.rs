use egui::{vec2, Align, Layout, RichText, Ui};

use crate::state::EditorState;
use crate::theme;
use crate::ui_controls;

pub struct ActionBarOutput {
    pub undo: bool,
    pub export: bool,
}

pub fn show_action_bar(
    ui: &mut Ui,
    state: &EditorState,
    exported_feedback: bool,
) -> ActionBarOutput {
    let theme = theme::dark_theme();
    let mut out = ActionBarOutput {
        undo: false,
        export: false,
    };

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = vec2(10.0, 0.0);

        let undo_button = ui.add_enabled_ui(state.can_undo(), |ui| {
            ui_controls::ghost_button(ui, &theme, "↩ Undo", vec2(92.0, 28.0))
        });
        if undo_button.inner.clicked() {
            out.undo = true;
        }

        ui.add_space(10.0);
        ui.label(
            RichText::new(&state.status)
                .color(theme.text.secondary)
                .size(13.0),
        );

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.add_space(4.0);
            if ui_controls::primary_button(ui, &theme, "Export JSON", vec2(112.0, 28.0)).clicked() {
                out.export = true;
            }
            if exported_feedback {
                ui_controls::subtle_badge(ui, &theme, "clipboard updated");
            }
        });
    });

    out
}
