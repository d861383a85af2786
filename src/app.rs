use std::path::PathBuf;
use std::time::Duration;

use eframe::egui::{self, Context as EguiContext, Key, RichText, TopBottomPanel};
use eframe::{App, Frame};

use crate::action_bar;
use crate::assets::AssetLoader;
use crate::canvas;
use crate::clipboard;
use crate::export;
use crate::state::EditorState;
use crate::theme;
use crate::toolbar;
use crate::ui_controls;

pub struct TacMarkApp {
    pub state: EditorState,
    asset_loader: AssetLoader,
    theme: theme::AppTheme,
    export_feedback_until: Option<f64>,
}

impl TacMarkApp {
    pub fn new(cc: &eframe::CreationContext<'_>, assets_dir: PathBuf) -> Self {
        let theme = theme::dark_theme();
        theme::apply_theme(&cc.egui_ctx, &theme);

        Self {
            state: EditorState::default(),
            asset_loader: AssetLoader::spawn(assets_dir),
            theme,
            export_feedback_until: None,
        }
    }

    fn process_asset_events(&mut self) {
        while let Some(event) = self.asset_loader.try_recv() {
            self.state.assets.apply(event);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &EguiContext) {
        let cmd = ctx.input(|input| input.modifiers.command || input.modifiers.ctrl);
        if cmd && ctx.input(|input| input.key_pressed(Key::Z)) {
            self.state.undo();
        }

        // Delete must not fire while a note field is being edited.
        if !ctx.wants_keyboard_input()
            && ctx
                .input(|input| input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace))
        {
            self.state.delete_selected();
        }
    }

    fn export_scene(&mut self, ctx: &EguiContext) {
        let record = export::export_scene(&self.state.scene, &self.state.notes);
        let result = export::to_json(&record)
            .and_then(|json| clipboard::write_text_to_clipboard(&json));
        match result {
            Ok(()) => {
                self.state.status = "Scene exported to the clipboard as JSON.".to_string();
                self.export_feedback_until = Some(ctx.input(|input| input.time) + 1.5);
            }
            Err(err) => {
                self.state.status = format!("Export failed: {err:#}");
            }
        }
    }

    fn show_notes_panel(&mut self, ctx: &EguiContext) {
        egui::SidePanel::right("notes_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.label(RichText::new("Notes").strong());
                ui.add(
                    egui::TextEdit::multiline(&mut self.state.notes.general)
                        .desired_rows(5)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(8.0);
                ui.label(RichText::new("Enemy (ENI)").strong());
                ui.add(
                    egui::TextEdit::multiline(&mut self.state.notes.enemy)
                        .desired_rows(5)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(8.0);
                ui.label(RichText::new("Defense").strong());
                ui.add(
                    egui::TextEdit::multiline(&mut self.state.notes.defense)
                        .desired_rows(5)
                        .desired_width(f32::INFINITY),
                );
            });
    }
}

impl App for TacMarkApp {
    fn update(&mut self, ctx: &EguiContext, _frame: &mut Frame) {
        self.process_asset_events();
        self.handle_shortcuts(ctx);

        TopBottomPanel::top("toolbar")
            .exact_height(46.0)
            .frame(ui_controls::toolbar_frame(&self.theme))
            .show(ctx, |ui| {
                toolbar::show_toolbar(ui, &mut self.state);
            });

        let exported_feedback = self
            .export_feedback_until
            .is_some_and(|deadline| ctx.input(|input| input.time) <= deadline);

        let action_output = TopBottomPanel::bottom("action_bar")
            .exact_height(48.0)
            .frame(ui_controls::action_bar_frame(&self.theme))
            .show(ctx, |ui| {
                action_bar::show_action_bar(ui, &self.state, exported_feedback)
            })
            .inner;

        self.show_notes_panel(ctx);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.surfaces.app_bg)
                    .inner_margin(egui::Margin::symmetric(12.0, 10.0)),
            )
            .show(ctx, |ui| {
                canvas::show_canvas(ui, ctx, &mut self.state);
            });

        if action_output.undo {
            self.state.undo();
        }
        if action_output.export {
            self.export_scene(ctx);
        }

        // Keep polling while assets decode in the background.
        if !self.state.background_ready() {
            ctx.request_repaint_after(Duration::from_millis(120));
        }
    }
}
