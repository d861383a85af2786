use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::AssetStore;
use crate::element::{ElementId, Handle, PlacedElement, Point, Tool};
use crate::history::{SnapshotRing, HISTORY_CAPACITY};
use crate::scene::Scene;

/// Selector values offered by the color control, in display order.
pub const COLOR_CHOICES: &[&str] = &["none", "red", "blue"];

pub const ARROW_START_PROMPT: &str = "Click to set the arrow start point.";
pub const ARROW_END_PROMPT: &str = "Click to set the arrow end point.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    Move,
    Resize,
    Rotate,
}

/// An in-flight pointer gesture. `origin` is the element as it was at
/// pointer-down; every pointer-move restores it and re-applies the current
/// delta, so the arithmetic always works from initial geometry.
#[derive(Clone, Debug)]
pub struct Gesture {
    pub mode: GestureMode,
    pub target: ElementId,
    pub start: Point,
    pub handle: Option<Handle>,
    pub origin: PlacedElement,
}

#[derive(Clone, Debug, Default)]
pub struct Notes {
    pub general: String,
    pub enemy: String,
    pub defense: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub last_color: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            last_color: "none".to_string(),
        }
    }
}

pub struct EditorState {
    pub scene: Scene,
    pub history: SnapshotRing<Vec<PlacedElement>>,
    pub assets: AssetStore,
    pub active_tool: Tool,
    /// Raw value of the color selector; parsed per element kind at placement.
    pub color_choice: String,
    /// First point of a half-placed arrow. Lives outside the scene so the
    /// model never contains an arrow with a single endpoint.
    pub pending_arrow: Option<Point>,
    pub gesture: Option<Gesture>,
    /// Set when a gesture ends; the click delivered by the same pointer
    /// release is consumed instead of placing or deselecting.
    pub suppress_click: bool,
    pub placed_count: usize,
    pub status: String,
    pub notes: Notes,
    pub container_size: Vec2,
    pub settings: UserSettings,
}

impl Default for EditorState {
    fn default() -> Self {
        let settings = UserSettings::load().unwrap_or_default();
        Self {
            scene: Scene::default(),
            history: SnapshotRing::new(Vec::new(), HISTORY_CAPACITY),
            assets: AssetStore::default(),
            active_tool: Tool::Cross,
            color_choice: settings.last_color.clone(),
            pending_arrow: None,
            gesture: None,
            suppress_click: false,
            placed_count: 0,
            status: String::new(),
            notes: Notes::default(),
            container_size: Vec2::ZERO,
            settings,
        }
    }
}

impl EditorState {
    pub fn commit(&mut self) {
        self.history.push(self.scene.snapshot());
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn undo(&mut self) {
        self.gesture = None;
        match self.history.undo() {
            Some(snapshot) => {
                self.scene.restore(snapshot);
                self.status = "Last action undone.".to_string();
            }
            None => {
                self.status = "Nothing to undo.".to_string();
            }
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(selected) = self.scene.selection() else {
            return;
        };
        self.scene.delete(selected);
        self.commit();
        self.status = "Annotation deleted.".to_string();
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.active_tool = tool;
        self.pending_arrow = None;
        self.status = if tool == Tool::Arrow {
            ARROW_START_PROMPT.to_string()
        } else {
            String::new()
        };
    }

    pub fn set_color(&mut self, choice: &str) {
        self.color_choice = choice.to_string();
        self.pending_arrow = None;
        self.settings.last_color = choice.to_string();
        let _ = self.settings.save();
    }

    pub fn background_ready(&self) -> bool {
        self.assets.background.is_ready()
    }

    pub fn tool_ready(&self, tool: Tool) -> bool {
        if !self.background_ready() {
            return false;
        }
        match tool {
            Tool::Icon(name) => self.assets.icon_ready(name),
            _ => true,
        }
    }
}

impl UserSettings {
    fn file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("org", "tacmark", "tacmark")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir).ok()?;
        Some(config_dir.join("settings.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EditorState;
    use crate::element::{Color, ElementKind, Point, ShapeKind, Tool};
    use crate::state::ARROW_START_PROMPT;

    fn place_cross(state: &mut EditorState, x: f32, y: f32) {
        state.scene.create(
            ElementKind::Shape {
                shape: ShapeKind::Cross,
                center: Point::new(x, y),
            },
            Color::None,
        );
        state.commit();
    }

    #[test]
    fn undo_at_the_baseline_is_an_idempotent_no_op() {
        let mut state = EditorState::default();
        place_cross(&mut state, 10.0, 10.0);

        state.undo();
        assert!(state.scene.elements().is_empty());

        for _ in 0..3 {
            state.undo();
            assert!(state.scene.elements().is_empty());
            assert_eq!(state.status, "Nothing to undo.");
        }
    }

    #[test]
    fn delete_selected_commits_one_history_entry() {
        let mut state = EditorState::default();
        place_cross(&mut state, 10.0, 10.0);
        let id = state.scene.elements()[0].id;
        state.scene.select(Some(id));

        state.delete_selected();
        assert!(state.scene.elements().is_empty());

        // One undo returns to the pre-delete scene.
        state.undo();
        assert_eq!(state.scene.elements().len(), 1);
    }

    #[test]
    fn delete_without_selection_changes_nothing() {
        let mut state = EditorState::default();
        place_cross(&mut state, 10.0, 10.0);
        state.status = "previous".to_string();

        state.delete_selected();
        assert_eq!(state.scene.elements().len(), 1);
        assert_eq!(state.status, "previous");
    }

    #[test]
    fn switching_tool_or_color_clears_a_pending_arrow() {
        let mut state = EditorState::default();
        state.set_tool(Tool::Arrow);
        assert_eq!(state.status, ARROW_START_PROMPT);

        state.pending_arrow = Some(Point::new(5.0, 5.0));
        state.set_tool(Tool::Cross);
        assert_eq!(state.pending_arrow, None);

        state.set_tool(Tool::Arrow);
        state.pending_arrow = Some(Point::new(5.0, 5.0));
        state.set_color("red");
        assert_eq!(state.pending_arrow, None);
    }
}
