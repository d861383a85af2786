use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use egui::{ColorImage, Context as EguiContext, TextureHandle, TextureOptions, Vec2};
use image::DynamicImage;
use log::{error, info};

use crate::element::ICON_NAMES;

pub struct AssetImage {
    pub dynamic: DynamicImage,
    pub texture: Option<TextureHandle>,
}

impl AssetImage {
    pub fn new(dynamic: DynamicImage) -> Self {
        Self {
            dynamic,
            texture: None,
        }
    }

    pub fn size_vec2(&self) -> Vec2 {
        Vec2::new(self.dynamic.width() as f32, self.dynamic.height() as f32)
    }

    pub fn ensure_texture(&mut self, ctx: &EguiContext, name: &str) {
        if self.texture.is_some() {
            return;
        }
        let rgba = self.dynamic.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        self.texture = Some(ctx.load_texture(name, color, TextureOptions::LINEAR));
    }
}

/// Every image starts out Loading; a failed decode pins the slot to Failed
/// for the rest of the session, which keeps the matching tool disabled.
pub enum AssetSlot {
    Loading,
    Ready(AssetImage),
    Failed,
}

impl AssetSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn image(&self) -> Option<&AssetImage> {
        match self {
            Self::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn image_mut(&mut self) -> Option<&mut AssetImage> {
        match self {
            Self::Ready(image) => Some(image),
            _ => None,
        }
    }
}

pub enum AssetEvent {
    BackgroundLoaded(DynamicImage),
    BackgroundFailed(String),
    IconLoaded {
        name: &'static str,
        image: DynamicImage,
    },
    IconFailed {
        name: &'static str,
        error: String,
    },
}

pub struct AssetStore {
    pub background: AssetSlot,
    icons: Vec<(&'static str, AssetSlot)>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self {
            background: AssetSlot::Loading,
            icons: ICON_NAMES
                .iter()
                .map(|name| (*name, AssetSlot::Loading))
                .collect(),
        }
    }
}

impl AssetStore {
    pub fn apply(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::BackgroundLoaded(image) => {
                info!(
                    "background image loaded ({}x{})",
                    image.width(),
                    image.height()
                );
                self.background = AssetSlot::Ready(AssetImage::new(image));
            }
            AssetEvent::BackgroundFailed(message) => {
                error!("background image failed to load: {message}");
                self.background = AssetSlot::Failed;
            }
            AssetEvent::IconLoaded { name, image } => {
                info!("icon '{name}' loaded ({}x{})", image.width(), image.height());
                if let Some(slot) = self.icon_slot_mut(name) {
                    *slot = AssetSlot::Ready(AssetImage::new(image));
                }
            }
            AssetEvent::IconFailed { name, error } => {
                error!("icon '{name}' failed to load: {error}");
                if let Some(slot) = self.icon_slot_mut(name) {
                    *slot = AssetSlot::Failed;
                }
            }
        }
    }

    /// Natural size of the background, once it has loaded.
    pub fn background_size(&self) -> Option<Vec2> {
        self.background.image().map(AssetImage::size_vec2)
    }

    pub fn icon(&self, name: &str) -> Option<&AssetSlot> {
        self.icons
            .iter()
            .find(|(icon_name, _)| *icon_name == name)
            .map(|(_, slot)| slot)
    }

    fn icon_slot_mut(&mut self, name: &str) -> Option<&mut AssetSlot> {
        self.icons
            .iter_mut()
            .find(|(icon_name, _)| *icon_name == name)
            .map(|(_, slot)| slot)
    }

    pub fn icon_image_mut(&mut self, name: &str) -> Option<&mut AssetImage> {
        self.icon_slot_mut(name).and_then(AssetSlot::image_mut)
    }

    pub fn icon_ready(&self, name: &str) -> bool {
        self.icon(name).is_some_and(AssetSlot::is_ready)
    }

    pub fn icon_size(&self, name: &str) -> Option<Vec2> {
        self.icon(name)
            .and_then(AssetSlot::image)
            .map(AssetImage::size_vec2)
    }
}

/// Decodes the background and icon images off the UI thread and reports each
/// result over a channel drained once per frame.
pub struct AssetLoader {
    rx: Receiver<AssetEvent>,
    _worker: thread::JoinHandle<()>,
}

impl AssetLoader {
    pub fn spawn(assets_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel::<AssetEvent>();
        let worker = thread::spawn(move || loader_loop(tx, &assets_dir));
        Self {
            rx,
            _worker: worker,
        }
    }

    pub fn try_recv(&self) -> Option<AssetEvent> {
        self.rx.try_recv().ok()
    }
}

fn loader_loop(tx: Sender<AssetEvent>, assets_dir: &Path) {
    let background_path = assets_dir.join("background.png");
    let event = match load_image(&background_path) {
        Ok(image) => AssetEvent::BackgroundLoaded(image),
        Err(err) => AssetEvent::BackgroundFailed(format!("{err:#}")),
    };
    if tx.send(event).is_err() {
        return;
    }

    for &name in ICON_NAMES {
        let icon_path = assets_dir.join("icons").join(format!("{name}.png"));
        let event = match load_image(&icon_path) {
            Ok(image) => AssetEvent::IconLoaded { name, image },
            Err(err) => AssetEvent::IconFailed {
                name,
                error: format!("{err:#}"),
            },
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}

fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("cannot decode {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{AssetEvent, AssetStore};
    use image::DynamicImage;

    #[test]
    fn icons_become_ready_independently() {
        let mut store = AssetStore::default();
        assert!(!store.icon_ready("fixer"));

        store.apply(AssetEvent::IconLoaded {
            name: "fixer",
            image: DynamicImage::new_rgba8(48, 32),
        });
        assert!(store.icon_ready("fixer"));
        assert!(!store.icon_ready("semparer_de"));
        assert_eq!(store.icon_size("fixer").map(|s| (s.x, s.y)), Some((48.0, 32.0)));
    }

    #[test]
    fn failed_icon_stays_disabled() {
        let mut store = AssetStore::default();
        store.apply(AssetEvent::IconFailed {
            name: "detruire",
            error: "missing file".to_string(),
        });
        assert!(!store.icon_ready("detruire"));
        assert!(store.icon("detruire").is_some());
    }

    #[test]
    fn background_size_requires_a_loaded_image() {
        let mut store = AssetStore::default();
        assert_eq!(store.background_size(), None);
        store.apply(AssetEvent::BackgroundLoaded(DynamicImage::new_rgba8(800, 600)));
        assert_eq!(
            store.background_size().map(|s| (s.x, s.y)),
            Some((800.0, 600.0))
        );
    }
}
