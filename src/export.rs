use anyhow::Result;
use serde::Serialize;

use crate::element::{Color, ElementKind, PlacedElement, ShapeKind, ARROW_STROKE, SHAPE_SIZE};
use crate::scene::Scene;
use crate::state::Notes;

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
}

/// One exported element, tagged by kind. Shapes and icons carry their center
/// and subtype; arrows carry endpoints, their derived orientation, their
/// length as `width` and the drawn stroke thickness as `height`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementRecord {
    Shape {
        subtype: ShapeKind,
        color: Color,
        rotation: f32,
        width: f32,
        height: f32,
        x: f32,
        y: f32,
    },
    Icon {
        subtype: String,
        color: Color,
        rotation: f32,
        width: f32,
        height: f32,
        x: f32,
        y: f32,
    },
    Arrow {
        color: Color,
        rotation: f32,
        width: f32,
        height: f32,
        start: PointRecord,
        end: PointRecord,
    },
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ExportRecord {
    pub notes: String,
    #[serde(rename = "notesENI")]
    pub notes_eni: String,
    #[serde(rename = "notesDefense")]
    pub notes_defense: String,
    pub elements: Vec<ElementRecord>,
}

/// Walks the scene in creation order; the output is deterministic for a given
/// scene and note fields.
pub fn export_scene(scene: &Scene, notes: &Notes) -> ExportRecord {
    ExportRecord {
        notes: notes.general.clone(),
        notes_eni: notes.enemy.clone(),
        notes_defense: notes.defense.clone(),
        elements: scene.elements().iter().map(element_record).collect(),
    }
}

pub fn to_json(record: &ExportRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

fn element_record(element: &PlacedElement) -> ElementRecord {
    match &element.kind {
        ElementKind::Shape { shape, center } => ElementRecord::Shape {
            subtype: *shape,
            color: element.color,
            rotation: element.rotation,
            width: SHAPE_SIZE,
            height: SHAPE_SIZE,
            x: center.x,
            y: center.y,
        },
        ElementKind::Icon {
            name,
            center,
            width,
            height,
        } => ElementRecord::Icon {
            subtype: name.clone(),
            color: element.color,
            rotation: element.rotation,
            width: *width,
            height: *height,
            x: center.x,
            y: center.y,
        },
        ElementKind::Arrow { start, end } => ElementRecord::Arrow {
            color: element.color,
            rotation: element.effective_rotation(),
            width: start.delta(*end).length(),
            height: ARROW_STROKE,
            start: PointRecord {
                x: start.x,
                y: start.y,
            },
            end: PointRecord { x: end.x, y: end.y },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{export_scene, to_json};
    use crate::element::{Color, ElementKind, Point, ShapeKind};
    use crate::scene::Scene;
    use crate::state::Notes;

    fn sample_scene() -> Scene {
        let mut scene = Scene::default();
        scene.create(
            ElementKind::Shape {
                shape: ShapeKind::Cross,
                center: Point::new(100.0, 100.0),
            },
            Color::Red,
        );
        scene.create(
            ElementKind::Icon {
                name: "fixer".to_string(),
                center: Point::new(200.0, 150.0),
                width: 64.0,
                height: 64.0,
            },
            Color::Blue,
        );
        scene.create(
            ElementKind::Arrow {
                start: Point::new(50.0, 50.0),
                end: Point::new(80.0, 90.0),
            },
            Color::Blue,
        );
        scene
    }

    fn sample_notes() -> Notes {
        Notes {
            general: "A".to_string(),
            enemy: "B".to_string(),
            defense: "C".to_string(),
        }
    }

    #[test]
    fn export_carries_all_elements_and_note_fields() {
        let record = export_scene(&sample_scene(), &sample_notes());
        let json = to_json(&record).expect("export serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("export parses back");

        assert_eq!(value["notes"], "A");
        assert_eq!(value["notesENI"], "B");
        assert_eq!(value["notesDefense"], "C");

        let elements = value["elements"].as_array().expect("elements array");
        assert_eq!(elements.len(), 3);

        assert_eq!(elements[0]["type"], "shape");
        assert_eq!(elements[0]["subtype"], "cross");
        assert_eq!(elements[0]["color"], "red");
        assert_eq!(elements[0]["x"], 100.0);
        assert_eq!(elements[0]["y"], 100.0);

        assert_eq!(elements[1]["type"], "icon");
        assert_eq!(elements[1]["subtype"], "fixer");
        assert_eq!(elements[1]["color"], "blue");
        assert_eq!(elements[1]["x"], 200.0);
        assert_eq!(elements[1]["y"], 150.0);

        assert_eq!(elements[2]["type"], "arrow");
        assert_eq!(elements[2]["start"]["x"], 50.0);
        assert_eq!(elements[2]["start"]["y"], 50.0);
        assert_eq!(elements[2]["end"]["x"], 80.0);
        assert_eq!(elements[2]["end"]["y"], 90.0);
        assert_eq!(elements[2]["height"], 4.0);
        assert_eq!(elements[2]["width"], 50.0);
    }

    #[test]
    fn export_is_deterministic() {
        let scene = sample_scene();
        let notes = sample_notes();
        let first = to_json(&export_scene(&scene, &notes)).expect("first export");
        let second = to_json(&export_scene(&scene, &notes)).expect("second export");
        assert_eq!(first, second);
    }

    #[test]
    fn deleted_elements_disappear_from_export() {
        let mut scene = sample_scene();
        let icon_id = scene.elements()[1].id;
        assert!(scene.delete(icon_id));

        let record = export_scene(&scene, &sample_notes());
        assert_eq!(record.elements.len(), 2);
        let json = to_json(&record).expect("export serializes");
        assert!(!json.contains("fixer"));
    }
}
