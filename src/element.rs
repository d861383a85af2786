use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

pub type ElementId = u64;

/// Smallest width/height a resize gesture may produce.
pub const MIN_ELEMENT_SIZE: f32 = 20.0;
/// Intrinsic edge length of the fixed-size shape glyphs.
pub const SHAPE_SIZE: f32 = 36.0;
/// Stroke thickness used when drawing and exporting arrows.
pub const ARROW_STROKE: f32 = 4.0;
/// Distance between an element's top edge and its rotate handle.
pub const ROTATE_HANDLE_OFFSET: f32 = 22.0;

/// Icon subtypes available in the placement toolbar. Each name doubles as the
/// file stem of its image under the assets directory.
pub const ICON_NAMES: &[&str] = &["semparer_de", "fixer", "detruire", "reconnaitre"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Cross,
    Circle,
    Icon(&'static str),
    Arrow,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Cross,
    Circle,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    None,
    Red,
    Blue,
}

impl Color {
    pub fn for_shape(selector: &str) -> Self {
        match selector {
            "red" => Self::Red,
            "blue" => Self::Blue,
            _ => Self::None,
        }
    }

    /// Arrows historically treat anything that is not "red" as blue, including
    /// the "none" selection and unrecognized values.
    pub fn for_arrow(selector: &str) -> Self {
        match selector {
            "red" => Self::Red,
            _ => Self::Blue,
        }
    }

    pub fn color32(self) -> egui::Color32 {
        match self {
            Self::None => egui::Color32::from_rgb(0x23, 0x26, 0x2E),
            Self::Red => egui::Color32::from_rgb(0xE5, 0x3E, 0x3E),
            Self::Blue => egui::Color32::from_rgb(0x31, 0x82, 0xCE),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn from_pos2(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }

    pub fn delta(self, other: Point) -> Vec2 {
        Vec2::new(other.x - self.x, other.y - self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Rotate,
    ArrowStart,
    ArrowEnd,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    Shape {
        shape: ShapeKind,
        center: Point,
    },
    Icon {
        name: String,
        center: Point,
        width: f32,
        height: f32,
    },
    Arrow {
        start: Point,
        end: Point,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub color: Color,
    pub rotation: f32,
}

impl PlacedElement {
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ElementKind::Shape { center, .. } => {
                Rect::from_center_size(center.to_pos2(), Vec2::splat(SHAPE_SIZE))
            }
            ElementKind::Icon {
                center,
                width,
                height,
                ..
            } => Rect::from_center_size(center.to_pos2(), Vec2::new(*width, *height)),
            ElementKind::Arrow { start, end } => {
                Rect::from_two_pos(start.to_pos2(), end.to_pos2()).expand(ARROW_STROKE + 2.0)
            }
        }
    }

    pub fn contains(&self, point: Point, tolerance: f32) -> bool {
        let p = point.to_pos2();
        match &self.kind {
            ElementKind::Shape { .. } | ElementKind::Icon { .. } => {
                self.bounds().expand(tolerance).contains(p)
            }
            ElementKind::Arrow { start, end } => {
                distance_to_segment(p, start.to_pos2(), end.to_pos2())
                    <= tolerance + ARROW_STROKE
            }
        }
    }

    pub fn move_by(&mut self, delta: Vec2) {
        let move_point = |p: &mut Point| {
            p.x += delta.x;
            p.y += delta.y;
        };
        match &mut self.kind {
            ElementKind::Shape { center, .. } | ElementKind::Icon { center, .. } => {
                move_point(center)
            }
            ElementKind::Arrow { start, end } => {
                move_point(start);
                move_point(end);
            }
        }
    }

    /// Rotation is a pure render transform for shapes and icons; an arrow's
    /// orientation is derived from its endpoints and cannot be set directly.
    pub fn set_rotation(&mut self, degrees: f32) {
        match self.kind {
            ElementKind::Shape { .. } | ElementKind::Icon { .. } => self.rotation = degrees,
            ElementKind::Arrow { .. } => {}
        }
    }

    /// Effective orientation in degrees, including the derived arrow angle.
    pub fn effective_rotation(&self) -> f32 {
        match &self.kind {
            ElementKind::Arrow { start, end } => {
                (end.y - start.y).atan2(end.x - start.x).to_degrees()
            }
            _ => self.rotation,
        }
    }

    pub fn handles(&self) -> Vec<(Handle, Point)> {
        match &self.kind {
            ElementKind::Shape { .. } => vec![(Handle::Rotate, self.rotate_handle_pos())],
            ElementKind::Icon { .. } => {
                let r = self.bounds();
                vec![
                    (Handle::TopLeft, Point::from_pos2(r.left_top())),
                    (Handle::TopRight, Point::from_pos2(r.right_top())),
                    (Handle::BottomLeft, Point::from_pos2(r.left_bottom())),
                    (Handle::BottomRight, Point::from_pos2(r.right_bottom())),
                    (Handle::Rotate, self.rotate_handle_pos()),
                ]
            }
            ElementKind::Arrow { start, end } => {
                vec![(Handle::ArrowStart, *start), (Handle::ArrowEnd, *end)]
            }
        }
    }

    fn rotate_handle_pos(&self) -> Point {
        let r = self.bounds();
        Point::new(r.center().x, r.top() - ROTATE_HANDLE_OFFSET)
    }

    /// Corner resize relative to the element's geometry at gesture start; the
    /// caller restores that geometry before re-applying the current delta.
    /// Width and height clamp at MIN_ELEMENT_SIZE and the edges opposite the
    /// grabbed corner never move, even when the clamp engages.
    pub fn resize_from_handle(&mut self, handle: Handle, delta: Vec2) {
        match &mut self.kind {
            ElementKind::Icon {
                center,
                width,
                height,
                ..
            } => {
                let left = center.x - *width * 0.5;
                let top = center.y - *height * 0.5;
                let right = left + *width;
                let bottom = top + *height;

                let (new_w, new_left) = match handle {
                    Handle::TopLeft | Handle::BottomLeft => {
                        let w = (*width - delta.x).max(MIN_ELEMENT_SIZE);
                        (w, right - w)
                    }
                    Handle::TopRight | Handle::BottomRight => {
                        ((*width + delta.x).max(MIN_ELEMENT_SIZE), left)
                    }
                    _ => return,
                };
                let (new_h, new_top) = match handle {
                    Handle::TopLeft | Handle::TopRight => {
                        let h = (*height - delta.y).max(MIN_ELEMENT_SIZE);
                        (h, bottom - h)
                    }
                    Handle::BottomLeft | Handle::BottomRight => {
                        ((*height + delta.y).max(MIN_ELEMENT_SIZE), top)
                    }
                    _ => return,
                };

                *width = new_w;
                *height = new_h;
                *center = Point::new(new_left + new_w * 0.5, new_top + new_h * 0.5);
            }
            ElementKind::Arrow { start, end } => match handle {
                Handle::ArrowStart => {
                    start.x += delta.x;
                    start.y += delta.y;
                }
                Handle::ArrowEnd => {
                    end.x += delta.x;
                    end.y += delta.y;
                }
                _ => {}
            },
            ElementKind::Shape { .. } => {}
        }
    }
}

fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let ap = point - a;
    let ab_len_sq = ab.length_sq();
    if ab_len_sq <= f32::EPSILON {
        return ap.length();
    }
    let t = (ap.dot(ab) / ab_len_sq).clamp(0.0, 1.0);
    let projection = a + ab * t;
    (point - projection).length()
}

#[cfg(test)]
mod tests {
    use super::{
        Color, ElementKind, Handle, PlacedElement, Point, ShapeKind, MIN_ELEMENT_SIZE, SHAPE_SIZE,
    };
    use egui::Vec2;

    fn icon(center: Point, width: f32, height: f32) -> PlacedElement {
        PlacedElement {
            id: 1,
            kind: ElementKind::Icon {
                name: "fixer".to_string(),
                center,
                width,
                height,
            },
            color: Color::None,
            rotation: 0.0,
        }
    }

    #[test]
    fn shape_bounds_are_fixed_size() {
        let shape = PlacedElement {
            id: 1,
            kind: ElementKind::Shape {
                shape: ShapeKind::Cross,
                center: Point::new(100.0, 80.0),
            },
            color: Color::Red,
            rotation: 0.0,
        };
        let bounds = shape.bounds();
        assert_eq!(bounds.width(), SHAPE_SIZE);
        assert_eq!(bounds.height(), SHAPE_SIZE);
        assert_eq!(bounds.center().x, 100.0);
    }

    #[test]
    fn bottom_right_resize_keeps_top_left_fixed() {
        let mut element = icon(Point::new(100.0, 100.0), 60.0, 40.0);
        element.resize_from_handle(Handle::BottomRight, Vec2::new(20.0, 10.0));
        let bounds = element.bounds();
        assert_eq!(bounds.left(), 70.0);
        assert_eq!(bounds.top(), 80.0);
        assert_eq!(bounds.width(), 80.0);
        assert_eq!(bounds.height(), 50.0);
    }

    #[test]
    fn top_left_resize_keeps_bottom_right_fixed() {
        let mut element = icon(Point::new(100.0, 100.0), 60.0, 40.0);
        element.resize_from_handle(Handle::TopLeft, Vec2::new(-10.0, -6.0));
        let bounds = element.bounds();
        assert_eq!(bounds.right(), 130.0);
        assert_eq!(bounds.bottom(), 120.0);
        assert_eq!(bounds.width(), 70.0);
        assert_eq!(bounds.height(), 46.0);
    }

    #[test]
    fn resize_clamps_without_moving_fixed_edges() {
        let mut element = icon(Point::new(100.0, 100.0), 60.0, 40.0);
        // Pull the top-left corner far past the bottom-right one.
        element.resize_from_handle(Handle::TopLeft, Vec2::new(500.0, 500.0));
        let bounds = element.bounds();
        assert_eq!(bounds.width(), MIN_ELEMENT_SIZE);
        assert_eq!(bounds.height(), MIN_ELEMENT_SIZE);
        assert_eq!(bounds.right(), 130.0);
        assert_eq!(bounds.bottom(), 120.0);
    }

    #[test]
    fn arrow_hit_test_follows_the_segment() {
        let arrow = PlacedElement {
            id: 1,
            kind: ElementKind::Arrow {
                start: Point::new(0.0, 0.0),
                end: Point::new(100.0, 0.0),
            },
            color: Color::Blue,
            rotation: 0.0,
        };
        assert!(arrow.contains(Point::new(50.0, 2.0), 2.0));
        assert!(!arrow.contains(Point::new(50.0, 30.0), 2.0));
    }

    #[test]
    fn arrow_rotation_is_derived_not_assignable() {
        let mut arrow = PlacedElement {
            id: 1,
            kind: ElementKind::Arrow {
                start: Point::new(0.0, 0.0),
                end: Point::new(0.0, 50.0),
            },
            color: Color::Blue,
            rotation: 0.0,
        };
        arrow.set_rotation(45.0);
        assert_eq!(arrow.rotation, 0.0);
        assert_eq!(arrow.effective_rotation(), 90.0);
    }

    #[test]
    fn color_fallback_is_asymmetric() {
        assert_eq!(Color::for_shape("red"), Color::Red);
        assert_eq!(Color::for_shape("none"), Color::None);
        assert_eq!(Color::for_shape("chartreuse"), Color::None);
        assert_eq!(Color::for_arrow("red"), Color::Red);
        assert_eq!(Color::for_arrow("none"), Color::Blue);
        assert_eq!(Color::for_arrow("chartreuse"), Color::Blue);
    }
}
