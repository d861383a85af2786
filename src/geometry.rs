use egui::{Pos2, Rect, Vec2};

use crate::element::Point;

/// Rendered rectangle of the background image inside its container under
/// contain-fit scaling, in container-local pixels. Zero-sized until the
/// image's natural dimensions are known.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageViewport {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageViewport {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether a container-local point lands on the rendered image. Edges are
    /// inclusive; an empty viewport contains nothing.
    pub fn contains(&self, point: Point) -> bool {
        if self.is_empty() {
            return false;
        }
        point.x >= self.offset_x
            && point.x <= self.offset_x + self.width
            && point.y >= self.offset_y
            && point.y <= self.offset_y + self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.offset_x, self.offset_y),
            Vec2::new(self.width, self.height),
        )
    }
}

/// The binding axis is chosen by comparing aspect ratios: a container wider
/// than the image is height-bound, otherwise width-bound. The image is
/// centered on the remaining axis.
pub fn contain_fit(container: Vec2, natural: Option<Vec2>) -> ImageViewport {
    let Some(natural) = natural else {
        return ImageViewport::default();
    };
    if container.x <= 0.0 || container.y <= 0.0 || natural.x <= 0.0 || natural.y <= 0.0 {
        return ImageViewport::default();
    }

    let container_ratio = container.x / container.y;
    let image_ratio = natural.x / natural.y;

    let (width, height) = if container_ratio > image_ratio {
        let height = container.y;
        (height * image_ratio, height)
    } else {
        let width = container.x;
        (width, width / image_ratio)
    };

    ImageViewport {
        offset_x: (container.x - width) * 0.5,
        offset_y: (container.y - height) * 0.5,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::{contain_fit, ImageViewport};
    use crate::element::Point;
    use egui::Vec2;

    #[test]
    fn wide_container_is_height_bound_and_centered() {
        let viewport = contain_fit(Vec2::new(1000.0, 500.0), Some(Vec2::new(400.0, 400.0)));
        assert_eq!(viewport.height, 500.0);
        assert_eq!(viewport.width, 500.0);
        assert_eq!(viewport.offset_x, 250.0);
        assert_eq!(viewport.offset_y, 0.0);
    }

    #[test]
    fn tall_container_is_width_bound_and_centered() {
        let viewport = contain_fit(Vec2::new(400.0, 1000.0), Some(Vec2::new(800.0, 400.0)));
        assert_eq!(viewport.width, 400.0);
        assert_eq!(viewport.height, 200.0);
        assert_eq!(viewport.offset_x, 0.0);
        assert_eq!(viewport.offset_y, 400.0);
    }

    #[test]
    fn rendered_rect_fits_and_touches_the_container() {
        let cases = [
            (Vec2::new(1000.0, 500.0), Vec2::new(400.0, 400.0)),
            (Vec2::new(500.0, 1000.0), Vec2::new(400.0, 400.0)),
            (Vec2::new(640.0, 480.0), Vec2::new(1920.0, 1080.0)),
            (Vec2::new(480.0, 640.0), Vec2::new(1080.0, 1920.0)),
            (Vec2::new(800.0, 600.0), Vec2::new(800.0, 600.0)),
        ];
        for (container, natural) in cases {
            let v = contain_fit(container, Some(natural));
            assert!(v.width <= container.x + 0.01 && v.height <= container.y + 0.01);
            assert!(v.offset_x >= -0.01 && v.offset_y >= -0.01);
            let touches_x = (v.width - container.x).abs() < 0.01;
            let touches_y = (v.height - container.y).abs() < 0.01;
            assert!(touches_x || touches_y, "no axis touched for {container:?}");
        }
    }

    #[test]
    fn unknown_natural_size_yields_empty_viewport() {
        let viewport = contain_fit(Vec2::new(800.0, 600.0), None);
        assert_eq!(viewport, ImageViewport::default());
        assert!(!viewport.contains(Point::new(0.0, 0.0)));
        assert!(!viewport.contains(Point::new(400.0, 300.0)));
    }

    #[test]
    fn edges_are_inclusive() {
        let viewport = contain_fit(Vec2::new(1000.0, 500.0), Some(Vec2::new(400.0, 400.0)));
        assert!(viewport.contains(Point::new(250.0, 0.0)));
        assert!(viewport.contains(Point::new(750.0, 500.0)));
        assert!(!viewport.contains(Point::new(249.0, 10.0)));
        assert!(!viewport.contains(Point::new(751.0, 10.0)));
    }
}
