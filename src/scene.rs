use crate::element::{Color, ElementId, ElementKind, PlacedElement, Point};

/// The placed elements of the current session. The scene owns identity
/// allocation and the at-most-one-selection invariant; the interaction layer
/// is its only writer and the renderer/exporter read it.
#[derive(Debug, Default)]
pub struct Scene {
    elements: Vec<PlacedElement>,
    selection: Option<ElementId>,
    next_id: ElementId,
}

impl Scene {
    pub fn create(&mut self, kind: ElementKind, color: Color) -> ElementId {
        self.next_id += 1;
        let id = self.next_id;
        self.elements.push(PlacedElement {
            id,
            kind,
            color,
            rotation: 0.0,
        });
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&PlacedElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut PlacedElement> {
        self.elements.iter_mut().find(|element| element.id == id)
    }

    pub fn delete(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|element| element.id != id);
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.elements.len() != before
    }

    pub fn select(&mut self, id: Option<ElementId>) {
        self.selection = id.filter(|id| self.get(*id).is_some());
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn selected(&self) -> Option<&PlacedElement> {
        self.selection.and_then(|id| self.get(id))
    }

    /// Elements in creation order (also the rendering and export order).
    pub fn elements(&self) -> &[PlacedElement] {
        &self.elements
    }

    /// Topmost element under the point, honoring draw order.
    pub fn hit_test(&self, point: Point, tolerance: f32) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|element| element.contains(point, tolerance))
            .map(|element| element.id)
    }

    pub fn snapshot(&self) -> Vec<PlacedElement> {
        self.elements.clone()
    }

    /// The id allocator is deliberately not part of a snapshot, so restoring
    /// an older scene can never lead to id reuse.
    pub fn restore(&mut self, snapshot: Vec<PlacedElement>) {
        self.elements = snapshot;
        self.selection = self.selection.filter(|id| self.get(*id).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::Scene;
    use crate::element::{Color, ElementKind, Point, ShapeKind};

    fn cross_at(x: f32, y: f32) -> ElementKind {
        ElementKind::Shape {
            shape: ShapeKind::Cross,
            center: Point::new(x, y),
        }
    }

    #[test]
    fn ids_are_never_reused_after_delete_or_restore() {
        let mut scene = Scene::default();
        let first = scene.create(cross_at(10.0, 10.0), Color::Red);
        let snapshot = scene.snapshot();
        let second = scene.create(cross_at(20.0, 20.0), Color::Red);
        assert!(scene.delete(second));
        scene.restore(snapshot);

        let third = scene.create(cross_at(30.0, 30.0), Color::Red);
        assert!(third > second);
        assert!(second > first);
    }

    #[test]
    fn selection_is_single_and_validated() {
        let mut scene = Scene::default();
        let a = scene.create(cross_at(10.0, 10.0), Color::None);
        let b = scene.create(cross_at(20.0, 20.0), Color::None);

        scene.select(Some(a));
        scene.select(Some(b));
        assert_eq!(scene.selection(), Some(b));

        scene.select(Some(9999));
        assert_eq!(scene.selection(), None);
    }

    #[test]
    fn deleting_the_selected_element_clears_selection() {
        let mut scene = Scene::default();
        let id = scene.create(cross_at(10.0, 10.0), Color::None);
        scene.select(Some(id));
        assert!(scene.delete(id));
        assert_eq!(scene.selection(), None);
        assert!(scene.elements().is_empty());
    }

    #[test]
    fn restore_drops_dangling_selection() {
        let mut scene = Scene::default();
        let empty = scene.snapshot();
        let id = scene.create(cross_at(10.0, 10.0), Color::None);
        scene.select(Some(id));
        scene.restore(empty);
        assert_eq!(scene.selection(), None);
    }

    #[test]
    fn hit_test_prefers_the_topmost_element() {
        let mut scene = Scene::default();
        let below = scene.create(cross_at(50.0, 50.0), Color::None);
        let above = scene.create(cross_at(52.0, 52.0), Color::None);
        assert_eq!(scene.hit_test(Point::new(51.0, 51.0), 4.0), Some(above));
        assert!(scene.delete(above));
        assert_eq!(scene.hit_test(Point::new(51.0, 51.0), 4.0), Some(below));
    }
}
