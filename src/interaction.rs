use crate::element::{Color, ElementKind, Handle, Point, ShapeKind, Tool};
use crate::geometry;
use crate::state::{EditorState, Gesture, GestureMode, ARROW_END_PROMPT};

/// Pointer distance within which a handle counts as grabbed.
const HANDLE_GRAB_RADIUS: f32 = 10.0;
/// Hit tolerance for element bodies.
const BODY_HIT_TOLERANCE: f32 = 6.0;

/// Classifies a pointer-down in container-local coordinates: the selected
/// element's handles win over element bodies, bodies win over the canvas.
pub fn pointer_down(state: &mut EditorState, pos: Point) {
    if state.gesture.is_some() {
        return;
    }

    if let Some(selected_id) = state.scene.selection() {
        if let Some(handle) = handle_hit(state, selected_id, pos) {
            let Some(origin) = state.scene.get(selected_id).cloned() else {
                return;
            };
            let mode = if handle == Handle::Rotate {
                GestureMode::Rotate
            } else {
                GestureMode::Resize
            };
            state.gesture = Some(Gesture {
                mode,
                target: selected_id,
                start: pos,
                handle: Some(handle),
                origin,
            });
            return;
        }
    }

    match state.scene.hit_test(pos, BODY_HIT_TOLERANCE) {
        Some(hit_id) => {
            state.scene.select(Some(hit_id));
            let Some(origin) = state.scene.get(hit_id).cloned() else {
                return;
            };
            state.gesture = Some(Gesture {
                mode: GestureMode::Move,
                target: hit_id,
                start: pos,
                handle: None,
                origin,
            });
        }
        None => state.scene.select(None),
    }
}

pub fn pointer_moved(state: &mut EditorState, pos: Point) {
    let Some(gesture) = state.gesture.clone() else {
        return;
    };
    let delta = gesture.start.delta(pos);
    let Some(element) = state.scene.get_mut(gesture.target) else {
        return;
    };

    *element = gesture.origin.clone();
    match gesture.mode {
        GestureMode::Move => element.move_by(delta),
        GestureMode::Resize => {
            if let Some(handle) = gesture.handle {
                element.resize_from_handle(handle, delta);
            }
        }
        GestureMode::Rotate => {
            let center = gesture.origin.bounds().center();
            let initial = (gesture.start.y - center.y).atan2(gesture.start.x - center.x);
            let current = (pos.y - center.y).atan2(pos.x - center.x);
            element.set_rotation(gesture.origin.rotation + (current - initial).to_degrees());
        }
    }
}

/// Ends the active gesture: commits a snapshot when the element actually
/// changed, and arms the click-suppression guard either way so the click
/// delivered by the same release cannot place or deselect.
pub fn pointer_up(state: &mut EditorState) {
    let Some(gesture) = state.gesture.take() else {
        return;
    };
    let changed = state
        .scene
        .get(gesture.target)
        .map(|element| *element != gesture.origin)
        .unwrap_or(false);
    if changed {
        state.commit();
    }
    state.suppress_click = true;
}

pub fn canvas_click(state: &mut EditorState, pos: Point) {
    if state.suppress_click {
        state.suppress_click = false;
        return;
    }

    if let Some(hit_id) = state.scene.hit_test(pos, BODY_HIT_TOLERANCE) {
        state.scene.select(Some(hit_id));
        return;
    }

    let viewport = geometry::contain_fit(state.container_size, state.assets.background_size());
    if viewport.is_empty() {
        state.status = "The background image has not loaded yet. Please try again.".to_string();
        return;
    }
    if !viewport.contains(pos) {
        state.status = "Please click on the image.".to_string();
        return;
    }

    match state.active_tool {
        Tool::Cross => place_shape(state, ShapeKind::Cross, pos),
        Tool::Circle => place_shape(state, ShapeKind::Circle, pos),
        Tool::Icon(name) => place_icon(state, name, pos),
        Tool::Arrow => place_arrow_point(state, pos),
    }
}

fn place_shape(state: &mut EditorState, shape: ShapeKind, pos: Point) {
    let color = Color::for_shape(&state.color_choice);
    state.scene.create(ElementKind::Shape { shape, center: pos }, color);
    state.commit();
    state.placed_count += 1;
    state.status = format!("You have placed {} shape(s) or arrow(s).", state.placed_count);
}

fn place_icon(state: &mut EditorState, name: &'static str, pos: Point) {
    let Some(size) = state.assets.icon_size(name) else {
        state.status = "The icon image has not loaded yet. Please try again.".to_string();
        return;
    };
    let color = Color::for_shape(&state.color_choice);
    state.scene.create(
        ElementKind::Icon {
            name: name.to_string(),
            center: pos,
            width: size.x,
            height: size.y,
        },
        color,
    );
    state.commit();
    state.placed_count += 1;
    state.status = format!("You have placed {} shape(s) or icon(s).", state.placed_count);
}

fn place_arrow_point(state: &mut EditorState, pos: Point) {
    match state.pending_arrow.take() {
        None => {
            state.pending_arrow = Some(pos);
            state.status = ARROW_END_PROMPT.to_string();
        }
        Some(start) => {
            let color = Color::for_arrow(&state.color_choice);
            state.scene.create(ElementKind::Arrow { start, end: pos }, color);
            state.commit();
            state.placed_count += 1;
            state.status = format!("You have placed {} shape(s) or arrow(s).", state.placed_count);
        }
    }
}

fn handle_hit(state: &EditorState, id: crate::element::ElementId, pos: Point) -> Option<Handle> {
    let element = state.scene.get(id)?;
    element
        .handles()
        .into_iter()
        .find(|(_, point)| point.delta(pos).length() <= HANDLE_GRAB_RADIUS)
        .map(|(handle, _)| handle)
}
