use egui::epaint::Vertex;
use egui::{
    vec2, Align2, Color32, Context, FontId, Mesh, Pos2, Rect, Response, Sense, Shape, Stroke, Ui,
    Vec2,
};

use crate::assets::{AssetSlot, AssetStore};
use crate::element::{
    ElementKind, Handle, PlacedElement, Point, ShapeKind, ARROW_STROKE, SHAPE_SIZE,
};
use crate::geometry;
use crate::interaction;
use crate::state::EditorState;
use crate::theme;

pub fn show_canvas(ui: &mut Ui, ctx: &Context, state: &mut EditorState) {
    let theme = theme::dark_theme();
    let (canvas_rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    state.container_size = canvas_rect.size();

    let background_texture = match state.assets.background.image_mut() {
        Some(image) => {
            image.ensure_texture(ctx, "background");
            image.texture.as_ref().map(|texture| texture.id())
        }
        None => None,
    };
    ensure_icon_textures(ctx, state);

    let painter = ui.painter_at(canvas_rect);
    painter.rect_filled(canvas_rect, 12.0, theme.surfaces.canvas_bg);

    let viewport = geometry::contain_fit(state.container_size, state.assets.background_size());
    match background_texture {
        Some(texture_id) if !viewport.is_empty() => {
            painter.image(
                texture_id,
                viewport.rect().translate(canvas_rect.min.to_vec2()),
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        _ => {
            let hint = if matches!(state.assets.background, AssetSlot::Failed) {
                "Background image unavailable"
            } else {
                "Loading background image…"
            };
            painter.text(
                canvas_rect.center(),
                Align2::CENTER_CENTER,
                hint,
                FontId::proportional(17.0),
                theme.text.muted,
            );
        }
    }

    let origin = canvas_rect.min.to_vec2();
    for element in state.scene.elements() {
        draw_element(&painter, element, origin, &state.assets);
    }

    if let Some(pending) = state.pending_arrow {
        painter.circle_filled(pending.to_pos2() + origin, 4.0, theme.surfaces.accent);
    }

    draw_selection(&painter, state, origin, &theme);
    handle_pointer(ctx, state, &response, canvas_rect);
}

fn ensure_icon_textures(ctx: &Context, state: &mut EditorState) {
    let names: Vec<String> = state
        .scene
        .elements()
        .iter()
        .filter_map(|element| match &element.kind {
            ElementKind::Icon { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    for name in names {
        if let Some(image) = state.assets.icon_image_mut(&name) {
            image.ensure_texture(ctx, &name);
        }
    }
}

fn draw_element(painter: &egui::Painter, element: &PlacedElement, origin: Vec2, assets: &AssetStore) {
    let color = element.color.color32();
    match &element.kind {
        ElementKind::Shape { shape, center } => {
            let center = center.to_pos2() + origin;
            let half = SHAPE_SIZE * 0.5 - 4.0;
            match shape {
                ShapeKind::Cross => {
                    let stroke = Stroke::new(5.0, color);
                    let corners =
                        rotated_quad(center, Vec2::splat(half), element.rotation);
                    painter.line_segment([corners[0], corners[2]], stroke);
                    painter.line_segment([corners[1], corners[3]], stroke);
                }
                ShapeKind::Circle => {
                    painter.circle_stroke(center, half, Stroke::new(5.0, color));
                }
            }
        }
        ElementKind::Icon {
            name,
            center,
            width,
            height,
        } => {
            let center = center.to_pos2() + origin;
            let half = vec2(*width, *height) * 0.5;
            let corners = rotated_quad(center, half, element.rotation);
            match assets.icon(name).and_then(AssetSlot::image).and_then(|image| {
                image.texture.as_ref().map(|texture| texture.id())
            }) {
                Some(texture_id) => {
                    let mut mesh = Mesh::with_texture(texture_id);
                    let uvs = [
                        Pos2::new(0.0, 0.0),
                        Pos2::new(1.0, 0.0),
                        Pos2::new(1.0, 1.0),
                        Pos2::new(0.0, 1.0),
                    ];
                    for (pos, uv) in corners.iter().zip(uvs) {
                        mesh.vertices.push(Vertex {
                            pos: *pos,
                            uv,
                            color: Color32::WHITE,
                        });
                    }
                    mesh.add_triangle(0, 1, 2);
                    mesh.add_triangle(0, 2, 3);
                    painter.add(Shape::mesh(mesh));
                }
                None => {
                    // Icon texture missing (e.g. restored scene while the image
                    // is still decoding); draw a placeholder outline.
                    painter.add(Shape::closed_line(
                        corners.to_vec(),
                        Stroke::new(1.5, Color32::from_rgba_unmultiplied(255, 255, 255, 90)),
                    ));
                }
            }
        }
        ElementKind::Arrow { start, end } => {
            draw_arrow(painter, *start, *end, origin, color);
        }
    }
}

fn draw_arrow(painter: &egui::Painter, start: Point, end: Point, origin: Vec2, color: Color32) {
    let from = start.to_pos2() + origin;
    let to = end.to_pos2() + origin;
    painter.line_segment([from, to], Stroke::new(ARROW_STROKE, color));

    let direction = to - from;
    let len = direction.length().max(1.0);
    let unit = direction / len;
    let head_length = 14.0;
    let head_half_width = 8.0;

    let tip = to;
    let base = tip - unit * head_length;
    let normal = vec2(-unit.y, unit.x);
    let left = base + normal * head_half_width;
    let right = base - normal * head_half_width;

    painter.add(Shape::convex_polygon(
        vec![tip, left, right],
        color,
        Stroke::NONE,
    ));
}

fn draw_selection(
    painter: &egui::Painter,
    state: &EditorState,
    origin: Vec2,
    theme: &theme::AppTheme,
) {
    let Some(element) = state.scene.selected() else {
        return;
    };

    let bounds = element.bounds().translate(origin);
    painter.rect_stroke(bounds, 6.0, Stroke::new(1.8, theme.surfaces.accent));

    for (handle, point) in element.handles() {
        let handle_pos = point.to_pos2() + origin;
        match handle {
            Handle::Rotate => {
                painter.line_segment(
                    [bounds.center_top(), handle_pos],
                    Stroke::new(1.0, theme.surfaces.accent),
                );
                painter.circle_filled(handle_pos, 5.0, theme.surfaces.accent);
                painter.circle_stroke(
                    handle_pos,
                    5.0,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 200)),
                );
            }
            _ => {
                let rect = Rect::from_center_size(handle_pos, vec2(9.0, 9.0));
                painter.rect_filled(rect, 3.0, theme.surfaces.accent);
                painter.rect_stroke(
                    rect,
                    3.0,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 200)),
                );
            }
        }
    }
}

fn handle_pointer(
    ctx: &Context,
    state: &mut EditorState,
    response: &Response,
    canvas_rect: Rect,
) {
    let pointer = ctx.input(|input| input.pointer.clone());
    let Some(pointer_pos) = pointer.interact_pos() else {
        return;
    };
    let local = Point::new(
        pointer_pos.x - canvas_rect.min.x,
        pointer_pos.y - canvas_rect.min.y,
    );

    if pointer.primary_pressed() && canvas_rect.contains(pointer_pos) {
        interaction::pointer_down(state, local);
    }
    if pointer.primary_down() && state.gesture.is_some() {
        interaction::pointer_moved(state, local);
    }
    let released = pointer.primary_released();
    if released {
        interaction::pointer_up(state);
    }
    if response.clicked() {
        interaction::canvas_click(state, local);
    } else if released {
        // egui drops the click after a genuine drag; disarm the guard so it
        // cannot swallow the next real click.
        state.suppress_click = false;
    }
}

fn rotated_quad(center: Pos2, half: Vec2, rotation_deg: f32) -> [Pos2; 4] {
    let radians = rotation_deg.to_radians();
    let (sin, cos) = radians.sin_cos();
    let rotate = |v: Vec2| Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
    [
        center + rotate(vec2(-half.x, -half.y)),
        center + rotate(vec2(half.x, -half.y)),
        center + rotate(vec2(half.x, half.y)),
        center + rotate(vec2(-half.x, half.y)),
    ]
}
