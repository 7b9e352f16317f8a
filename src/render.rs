use egui::{
    epaint::{Mesh, Vertex, WHITE_UV},
    pos2, vec2, Color32, Painter, Pos2, Rect, Shape, TextureId, Vec2,
};

use crate::geom::{perpendicular, ClipLine, Pose, RectPose};
use crate::peel::{CanvasSpace, Surface, VisualSink};

/// Canvas space centered on a screen rect, y up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EguiCanvas {
    pub origin: Pos2,
    pub points_per_unit: f32,
}

impl EguiCanvas {
    pub fn centered(rect: Rect) -> Self {
        Self {
            origin: rect.center(),
            points_per_unit: 1.,
        }
    }
}

impl CanvasSpace for EguiCanvas {
    fn screen_to_canvas(&self, screen: Pos2) -> Vec2 {
        let d = (screen - self.origin) / self.points_per_unit;
        vec2(d.x, -d.y)
    }

    fn canvas_to_screen(&self, canvas: Vec2) -> Pos2 {
        self.origin + vec2(canvas.x, -canvas.y) * self.points_per_unit
    }
}

/// Polygon vertex carrying a texture coordinate through clipping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    /// Canvas space
    pub pos: Vec2,
    pub uv: Pos2,
}

impl ClipVertex {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            pos: a.pos + (b.pos - a.pos) * t,
            uv: a.uv + (b.uv - a.uv) * t,
        }
    }
}

/// Cuts a convex polygon down to the side of `clip` it keeps. Stands in for a shader clip plane.
pub fn clip_polygon(polygon: &[ClipVertex], clip: ClipLine) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    let Some(&last) = polygon.last() else {
        return out;
    };

    let mut prev = last;
    let mut prev_dist = clip.signed_distance(prev.pos);
    for &current in polygon {
        let dist = clip.signed_distance(current.pos);
        if (dist >= 0.) != (prev_dist >= 0.) {
            let t = prev_dist / (prev_dist - dist);
            out.push(ClipVertex::lerp(prev, current, t));
        }
        if dist >= 0. {
            out.push(current);
        }
        prev = current;
        prev_dist = dist;
    }

    out
}

/// Textured quad for a rectangle of `size` at `pose`. Image top is local +Y.
pub fn quad(pose: &Pose, size: Vec2) -> [ClipVertex; 4] {
    let h = size / 2.;
    [
        (vec2(-h.x, -h.y), pos2(0., 1.)),
        (vec2(h.x, -h.y), pos2(1., 1.)),
        (vec2(h.x, h.y), pos2(1., 0.)),
        (vec2(-h.x, h.y), pos2(0., 0.)),
    ]
    .map(|(local, uv)| ClipVertex {
        pos: pose.transform_point(local),
        uv,
    })
}

/// Inward edges of a rectangle, for cutting things down to its outline
fn edge_lines(rect: &RectPose) -> [ClipLine; 4] {
    let c = rect.corners();
    [0, 1, 2, 3].map(|i| {
        let along = (c[(i + 1) % 4] - c[i]).normalized();
        ClipLine::through(perpendicular(along), c[i])
    })
}

fn fan_mesh(
    polygon: &[ClipVertex],
    space: &impl CanvasSpace,
    texture: Option<TextureId>,
    mut color: impl FnMut(&ClipVertex) -> Color32,
) -> Option<Mesh> {
    if polygon.len() < 3 {
        return None;
    }

    let mut mesh = match texture {
        Some(id) => Mesh::with_texture(id),
        None => Mesh::default(),
    };
    for v in polygon {
        mesh.vertices.push(Vertex {
            pos: space.canvas_to_screen(v.pos),
            uv: if texture.is_some() { v.uv } else { WHITE_UV },
            color: color(v),
        });
    }
    for i in 1..(polygon.len() as u32 - 1) {
        mesh.add_triangle(0, i, i + 1);
    }

    Some(mesh)
}

/// Colors and artwork for painting
#[derive(Clone, Copy, Debug)]
pub struct StickerLook {
    pub texture: Option<TextureId>,
    /// Fill without artwork, tint with it
    pub face: Color32,
    pub back: Color32,
    pub highlight: Color32,
    /// Highlight extent along the crease normal
    pub highlight_width: f32,
}

/// Host-side visual parameters, written by a `PeelFrame` and read when painting
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickerVisuals {
    pub front_clip: ClipLine,
    pub fold_clip: ClipLine,
    pub fold_visible: bool,
    pub fold_pose: Pose,
    pub highlight_pose: Pose,
    pub sticker_scale: f32,
}

impl Default for StickerVisuals {
    fn default() -> Self {
        Self {
            front_clip: ClipLine::NEUTRAL,
            fold_clip: ClipLine::NEUTRAL,
            fold_visible: false,
            fold_pose: Pose::default(),
            highlight_pose: Pose::default(),
            sticker_scale: 1.,
        }
    }
}

impl VisualSink for StickerVisuals {
    fn set_clip(&mut self, surface: Surface, clip: ClipLine) {
        match surface {
            Surface::Front => self.front_clip = clip,
            Surface::Fold => self.fold_clip = clip,
        }
    }

    fn set_fold_visible(&mut self, visible: bool) {
        self.fold_visible = visible;
    }

    fn set_fold_pose(&mut self, pose: Pose) {
        self.fold_pose = pose;
    }

    fn set_highlight_pose(&mut self, pose: Pose) {
        self.highlight_pose = pose;
    }

    fn set_sticker_scale(&mut self, scale: f32) {
        self.sticker_scale = scale;
    }
}

/// Meshes drawn for the sticker, bottom to top
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Front,
    Fold,
    Highlight,
}

impl StickerVisuals {
    /// Meshes in paint order. `sticker` is the rest pose; the current scale is applied here.
    pub fn layers(
        &self,
        space: &impl CanvasSpace,
        sticker: &RectPose,
        look: &StickerLook,
    ) -> Vec<(Layer, Mesh)> {
        let mut layers = Vec::with_capacity(3);
        let lifted = RectPose {
            pose: sticker.pose.with_scale(self.sticker_scale),
            size: sticker.size,
        };

        let front = clip_polygon(&quad(&lifted.pose, lifted.size), self.front_clip);
        if let Some(mesh) = fan_mesh(&front, space, look.texture, |_| look.face) {
            layers.push((Layer::Front, mesh));
        }

        if !self.fold_visible {
            return layers;
        }

        // The back face covers the crease, so the highlight goes on top of it
        let fold = clip_polygon(&quad(&self.fold_pose, lifted.size), self.fold_clip);
        if let Some(mesh) = fan_mesh(&fold, space, None, |_| look.back) {
            layers.push((Layer::Fold, mesh));
        }

        // Fades away from the crease, kept on the remaining sticker
        let length = lifted.size.length() * lifted.pose.scale;
        let mut highlight = quad(
            &self.highlight_pose,
            vec2(look.highlight_width, length),
        )
        .to_vec();
        for edge in edge_lines(&lifted) {
            highlight = clip_polygon(&highlight, edge);
        }
        highlight = clip_polygon(&highlight, self.front_clip);
        let fade = |v: &ClipVertex| look.highlight.linear_multiply(1. - v.uv.x);
        if let Some(mesh) = fan_mesh(&highlight, space, None, fade) {
            layers.push((Layer::Highlight, mesh));
        }

        layers
    }

    pub fn paint(
        &self,
        painter: &Painter,
        space: &impl CanvasSpace,
        sticker: &RectPose,
        look: &StickerLook,
    ) {
        for (_, mesh) in self.layers(space, sticker, look) {
            painter.add(Shape::mesh(mesh));
        }
    }
}
