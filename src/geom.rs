use egui::{emath::Rot2, vec2, Vec2};

pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.x * b.x + a.y * b.y
}

/// Counter-clockwise quarter turn
pub fn perpendicular(v: Vec2) -> Vec2 {
    vec2(-v.y, v.x)
}

/// Rotation whose local +X axis points along `direction`
pub fn rotation_from_x_axis(direction: Vec2) -> Rot2 {
    Rot2::from_angle(direction.y.atan2(direction.x))
}

/// Placement of a visual in canvas space (y up)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub rotation: Rot2,
    /// Uniform scale applied before rotation
    pub scale: f32,
}

impl Pose {
    pub fn new(position: Vec2, rotation: Rot2) -> Self {
        Self {
            position,
            rotation,
            scale: 1.,
        }
    }

    pub fn with_scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    /// Local point to canvas space
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + self.rotation * (local * self.scale)
    }

    /// Canvas point to local space
    pub fn inverse_transform_point(&self, canvas: Vec2) -> Vec2 {
        (self.rotation.inverse() * (canvas - self.position)) / self.scale
    }

    /// Local +X in canvas space
    pub fn right(&self) -> Vec2 {
        self.rotation * vec2(1., 0.)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Rot2::IDENTITY)
    }
}

/// A rectangle centered on its pose
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectPose {
    pub pose: Pose,
    /// Width, height in unscaled local units
    pub size: Vec2,
}

impl RectPose {
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.
    }

    pub fn contains(&self, canvas: Vec2) -> bool {
        let local = self.pose.inverse_transform_point(canvas);
        let half = self.half_extents();
        local.x.abs() <= half.x && local.y.abs() <= half.y
    }

    /// Corners in canvas space, counter-clockwise starting at the bottom left
    pub fn corners(&self) -> [Vec2; 4] {
        let h = self.half_extents();
        [
            vec2(-h.x, -h.y),
            vec2(h.x, -h.y),
            vec2(h.x, h.y),
            vec2(-h.x, h.y),
        ]
        .map(|local| self.pose.transform_point(local))
    }
}

/// Corner of the sticker nearest the press, fixed for one gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorCorner {
    UpperLeft,
    UpperRight,
    BottomLeft,
    BottomRight,
}

impl AnchorCorner {
    pub const ALL: [Self; 4] = [
        Self::UpperLeft,
        Self::UpperRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Picks the corner from a press given relative to the rectangle's center.
    /// A press on an axis counts as upper (y == 0) or right (x == 0).
    pub fn resolve(local: Vec2) -> Self {
        match (local.y >= 0., local.x >= 0.) {
            (true, false) => Self::UpperLeft,
            (true, true) => Self::UpperRight,
            (false, false) => Self::BottomLeft,
            (false, true) => Self::BottomRight,
        }
    }

    /// Per-axis sign of the corner relative to the center
    pub fn signs(self) -> Vec2 {
        match self {
            Self::UpperLeft => vec2(-1., 1.),
            Self::UpperRight => vec2(1., 1.),
            Self::BottomLeft => vec2(-1., -1.),
            Self::BottomRight => vec2(1., -1.),
        }
    }

    /// The corner itself in the rectangle's local frame
    pub fn local_drag_point(self, half_extents: Vec2) -> Vec2 {
        let s = self.signs();
        vec2(s.x * half_extents.x, s.y * half_extents.y)
    }

    /// Allowed drag direction per axis: always back across the sticker, away from the corner
    pub fn quadrant_mask(self) -> Vec2 {
        -self.signs()
    }
}

/// Forces each axis of `raw` onto the side `mask` allows, zeroing it otherwise
pub fn clamp_displacement(raw: Vec2, mask: Vec2) -> Vec2 {
    let clamp_axis = |value: f32, sign: f32| {
        if sign < 0. {
            value.min(0.)
        } else {
            value.max(0.)
        }
    };
    vec2(clamp_axis(raw.x, mask.x), clamp_axis(raw.y, mask.y))
}

/// Half-plane boundary `dot(p, normal) == offset`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipLine {
    /// Unit length, or zero for the neutral line
    pub normal: Vec2,
    pub offset: f32,
}

impl ClipLine {
    /// Clips nothing
    pub const NEUTRAL: Self = Self {
        normal: Vec2::ZERO,
        offset: 0.,
    };

    pub fn through(normal: Vec2, point: Vec2) -> Self {
        Self {
            normal,
            offset: dot(point, normal),
        }
    }

    pub fn signed_distance(&self, p: Vec2) -> f32 {
        dot(p, self.normal) - self.offset
    }

    /// Whether `p` survives the cut. The corner side (`dot(p, n) < offset`) is the one peeled away.
    pub fn keeps(&self, p: Vec2) -> bool {
        self.signed_distance(p) >= 0.
    }

    pub fn is_neutral(&self) -> bool {
        self.normal == Vec2::ZERO
    }
}

impl Default for ClipLine {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// The fold line for one drag update: the perpendicular bisector between the dragged corner's
/// rest position and where the pointer has pulled it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crease {
    pub line: ClipLine,
    /// Midpoint of the dragged corner's travel
    pub point: Vec2,
}

impl Crease {
    /// `None` while the displacement has no direction yet
    pub fn new(displacement: Vec2, local_drag_point: Vec2, rect: &Pose) -> Option<Self> {
        let length = displacement.length();
        if !length.is_normal() {
            return None;
        }
        let normal = displacement / length;
        let drag_point = rect.transform_point(local_drag_point);
        let point = drag_point + displacement / 2.;
        Some(Self {
            line: ClipLine::through(normal, point),
            point,
        })
    }

    pub fn normal(&self) -> Vec2 {
        self.line.normal
    }

    /// Unit vector along the crease
    pub fn tangent(&self) -> Vec2 {
        perpendicular(self.line.normal)
    }

    /// Point on the crease closest to `p`
    pub fn project(&self, p: Vec2) -> Vec2 {
        let (x, y) = (self.normal(), self.tangent());
        x * dot(self.point, x) + y * dot(p, y)
    }

    pub fn reflect_point(&self, p: Vec2) -> Vec2 {
        let center = self.project(p);
        center + (center - p)
    }

    pub fn reflect_direction(&self, direction: Vec2) -> Vec2 {
        let (x, y) = (self.normal(), self.tangent());
        x * -dot(direction, x) + y * dot(direction, y)
    }

    /// Pose of the back face. Reflection flips handedness, so the fold keeps a proper rotation
    /// by turning its +X against the reflected direction; local x maps to -x as a result.
    pub fn mirror_pose(&self, pose: &Pose) -> Pose {
        let direction = self.reflect_direction(pose.right());
        Pose {
            position: self.reflect_point(pose.position),
            rotation: rotation_from_x_axis(-direction),
            scale: pose.scale,
        }
    }

    /// Cut for the back face, in the fold's own frame. The fold faces the other way, so its
    /// corner is mirrored horizontally and the half displacement is subtracted.
    pub fn fold_clip(&self, displacement: Vec2, local_drag_point: Vec2, fold: &Pose) -> ClipLine {
        let fold_drag_point = vec2(-local_drag_point.x, local_drag_point.y);
        let point = fold.transform_point(fold_drag_point) - displacement / 2.;
        ClipLine::through(self.normal(), point)
    }

    /// Highlight strip laid along the crease, pushed `gap` past it onto the sticker.
    /// `width` is the highlight's extent along the normal.
    pub fn highlight_pose(&self, width: f32, gap: f32) -> Pose {
        Pose::new(
            self.point + self.normal() * (gap + width / 2.),
            rotation_from_x_axis(self.normal()),
        )
    }
}

/// Everything one drag update produces
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldSolution {
    pub displacement: Vec2,
    pub front_clip: ClipLine,
    pub fold_pose: Pose,
    pub fold_clip: ClipLine,
    pub highlight_pose: Pose,
}

/// Highlight visual dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightShape {
    pub width: f32,
    pub gap: f32,
}

/// Full solve for an already clamped displacement. `None` means "not peeling yet".
pub fn solve(
    rect: &Pose,
    local_drag_point: Vec2,
    displacement: Vec2,
    highlight: HighlightShape,
) -> Option<FoldSolution> {
    let crease = Crease::new(displacement, local_drag_point, rect)?;
    let fold_pose = crease.mirror_pose(rect);
    Some(FoldSolution {
        displacement,
        front_clip: crease.line,
        fold_pose,
        fold_clip: crease.fold_clip(displacement, local_drag_point, &fold_pose),
        highlight_pose: crease.highlight_pose(highlight.width, highlight.gap),
    })
}
