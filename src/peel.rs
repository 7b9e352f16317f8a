use egui::{emath::Rot2, Pos2, Vec2};

use crate::geom::{self, AnchorCorner, ClipLine, HighlightShape, Pose, RectPose};

/// Conversion between the host's screen space and the sticker's parent (canvas) space
pub trait CanvasSpace {
    fn screen_to_canvas(&self, screen: Pos2) -> Vec2;
    fn canvas_to_screen(&self, canvas: Vec2) -> Pos2;
}

/// The two clipped surfaces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Front,
    Fold,
}

/// Effects the host performs on its visuals
pub trait VisualSink {
    fn set_clip(&mut self, surface: Surface, clip: ClipLine);
    fn set_fold_visible(&mut self, visible: bool);
    fn set_fold_pose(&mut self, pose: Pose);
    fn set_highlight_pose(&mut self, pose: Pose);
    fn set_sticker_scale(&mut self, scale: f32);
}

/// Back face placement for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldVisual {
    pub pose: Pose,
    pub clip: ClipLine,
    pub highlight: Pose,
}

/// Render parameters produced by every input event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeelFrame {
    pub sticker_scale: f32,
    pub front_clip: ClipLine,
    /// `None` hides the fold and highlight
    pub fold: Option<FoldVisual>,
}

impl PeelFrame {
    /// Idle: nothing clipped, nothing folded, scale reset
    pub const NEUTRAL: Self = Self {
        sticker_scale: 1.,
        front_clip: ClipLine::NEUTRAL,
        fold: None,
    };

    fn lifted(sticker_scale: f32) -> Self {
        Self {
            sticker_scale,
            ..Self::NEUTRAL
        }
    }

    pub fn fold_visible(&self) -> bool {
        self.fold.is_some()
    }

    pub fn apply(&self, sink: &mut impl VisualSink) {
        sink.set_sticker_scale(self.sticker_scale);
        sink.set_clip(Surface::Front, self.front_clip);
        match self.fold {
            Some(fold) => {
                sink.set_fold_pose(fold.pose);
                sink.set_highlight_pose(fold.highlight);
                sink.set_clip(Surface::Fold, fold.clip);
                sink.set_fold_visible(true);
            }
            None => {
                sink.set_clip(Surface::Fold, ClipLine::NEUTRAL);
                sink.set_fold_visible(false);
            }
        }
    }
}

impl Default for PeelFrame {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Fixed for the lifetime of one gesture
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Canvas space
    pub press_point: Vec2,
    pub anchor: AnchorCorner,
    pub local_drag_point: Vec2,
    pub quadrant_mask: Vec2,
}

impl DragSession {
    /// Anchors a gesture on the corner nearest `press_point`
    pub fn begin(press_point: Vec2, rect: &RectPose) -> Self {
        let local = rect.pose.inverse_transform_point(press_point);
        let anchor = AnchorCorner::resolve(local);
        Self {
            press_point,
            anchor,
            local_drag_point: anchor.local_drag_point(rect.half_extents()),
            quadrant_mask: anchor.quadrant_mask(),
        }
    }

    /// Pointer travel since the press, restricted to the peeling quadrant.
    /// Unlike a plain canvas-space clamp, the mask is applied along the sticker's own axes;
    /// the two agree at rotation 0, and a rotated sticker still only peels away from its anchor.
    pub fn displacement(&self, pointer: Vec2, rotation: Rot2) -> Vec2 {
        let local = rotation.inverse() * (pointer - self.press_point);
        rotation * geom::clamp_displacement(local, self.quadrant_mask)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PeelState {
    Idle,
    /// Pressed, not dragged yet
    Anchored(DragSession),
    Peeling(DragSession),
}

impl PeelState {
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Anchored(session) | Self::Peeling(session) => Some(session),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeelSettings {
    /// Sticker scale while a gesture is active
    pub lift_scale: f32,
    pub highlight: HighlightShape,
}

impl Default for PeelSettings {
    fn default() -> Self {
        Self {
            lift_scale: 1.,
            highlight: HighlightShape { width: 0., gap: 0. },
        }
    }
}

/// One widget's peel state machine. Pointer positions come in through a [`CanvasSpace`], and
/// each event yields a [`PeelFrame`] for the host to apply through a [`VisualSink`].
#[derive(Clone, Debug)]
pub struct PeelController {
    state: PeelState,
    settings: PeelSettings,
}

impl PeelController {
    pub fn new(settings: PeelSettings) -> Self {
        Self {
            state: PeelState::Idle,
            settings,
        }
    }

    pub fn state(&self) -> &PeelState {
        &self.state
    }

    pub fn set_settings(&mut self, settings: PeelSettings) {
        self.settings = settings;
    }

    pub fn is_active(&self) -> bool {
        self.state != PeelState::Idle
    }

    /// Pointer-down. Returns `None` if the press misses the sticker, which leaves the state alone.
    pub fn press(
        &mut self,
        screen: Pos2,
        rect: &RectPose,
        space: &impl CanvasSpace,
    ) -> Option<PeelFrame> {
        let press_point = space.screen_to_canvas(screen);
        if !rect.contains(press_point) {
            return None;
        }

        let session = DragSession::begin(press_point, rect);
        tracing::debug!(anchor = ?session.anchor, "sticker pressed");
        self.state = PeelState::Anchored(session);
        Some(PeelFrame::lifted(self.settings.lift_scale))
    }

    /// Pointer-drag. `rect` is the sticker's rest pose; the controller applies the lift scale.
    pub fn drag(&mut self, screen: Pos2, rect: &RectPose, space: &impl CanvasSpace) -> PeelFrame {
        let session = match self.state {
            PeelState::Idle => return PeelFrame::NEUTRAL,
            PeelState::Anchored(session) | PeelState::Peeling(session) => session,
        };
        self.state = PeelState::Peeling(session);

        let pose = rect.pose.with_scale(self.settings.lift_scale);
        let pointer = space.screen_to_canvas(screen);
        let displacement = session.displacement(pointer, rect.pose.rotation);
        let solution = geom::solve(
            &pose,
            session.local_drag_point,
            displacement,
            self.settings.highlight,
        );

        match solution {
            Some(solution) => PeelFrame {
                sticker_scale: self.settings.lift_scale,
                front_clip: solution.front_clip,
                fold: Some(FoldVisual {
                    pose: solution.fold_pose,
                    clip: solution.fold_clip,
                    highlight: solution.highlight_pose,
                }),
            },
            None => PeelFrame::lifted(self.settings.lift_scale),
        }
    }

    /// Pointer-up
    pub fn release(&mut self) -> PeelFrame {
        if let Some(session) = self.state.session() {
            tracing::debug!(anchor = ?session.anchor, "sticker released");
        }
        self.state = PeelState::Idle;
        PeelFrame::NEUTRAL
    }

    /// The widget went away mid-gesture (disabled, hidden). Same reset as a release.
    pub fn interrupt(&mut self) -> PeelFrame {
        if self.is_active() {
            tracing::debug!("peel gesture interrupted");
        }
        self.state = PeelState::Idle;
        PeelFrame::NEUTRAL
    }
}

impl Default for PeelController {
    fn default() -> Self {
        Self::new(PeelSettings::default())
    }
}
