use approx::assert_abs_diff_eq;
use egui::{emath::Rot2, vec2, Pos2, Rect, Vec2};
use peel_sticker::{
    geom::{AnchorCorner, ClipLine, Pose, RectPose},
    peel::{CanvasSpace, PeelController, PeelFrame, PeelSettings, PeelState, Surface, VisualSink},
    render::EguiCanvas,
    StickerConfig,
};

/// Everything the controller asked the host to do, in order
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
    front: Option<ClipLine>,
    fold: Option<ClipLine>,
    fold_visible: Option<bool>,
    scale: Option<f32>,
}

impl VisualSink for Recorder {
    fn set_clip(&mut self, surface: Surface, clip: ClipLine) {
        self.calls.push(format!("clip {:?}", surface));
        match surface {
            Surface::Front => self.front = Some(clip),
            Surface::Fold => self.fold = Some(clip),
        }
    }

    fn set_fold_visible(&mut self, visible: bool) {
        self.calls.push(format!("visible {}", visible));
        self.fold_visible = Some(visible);
    }

    fn set_fold_pose(&mut self, _pose: Pose) {
        self.calls.push("fold pose".into());
    }

    fn set_highlight_pose(&mut self, _pose: Pose) {
        self.calls.push("highlight pose".into());
    }

    fn set_sticker_scale(&mut self, scale: f32) {
        self.calls.push("scale".into());
        self.scale = Some(scale);
    }
}

fn square_at_origin() -> RectPose {
    RectPose {
        pose: Pose::new(Vec2::ZERO, Rot2::IDENTITY),
        size: vec2(100., 100.),
    }
}

fn screen() -> EguiCanvas {
    EguiCanvas::centered(Rect::from_min_size(Pos2::ZERO, vec2(400., 300.)))
}

#[test]
fn full_gesture_on_screen() {
    let space = screen();
    let rect = square_at_origin();
    let mut peel = PeelController::default();
    let mut sink = Recorder::default();

    // Lower left quarter of the sticker
    let press = space.canvas_to_screen(vec2(-20., -30.));
    peel.press(press, &rect, &space).unwrap().apply(&mut sink);
    assert_eq!(
        peel.state().session().map(|s| s.anchor),
        Some(AnchorCorner::BottomLeft)
    );
    assert_eq!(sink.fold_visible, Some(false));

    // Pull up and to the right by (30, 40)
    let to = space.canvas_to_screen(vec2(10., 10.));
    peel.drag(to, &rect, &space).apply(&mut sink);
    assert!(matches!(peel.state(), PeelState::Peeling(_)));
    assert_eq!(sink.fold_visible, Some(true));

    let front = sink.front.unwrap();
    assert_abs_diff_eq!(front.normal.x, 0.6, epsilon = 1e-5);
    assert_abs_diff_eq!(front.normal.y, 0.8, epsilon = 1e-5);
    // Clip point (-35, -30)
    assert_abs_diff_eq!(front.offset, -45., epsilon = 1e-4);
    let fold = sink.fold.unwrap();
    assert_abs_diff_eq!(fold.offset, front.offset, epsilon = 1e-3);

    peel.release().apply(&mut sink);
    assert_eq!(sink.front, Some(ClipLine::NEUTRAL));
    assert_eq!(sink.fold, Some(ClipLine::NEUTRAL));
    assert_eq!(sink.fold_visible, Some(false));
    assert_eq!(sink.scale, Some(1.));
    assert_eq!(peel.state(), &PeelState::Idle);
}

#[test]
fn host_effects_come_in_a_fixed_order() {
    let space = screen();
    let rect = square_at_origin();
    let mut peel = PeelController::default();
    let mut sink = Recorder::default();

    peel.press(space.canvas_to_screen(vec2(20., 20.)), &rect, &space);
    peel.drag(space.canvas_to_screen(vec2(0., 5.)), &rect, &space)
        .apply(&mut sink);
    assert_eq!(
        sink.calls,
        [
            "scale",
            "clip Front",
            "fold pose",
            "highlight pose",
            "clip Fold",
            "visible true"
        ]
    );
}

#[test]
fn backwards_drag_never_peels() {
    let space = screen();
    let rect = square_at_origin();
    let mut peel = PeelController::default();

    // Upper right anchor only peels down and to the left
    peel.press(space.canvas_to_screen(vec2(30., 30.)), &rect, &space);
    for to in [vec2(60., 30.), vec2(30., 80.), vec2(90., 90.), vec2(30., 30.)] {
        let frame = peel.drag(space.canvas_to_screen(to), &rect, &space);
        assert!(!frame.fold_visible());
        assert_eq!(frame.front_clip, ClipLine::NEUTRAL);
    }
}

#[test]
fn disable_mid_drag_then_release_is_harmless() {
    let space = screen();
    let rect = square_at_origin();
    let mut peel = PeelController::default();
    peel.press(space.canvas_to_screen(vec2(-30., 30.)), &rect, &space);
    peel.drag(space.canvas_to_screen(vec2(-10., 0.)), &rect, &space);

    assert_eq!(peel.interrupt(), PeelFrame::NEUTRAL);
    // A late pointer-up or drag after the reset changes nothing
    assert_eq!(peel.release(), PeelFrame::NEUTRAL);
    assert_eq!(
        peel.drag(space.canvas_to_screen(vec2(0., 0.)), &rect, &space),
        PeelFrame::NEUTRAL
    );
}

#[test]
fn rotated_sticker_from_config() {
    let mut config = StickerConfig::default();
    config.sticker.size = [100., 60.];
    config.sticker.position = [40., -10.];
    config.sticker.rotation = 90.;
    let rect = config.sticker.rect_pose();
    let space = screen();
    let mut peel = PeelController::new(PeelSettings {
        lift_scale: 1.,
        ..config.peel_settings()
    });

    // Local (-30, -20): rotated a quarter turn lands at canvas (60, -40)
    let press = space.canvas_to_screen(vec2(60., -40.));
    peel.press(press, &rect, &space).unwrap();
    let session = *peel.state().session().unwrap();
    assert_eq!(session.anchor, AnchorCorner::BottomLeft);

    // Canvas (-10, 0) is local (0, 10), which the bottom left mask allows
    let frame = peel.drag(space.canvas_to_screen(vec2(50., -40.)), &rect, &space);
    let fold = frame.fold.unwrap();
    // Corner at local (-50, -30) sits at canvas (70, -60); pulled by (-10, 0)
    assert_abs_diff_eq!(frame.front_clip.normal.x, -1., epsilon = 1e-5);
    assert_abs_diff_eq!(frame.front_clip.offset, -65., epsilon = 1e-3);
    let corner = fold.pose.transform_point(vec2(50., -30.));
    assert_abs_diff_eq!(corner.x, 60., epsilon = 1e-3);
    assert_abs_diff_eq!(corner.y, -60., epsilon = 1e-3);
}
