use egui::{
    panel::TopBottomSide, Context, DragValue, Sense, TextureFilter, TextureHandle, Ui,
};

use crate::{
    config,
    peel::{PeelController, PeelState},
    render::{EguiCanvas, StickerLook, StickerVisuals},
    texture, StickerConfig,
};

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct StickerApp {
    config: StickerConfig,
    enabled: bool,

    #[serde(skip)]
    texture: Option<TextureHandle>,
    #[serde(skip)]
    peel: PeelController,
    #[serde(skip)]
    visuals: StickerVisuals,
}

impl Default for StickerApp {
    fn default() -> Self {
        Self {
            config: StickerConfig::default(),
            enabled: true,
            texture: None,
            peel: PeelController::default(),
            visuals: StickerVisuals::default(),
        }
    }
}

impl StickerApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous app state (if any).
        // Note that you must enable the `persistence` feature for this to work.
        if let Some(storage) = cc.storage {
            return eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
        }

        Default::default()
    }

    fn load_artwork(&mut self, ctx: &Context) {
        let Some(path) = self.config.artwork.as_ref() else {
            return;
        };

        match texture::load_png(path) {
            Ok(image) => {
                tracing::info!("Loaded artwork {}", path.display());
                self.texture = Some(ctx.load_texture(
                    path.display().to_string(),
                    image,
                    TextureFilter::Linear,
                ));
            }
            Err(e) => {
                tracing::error!("{:#}", e);
                // Don't retry every frame
                self.config.artwork = None;
            }
        }
    }

    /// Drops an in-flight gesture and puts the visuals back to rest
    fn reset_peel(&mut self) {
        self.peel.interrupt().apply(&mut self.visuals);
    }

    fn sticker_canvas(&mut self, ui: &mut Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
        let space = EguiCanvas::centered(response.rect);
        let rect = self.config.sticker.rect_pose();

        self.peel.set_settings(self.config.peel_settings());

        if !self.enabled {
            if self.peel.is_active() {
                self.reset_peel();
            }
        } else {
            if response.drag_started() {
                let origin = ui.input().pointer.press_origin();
                if let Some(frame) = origin.and_then(|o| self.peel.press(o, &rect, &space)) {
                    frame.apply(&mut self.visuals);
                }
            }

            if response.dragged() && self.peel.is_active() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.peel.drag(pos, &rect, &space).apply(&mut self.visuals);
                }
            }

            if response.drag_released() && self.peel.is_active() {
                self.peel.release().apply(&mut self.visuals);
            }
        }

        let look = StickerLook {
            texture: self.texture.as_ref().map(|t| t.id()),
            face: if self.texture.is_some() {
                egui::Color32::WHITE
            } else {
                self.config.sticker.face_color
            },
            back: self.config.sticker.back_color,
            highlight: self.config.highlight.color,
            highlight_width: self.config.highlight.width,
        };
        self.visuals.paint(&painter, &space, &rect, &look);
    }
}

impl eframe::App for StickerApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Load artwork if not present!
        if self.config.artwork.is_some() && self.texture.is_none() {
            self.load_artwork(ctx);
        }

        egui::TopBottomPanel::new(TopBottomSide::Top, "Controls")
            .min_height(100.)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Load artwork").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("PNG", &["png"])
                            .pick_file()
                        {
                            self.config.artwork = Some(path);
                            self.texture = None;
                            self.load_artwork(ui.ctx());
                        }
                    }

                    if ui.button("Clear artwork").clicked() {
                        self.config.artwork = None;
                        self.texture = None;
                    }

                    if ui.checkbox(&mut self.enabled, "Enabled").changed() && !self.enabled {
                        self.reset_peel();
                    }

                    ui.label(match self.peel.state() {
                        PeelState::Idle => "Idle".to_string(),
                        PeelState::Anchored(s) => format!("Anchored {:?}", s.anchor),
                        PeelState::Peeling(s) => format!("Peeling {:?}", s.anchor),
                    });
                });

                sticker_controls(ui, &mut self.config);

                ui.horizontal(|ui| {
                    // Save config
                    if ui.button("Save config").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("RON", &["ron"])
                            .save_file()
                        {
                            if let Err(e) = config::save(&path, &self.config) {
                                tracing::error!("{:#}", e);
                            }
                        }
                    }

                    // Load config
                    if ui.button("Load config").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("RON", &["ron"])
                            .pick_file()
                        {
                            match config::load(&path) {
                                Ok(config) => {
                                    self.config = config;
                                    self.texture = None;
                                    self.reset_peel();
                                }
                                Err(e) => tracing::error!("{:#}", e),
                            }
                        }
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.sticker_canvas(ui);
        });
    }
}

fn sticker_controls(ui: &mut Ui, config: &mut StickerConfig) {
    let sticker = &mut config.sticker;

    ui.horizontal(|ui| {
        ui.add(
            DragValue::new(&mut sticker.size[0])
                .prefix("Width: ")
                .clamp_range(1.0..=f32::MAX),
        );
        ui.add(
            DragValue::new(&mut sticker.size[1])
                .prefix("Height: ")
                .clamp_range(1.0..=f32::MAX),
        );
        ui.add(DragValue::new(&mut sticker.position[0]).prefix("X: "));
        ui.add(DragValue::new(&mut sticker.position[1]).prefix("Y: "));
        ui.add(
            DragValue::new(&mut sticker.rotation)
                .prefix("Angle: ")
                .suffix("°")
                .speed(0.25),
        );
        ui.label("Face");
        ui.color_edit_button_srgba(&mut sticker.face_color);
        ui.label("Back");
        ui.color_edit_button_srgba(&mut sticker.back_color);
    });

    ui.horizontal(|ui| {
        ui.add(
            DragValue::new(&mut config.lift_scale)
                .prefix("Lift: ")
                .speed(0.005)
                .clamp_range(0.5..=2.0),
        );
        ui.add(
            DragValue::new(&mut config.highlight.width)
                .prefix("Highlight width: ")
                .clamp_range(0.0..=f32::MAX),
        );
        ui.add(DragValue::new(&mut config.highlight.gap).prefix("Highlight gap: "));
        ui.label("Highlight");
        ui.color_edit_button_srgba(&mut config.highlight.color);
    });
}
