use rasterpaint::canvas::Color;
use rasterpaint::components::tools::{Action, EditSession, InputEvent, KeyCode, ToolType};
use rasterpaint::ops::clipboard::{AppClipboard, ClipboardError, ClipboardProvider, SystemClipboard};
use rasterpaint::ops::shapes::MAX_STROKE_WIDTH;
use rasterpaint::settings::Settings;
use rasterpaint::{log_info, log_warn};

/// OS clipboard with an in-process fallback when the OS one is unavailable
/// (headless sessions, Wayland without a data-control protocol, ...).
#[derive(Default)]
struct HostClipboard {
    system: SystemClipboard,
    fallback: AppClipboard,
}

impl ClipboardProvider for HostClipboard {
    fn read_image(&mut self) -> Result<image::RgbaImage, ClipboardError> {
        match self.system.read_image() {
            Err(ClipboardError::Unavailable(e)) => {
                log_warn!("System clipboard unavailable ({}), using app clipboard", e);
                self.fallback.read_image()
            }
            other => other,
        }
    }

    fn write_image(&mut self, img: &image::RgbaImage) -> Result<(), ClipboardError> {
        self.fallback.write_image(img)?;
        match self.system.write_image(img) {
            Err(ClipboardError::Unavailable(e)) => {
                log_warn!("System clipboard unavailable ({}), kept in app clipboard", e);
                Ok(())
            }
            other => other,
        }
    }
}

pub struct RasterPaintApp {
    session: EditSession,
    clipboard: HostClipboard,
    settings: Settings,
    texture: Option<egui::TextureHandle>,
    needs_upload: bool,
    /// The primary button went down over the canvas and has not been released.
    pointer_captured: bool,
    last_canvas_pos: Option<(i32, i32)>,
}

impl RasterPaintApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        Self {
            session: EditSession::from_settings(&settings),
            clipboard: HostClipboard::default(),
            settings,
            texture: None,
            needs_upload: true,
            pointer_captured: false,
            last_canvas_pos: None,
        }
    }

    fn feed(&mut self, event: InputEvent) {
        if self.session.handle_event(event, &mut self.clipboard) {
            self.needs_upload = true;
        }
    }

    fn run_action(&mut self, action: Action) {
        if self.session.perform(action, &mut self.clipboard) {
            self.needs_upload = true;
        }
    }

    fn upload_texture(&mut self, ctx: &egui::Context) {
        let buffer = self.session.buffer();
        let image = egui::ColorImage::from_rgb(
            [buffer.width() as usize, buffer.height() as usize],
            buffer.as_bytes(),
        );
        match &mut self.texture {
            Some(tex) => tex.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("canvas", image, egui::TextureOptions::NEAREST));
            }
        }
        self.needs_upload = false;
    }

    // ---- keyboard -----------------------------------------------------------

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed,
                    modifiers,
                    ..
                } => {
                    let code = match key {
                        egui::Key::Z => KeyCode::Z,
                        egui::Key::C => KeyCode::C,
                        egui::Key::V => KeyCode::V,
                        _ => KeyCode::Other,
                    };
                    if pressed {
                        self.feed(InputEvent::KeyDown {
                            code,
                            ctrl: modifiers.command,
                        });
                    } else {
                        self.feed(InputEvent::KeyUp { code });
                    }
                }
                // egui-winit reports Ctrl+C / Ctrl+V as clipboard events
                // rather than key presses.
                egui::Event::Copy => self.tap(KeyCode::C),
                egui::Event::Paste(_) => self.tap(KeyCode::V),
                _ => {}
            }
        }
    }

    /// Press only: the key's own release event re-arms the action, so a
    /// `Key` event for the same press in this frame is ignored.
    fn tap(&mut self, code: KeyCode) {
        self.feed(InputEvent::KeyDown { code, ctrl: true });
    }

    // ---- toolbar ------------------------------------------------------------

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for &tool in ToolType::all() {
                if ui
                    .selectable_label(self.session.tool() == tool, tool.label())
                    .clicked()
                    && self.session.set_tool(tool)
                {
                    self.needs_upload = true;
                }
            }

            ui.separator();

            let c = self.session.color();
            let mut rgb = [c.r, c.g, c.b];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                self.session.set_color(Color::new(rgb[0], rgb[1], rgb[2]));
            }

            let mut width = self.session.stroke_width();
            if ui
                .add(egui::Slider::new(&mut width, 1..=MAX_STROKE_WIDTH).text("Width"))
                .changed()
            {
                self.session.set_stroke_width(width);
            }

            ui.separator();

            let undo_label = match self.session.undo_description() {
                Some(desc) => format!("Undo {}", desc),
                None => "Undo".to_string(),
            };
            if ui
                .add_enabled(self.session.can_undo(), egui::Button::new(undo_label))
                .clicked()
            {
                self.run_action(Action::Undo);
            }
            if ui.button("Copy").clicked() {
                self.run_action(Action::Copy);
            }
            if ui.button("Paste").clicked() {
                self.run_action(Action::Paste);
            }

            ui.separator();
            ui.label(format!(
                "History: {} ({} KB)",
                self.session.history_len(),
                self.session.history_memory() / 1024
            ));
        });
    }

    // ---- canvas -------------------------------------------------------------

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let buffer = self.session.buffer();
        let size = egui::vec2(buffer.width() as f32, buffer.height() as f32);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

        let to_canvas = |pos: egui::Pos2| -> (i32, i32) {
            let local = pos - rect.min;
            (local.x.floor() as i32, local.y.floor() as i32)
        };

        let (pointer_pos, primary_down) = ui.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.button_down(egui::PointerButton::Primary),
            )
        });

        if response.is_pointer_button_down_on() && !self.pointer_captured {
            if let Some(pos) = pointer_pos {
                let (x, y) = to_canvas(pos);
                self.pointer_captured = true;
                self.last_canvas_pos = Some((x, y));
                self.feed(InputEvent::PointerDown { x, y });
            }
        } else if self.pointer_captured {
            if let Some(pos) = pointer_pos {
                let (x, y) = to_canvas(pos);
                if primary_down && self.last_canvas_pos != Some((x, y)) {
                    self.last_canvas_pos = Some((x, y));
                    self.feed(InputEvent::PointerMove {
                        x,
                        y,
                        button_held: true,
                    });
                }
            }
            if !primary_down {
                let (x, y) = self.last_canvas_pos.unwrap_or_default();
                self.pointer_captured = false;
                self.last_canvas_pos = None;
                self.feed(InputEvent::PointerUp { x, y });
            }
        }

        if self.needs_upload || self.texture.is_none() {
            self.upload_texture(ui.ctx());
        }
        if let Some(tex) = &self.texture {
            ui.painter().image(
                tex.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }
}

impl eframe::App for RasterPaintApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                self.canvas(ui);
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.stroke_width = self.session.stroke_width();
        self.settings.primary_color = self.session.color();
        self.settings.default_tool = self.session.tool();
        match self.settings.save() {
            Ok(()) => log_info!("Settings saved"),
            Err(e) => log_warn!("Failed to save settings: {}", e),
        }
    }
}
