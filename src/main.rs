#![windows_subsystem = "windows"]
//! Interpreter Studio - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod highlight;
mod session;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use std::path::PathBuf;
use std::time::Instant;

use app::App;
use app::ImageSlot;
use constants::*;
use eframe::egui;
use settings::ThemeChoice;
use tracing::info;
use types::{ActionKind, Language, Mode, SpecialOutput};
use ui::components;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "interpreter-studio.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,interpreter_studio=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Interpreter Studio");

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Interpreter Studio starting");

    // Load saved window position/size and theme
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1100.0, 780.0)))
        .with_min_inner_size([860.0, 600.0])
        .with_title("Interpreter Studio");

    // Window/taskbar icon from the embedded SVG logo
    {
        let (rgba, w, h) = utils::rasterize_logo(64);
        let icon = egui::IconData { rgba, width: w, height: h };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Interpreter Studio",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Populate the model selector once at startup
        if !self.models_requested {
            self.models_requested = true;
            self.start_load_models(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        self.drain_events(ctx);

        self.render_top_bar(ctx);
        self.render_central(ctx);
        self.render_notifications(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Interpreter Studio shutting down");
        self.save_settings();
    }
}

impl App {
    // ========================================================================
    // TOP BAR
    // ========================================================================

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = self.palette();

        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::new()
                    .fill(palette.bg_elevated)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let texture = self.logo_texture.get_or_insert_with(|| {
                        let (pixels, w, h) = utils::rasterize_logo(48);
                        ctx.load_texture(
                            "logo",
                            egui::ColorImage::from_rgba_unmultiplied(
                                [w as usize, h as usize],
                                &pixels,
                            ),
                            egui::TextureOptions::LINEAR,
                        )
                    });
                    ui.image(egui::load::SizedTexture::new(
                        texture.id(),
                        egui::vec2(22.0, 22.0),
                    ));
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("INTERPRETER STUDIO")
                                .size(theme::FONT_LABEL)
                                .color(palette.text_secondary),
                        )
                        .selectable(false),
                    );

                    ui.separator();

                    components::section_label(ui, palette, "MODE");
                    egui::ComboBox::from_id_salt("mode_select")
                        .width(100.0)
                        .selected_text(self.session.mode.label())
                        .show_ui(ui, |ui| {
                            for mode in Mode::ALL {
                                ui.selectable_value(&mut self.session.mode, mode, mode.label());
                            }
                        });

                    components::section_label(ui, palette, "MODEL");
                    let model_text = if self.session.models.is_empty() {
                        "No models".to_string()
                    } else {
                        self.session.model.clone()
                    };
                    egui::ComboBox::from_id_salt("model_select")
                        .width(150.0)
                        .selected_text(model_text)
                        .show_ui(ui, |ui| {
                            for name in self.session.models.clone() {
                                ui.selectable_value(&mut self.session.model, name.clone(), name);
                            }
                        });

                    components::section_label(ui, palette, "LANGUAGE");
                    egui::ComboBox::from_id_salt("language_select")
                        .width(110.0)
                        .selected_text(self.session.language.label())
                        .show_ui(ui, |ui| {
                            for language in Language::ALL {
                                ui.selectable_value(
                                    &mut self.session.language,
                                    language,
                                    language.label(),
                                );
                            }
                        });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let mut light_active = !self.theme.is_dark();
                        if components::segmented_toggle(
                            ui,
                            palette,
                            "Light",
                            "Dark",
                            &mut light_active,
                        ) {
                            let choice = if light_active {
                                ThemeChoice::Light
                            } else {
                                ThemeChoice::Dark
                            };
                            self.set_theme(ctx, choice);
                        }
                    });
                });
            });
    }

    // ========================================================================
    // CENTRAL PANEL
    // ========================================================================

    fn render_central(&mut self, ctx: &egui::Context) {
        let palette = self.palette();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(palette.bg_base)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        self.render_prompt_section(ctx, ui);
                        ui.add_space(12.0);
                        if self.session.show_code {
                            self.render_code_section(ctx, ui);
                            ui.add_space(12.0);
                        }
                        self.render_output_section(ctx, ui);
                        ui.add_space(12.0);
                        self.render_install_row(ctx, ui);
                    });
            });
    }

    fn render_prompt_section(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let palette = self.palette();

        theme::section_frame(palette).show(ui, |ui| {
            components::section_label(ui, palette, "PROMPT");
            ui.add_space(4.0);
            ui.add(
                egui::TextEdit::multiline(&mut self.session.prompt)
                    .hint_text("Describe the code you want...")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                let generating = self.session.is_pending(ActionKind::Generate);
                let label = if generating {
                    "Generating...".to_string()
                } else {
                    format!("{}  Generate", egui_phosphor::regular::LIGHTNING)
                };
                if ui
                    .add_enabled(!generating, theme::button_accent(palette, label))
                    .clicked()
                {
                    self.start_generate(ctx);
                }

                ui.checkbox(&mut self.session.run_after_generate, "Run after generate");
                ui.checkbox(&mut self.session.show_code, "Show code");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(theme::button(
                            palette,
                            format!("{}  Clear", egui_phosphor::regular::TRASH),
                        ))
                        .clicked()
                    {
                        self.clear_all();
                    }
                    if ui
                        .add(theme::button(
                            palette,
                            format!("{}  Attach folder", egui_phosphor::regular::FOLDER_OPEN),
                        ))
                        .clicked()
                    {
                        self.attach_folder();
                    }
                    if ui
                        .add(theme::button(
                            palette,
                            format!("{}  Attach files", egui_phosphor::regular::FILES),
                        ))
                        .clicked()
                    {
                        self.attach_files();
                    }
                });
            });
        });
    }

    fn render_code_section(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let palette = self.palette();
        let language = self.session.language;

        theme::section_frame(palette).show(ui, |ui| {
            ui.horizontal(|ui| {
                components::section_label(ui, palette, "CODE");
                let lock_icon = if self.session.code_locked {
                    egui_phosphor::regular::LOCK
                } else {
                    egui_phosphor::regular::LOCK_OPEN
                };
                ui.label(
                    egui::RichText::new(lock_icon)
                        .size(theme::FONT_SECTION)
                        .color(palette.text_dim),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(self.session.language.label())
                            .size(theme::FONT_SECTION)
                            .color(palette.accent),
                    );
                });
            });
            ui.add_space(4.0);

            let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
                let mut job = highlight::layout_job(
                    language,
                    palette,
                    text,
                    egui::FontId::monospace(theme::FONT_CODE),
                );
                job.wrap.max_width = wrap_width;
                ui.fonts(|f| f.layout_job(job))
            };
            ui.add(
                egui::TextEdit::multiline(&mut self.session.code)
                    .code_editor()
                    .desired_rows(12)
                    .desired_width(f32::INFINITY)
                    .interactive(!self.session.code_locked)
                    .layouter(&mut layouter),
            );
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                if ui.add(theme::button(palette, self.session.lock_label())).clicked() {
                    self.session.toggle_code_lock();
                }

                let fixing = self.session.is_pending(ActionKind::Fix);
                let fix_label = if fixing {
                    "Fixing...".to_string()
                } else {
                    format!("{}  Fix", egui_phosphor::regular::WRENCH)
                };
                if ui
                    .add_enabled(!fixing, theme::button(palette, fix_label))
                    .clicked()
                {
                    self.start_fix(ctx);
                }

                let saving = self.session.is_pending(ActionKind::Save);
                let save_label = if saving {
                    "Saving...".to_string()
                } else {
                    format!("{}  Save", egui_phosphor::regular::FLOPPY_DISK)
                };
                if ui
                    .add_enabled(!saving, theme::button(palette, save_label))
                    .clicked()
                {
                    self.start_save(ctx);
                }

                if ui
                    .add(theme::button(
                        palette,
                        format!("{}  Copy", egui_phosphor::regular::COPY),
                    ))
                    .clicked()
                {
                    self.copy_code(ctx);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let executing = self.session.is_pending(ActionKind::Execute);
                    let run_label = if executing {
                        "Running...".to_string()
                    } else {
                        format!("{}  Run", egui_phosphor::regular::PLAY)
                    };
                    if ui
                        .add_enabled(!executing, theme::button_accent(palette, run_label))
                        .clicked()
                    {
                        self.start_execute(ctx);
                    }
                });
            });
        });
    }

    fn render_output_section(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let palette = self.palette();

        theme::section_frame(palette).show(ui, |ui| {
            components::section_label(ui, palette, "OUTPUT");
            ui.add_space(4.0);
            ui.add(
                egui::TextEdit::multiline(&mut self.session.output)
                    .code_editor()
                    .desired_rows(6)
                    .desired_width(f32::INFINITY)
                    .interactive(false),
            );
        });

        // Auxiliary blocks from the last execute response
        let special = self.session.special_outputs.clone();
        for item in &special {
            ui.add_space(8.0);
            self.render_special_block(ctx, ui, item);
        }
    }

    fn render_special_block(
        &mut self,
        ctx: &egui::Context,
        ui: &mut egui::Ui,
        item: &SpecialOutput,
    ) {
        let palette = self.palette();

        theme::section_frame(palette).show(ui, |ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(item.title())
                        .size(theme::FONT_BODY)
                        .color(palette.text_primary),
                )
                .selectable(false),
            );
            ui.add_space(4.0);

            match item {
                SpecialOutput::Image { url, .. } => match self.image_slot(ctx, url) {
                    ImageSlot::Loading => {
                        ui.horizontal(|ui| {
                            ui.add(egui::Spinner::new().size(16.0));
                            ui.label(
                                egui::RichText::new("Loading image...")
                                    .size(theme::FONT_LABEL)
                                    .color(palette.text_muted),
                            );
                        });
                    }
                    ImageSlot::Failed(error) => {
                        ui.label(
                            egui::RichText::new(format!("Image unavailable: {error}"))
                                .size(theme::FONT_LABEL)
                                .color(palette.status_error),
                        );
                    }
                    ImageSlot::Ready(texture) => {
                        let size = texture.size();
                        let avail = ui.available_width();
                        let scale = (avail / size[0] as f32).min(1.0);
                        let shown =
                            egui::vec2(size[0] as f32 * scale, size[1] as f32 * scale);
                        ui.image(egui::load::SizedTexture::new(texture.id(), shown));
                    }
                },
                SpecialOutput::Html { content, .. } => {
                    // Markup renders verbatim; there is no HTML engine here.
                    egui::ScrollArea::vertical()
                        .id_salt(item.title())
                        .max_height(220.0)
                        .show(ui, |ui| {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(content)
                                        .monospace()
                                        .size(theme::FONT_CODE)
                                        .color(palette.text_secondary),
                                )
                                .selectable(true),
                            );
                        });
                }
            }
        });
    }

    fn render_install_row(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let palette = self.palette();

        theme::section_frame(palette).show(ui, |ui| {
            components::section_label(ui, palette, "PACKAGES");
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.session.package_name)
                        .hint_text("Package name (e.g. numpy)")
                        .desired_width(260.0),
                );

                let installing = self.session.is_pending(ActionKind::Install);
                let label = if installing {
                    "Installing...".to_string()
                } else {
                    format!("{}  Install", egui_phosphor::regular::PACKAGE)
                };
                if ui
                    .add_enabled(!installing, theme::button(palette, label))
                    .clicked()
                {
                    self.start_install(ctx);
                }
            });
        });
    }

    // ========================================================================
    // NOTIFICATIONS
    // ========================================================================

    // Stacked top-right, newest last, auto-fading; hover does not pause
    // the timer but close always works.
    fn render_notifications(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.session.notices.prune(now);
        if self.session.notices.is_empty() {
            return;
        }

        let palette = self.palette();
        let screen = ctx.screen_rect();
        let mut dismissed: Option<usize> = None;

        egui::Area::new(egui::Id::new("notification_container"))
            .fixed_pos(egui::pos2(screen.right() - 12.0, screen.top() + 48.0))
            .pivot(egui::Align2::RIGHT_TOP)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (index, notice) in self.session.notices.iter().enumerate() {
                    let alpha = notice.alpha(now);
                    if components::notification_card(ui, palette, notice, alpha) {
                        dismissed = Some(index);
                    }
                    ui.add_space(6.0);
                }
            });

        if let Some(index) = dismissed {
            self.session.notices.dismiss(index);
        }

        // Keep repainting while notices are on screen so fades animate
        ctx.request_repaint();
    }
}
