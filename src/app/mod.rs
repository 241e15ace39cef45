//! App module - the application state and the glue between the egui
//! layer and the spawned backend tasks

mod attachments;
mod backend;
mod outputs;

pub(crate) use outputs::ImageSlot;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use eframe::egui;
use tracing::{info, warn};

use crate::session::{FollowUp, Session, Severity};
use crate::settings::{Settings, ThemeChoice};
use crate::theme::{self, Palette};
use crate::types::{ActionKind, BackendEvent};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) session: Session,
    pub(crate) theme: ThemeChoice,
    pub(crate) backend_url: String,
    pub(crate) data_dir: PathBuf,

    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) client: reqwest::Client,
    /// Completions pushed by spawned tasks, drained once per frame.
    pub(crate) events: Arc<Mutex<Vec<BackendEvent>>>,

    // Auxiliary-output images: fetched bytes, lazily decoded into textures
    pub(crate) image_bytes: HashMap<String, Vec<u8>>,
    pub(crate) image_textures: HashMap<String, Option<egui::TextureHandle>>,
    pub(crate) image_errors: HashMap<String, String>,

    pub(crate) logo_texture: Option<egui::TextureHandle>,

    // Window state
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) models_requested: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx, settings.theme);

        Self {
            session: Session::new(),
            theme: settings.theme,
            backend_url: settings.backend_url,
            data_dir,
            runtime: tokio::runtime::Runtime::new().unwrap(),
            client: reqwest::Client::new(),
            events: Arc::new(Mutex::new(Vec::new())),
            image_bytes: HashMap::new(),
            image_textures: HashMap::new(),
            image_errors: HashMap::new(),
            logo_texture: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            models_requested: false,
        }
    }

    pub(crate) fn palette(&self) -> &'static Palette {
        theme::palette(self.theme)
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            theme: self.theme,
            backend_url: self.backend_url.clone(),
        };
        settings.save(&self.data_dir);
    }

    /// Applies a theme switch immediately and persists it.
    pub fn set_theme(&mut self, ctx: &egui::Context, choice: ThemeChoice) {
        if self.theme == choice {
            return;
        }
        self.theme = choice;
        theme::apply_visuals(ctx, choice);
        self.save_settings();
        self.session.notices.push(Severity::Success, "Theme updated");
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub(crate) fn base_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    pub fn copy_code(&mut self, ctx: &egui::Context) {
        if self.session.code.is_empty() {
            self.session
                .notices
                .push(Severity::Error, "No code to copy");
            return;
        }
        ctx.copy_text(self.session.code.clone());
        self.session
            .notices
            .push(Severity::Success, "Code copied to clipboard");
    }

    pub fn clear_all(&mut self) {
        self.session.clear_all();
        self.image_bytes.clear();
        self.image_textures.clear();
        self.image_errors.clear();
    }

    // ========================================================================
    // EVENT DRAIN
    // ========================================================================

    pub(crate) fn drain_events(&mut self, ctx: &egui::Context) {
        let events: Vec<BackendEvent> = std::mem::take(&mut *self.events.lock().unwrap());
        for event in events {
            self.handle_event(ctx, event);
        }
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: BackendEvent) {
        match event {
            BackendEvent::Action { kind, outcome } => {
                if let Err(message) = &outcome {
                    warn!(?kind, error = %message, "Action failed");
                } else {
                    info!(?kind, "Action completed");
                }
                let succeeded = outcome.is_ok();
                let follow_up = self.session.finish(kind, outcome);

                if kind == ActionKind::Execute && succeeded {
                    self.refresh_special_images(ctx);
                }
                if follow_up == Some(FollowUp::Execute) {
                    self.start_execute(ctx);
                }
            }
            BackendEvent::ImageLoaded { url, bytes } => {
                self.image_bytes.insert(url, bytes);
            }
            BackendEvent::ImageFailed { url, error } => {
                warn!(url = %url, error = %error, "Auxiliary image fetch failed");
                self.image_errors.insert(url, error);
            }
        }
    }
}
