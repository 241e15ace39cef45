//! Light and dark palettes plus the egui visuals derived from them.
//! All colors, sizes, and styling should reference these constants.

use egui::Color32;

use crate::session::Severity;
use crate::settings::ThemeChoice;

// =============================================================================
// PALETTE
// =============================================================================

/// Syntax colors for the code surface highlighter
pub struct SyntaxColors {
    pub keyword: Color32,
    pub string: Color32,
    pub number: Color32,
    pub comment: Color32,
    pub call: Color32,
    pub plain: Color32,
}

pub struct Palette {
    pub dark_mode: bool,

    // Backgrounds
    pub bg_base: Color32,
    pub bg_elevated: Color32,
    pub bg_input: Color32,
    pub bg_surface: Color32,
    pub window_fill: Color32,

    // Borders
    pub border_subtle: Color32,
    pub border_default: Color32,

    // Text
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub text_dim: Color32,

    // Accent (teal)
    pub accent: Color32,

    // Buttons
    pub btn_default: Color32,
    pub btn_accent: Color32,
    pub btn_accent_text: Color32,

    // Status
    pub status_success: Color32,
    pub status_error: Color32,
    pub status_info: Color32,

    pub syntax: SyntaxColors,
}

pub const DARK: Palette = Palette {
    dark_mode: true,

    bg_base: Color32::from_rgb(0x09, 0x09, 0x0b),      // zinc-950
    bg_elevated: Color32::from_rgb(0x18, 0x18, 0x1b),  // zinc-900
    bg_input: Color32::from_rgb(0x14, 0x14, 0x18),
    bg_surface: Color32::from_rgb(0x27, 0x27, 0x2a),   // zinc-800
    window_fill: Color32::from_rgb(0x1a, 0x1a, 0x1e),

    border_subtle: Color32::from_rgb(0x27, 0x27, 0x2a),
    border_default: Color32::from_rgb(0x3f, 0x3f, 0x46), // zinc-700

    text_primary: Color32::WHITE,
    text_secondary: Color32::from_rgb(0xe4, 0xe4, 0xe7), // zinc-200
    text_muted: Color32::from_rgb(0xa1, 0xa1, 0xaa),     // zinc-400
    text_dim: Color32::from_rgb(0x71, 0x71, 0x7a),       // zinc-500

    accent: Color32::from_rgb(0x2d, 0xd4, 0xbf), // teal-400

    btn_default: Color32::from_rgb(0x3f, 0x3f, 0x46),
    btn_accent: Color32::from_rgb(0x2d, 0xd4, 0xbf),
    btn_accent_text: Color32::from_rgb(0x04, 0x2f, 0x2e),

    status_success: Color32::from_rgb(0x34, 0xd3, 0x99), // emerald-400
    status_error: Color32::from_rgb(0xf8, 0x71, 0x71),   // red-400
    status_info: Color32::from_rgb(0x38, 0xbd, 0xf8),    // sky-400

    syntax: SyntaxColors {
        keyword: Color32::from_rgb(0xc0, 0x84, 0xfc),  // violet-400
        string: Color32::from_rgb(0x86, 0xef, 0xac),   // green-300
        number: Color32::from_rgb(0xfb, 0xbf, 0x24),   // amber-400
        comment: Color32::from_rgb(0x71, 0x71, 0x7a),  // zinc-500
        call: Color32::from_rgb(0x7d, 0xd3, 0xfc),     // sky-300
        plain: Color32::from_rgb(0xe4, 0xe4, 0xe7),
    },
};

pub const LIGHT: Palette = Palette {
    dark_mode: false,

    bg_base: Color32::from_rgb(0xfa, 0xfa, 0xfa),      // zinc-50
    bg_elevated: Color32::WHITE,
    bg_input: Color32::WHITE,
    bg_surface: Color32::from_rgb(0xe4, 0xe4, 0xe7),   // zinc-200
    window_fill: Color32::WHITE,

    border_subtle: Color32::from_rgb(0xe4, 0xe4, 0xe7),
    border_default: Color32::from_rgb(0xd4, 0xd4, 0xd8), // zinc-300

    text_primary: Color32::from_rgb(0x18, 0x18, 0x1b),
    text_secondary: Color32::from_rgb(0x3f, 0x3f, 0x46),
    text_muted: Color32::from_rgb(0x71, 0x71, 0x7a),
    text_dim: Color32::from_rgb(0xa1, 0xa1, 0xaa),

    accent: Color32::from_rgb(0x0d, 0x94, 0x88), // teal-600

    btn_default: Color32::from_rgb(0xe4, 0xe4, 0xe7),
    btn_accent: Color32::from_rgb(0x0d, 0x94, 0x88),
    btn_accent_text: Color32::WHITE,

    status_success: Color32::from_rgb(0x05, 0x96, 0x69), // emerald-600
    status_error: Color32::from_rgb(0xdc, 0x26, 0x26),   // red-600
    status_info: Color32::from_rgb(0x02, 0x84, 0xc7),    // sky-600

    syntax: SyntaxColors {
        keyword: Color32::from_rgb(0x7c, 0x3a, 0xed),  // violet-600
        string: Color32::from_rgb(0x16, 0xa3, 0x4a), // green-600
        number: Color32::from_rgb(0xd9, 0x77, 0x06),   // amber-600
        comment: Color32::from_rgb(0xa1, 0xa1, 0xaa),
        call: Color32::from_rgb(0x02, 0x84, 0xc7),
        plain: Color32::from_rgb(0x27, 0x27, 0x2a),
    },
};

pub fn palette(choice: ThemeChoice) -> &'static Palette {
    match choice {
        ThemeChoice::Dark => &DARK,
        ThemeChoice::Light => &LIGHT,
    }
}

impl Palette {
    pub fn severity_color(&self, severity: Severity) -> Color32 {
        match severity {
            Severity::Info => self.status_info,
            Severity::Success => self.status_success,
            Severity::Error => self.status_error,
        }
    }
}

// =============================================================================
// TYPOGRAPHY & DIMENSIONS
// =============================================================================
pub const FONT_BODY: f32 = 14.0;
pub const FONT_LABEL: f32 = 13.0;
pub const FONT_SECTION: f32 = 11.0;
pub const FONT_CODE: f32 = 13.0;

pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 8.0;
pub const STROKE_DEFAULT: f32 = 1.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context, choice: ThemeChoice) {
    let p = palette(choice);
    let base = if p.dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    ctx.set_visuals(egui::Visuals {
        dark_mode: p.dark_mode,
        panel_fill: p.bg_base,
        window_fill: p.window_fill,
        extreme_bg_color: p.bg_input,
        faint_bg_color: p.bg_elevated,
        hyperlink_color: p.accent,
        widgets: egui::style::Widgets {
            noninteractive: egui::style::WidgetVisuals {
                bg_fill: p.bg_elevated,
                weak_bg_fill: p.bg_surface,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, p.border_subtle),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, p.text_primary),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            inactive: egui::style::WidgetVisuals {
                bg_fill: Color32::TRANSPARENT,
                weak_bg_fill: p.bg_elevated,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, p.border_subtle),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, p.text_secondary),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            hovered: egui::style::WidgetVisuals {
                bg_fill: p.bg_surface,
                weak_bg_fill: p.bg_surface,
                bg_stroke: egui::Stroke::NONE,
                fg_stroke: egui::Stroke::new(1.5, p.text_primary),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            active: egui::style::WidgetVisuals {
                bg_fill: p.bg_surface,
                weak_bg_fill: p.bg_surface,
                bg_stroke: egui::Stroke::NONE,
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, p.text_primary),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: -2.0,
            },
            open: egui::style::WidgetVisuals {
                bg_fill: p.bg_surface,
                weak_bg_fill: p.bg_elevated,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, p.border_subtle),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, p.text_primary),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
        },
        striped: false,
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        window_stroke: egui::Stroke::new(1.0, p.border_default),
        window_corner_radius: egui::CornerRadius::same(8),
        menu_corner_radius: egui::CornerRadius::same(8),
        ..base
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.menu_margin = egui::Margin::symmetric(6, 4);
        style.spacing.scroll.bar_width = 6.0;
    });
}

// =============================================================================
// HELPER - Frames
// =============================================================================

/// Section panel frame with fill and border
pub fn section_frame(p: &Palette) -> egui::Frame {
    egui::Frame::new()
        .fill(p.bg_input)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, p.border_subtle))
        .corner_radius(RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(12))
}

/// Frame for floating notification cards
pub fn notice_frame(p: &Palette, accent: Color32) -> egui::Frame {
    egui::Frame::new()
        .fill(p.window_fill)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, accent))
        .corner_radius(RADIUS_LARGE - 2.0)
        .inner_margin(egui::Margin::symmetric(12, 8))
}

// =============================================================================
// HELPER - Button styles
// =============================================================================

/// Default button
pub fn button(p: &Palette, text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(text.into())
            .size(FONT_LABEL)
            .color(p.text_primary),
    )
    .fill(p.btn_default)
    .corner_radius(RADIUS_DEFAULT)
}

/// Accent teal button (primary actions like Generate)
pub fn button_accent(p: &Palette, text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(text.into())
            .size(FONT_LABEL)
            .color(p.btn_accent_text),
    )
    .fill(p.btn_accent)
    .corner_radius(RADIUS_DEFAULT)
}
