//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use eframe::egui;

use crate::session::{Notice, Severity};
use crate::theme::{self, Palette};

/// Render one notification card. Returns true when its close control
/// was clicked.
pub fn notification_card(
    ui: &mut egui::Ui,
    palette: &Palette,
    notice: &Notice,
    alpha: f32,
) -> bool {
    let accent = palette.severity_color(notice.severity).gamma_multiply(alpha);
    let mut dismissed = false;

    theme::notice_frame(palette, accent)
        .fill(palette.window_fill.gamma_multiply(alpha))
        .show(ui, |ui| {
            ui.set_width(300.0);
            ui.horizontal(|ui| {
                let icon = match notice.severity {
                    Severity::Info => egui_phosphor::regular::INFO,
                    Severity::Success => egui_phosphor::regular::CHECK_CIRCLE,
                    Severity::Error => egui_phosphor::regular::WARNING_CIRCLE,
                };
                ui.label(egui::RichText::new(icon).size(16.0).color(accent));
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(&notice.message)
                            .size(theme::FONT_LABEL)
                            .color(palette.text_primary.gamma_multiply(alpha)),
                    )
                    .wrap(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (rect, resp) =
                        ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::click());
                    let color = if resp.hovered() {
                        palette.text_primary
                    } else {
                        palette.text_muted
                    };
                    if resp.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    }
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        egui_phosphor::regular::X,
                        egui::FontId::proportional(12.0),
                        color.gamma_multiply(alpha),
                    );
                    if resp.clicked() {
                        dismissed = true;
                    }
                });
            });
        });

    dismissed
}

/// Two-option segmented toggle. Returns true if the selection changed.
/// `left_active` indicates if the left option is currently selected.
pub fn segmented_toggle(
    ui: &mut egui::Ui,
    palette: &Palette,
    left_label: &str,
    right_label: &str,
    left_active: &mut bool,
) -> bool {
    let mut changed = false;
    let height = 24.0;
    let font_size = 12.0;
    let rounding = 5.0;
    let segment_width = 58.0;
    let total_width = segment_width * 2.0;

    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(total_width, height), egui::Sense::click());
    let painter = ui.painter();

    painter.rect_filled(rect, rounding, palette.bg_surface);

    let left_rect =
        egui::Rect::from_min_max(rect.min, egui::pos2(rect.min.x + segment_width, rect.max.y));
    let right_rect =
        egui::Rect::from_min_max(egui::pos2(rect.min.x + segment_width, rect.min.y), rect.max);
    let active_rect = if *left_active { left_rect } else { right_rect };

    painter.rect_filled(active_rect.shrink(2.0), rounding - 1.0, palette.btn_accent);

    let (left_color, right_color) = if *left_active {
        (palette.btn_accent_text, palette.text_muted)
    } else {
        (palette.text_muted, palette.btn_accent_text)
    };
    painter.text(
        left_rect.center(),
        egui::Align2::CENTER_CENTER,
        left_label,
        egui::FontId::proportional(font_size),
        left_color,
    );
    painter.text(
        right_rect.center(),
        egui::Align2::CENTER_CENTER,
        right_label,
        egui::FontId::proportional(font_size),
        right_color,
    );

    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let clicked_left = pos.x < rect.min.x + segment_width;
            if clicked_left != *left_active {
                *left_active = clicked_left;
                changed = true;
            }
        }
    }
    changed
}

/// Dim uppercase section header, matching the sidebar labels.
pub fn section_label(ui: &mut egui::Ui, palette: &Palette, text: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(text)
                .size(theme::FONT_SECTION)
                .color(palette.text_dim),
        )
        .selectable(false),
    );
}
