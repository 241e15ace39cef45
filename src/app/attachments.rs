//! File and folder attachment via native dialogs
//!
//! Only paths travel into the prompt; file contents are never read.

use tracing::info;

use super::App;
use crate::session::Severity;
use crate::utils;

impl App {
    pub fn attach_files(&mut self) {
        let Some(paths) = rfd::FileDialog::new().pick_files() else {
            return;
        };
        if paths.is_empty() {
            return;
        }
        info!(count = paths.len(), "Files attached to prompt");
        self.session
            .append_prompt_block(&utils::format_files_block(&paths));
        self.session
            .notices
            .push(Severity::Success, format!("Added {} file(s)", paths.len()));
    }

    pub fn attach_folder(&mut self) {
        let Some(path) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        info!(path = %path.display(), "Folder attached to prompt");
        self.session
            .append_prompt_block(&utils::format_folder_block(&path));
        self.session
            .notices
            .push(Severity::Success, "Added folder path");
    }
}
