//! Utility functions

use std::path::{Path, PathBuf};

// Two-tone bracket mark, square viewBox — for the sidebar logo and the
// window/taskbar icon.
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><path fill="#2dd4bf" d="M26 12 6 32l20 20 6-6-14-14 14-14z"/><path fill="#38bdf8" d="M38 12l20 20-20 20-6-6 14-14-14-14z"/><path fill="#e4e4e7" d="m34.8 10 5.8 2.1-11.4 41.9-5.8-2.1z"/></svg>"##;

/// Rasterize the logo SVG to a square image at the given size.
pub fn rasterize_logo(size: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), size, size)
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Display path for a picked entry: absolute paths pass through, relative
/// ones are anchored to the working directory.
pub fn display_path(path: &Path) -> String {
    if path.is_absolute() {
        path.display().to_string()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| PathBuf::from(path))
            .display()
            .to_string()
    }
}

/// The block appended to the prompt for picked files.
pub fn format_files_block(paths: &[PathBuf]) -> String {
    let list: Vec<String> = paths.iter().map(|p| display_path(p)).collect();
    format!("Selected Files:\n{}", list.join("\n"))
}

/// The block appended to the prompt for a picked folder.
pub fn format_folder_block(path: &Path) -> String {
    format!("Selected Folder:\n{}", display_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_pass_through() {
        let path = Path::new("/home/user/project/main.py");
        assert_eq!(display_path(path), "/home/user/project/main.py");
    }

    #[test]
    fn relative_paths_anchor_to_the_working_directory() {
        let shown = display_path(Path::new("src/main.py"));
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(shown, cwd.join("src/main.py").display().to_string());
    }

    #[test]
    fn files_block_lists_one_path_per_line() {
        let paths = vec![
            PathBuf::from("/tmp/a.py"),
            PathBuf::from("/tmp/b.py"),
        ];
        assert_eq!(
            format_files_block(&paths),
            "Selected Files:\n/tmp/a.py\n/tmp/b.py"
        );
    }

    #[test]
    fn folder_block_carries_the_single_path() {
        assert_eq!(
            format_folder_block(Path::new("/data/projects")),
            "Selected Folder:\n/data/projects"
        );
    }

    #[test]
    fn logo_rasterizes_to_requested_square() {
        let (pixels, w, h) = rasterize_logo(32);
        assert_eq!((w, h), (32, 32));
        assert_eq!(pixels.len(), 32 * 32 * 4);
    }
}
