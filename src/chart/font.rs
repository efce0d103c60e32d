//! Font discovery for chart text
//!
//! Text is rasterised with `ab_glyph`, which only knows fonts registered at runtime.
//! A configured font file wins, otherwise a few well-known system locations are tried.

use plotters::style::{FontStyle, register_font};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Family name every chart text style asks for
pub const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: [&str; 9] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Make sure a font is registered under [`FONT_FAMILY`].
///
/// Returns the registered file, or `None` when no usable font was found.
pub fn ensure_font(configured: Option<&Path>) -> Option<PathBuf> {
    let mut registered = REGISTERED.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(path) = registered.as_ref() {
        return Some(path.clone());
    }

    let candidates = configured
        .into_iter()
        .map(Path::to_path_buf)
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

    for candidate in candidates {
        if !candidate.is_file() {
            continue;
        }
        match register(&candidate) {
            Ok(()) => {
                debug!("Registered chart font {}", candidate.display());
                *registered = Some(candidate.clone());
                return Some(candidate);
            }
            Err(e) => warn!("Unusable font {}: {}", candidate.display(), e),
        }
    }

    None
}

fn register(path: &Path) -> Result<(), String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    // The font registry keeps `'static` references for the rest of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    for style in [FontStyle::Normal, FontStyle::Italic] {
        register_font(FONT_FAMILY, style, bytes)
            .map_err(|_| format!("invalid font data in {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), b"definitely not a font").unwrap();
        let err = register(file.path()).unwrap_err();
        assert!(err.contains("invalid font data"));
        assert!(err.contains(&file.path().display().to_string()));
    }
}
