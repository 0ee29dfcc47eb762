use plotters::style::{register_font, FontStyle};
use std::fs;
use std::path::Path;

const FAMILY: &str = "wordscope-label";
const DEFAULT_FAMILY: &str = "wordscope-default";
static DEFAULT_FACE: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Font used for the title, axis ticks and point labels.
///
/// Loading never fails: a missing or unreadable font falls back to the
/// bundled DejaVu Sans face, which has no glyphs for Indic scripts but still
/// draws every label.
#[derive(Clone, Copy, Debug)]
pub struct LabelFont {
    family: Option<&'static str>,
    fallback: bool,
}

impl LabelFont {
    /// The bundled face.
    pub fn fallback() -> Self {
        if register_font(DEFAULT_FAMILY, FontStyle::Normal, DEFAULT_FACE).is_err() {
            error!("register bundled font failed, plot text will not be drawn");
            return Self {
                family: None,
                fallback: true,
            };
        }
        Self {
            family: Some(DEFAULT_FAMILY),
            fallback: true,
        }
    }

    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!(
                "font not found at {}, fall back to bundled font",
                path.display()
            );
            return Self::fallback();
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("read font {} failed: {}, fall back to bundled font", path.display(), e);
                return Self::fallback();
            }
        };

        // the plotting backend keeps registered fonts for the whole process
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        if register_font(FAMILY, FontStyle::Normal, bytes).is_err() {
            warn!(
                "register font {} failed: invalid font data, fall back to bundled font",
                path.display()
            );
            return Self::fallback();
        }
        info!("font loaded: {}", path.display());
        Self {
            family: Some(FAMILY),
            fallback: false,
        }
    }

    pub fn family(&self) -> Option<&'static str> {
        self.family
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}
