//! Font collaborator: resolves font files into the four text faces.
//!
//! `ab_glyph` does not discover system fonts, so each configured file is read
//! once and registered with plotters under its own family name.

use log::{info, warn};
use plotters::style::FontStyle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::error::{ExhibitError, Result};
use crate::style::FontVariant;

/// Family used for variants that have no font file.
pub const FALLBACK_FAMILY: &str = "sans-serif";

/// Font files for the four variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub normal: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub italic: Option<PathBuf>,
    pub bold_italic: Option<PathBuf>,
}

impl FontPaths {
    pub fn get(&self, variant: FontVariant) -> Option<&Path> {
        match variant {
            FontVariant::Normal => self.normal.as_deref(),
            FontVariant::Bold => self.bold.as_deref(),
            FontVariant::Italic => self.italic.as_deref(),
            FontVariant::BoldItalic => self.bold_italic.as_deref(),
        }
    }

    /// Same file for every variant.
    pub fn uniform(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            normal: Some(path.clone()),
            bold: Some(path.clone()),
            italic: Some(path.clone()),
            bold_italic: Some(path),
        }
    }
}

/// Resolved handle for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHandle {
    pub family: String,
    /// Whether glyph data was registered; without it only vector output can carry the text.
    pub loaded: bool,
}

/// The four handles every text draw call picks from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSet {
    handles: [FontHandle; 4],
}

/// Families already registered in this process, by path.
fn registry() -> &'static Mutex<HashMap<PathBuf, String>> {
    static REGISTERED: OnceLock<Mutex<HashMap<PathBuf, String>>> = OnceLock::new();
    REGISTERED.get_or_init(|| Mutex::new(HashMap::new()))
}

fn register(path: &Path) -> Result<String> {
    let mut registered = registry()
        .lock()
        .map_err(|_| ExhibitError::Font("font registry poisoned".into()))?;
    if let Some(family) = registered.get(path) {
        return Ok(family.clone());
    }
    let bytes = std::fs::read(path)
        .map_err(|e| ExhibitError::Font(format!("cannot read {}: {e}", path.display())))?;
    let family = path.display().to_string();
    // plotters keeps a 'static reference; each file is leaked once per process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(&family, FontStyle::Normal, bytes)
        .map_err(|_| ExhibitError::Font(format!("{} is not a usable font", path.display())))?;
    info!("registered font {family}");
    registered.insert(path.to_path_buf(), family.clone());
    Ok(family)
}

impl FontSet {
    /// Load every configured file. A missing entry falls back to
    /// [`FALLBACK_FAMILY`]; a configured file that cannot be read is an error.
    pub fn load(paths: &FontPaths) -> Result<FontSet> {
        let handle = |variant: FontVariant| -> Result<FontHandle> {
            match paths.get(variant) {
                Some(path) => Ok(FontHandle {
                    family: register(path)?,
                    loaded: true,
                }),
                None => {
                    warn!("no font file for {variant:?}; text falls back to `{FALLBACK_FAMILY}`");
                    Ok(FontHandle {
                        family: FALLBACK_FAMILY.to_string(),
                        loaded: false,
                    })
                }
            }
        };
        Ok(FontSet {
            handles: [
                handle(FontVariant::Normal)?,
                handle(FontVariant::Bold)?,
                handle(FontVariant::Italic)?,
                handle(FontVariant::BoldItalic)?,
            ],
        })
    }

    pub fn get(&self, variant: FontVariant) -> &FontHandle {
        let idx = match variant {
            FontVariant::Normal => 0,
            FontVariant::Bold => 1,
            FontVariant::Italic => 2,
            FontVariant::BoldItalic => 3,
        };
        &self.handles[idx]
    }
}
