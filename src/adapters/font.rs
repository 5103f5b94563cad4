use crate::domain::model::FontHandle;
use crate::domain::ports::FontLocator;
use std::path::{Path, PathBuf};
use usvg::fontdb;

/// Families tried in order before falling back to the generic sans-serif face.
pub const PREFERRED_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// Looks up a sans-serif font among the fonts installed on the host.
#[derive(Debug, Clone)]
pub struct SystemFontLocator {
    families: Vec<String>,
}

impl SystemFontLocator {
    pub fn new() -> Self {
        Self {
            families: PREFERRED_FAMILIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn locate_in(&self, db: &fontdb::Database) -> Option<FontHandle> {
        let mut families: Vec<fontdb::Family<'_>> = self
            .families
            .iter()
            .map(|name| fontdb::Family::Name(name.as_str()))
            .collect();
        families.push(fontdb::Family::SansSerif);

        // fontdb 會依序嘗試每個 family，回傳第一個符合的
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };

        let id = db.query(&query)?;
        let face = db.face(id)?;
        let path = match &face.source {
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => path.clone(),
            fontdb::Source::Binary(_) => return None,
        };
        let family = face.families.first().map(|(name, _)| name.clone())?;

        Some(FontHandle { family, path })
    }
}

impl Default for SystemFontLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLocator for SystemFontLocator {
    fn locate(&self) -> Option<FontHandle> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let found = self.locate_in(&db);
        match &found {
            Some(handle) => tracing::debug!(
                "Using font '{}' from {}",
                handle.family,
                handle.path.display()
            ),
            None => tracing::debug!(
                "No preferred font found among {} system faces, renderer will pick its default",
                db.len()
            ),
        }
        found
    }
}

/// A font file given explicitly by the user, e.g. `--font path/to/face.ttf`.
#[derive(Debug, Clone)]
pub struct FileFontLocator {
    path: PathBuf,
}

impl FileFontLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontLocator for FileFontLocator {
    fn locate(&self) -> Option<FontHandle> {
        let handle = read_font_file(&self.path);
        if handle.is_none() {
            tracing::warn!(
                "⚠️ Could not load font file {}, falling back to renderer default",
                self.path.display()
            );
        }
        handle
    }
}

fn read_font_file(path: &Path) -> Option<FontHandle> {
    let mut db = fontdb::Database::new();
    db.load_font_file(path).ok()?;
    let face = db.faces().next()?;
    let family = face.families.first().map(|(name, _)| name.clone())?;
    Some(FontHandle {
        family,
        path: path.to_path_buf(),
    })
}
