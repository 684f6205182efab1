//! In-memory font representation and the inspector that produces it.

use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    fs::read,
    path::{Path, PathBuf},
};

use log::debug;
use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::FontBuilder;

use crate::{
    cmap::unicode_mappings,
    error::{FontParseError, Result},
};

pub const HEAD: Tag = Tag::new(b"head");
pub const GLYF: Tag = Tag::new(b"glyf");
pub const CFF: Tag = Tag::new(b"CFF ");
pub const CFF2: Tag = Tag::new(b"CFF2");

const SFNT_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;
const UNITS_PER_EM_OFFSET: usize = 18;

const TRUETYPE_SIGNATURE: u32 = 0x0001_0000;
const OPENTYPE_SIGNATURE: u32 = u32::from_be_bytes(*b"OTTO");
const APPLE_SIGNATURE: u32 = u32::from_be_bytes(*b"true");

/// One font binary, split into its tables.
///
/// Stages take a `FontAsset` by value and hand a new one to the next stage,
/// so an asset is never shared between two stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAsset {
    path: PathBuf,
    units_per_em: u16,
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl FontAsset {
    /// Validate `data` as an sfnt font and split it into tables.
    ///
    /// `path` is only recorded for reporting; nothing is read from it.
    pub fn from_bytes(path: impl Into<PathBuf>, data: &[u8]) -> Result<Self> {
        check_directory(data)?;

        let font = FontRef::new(data)?;
        for record in font.table_directory.table_records() {
            let end = record.offset() as usize + record.length() as usize;
            if end > data.len() {
                return Err(FontParseError::Truncated { needed: end, actual: data.len() });
            }
        }

        if font.table_data(HEAD).is_none() {
            return Err(FontParseError::MissingTable(HEAD));
        }
        let units_per_em = font.head()?.units_per_em();

        let tables = font
            .table_directory
            .table_records()
            .iter()
            .filter_map(|record| {
                let tag = record.tag();
                font.table_data(tag).map(|data| (tag, data.as_bytes().to_vec()))
            })
            .collect();

        Ok(Self { path: path.into(), units_per_em, tables })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-label the asset, e.g. after it has been written somewhere new.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// File stem of the source path, used to name intermediates.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string())
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn table(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.get(&tag).map(Vec::as_slice)
    }

    pub fn has_table(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Tables in tag order.
    pub fn tables(&self) -> impl Iterator<Item = (Tag, &[u8])> {
        self.tables.iter().map(|(tag, data)| (*tag, data.as_slice()))
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn flavor(&self) -> OutlineFlavor {
        if self.has_table(GLYF) {
            OutlineFlavor::TrueType
        } else if self.has_table(CFF) || self.has_table(CFF2) {
            OutlineFlavor::Cff
        } else {
            OutlineFlavor::Missing
        }
    }

    /// Serialize back to an sfnt binary.
    ///
    /// Tables are written in tag order, so equal assets serialize to equal bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut builder = FontBuilder::new();
        for (tag, data) in &self.tables {
            builder.add_raw(*tag, data.as_slice());
        }
        builder.build()
    }

    /// Overwrite `head.unitsPerEm` in place. Nothing else is touched.
    pub(crate) fn set_units_per_em(&mut self, units_per_em: u16) {
        if let Some(head) = self.tables.get_mut(&HEAD)
            && head.len() >= UNITS_PER_EM_OFFSET + 2
        {
            head[UNITS_PER_EM_OFFSET..UNITS_PER_EM_OFFSET + 2]
                .copy_from_slice(&units_per_em.to_be_bytes());
            self.units_per_em = units_per_em;
        }
    }

    /// Collect the facts the CLI and debug logs report about a font.
    pub fn summary(&self) -> Result<FontSummary> {
        let data = self.to_bytes();
        let font = FontRef::new(&data)?;

        let glyph_count = font.maxp().map(|m| m.num_glyphs()).unwrap_or_default();
        let codepoints = unicode_mappings(&font).map(|m| m.len()).unwrap_or_default();

        Ok(FontSummary {
            family: family_name(&font),
            units_per_em: self.units_per_em,
            glyph_count,
            codepoints,
            flavor: self.flavor(),
            tables: self.tables.keys().copied().collect(),
        })
    }
}

/// Open `path` and validate it as a TrueType/OpenType font.
pub fn inspect(path: impl AsRef<Path>) -> Result<FontAsset> {
    let path = path.as_ref();
    let data = read(path)
        .map_err(|source| FontParseError::Io { path: path.to_path_buf(), source })?;
    debug!("Inspecting {} ({} bytes)", path.display(), data.len());
    FontAsset::from_bytes(path, &data)
}

fn check_directory(data: &[u8]) -> Result<()> {
    if data.len() < SFNT_HEADER_LEN {
        return Err(FontParseError::Truncated { needed: SFNT_HEADER_LEN, actual: data.len() });
    }

    let signature = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    if !matches!(signature, TRUETYPE_SIGNATURE | OPENTYPE_SIGNATURE | APPLE_SIGNATURE) {
        return Err(FontParseError::InvalidSignature(signature));
    }

    let num_tables = u16::from_be_bytes([data[4], data[5]]) as usize;
    let needed = SFNT_HEADER_LEN + num_tables * TABLE_RECORD_LEN;
    if data.len() < needed {
        return Err(FontParseError::Truncated { needed, actual: data.len() });
    }
    Ok(())
}

/// Family name (name ID 1), preferring the Windows Unicode record.
fn family_name(font: &FontRef) -> Option<String> {
    let name = font.name().ok()?;
    let mut candidates: Vec<_> = name
        .name_record()
        .iter()
        .filter(|record| record.name_id().to_u16() == 1)
        .collect();
    candidates.sort_by_key(|record| record.platform_id() != 3);

    candidates
        .into_iter()
        .find_map(|record| record.string(name.string_data()).ok())
        .map(|s| s.chars().collect())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutlineFlavor {
    TrueType,
    Cff,
    Missing,
}

impl Display for OutlineFlavor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutlineFlavor::TrueType => "TrueType (glyf)",
            OutlineFlavor::Cff => "PostScript (CFF)",
            OutlineFlavor::Missing => "no outlines",
        })
    }
}

#[derive(Debug, Clone)]
pub struct FontSummary {
    pub family: Option<String>,
    pub units_per_em: u16,
    pub glyph_count: u16,
    pub codepoints: usize,
    pub flavor: OutlineFlavor,
    pub tables: Vec<Tag>,
}

impl Display for FontSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tables: Vec<String> = self.tables.iter().map(Tag::to_string).collect();
        writeln!(f, "  family:       {}", self.family.as_deref().unwrap_or("(unnamed)"))?;
        writeln!(f, "  unitsPerEm:   {}", self.units_per_em)?;
        writeln!(f, "  glyphs:       {}", self.glyph_count)?;
        writeln!(f, "  codepoints:   {}", self.codepoints)?;
        writeln!(f, "  outlines:     {}", self.flavor)?;
        write!(f, "  tables:       {}", tables.join(" "))
    }
}
