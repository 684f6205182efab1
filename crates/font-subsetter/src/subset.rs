//! Glyph closure and table rebuild for TrueType fonts.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use duofont_font_ops::{
    FontAsset, Hinting, component_gids, convert_glyph, h_metric, unicode_mappings,
};
use log::debug;
use read_fonts::{
    FontRef, TableProvider,
    tables::{
        glyf::Glyf as ReadGlyf,
        loca::Loca as ReadLoca,
        post::Post as ReadPost,
    },
    types::{GlyphId, GlyphId16, Tag, Version16Dot16},
};
use write_fonts::{
    FontBuilder,
    from_obj::ToOwnedTable,
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, Glyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        post::Post,
    },
    types::{FWord, LongDateTime, UfWord},
};

use crate::{
    CodepointRangeSet, HINTING_TABLES, UNREWRITABLE_TABLES,
    error::{Result, SubsetError},
};

/// Tables rebuilt from the retained glyph set.
const REBUILT_TABLES: &[&[u8; 4]] =
    &[b"cmap", b"glyf", b"head", b"hhea", b"hmtx", b"loca", b"maxp", b"post"];

/// Subset a TrueType font to the glyphs reachable from `ranges`.
pub(crate) fn subset_truetype(asset: &FontAsset, ranges: &CodepointRangeSet) -> Result<FontAsset> {
    let data = asset.to_bytes();
    let font = FontRef::new(&data)?;

    let num_glyphs = font.maxp()?.num_glyphs();
    let glyf = font.glyf()?;
    let loca = font.loca(None)?;

    let mappings: BTreeMap<u32, u16> = unicode_mappings(&font)?
        .into_iter()
        .filter(|(cp, gid)| ranges.contains(*cp) && *gid < num_glyphs)
        .collect();

    let retained = glyph_closure(&glyf, &loca, mappings.values().copied(), num_glyphs)?;
    let new_gid: HashMap<u16, u16> =
        retained.iter().enumerate().map(|(new, old)| (*old, new as u16)).collect();
    debug!(
        "{}: {} codepoints in range, keeping {} of {num_glyphs} glyphs",
        asset.path().display(),
        mappings.len(),
        retained.len()
    );

    let mut builder = FontBuilder::new();

    let mut glyf_builder = GlyfLocaBuilder::new();
    for &old in &retained {
        let glyph = match loca.get_glyf(GlyphId::new(old.into()), &glyf)? {
            Some(glyph) => convert_glyph(&glyph, |c| new_gid.get(&c).copied(), Hinting::Strip),
            None => Glyph::Empty,
        };
        glyf_builder.add_glyph(&glyph)?;
    }
    let (new_glyf, new_loca, loca_format) = glyf_builder.build();
    builder.add_table(&new_glyf)?;
    builder.add_table(&new_loca)?;

    let cmap = Cmap::from_mappings(mappings.iter().filter_map(|(cp, old)| {
        let ch = char::from_u32(*cp)?;
        Some((ch, GlyphId::new(new_gid[old].into())))
    }))
    .map_err(|_| SubsetError::Malformed("conflicting cmap mappings".to_string()))?;
    builder.add_table(&cmap)?;

    let metrics = retained_metrics(&font, &retained)?;
    builder.add_table(&build_hmtx(&metrics))?;
    builder.add_table(&build_hhea(&font, &metrics)?)?;
    builder.add_table(&build_maxp(&font, retained.len() as u16)?)?;
    builder.add_table(&build_head(&font, loca_format)?)?;
    if let Ok(post) = font.post() {
        builder.add_table(&build_post(&post, &retained))?;
    }

    for (tag, table) in asset.tables() {
        if REBUILT_TABLES.iter().any(|t| Tag::new(t) == tag) {
            continue;
        }
        if HINTING_TABLES.iter().chain(UNREWRITABLE_TABLES).any(|t| Tag::new(t) == tag) {
            debug!("{}: dropping '{tag}'", asset.path().display());
            continue;
        }
        builder.add_raw(tag, table.to_vec());
    }

    let subset = FontAsset::from_bytes(asset.path(), &builder.build())
        .map_err(|e| SubsetError::Malformed(e.to_string()))?;
    Ok(subset)
}

/// `.notdef`, the mapped glyphs, and every composite component they reach.
fn glyph_closure(
    glyf: &ReadGlyf,
    loca: &ReadLoca,
    mapped: impl IntoIterator<Item = u16>,
    num_glyphs: u16,
) -> Result<BTreeSet<u16>> {
    let mut retained = BTreeSet::from([0u16]);
    retained.extend(mapped);

    let mut pending: Vec<u16> = retained.iter().copied().collect();
    while let Some(gid) = pending.pop() {
        let Some(glyph) = loca.get_glyf(GlyphId::new(gid.into()), glyf)? else {
            continue;
        };
        for component in component_gids(&glyph) {
            if component < num_glyphs && retained.insert(component) {
                pending.push(component);
            }
        }
    }
    Ok(retained)
}

fn retained_metrics(font: &FontRef, retained: &BTreeSet<u16>) -> Result<Vec<LongMetric>> {
    let hmtx = font.hmtx()?;
    let num_h_metrics = font.hhea()?.number_of_h_metrics() as usize;
    Ok(retained.iter().map(|&gid| h_metric(&hmtx, num_h_metrics, gid as usize)).collect())
}

fn build_hmtx(metrics: &[LongMetric]) -> Hmtx {
    Hmtx { h_metrics: metrics.to_vec(), left_side_bearings: Vec::new() }
}

fn build_hhea(font: &FontRef, metrics: &[LongMetric]) -> Result<Hhea> {
    let mut hhea: Hhea = font.hhea()?.to_owned_table();
    hhea.number_of_h_metrics = metrics.len() as u16;
    hhea.advance_width_max = UfWord::new(metrics.iter().map(|m| m.advance).max().unwrap_or(0));
    hhea.min_left_side_bearing =
        FWord::new(metrics.iter().map(|m| m.side_bearing).min().unwrap_or(0));
    Ok(hhea)
}

fn build_maxp(font: &FontRef, num_glyphs: u16) -> Result<Maxp> {
    let mut maxp: Maxp = font.maxp()?.to_owned_table();
    maxp.num_glyphs = num_glyphs;
    // hinting is gone, so are its resource requirements
    for field in [
        &mut maxp.max_twilight_points,
        &mut maxp.max_storage,
        &mut maxp.max_function_defs,
        &mut maxp.max_instruction_defs,
        &mut maxp.max_stack_elements,
        &mut maxp.max_size_of_instructions,
    ] {
        if field.is_some() {
            *field = Some(0);
        }
    }
    if maxp.max_zones.is_some() {
        maxp.max_zones = Some(1);
    }
    Ok(maxp)
}

fn build_head(font: &FontRef, loca_format: LocaFormat) -> Result<Head> {
    let mut head: Head = font.head()?.to_owned_table();
    head.checksum_adjustment = 0;
    head.created = LongDateTime::new(0);
    head.modified = LongDateTime::new(0);
    head.index_to_loc_format = match loca_format {
        LocaFormat::Short => 0,
        LocaFormat::Long => 1,
    };
    Ok(head)
}

/// Version 2 with the retained glyph names when the source has names, else version 3.
fn build_post(source: &ReadPost, retained: &BTreeSet<u16>) -> Post {
    let names: Option<Vec<&str>> = (source.version() == Version16Dot16::VERSION_2_0)
        .then(|| retained.iter().map(|&gid| source.glyph_name(GlyphId16::new(gid))).collect())
        .flatten();

    let mut post: Post = match names {
        Some(names) => Post::new_v2(names),
        None => {
            let mut post: Post = source.to_owned_table();
            post.version = Version16Dot16::VERSION_3_0;
            post.num_glyphs = None;
            post.glyph_name_index = None;
            post.string_data = None;
            post
        }
    };
    post.italic_angle = source.italic_angle();
    post.underline_position = source.underline_position();
    post.underline_thickness = source.underline_thickness();
    post.is_fixed_pitch = source.is_fixed_pitch();
    post
}
