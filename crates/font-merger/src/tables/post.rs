//! post table merging

use read_fonts::{TableProvider, tables::post::Post as ReadPost};
use write_fonts::tables::post::Post;

use crate::{Result, context::MergeContext};

/// A version 2.0 table naming every merged glyph, with the first font's
/// typographic values. Fonts without a `post` table contribute nothing.
pub fn merge_post(ctx: &MergeContext) -> Result<Post> {
    let tables: Vec<ReadPost> = ctx
        .fonts()
        .iter()
        .filter_map(|f| f.post().ok())
        .collect();

    let glyph_names: Vec<&str> = ctx.mega().iter().map(|n| n.as_str()).collect();
    let mut post = Post::new_v2(glyph_names);

    if let Some(first) = tables.first() {
        post.italic_angle = first.italic_angle();
        post.underline_position = first.underline_position();
        post.underline_thickness = first.underline_thickness();
        post.is_fixed_pitch = first.is_fixed_pitch();
        post.min_mem_type42 = first.min_mem_type42();
        post.max_mem_type42 = first.max_mem_type42();
        post.min_mem_type1 = first.min_mem_type1();
        post.max_mem_type1 = first.max_mem_type1();
    }

    Ok(post)
}
