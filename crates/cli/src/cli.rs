//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use duofont_core::config::DEFAULT_OUTPUT_DIR;
use duofont_font_subsetter::CodepointRangeSet;

use crate::{
    inspect::inspect_fonts,
    merge::{MergeArgs, merge},
    preview::preview,
    shape::shape,
    subset::subset_file,
};

#[derive(Parser)]
#[command(name = "duofont")]
#[command(about = "Merge a Latin font and an Arabic font into one")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the whole pipeline: reconcile, subset, merge, preview
    Merge {
        latin: PathBuf,
        arabic: PathBuf,
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Also render a dark preview
        #[arg(long)]
        dark: bool,
        /// e.g. U+0020-007F,U+00A0-00FF
        #[arg(long)]
        latin_ranges: Option<CodepointRangeSet>,
        #[arg(long)]
        arabic_ranges: Option<CodepointRangeSet>,
    },
    /// Print what each font contains
    Inspect {
        #[arg(required = true)]
        fonts: Vec<PathBuf>,
    },
    /// Keep only the glyphs for the given ranges
    Subset {
        input: PathBuf,
        #[arg(short, long)]
        ranges: CodepointRangeSet,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print text in visual order with Arabic presentation forms
    Shape {
        text: String,
        /// Print codepoints instead of the shaped string
        #[arg(long)]
        codepoints: bool,
    },
    /// Render the sample lines with a font
    Preview {
        font: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        dark: bool,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Merge { latin, arabic, output_dir, dark, latin_ranges, arabic_ranges } => {
                merge(MergeArgs { latin, arabic, output_dir, dark, latin_ranges, arabic_ranges })?;
            }
            Commands::Inspect { fonts } => inspect_fonts(&fonts)?,
            Commands::Subset { input, ranges, output } => subset_file(&input, &ranges, &output)?,
            Commands::Shape { text, codepoints } => shape(&text, codepoints),
            Commands::Preview { font, output, dark } => preview(&font, &output, dark)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_merge_defaults() {
        let cli = Cli::try_parse_from(["duofont", "merge", "latin.ttf", "arabic.ttf"]).unwrap();
        let Commands::Merge { output_dir, dark, latin_ranges, .. } = cli.command else {
            panic!("expected merge");
        };
        assert_eq!(output_dir, PathBuf::from("MergedFonts"));
        assert!(!dark);
        assert!(latin_ranges.is_none());
    }

    #[test]
    fn test_merge_ranges_parsed() {
        let cli = Cli::try_parse_from([
            "duofont",
            "merge",
            "latin.ttf",
            "arabic.ttf",
            "--dark",
            "--latin-ranges",
            "U+0000-007F",
            "--arabic-ranges",
            "U+0600-06FF,U+FE70-FEFF",
        ])
        .unwrap();
        let Commands::Merge { dark, latin_ranges, arabic_ranges, .. } = cli.command else {
            panic!("expected merge");
        };
        assert!(dark);
        assert_eq!(latin_ranges.unwrap().iter().collect::<Vec<_>>(), vec![(0, 0x7F)]);
        assert!(arabic_ranges.unwrap().contains(0xFEFB));
    }

    #[test]
    fn test_bad_ranges_rejected() {
        let result =
            Cli::try_parse_from(["duofont", "subset", "in.ttf", "-r", "U+ZZZZ", "-o", "out.ttf"]);
        assert!(result.is_err());
    }
}
