//! Configuration constants and per-job settings.

use duofont_font_subsetter::CodepointRangeSet;
pub use duofont_font_subsetter::{ARABIC_RANGES, LATIN_RANGES};
pub use duofont_preview::{
    FONT_SIZE, HEIGHT as PREVIEW_HEIGHT, JPEG_QUALITY, WIDTH as PREVIEW_WIDTH,
};
use thiserror::Error;

/// Latin line of the preview.
pub const LATIN_SAMPLE: &str = "The quick brown fox jumps over the lazy dog. 1234567890";

/// Arabic line of the preview, in logical order.
pub const ARABIC_SAMPLE: &str = "سمَات مجّانِية، إختر منْ بين أكثر من ١٠٠ سمة مجانية او انشئ سماتك الخاصة هُنا في هذا التطبيق النظيف الرائع، وأظهر الابداع.١٢٣٤٥٦٧٨٩٠";

/// File name of the merged font inside the output directory.
pub const MERGED_FONT_NAME: &str = "merged_font.ttf";

/// Output directory used when the caller names none.
pub const DEFAULT_OUTPUT_DIR: &str = "MergedFonts";

/// Progress checkpoints per job.
pub const TOTAL_STEPS: usize = 6;

pub const WORKDIR_PREFIX: &str = "duofont-";

/// Preview file name for a color scheme and the merged font's stem.
pub fn preview_file_name(scheme: &str, stem: &str) -> String {
    format!("preview_{scheme}_{stem}.jpg")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Latin ranges {latin} overlap Arabic ranges {arabic}")]
    OverlappingRanges { latin: CodepointRangeSet, arabic: CodepointRangeSet },
}

/// Ranges and sample texts used by one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    latin_ranges: CodepointRangeSet,
    arabic_ranges: CodepointRangeSet,
    latin_sample: String,
    arabic_sample: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            latin_ranges: CodepointRangeSet::latin(),
            arabic_ranges: CodepointRangeSet::arabic(),
            latin_sample: LATIN_SAMPLE.to_string(),
            arabic_sample: ARABIC_SAMPLE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latin_ranges(mut self, ranges: CodepointRangeSet) -> Self {
        self.latin_ranges = ranges;
        self
    }

    pub fn with_arabic_ranges(mut self, ranges: CodepointRangeSet) -> Self {
        self.arabic_ranges = ranges;
        self
    }

    pub fn with_samples(mut self, latin: impl Into<String>, arabic: impl Into<String>) -> Self {
        self.latin_sample = latin.into();
        self.arabic_sample = arabic.into();
        self
    }

    /// Reject range sets that would let both fonts claim a codepoint.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.latin_ranges.overlaps(&self.arabic_ranges) {
            return Err(ConfigError::OverlappingRanges {
                latin: self.latin_ranges,
                arabic: self.arabic_ranges,
            });
        }
        Ok(self)
    }

    pub fn latin_ranges(&self) -> &CodepointRangeSet {
        &self.latin_ranges
    }

    pub fn arabic_ranges(&self) -> &CodepointRangeSet {
        &self.arabic_ranges
    }

    pub fn latin_sample(&self) -> &str {
        &self.latin_sample
    }

    pub fn arabic_sample(&self) -> &str {
        &self.arabic_sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges_are_disjoint() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overlapping_ranges_rejected() {
        let config = PipelineConfig::new()
            .with_latin_ranges("U+0000-0700".parse().unwrap())
            .with_arabic_ranges("U+0600-06FF".parse().unwrap());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::OverlappingRanges { .. }));
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn test_preview_file_name() {
        assert_eq!(preview_file_name("dark", "merged_font"), "preview_dark_merged_font.jpg");
    }
}
