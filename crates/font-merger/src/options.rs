use read_fonts::types::Tag;

use crate::types::TableTag;

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Tables left out of the merged font
    pub drop_tables: Vec<TableTag>,

    /// Log per-table decisions at info level instead of debug
    pub verbose: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables to drop, by name; names longer than four bytes are ignored.
    pub fn drop_tables(mut self, tables: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.drop_tables
            .extend(tables.into_iter().filter_map(|s| TableTag::parse(s.as_ref())));
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn should_drop(&self, tag: Tag) -> bool {
        self.drop_tables.iter().any(|t| t.tag() == tag)
    }
}
