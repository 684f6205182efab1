//! End-to-end runs of the merge pipeline on in-memory test fonts.

use std::{
    fs::{read, read_dir, write},
    path::{Path, PathBuf},
    sync::mpsc::channel,
};

use duofont_core::{
    ChannelSink, FailureKind, LogSink, MergeJob, Pipeline, PipelineConfig, PipelineResult,
    PipelineState, ProgressEvent, Warning, spawn,
};
use duofont_font_ops::{fixture::TestFont, unicode_mappings};
use read_fonts::{FontRef, TableProvider};
use tempfile::TempDir;

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self { root: tempfile::tempdir().unwrap() }
    }

    fn font(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        write(&path, data).unwrap();
        path
    }

    fn output(&self) -> PathBuf {
        self.root.path().join("MergedFonts")
    }

    fn work_root(&self) -> PathBuf {
        let path = self.root.path().join("work");
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    fn job(&self, latin: &Path, arabic: &Path) -> MergeJob {
        let config = PipelineConfig::new()
            .with_latin_ranges("U+0000-007F".parse().unwrap())
            .with_arabic_ranges("U+0600-06FF".parse().unwrap());
        MergeJob::new(latin, arabic, self.output())
            .unwrap()
            .with_config(config)
            .unwrap()
            .with_work_root(self.work_root())
    }
}

fn latin_font() -> Vec<u8> {
    TestFont::new("Latin").glyph("A", 0x41).build()
}

fn arabic_font() -> Vec<u8> {
    TestFont::new("Arabic").glyph("alef", 0x0627).build()
}

fn is_empty_dir(path: &Path) -> bool {
    read_dir(path).unwrap().next().is_none()
}

fn run(job: &MergeJob) -> (PipelineResult, Vec<ProgressEvent>) {
    let (tx, rx) = channel();
    let result = Pipeline::run(job, &ChannelSink::new(tx));
    (result, rx.try_iter().collect())
}

#[test]
fn test_merge_latin_and_arabic() {
    let ws = Workspace::new();
    let job = ws.job(&ws.font("latin.ttf", &latin_font()), &ws.font("arabic.ttf", &arabic_font()));

    let (result, events) = run(&job);
    let PipelineResult::Success { merged_font_path, preview_paths, warnings } = result else {
        panic!("expected success, got {result:?}");
    };

    assert_eq!(merged_font_path, ws.output().join("merged_font.ttf"));
    let data = read(&merged_font_path).unwrap();
    let font = FontRef::new(&data).unwrap();
    let codepoints: Vec<u32> = unicode_mappings(&font).unwrap().into_keys().collect();
    assert_eq!(codepoints, vec![0x41, 0x0627]);

    assert_eq!(preview_paths, vec![ws.output().join("preview_light_merged_font.jpg")]);
    let jpeg = read(&preview_paths[0]).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    assert!(warnings.iter().all(|w| matches!(w, Warning::Render(_))));

    assert!(is_empty_dir(&ws.work_root()));
    assert_eq!(events.len(), 6);
}

#[test]
fn test_six_checkpoints_without_dark_preview() {
    let ws = Workspace::new();
    let job = ws.job(&ws.font("latin.ttf", &latin_font()), &ws.font("arabic.ttf", &arabic_font()));

    let (result, events) = run(&job);
    assert!(result.is_success());

    let steps: Vec<usize> = events.iter().map(|e| e.step).collect();
    assert_eq!(steps, vec![1, 2, 3, 4, 5, 6]);
    assert!(events.iter().all(|e| e.total == 6));
    assert_eq!(events[0].state, PipelineState::UnifyingUnits);
    assert_eq!(events[3].message, "Merging fonts");
    assert_eq!(events[5].state, PipelineState::RenderingPreviewDark);
    assert!(events[5].message.contains("Skipping"));
    assert!(!ws.output().join("preview_dark_merged_font.jpg").exists());
}

#[test]
fn test_dark_preview() {
    let ws = Workspace::new();
    let job = ws
        .job(&ws.font("latin.ttf", &latin_font()), &ws.font("arabic.ttf", &arabic_font()))
        .with_dark_preview(true);

    let (result, events) = run(&job);
    let PipelineResult::Success { preview_paths, .. } = result else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(
        preview_paths,
        vec![
            ws.output().join("preview_light_merged_font.jpg"),
            ws.output().join("preview_dark_merged_font.jpg"),
        ]
    );
    assert!(preview_paths.iter().all(|p| p.exists()));
    assert_eq!(events[5].message, "Rendering dark preview");
}

#[test]
fn test_units_per_em_reconciled() {
    let ws = Workspace::new();
    let arabic = TestFont::new("Arabic").units_per_em(2048).glyph("alef", 0x0627).build();
    let job = ws.job(&ws.font("latin.ttf", &latin_font()), &ws.font("arabic.ttf", &arabic));

    let (result, _) = run(&job);
    let PipelineResult::Success { merged_font_path, warnings, .. } = result else {
        panic!("expected success, got {result:?}");
    };

    let data = read(&merged_font_path).unwrap();
    assert_eq!(FontRef::new(&data).unwrap().head().unwrap().units_per_em(), 2048);

    let rewrites: Vec<_> = warnings
        .iter()
        .filter_map(|w| match w {
            Warning::UnitsRewritten(rewrite) => Some(rewrite),
            _ => None,
        })
        .collect();
    assert_eq!(rewrites.len(), 1);
    assert_eq!((rewrites[0].from, rewrites[0].to), (1000, 2048));
    assert!(rewrites[0].path.ends_with("latin.ttf"));
}

#[test]
fn test_zero_byte_input_fails_without_outputs() {
    let ws = Workspace::new();
    let job = ws.job(&ws.font("latin.ttf", &[]), &ws.font("arabic.ttf", &arabic_font()));

    let (result, events) = run(&job);
    let PipelineResult::Failure { kind, message } = result else {
        panic!("expected failure, got {result:?}");
    };
    assert_eq!(kind, FailureKind::FontParse);
    assert!(message.contains("Latin"), "{message}");
    assert!(message.contains("truncated"), "{message}");

    assert_eq!(events.len(), 1);
    assert!(!ws.output().exists());
    assert!(is_empty_dir(&ws.work_root()));
}

#[test]
fn test_glyph_capacity_exceeded() {
    let ws = Workspace::new();
    let huge = TestFont::new("Huge").glyph("A", 0x41).declared_glyph_count(65535).build();
    let job = ws.job(&ws.font("latin.ttf", &huge), &ws.font("arabic.ttf", &arabic_font()));

    let (result, events) = run(&job);
    let PipelineResult::Failure { kind, message } = result else {
        panic!("expected failure, got {result:?}");
    };
    assert_eq!(kind, FailureKind::Merge);
    assert!(message.contains("65535"), "{message}");

    assert_eq!(events.last().map(|e| e.state), Some(PipelineState::Merging));
    assert!(!ws.output().exists());
    assert!(is_empty_dir(&ws.work_root()));
}

#[test]
fn test_missing_input_fails_as_font_parse() {
    let ws = Workspace::new();
    let job = ws.job(&ws.root.path().join("missing.ttf"), &ws.font("arabic.ttf", &arabic_font()));

    let (result, _) = run(&job);
    let PipelineResult::Failure { kind, message } = result else {
        panic!("expected failure, got {result:?}");
    };
    assert_eq!(kind, FailureKind::FontParse);
    assert!(message.contains("missing.ttf"), "{message}");
}

#[test]
fn test_spawn_delivers_one_result() {
    let ws = Workspace::new();
    let job = ws.job(&ws.font("latin.ttf", &latin_font()), &ws.font("arabic.ttf", &arabic_font()));

    let (tx, rx) = channel();
    let handle = spawn(job, ChannelSink::new(tx));
    let result = handle.join();

    assert!(result.is_success(), "{result}");
    assert_eq!(rx.iter().count(), 6);
}

#[test]
fn test_log_sink() {
    let ws = Workspace::new();
    let job = ws.job(&ws.font("latin.ttf", &latin_font()), &ws.font("arabic.ttf", &arabic_font()));
    assert!(Pipeline::run(&job, &LogSink).is_success());
}
