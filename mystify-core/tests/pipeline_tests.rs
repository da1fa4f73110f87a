//! Pipeline boundary tests: run the real file-backed pipeline over the
//! chapters in `test_fixtures/chapters/` and compare against
//! `test_fixtures/expected/`.
//!
//! - Output A: converted chapters, byte for byte
//! - Output B: combined README, byte for byte against the raw chapters
//! - Properties that must hold for any chapter (separators, order, header levels)

use mystify_core::{split_paragraphs, ChapterPipeline, ChapterProcessor, MystifyConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Fixture helpers
// ============================================================================

const CHAPTERS: [&str; 2] = ["01_introduction.md", "02_basic_modeling.md"];

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

fn load_fixture(kind: &str, name: &str) -> String {
    let path = fixtures_dir().join(kind).join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Missing fixture: {}", path.display()))
}

/// Copy the fixture chapters into a fresh project root.
fn project_with_fixtures() -> TempDir {
    let root = TempDir::new().expect("temp dir");
    let chapters = root.path().join("chapters");
    fs::create_dir_all(&chapters).unwrap();
    for entry in fs::read_dir(fixtures_dir().join("chapters")).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), chapters.join(entry.file_name())).unwrap();
    }
    root
}

fn run_default(root: &Path) -> mystify_core::BuildReport {
    ChapterPipeline::from_config(&MystifyConfig::default(), root)
        .expect("pipeline")
        .run()
        .expect("run")
}

fn header_levels(text: &str) -> Vec<usize> {
    split_paragraphs(text)
        .filter_map(|p| {
            let heading = p.text.lines().find(|line| line.starts_with('#'))?;
            Some(heading.chars().take_while(|c| *c == '#').count())
        })
        .collect()
}

// ============================================================================
// Output A: converted chapter tree
// ============================================================================

mod converted_tree {
    use super::*;

    #[test]
    fn chapters_match_expected_output() {
        let root = project_with_fixtures();
        run_default(root.path());

        for name in CHAPTERS {
            let converted =
                fs::read_to_string(root.path().join("sphinx/source").join(name)).unwrap();
            assert_eq!(
                converted,
                load_fixture("expected", name),
                "Converted {name} differs from expected fixture"
            );
        }
    }

    #[test]
    fn non_markdown_files_are_not_chapters() {
        let root = project_with_fixtures();
        let report = run_default(root.path());

        assert!(!root.path().join("sphinx/source/notes.txt").exists());
        let names: Vec<&str> = report.chapters.iter().map(|c| c.chapter.as_str()).collect();
        assert_eq!(names, CHAPTERS);
    }

    #[test]
    fn chapter_files_are_left_untouched() {
        let root = project_with_fixtures();
        run_default(root.path());

        for name in CHAPTERS {
            let source = fs::read_to_string(root.path().join("chapters").join(name)).unwrap();
            assert_eq!(source, load_fixture("chapters", name));
        }
    }

    #[test]
    fn rerunning_overwrites_previous_output() {
        let root = project_with_fixtures();
        let out = root.path().join("sphinx/source/01_introduction.md");
        fs::create_dir_all(out.parent().unwrap()).unwrap();
        fs::write(&out, "stale").unwrap();

        run_default(root.path());
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            load_fixture("expected", "01_introduction.md")
        );
    }

    #[test]
    fn missing_chapters_directory_fails() {
        let root = TempDir::new().unwrap();
        let err = ChapterPipeline::from_config(&MystifyConfig::default(), root.path())
            .unwrap()
            .run()
            .unwrap_err();
        assert!(format!("{err:#}").contains("chapters"));
    }
}

// ============================================================================
// Output B: combined README
// ============================================================================

mod combined_readme {
    use super::*;

    #[test]
    fn readme_is_raw_concatenation_in_lexicographic_order() {
        let root = project_with_fixtures();
        let report = run_default(root.path());

        let expected: String = CHAPTERS
            .iter()
            .map(|name| load_fixture("chapters", name))
            .collect();
        let readme = fs::read_to_string(root.path().join("README.md")).unwrap();

        assert_eq!(readme, expected);
        assert_eq!(report.readme_bytes, expected.len());
        assert_eq!(report.readme_path, Some(root.path().join("README.md")));
        assert_eq!(report.output_dir, Some(root.path().join("sphinx/source")));
    }

    #[test]
    fn readme_contains_no_rewritten_syntax() {
        let root = project_with_fixtures();
        run_default(root.path());

        let readme = fs::read_to_string(root.path().join("README.md")).unwrap();
        assert!(!readme.contains("```{"));
        assert!(!readme.contains(")=\n"));
        assert!(readme.contains("> :warning: Work in progress"));
    }

    #[test]
    fn readme_can_be_disabled_from_yaml() {
        let root = project_with_fixtures();
        let config = MystifyConfig::from_yaml("combine_readme: false\n").unwrap();
        ChapterPipeline::from_config(&config, root.path())
            .unwrap()
            .run()
            .unwrap();

        assert!(!root.path().join("README.md").exists());
        assert!(root.path().join("sphinx/source/01_introduction.md").exists());
    }

    #[test]
    fn custom_layout_from_yaml() {
        let root = project_with_fixtures();
        let yaml = r#"
paths:
  output_dir: build/myst
  readme_path: docs/COMBINED.md
"#;
        let config = MystifyConfig::from_yaml(yaml).unwrap();
        let report = ChapterPipeline::from_config(&config, root.path())
            .unwrap()
            .run()
            .unwrap();

        assert!(root.path().join("build/myst/02_basic_modeling.md").exists());
        assert_eq!(report.output_dir, Some(root.path().join("build/myst")));
        assert!(root.path().join("docs/COMBINED.md").exists());
        assert!(!root.path().join("README.md").exists());
    }

    #[test]
    fn readme_inside_chapters_is_rejected() {
        let root = project_with_fixtures();
        let config =
            MystifyConfig::from_yaml("paths:\n  readme_path: chapters/00_readme.md\n").unwrap();
        let err = ChapterPipeline::from_config(&config, root.path())
            .err()
            .unwrap();

        assert!(err.to_string().contains("inside the chapters directory"));
        assert!(!root.path().join("chapters/00_readme.md").exists());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let root = project_with_fixtures();
        let config = MystifyConfig {
            dry_run: true,
            ..MystifyConfig::default()
        };
        let report = ChapterPipeline::from_config(&config, root.path())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(report.chapters.len(), 2);
        assert!(!root.path().join("README.md").exists());
        assert!(!root.path().join("sphinx").exists());
    }
}

// ============================================================================
// Properties over the fixture chapters
// ============================================================================

mod properties {
    use super::*;

    #[test]
    fn one_separator_per_paragraph() {
        let processor = ChapterProcessor::new().unwrap();
        for name in CHAPTERS {
            let source = load_fixture("chapters", name);
            let output = processor.convert(&source);
            assert_eq!(
                output.matches("\n\n").count(),
                split_paragraphs(&source).count(),
                "Separator count mismatch in {name}"
            );
        }
    }

    #[test]
    fn header_levels_move_up_by_one() {
        let processor = ChapterProcessor::new().unwrap();
        for name in CHAPTERS {
            let source = load_fixture("chapters", name);
            let before = header_levels(&source);
            let after = header_levels(&processor.convert(&source));

            let expected: Vec<usize> = before
                .iter()
                .map(|&level| if level >= 2 { level - 1 } else { level })
                .collect();
            assert_eq!(after, expected, "Header levels not shifted in {name}");
        }
    }

    #[test]
    fn paragraph_order_is_preserved() {
        let processor = ChapterProcessor::new().unwrap();
        let source = load_fixture("chapters", "02_basic_modeling.md");
        let rewrites = processor.rewrite_paragraphs(&source);

        let inputs: Vec<&str> = rewrites.iter().map(|r| r.input.as_str()).collect();
        let paragraphs: Vec<&str> = split_paragraphs(&source).map(|p| p.text).collect();
        assert_eq!(inputs, paragraphs);
    }

    #[test]
    fn passthrough_only_normalises_spacing() {
        let processor =
            ChapterProcessor::from_config(&MystifyConfig::from_yaml("passthrough: true").unwrap())
                .unwrap();
        let source = load_fixture("chapters", "01_introduction.md");
        let output = processor.convert(&source);

        let expected: String = split_paragraphs(&source)
            .map(|p| format!("{}\n\n", p.text))
            .collect();
        assert_eq!(output, expected);
    }
}
