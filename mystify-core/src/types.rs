use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Blank-line separator written after every paragraph.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One blank-line-delimited unit of a chapter, already trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paragraph<'a> {
    /// Position in the chapter's paragraph sequence
    pub index: usize,
    pub text: &'a str,
}

/// What the rule table did to a single paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphRewrite {
    pub index: usize,
    pub input: String,
    /// Rules that matched, in the order they were applied
    pub applied_rules: Vec<&'static str>,
    pub output: String,
}

impl ParagraphRewrite {
    pub fn is_rewritten(&self) -> bool {
        !self.applied_rules.is_empty()
    }
}

/// Captured intermediate outputs for one chapter.
/// Used for testing and diagnostics; one entry per boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterStages {
    pub chapter: String,
    pub paragraphs: Vec<String>,
    pub rewrites: Vec<ParagraphRewrite>,
    pub output: String,
}

/// Per-chapter outcome of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChapterReport {
    pub chapter: String,
    pub paragraphs: usize,
    pub rewritten_paragraphs: usize,
    /// rule name -> number of paragraphs it matched
    pub rule_hits: BTreeMap<String, usize>,
    pub input_bytes: usize,
    pub output_bytes: usize,
}

impl ChapterReport {
    pub fn from_rewrites(
        chapter: &str,
        input: &str,
        rewrites: &[ParagraphRewrite],
        output: &str,
    ) -> Self {
        let mut rule_hits = BTreeMap::new();
        for rewrite in rewrites {
            for rule in &rewrite.applied_rules {
                *rule_hits.entry(rule.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            chapter: chapter.to_string(),
            paragraphs: rewrites.len(),
            rewritten_paragraphs: rewrites.iter().filter(|r| r.is_rewritten()).count(),
            rule_hits,
            input_bytes: input.len(),
            output_bytes: output.len(),
        }
    }
}

/// Outcome of a whole pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub chapters: Vec<ChapterReport>,
    /// Directory the converted chapters go to, when the storage has one
    pub output_dir: Option<PathBuf>,
    /// Where the combined README goes, `None` when combining is disabled
    pub readme_path: Option<PathBuf>,
    pub readme_bytes: usize,
    pub dry_run: bool,
}

impl BuildReport {
    pub fn total_paragraphs(&self) -> usize {
        self.chapters.iter().map(|c| c.paragraphs).sum()
    }

    pub fn total_rewritten(&self) -> usize {
        self.chapters.iter().map(|c| c.rewritten_paragraphs).sum()
    }
}
