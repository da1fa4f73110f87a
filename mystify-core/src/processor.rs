use crate::config::MystifyConfig;
use crate::rules::RuleEngine;
use crate::splitter::split_paragraphs;
use crate::types::*;
use anyhow::Result;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        log::debug!("{}: {}µs", step_name, elapsed.as_micros());
        self.timings.push((step_name.to_string(), elapsed));

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    /// Timing table, one line per step plus a total. Empty when profiling is off.
    pub fn summary(&self) -> String {
        if !self.enabled || self.timings.is_empty() {
            return String::new();
        }

        let mut out = String::from("📊 Performance Summary:\n");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        let total_secs = total.as_secs_f64().max(f64::EPSILON);

        for (step, duration) in &self.timings {
            let percentage = (duration.as_secs_f64() / total_secs) * 100.0;
            let _ = writeln!(
                out,
                "   {:.<45} {}µs ({:.1}%)",
                step,
                duration.as_micros(),
                percentage
            );
        }
        let _ = writeln!(out, "   {:.<45} {}µs", "Total", total.as_micros());
        out
    }
}

/// Join rewritten paragraphs back into one document, each followed by a blank line.
pub fn assemble(rewrites: &[ParagraphRewrite]) -> String {
    let capacity = rewrites
        .iter()
        .map(|r| r.output.len() + PARAGRAPH_SEPARATOR.len())
        .sum();
    let mut document = String::with_capacity(capacity);
    for rewrite in rewrites {
        document.push_str(&rewrite.output);
        document.push_str(PARAGRAPH_SEPARATOR);
    }
    document
}

/// Runs one chapter through splitter, rule table and assembler.
pub struct ChapterProcessor {
    rule_engine: RuleEngine,
}

impl ChapterProcessor {
    /// Processor with the default rule table
    pub fn new() -> Result<Self> {
        Ok(Self::with_engine(RuleEngine::new()?))
    }

    pub fn with_engine(rule_engine: RuleEngine) -> Self {
        Self { rule_engine }
    }

    pub fn from_config(config: &MystifyConfig) -> Result<Self> {
        Ok(Self::with_engine(RuleEngine::from_config(config)?))
    }

    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rule_engine
    }

    pub fn rewrite_paragraphs(&self, document: &str) -> Vec<ParagraphRewrite> {
        split_paragraphs(document)
            .map(|paragraph| self.rule_engine.rewrite_paragraph(paragraph))
            .collect()
    }

    /// Convert a whole chapter to MyST.
    pub fn convert(&self, document: &str) -> String {
        assemble(&self.rewrite_paragraphs(document))
    }

    /// Convert a chapter and capture every intermediate stage, timing each step.
    pub fn process_chapter(
        &self,
        chapter: &str,
        document: &str,
        profiler: &mut StepProfiler,
    ) -> ChapterStages {
        let split: Vec<Paragraph<'_>> = profiler.time_step(&format!("{chapter}: split"), || {
            split_paragraphs(document).collect()
        });

        let rewrites: Vec<ParagraphRewrite> =
            profiler.time_step(&format!("{chapter}: rewrite"), || {
                split
                    .iter()
                    .map(|paragraph| self.rule_engine.rewrite_paragraph(*paragraph))
                    .collect()
            });

        let output = profiler.time_step(&format!("{chapter}: assemble"), || assemble(&rewrites));

        ChapterStages {
            chapter: chapter.to_string(),
            paragraphs: split.iter().map(|p| p.text.to_string()).collect(),
            rewrites,
            output,
        }
    }

    /// Capture stages without profiling
    pub fn capture_stages(&self, chapter: &str, document: &str) -> ChapterStages {
        self.process_chapter(chapter, document, &mut StepProfiler::disabled())
    }
}
