use crate::config::MystifyConfig;
use crate::processor::{ChapterProcessor, StepProfiler};
use crate::storage::{ChapterStorage, FileStorage};
use crate::types::*;
use anyhow::{Context, Result};
use std::path::Path;

/// Drives one traversal of the chapter tree.
///
/// Every chapter is read once. The raw texts are concatenated into the
/// combined README (written first), then each chapter is converted and
/// written under its own name. The first failure stops the run.
pub struct ChapterPipeline {
    storage: Box<dyn ChapterStorage + Send + Sync>,
    processor: ChapterProcessor,
    combine_readme: bool,
    dry_run: bool,
}

impl ChapterPipeline {
    /// Create a pipeline with full dependency injection
    pub fn new_with_dependencies(
        storage: Box<dyn ChapterStorage + Send + Sync>,
        processor: ChapterProcessor,
    ) -> Self {
        Self {
            storage,
            processor,
            combine_readme: true,
            dry_run: false,
        }
    }

    /// File-backed pipeline for the project rooted at `root`
    pub fn from_config(config: &MystifyConfig, root: &Path) -> Result<Self> {
        config.validate()?;
        let paths = config.paths.resolve(root);
        paths.validate()?;

        let processor = ChapterProcessor::from_config(config)?;
        let storage = Box::new(FileStorage::new(&paths));

        Ok(Self::new_with_dependencies(storage, processor)
            .with_combine_readme(config.combine_readme)
            .with_dry_run(config.dry_run))
    }

    pub fn with_combine_readme(mut self, combine_readme: bool) -> Self {
        self.combine_readme = combine_readme;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn processor(&self) -> &ChapterProcessor {
        &self.processor
    }

    pub fn run(&self) -> Result<BuildReport> {
        let (report, _) = self.run_inner(&mut StepProfiler::disabled(), false)?;
        Ok(report)
    }

    pub fn run_with_profiler(&self, profiler: &mut StepProfiler) -> Result<BuildReport> {
        let (report, _) = self.run_inner(profiler, false)?;
        Ok(report)
    }

    /// Run and keep every chapter's intermediate stages
    pub fn run_capture_stages(
        &self,
        profiler: &mut StepProfiler,
    ) -> Result<(BuildReport, Vec<ChapterStages>)> {
        self.run_inner(profiler, true)
    }

    fn run_inner(
        &self,
        profiler: &mut StepProfiler,
        capture: bool,
    ) -> Result<(BuildReport, Vec<ChapterStages>)> {
        let chapters = profiler.time_step("List chapters", || self.storage.list_chapters())?;
        if chapters.is_empty() {
            log::warn!("No chapters found, nothing to convert");
        } else {
            log::info!("Found {} chapters: {}", chapters.len(), chapters.join(", "));
        }

        let sources = profiler.time_step("Read chapters", || {
            chapters
                .iter()
                .map(|name| {
                    self.storage
                        .read_chapter(name)
                        .with_context(|| format!("Failed to load chapter {name}"))
                        .map(|text| (name.as_str(), text))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut report = BuildReport {
            output_dir: self.storage.converted_location(),
            dry_run: self.dry_run,
            ..BuildReport::default()
        };

        if self.combine_readme {
            let combined: String = sources.iter().map(|(_, text)| text.as_str()).collect();
            if !self.dry_run {
                profiler.time_step("Write combined README", || {
                    self.storage.store_combined(&combined)
                })?;
            }
            report.readme_path = self.storage.combined_location();
            report.readme_bytes = combined.len();
            log::info!("Combined README: {} bytes", combined.len());
        }

        let mut captured = Vec::new();
        for (name, text) in &sources {
            let stages = self.processor.process_chapter(name, text, profiler);

            if !self.dry_run {
                profiler
                    .time_step(&format!("{name}: write"), || {
                        self.storage.store_converted(name, &stages.output)
                    })
                    .with_context(|| format!("Failed to store converted chapter {name}"))?;
            }

            let chapter_report =
                ChapterReport::from_rewrites(name, text, &stages.rewrites, &stages.output);
            log::info!(
                "{}: {} paragraphs, {} rewritten",
                name,
                chapter_report.paragraphs,
                chapter_report.rewritten_paragraphs
            );
            report.chapters.push(chapter_report);

            if capture {
                captured.push(stages);
            }
        }

        Ok((report, captured))
    }
}
