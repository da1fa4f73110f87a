// Mystify Core Library
//
// Rewrites GitHub-flavored Markdown chapters into MyST/Sphinx sources,
// paragraph by paragraph, through a configurable rule table.
// Main interface for converting a chapter tree and building the combined README.

pub mod types;
pub mod error;
pub mod config;
pub mod splitter;
pub mod rules;
pub mod processor;
pub mod storage;
pub mod pipeline;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::ConfigError;
pub use config::{MystifyConfig, PathsConfig, PipelineConfig, ResolvedPaths, RuleConfig};
pub use splitter::{split_paragraphs, Paragraphs};
pub use rules::{RewriteRule, RuleEngine, RuleName};
pub use processor::{ChapterProcessor, StepProfiler};
pub use storage::{ChapterStorage, FileStorage, MemoryStorage};
pub use pipeline::ChapterPipeline;
