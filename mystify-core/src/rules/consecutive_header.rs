use super::engine::RewriteRule;
use anyhow::Result;
use regex::{Captures, Regex};

// ConsecutiveHeaderRule - headers deeper than level 2 move one level up
pub struct ConsecutiveHeaderRule {
    detect: Regex,
}

impl ConsecutiveHeaderRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            detect: Regex::new(r"^###+")?,
        })
    }
}

impl RewriteRule for ConsecutiveHeaderRule {
    fn name(&self) -> &'static str {
        "ConsecutiveHeader"
    }

    fn pattern(&self) -> &Regex {
        &self.detect
    }

    fn rewrite(&self, text: &str, _captures: &Captures<'_>) -> String {
        text.strip_prefix('#').unwrap_or(text).to_string()
    }
}
