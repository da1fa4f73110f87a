use super::engine::RewriteRule;
use anyhow::Result;
use regex::{Captures, Regex};

/// Opening and closing fence of a MyST directive
const FENCE: &str = "```";

// AdmonitionRule - turns a quoted callout into a fenced MyST directive:
//
//   > :warning: Be careful          ```{warning} Be careful
//   > This may break things.   ->   This may break things.
//                                  ```
pub struct AdmonitionRule {
    detect: Regex,
    line: Regex,
}

impl AdmonitionRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            detect: Regex::new(r"^> :")?,
            line: Regex::new(r"> :(\w+): (.+)|> (.+)")?,
        })
    }
}

impl RewriteRule for AdmonitionRule {
    fn name(&self) -> &'static str {
        "Admonition"
    }

    fn pattern(&self) -> &Regex {
        &self.detect
    }

    fn rewrite(&self, text: &str, _captures: &Captures<'_>) -> String {
        let mut block = String::with_capacity(text.len() + 2 * FENCE.len());

        // Lines matching neither form are dropped.
        for line in self.line.captures_iter(text) {
            if let (Some(directive), Some(argument)) = (line.get(1), line.get(2)) {
                block.push_str(&format!(
                    "{FENCE}{{{}}} {}\n",
                    directive.as_str(),
                    argument.as_str()
                ));
            } else if let Some(content) = line.get(3) {
                block.push_str(content.as_str());
                block.push('\n');
            }
        }

        block.push_str(FENCE);
        block
    }
}
