use super::RuleName;
use crate::config::MystifyConfig;
use crate::types::{Paragraph, ParagraphRewrite};
use anyhow::{Context, Result};
use regex::{Captures, Regex};

/// One entry of the rule table: a start-anchored detection pattern and the
/// rewrite applied when it matches.
pub trait RewriteRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Detection pattern, tested against the start of the current text.
    fn pattern(&self) -> &Regex;

    /// Produce the replacement for `text`.
    ///
    /// `text` is whatever the earlier rules in the table left behind for this
    /// paragraph (the raw paragraph if none of them matched), and `captures`
    /// is this rule's pattern matched against it.
    fn rewrite(&self, text: &str, captures: &Captures<'_>) -> String;
}

pub struct RuleEngine {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl RuleEngine {
    /// Engine with the default table: Admonition, HeaderReference, ConsecutiveHeader.
    pub fn new() -> Result<Self> {
        Self::from_rule_names(&RuleName::ALL)
    }

    pub fn from_rule_names(names: &[RuleName]) -> Result<Self> {
        let rules = names
            .iter()
            .map(|name| {
                name.build()
                    .with_context(|| format!("Failed to compile rule {name}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Build the table described by `config.pipeline`; passthrough mode gets an empty table.
    pub fn from_config(config: &MystifyConfig) -> Result<Self> {
        let names = config.pipeline.enabled_rules()?;
        if config.passthrough {
            log::info!("Passthrough mode enabled - bypassing all rule processing");
            return Ok(Self { rules: Vec::new() });
        }
        Self::from_rule_names(&names)
    }

    /// Names of the active rules, in table order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Fold every matching rule over `paragraph`, in table order.
    ///
    /// The accumulator starts as the raw paragraph; each rule is matched
    /// against the accumulator and, on a match, replaces it.
    pub fn apply_rules(&self, paragraph: &str) -> (String, Vec<&'static str>) {
        let mut text = paragraph.to_string();
        let mut applied = Vec::new();

        for rule in &self.rules {
            let rewritten = match rule.pattern().captures(&text) {
                Some(captures) => rule.rewrite(&text, &captures),
                None => continue,
            };
            applied.push(rule.name());
            text = rewritten;
        }

        (text, applied)
    }

    pub fn rewrite_paragraph(&self, paragraph: Paragraph<'_>) -> ParagraphRewrite {
        let (output, applied_rules) = self.apply_rules(paragraph.text);

        if !applied_rules.is_empty() {
            log::debug!(
                "paragraph {} rewritten by {}: {:?}",
                paragraph.index,
                applied_rules.join(" -> "),
                paragraph.text.chars().take(50).collect::<String>()
            );
        }

        ParagraphRewrite {
            index: paragraph.index,
            input: paragraph.text.to_string(),
            applied_rules,
            output,
        }
    }
}
