// Main rules module - delegates to one file per rewrite rule
// This file names the rules and wires them into the table; the pieces are:
// - engine.rs: RewriteRule trait and the RuleEngine that folds rules over a paragraph
// - admonition.rs: `> :note: title` block quotes -> fenced directives
// - header_reference.rs: `## Title` -> `(Title)=` anchor + level-1 heading
// - consecutive_header.rs: `###...` -> one level shallower

pub mod admonition;
pub mod consecutive_header;
pub mod engine;
pub mod header_reference;

pub use engine::*;

use crate::error::ConfigError;
use admonition::AdmonitionRule;
use anyhow::Result;
use consecutive_header::ConsecutiveHeaderRule;
use header_reference::HeaderReferenceRule;
use std::fmt;
use std::str::FromStr;

/// The closed set of rules a pipeline can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleName {
    Admonition,
    HeaderReference,
    ConsecutiveHeader,
}

impl RuleName {
    /// Every rule, in default table order
    pub const ALL: [RuleName; 3] = [
        RuleName::Admonition,
        RuleName::HeaderReference,
        RuleName::ConsecutiveHeader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::Admonition => "Admonition",
            RuleName::HeaderReference => "HeaderReference",
            RuleName::ConsecutiveHeader => "ConsecutiveHeader",
        }
    }

    /// Compile the rule this name stands for.
    pub fn build(&self) -> Result<Box<dyn RewriteRule>> {
        let rule: Box<dyn RewriteRule> = match self {
            RuleName::Admonition => Box::new(AdmonitionRule::new()?),
            RuleName::HeaderReference => Box::new(HeaderReferenceRule::new()?),
            RuleName::ConsecutiveHeader => Box::new(ConsecutiveHeaderRule::new()?),
        };
        Ok(rule)
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleName::ALL
            .iter()
            .copied()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownRule {
                name: s.to_string(),
                expected: RuleName::ALL
                    .iter()
                    .map(RuleName::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_names_roundtrip() {
        for rule in RuleName::ALL {
            assert_eq!(rule.as_str().parse::<RuleName>().unwrap(), rule);
            assert_eq!(rule.build().unwrap().name(), rule.as_str());
        }
    }

    #[test]
    fn test_rule_names_are_case_sensitive() {
        let err = "admonition".parse::<RuleName>().unwrap_err();
        assert!(err.to_string().contains("Admonition, HeaderReference, ConsecutiveHeader"));
    }

    #[test]
    fn test_every_pattern_is_anchored_at_start() {
        for rule in RuleName::ALL {
            let built = rule.build().unwrap();
            assert!(
                built.pattern().as_str().starts_with('^'),
                "{} pattern is not start-anchored",
                rule
            );
        }
    }
}
