use super::engine::RewriteRule;
use anyhow::Result;
use regex::{Captures, Regex};

// HeaderReferenceRule - gives every level-2 header an explicit MyST anchor and
// raises it to level 1:
//
//   ## How does it work?   ->   (How-does-it-work)=
//                              # How does it work?
pub struct HeaderReferenceRule {
    detect: Regex,
}

impl HeaderReferenceRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            detect: Regex::new(r"^## (.+)")?,
        })
    }
}

/// Build the cross-reference slug for a heading.
///
/// One trailing non-alphabetic character is removed, then the words are
/// joined with `-`. Case is kept. Headings made only of punctuation give
/// an empty slug.
pub fn anchor_slug(title: &str) -> String {
    let trimmed = match title.chars().last() {
        Some(last) if !last.is_alphabetic() => &title[..title.len() - last.len_utf8()],
        _ => title,
    };
    trimmed.split_whitespace().collect::<Vec<_>>().join("-")
}

impl RewriteRule for HeaderReferenceRule {
    fn name(&self) -> &'static str {
        "HeaderReference"
    }

    fn pattern(&self) -> &Regex {
        &self.detect
    }

    fn rewrite(&self, text: &str, captures: &Captures<'_>) -> String {
        let Some(title) = captures.get(1) else {
            return text.to_string();
        };

        // Lines after the header stay where they are.
        let rest = &text[title.end()..];
        format!(
            "({})=\n# {}{}",
            anchor_slug(title.as_str()),
            title.as_str(),
            rest
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str) -> Option<String> {
        let rule = HeaderReferenceRule::new().unwrap();
        let captures = rule.pattern().captures(text)?;
        Some(rule.rewrite(text, &captures))
    }

    #[test]
    fn test_slug_strips_trailing_punctuation() {
        assert_eq!(anchor_slug("How does it work?"), "How-does-it-work");
        assert_eq!(anchor_slug("Installation:"), "Installation");
        assert_eq!(anchor_slug("Plain Title"), "Plain-Title");
    }

    #[test]
    fn test_slug_strips_exactly_one_character() {
        assert_eq!(anchor_slug("Wait..."), "Wait..");
        assert_eq!(anchor_slug("Chapter 12"), "Chapter-1");
    }

    #[test]
    fn test_slug_collapses_whitespace() {
        assert_eq!(anchor_slug("  Spaced   out  words"), "Spaced-out-words");
    }

    #[test]
    fn test_degenerate_slugs() {
        assert_eq!(anchor_slug("?"), "");
        assert_eq!(anchor_slug("- -"), "-");
        assert_eq!(apply("## ?").unwrap(), "()=\n# ?");
    }

    #[test]
    fn test_slug_handles_multibyte_tail() {
        assert_eq!(anchor_slug("Café"), "Café");
        assert_eq!(anchor_slug("Done ✓"), "Done");
    }

    #[test]
    fn test_header_is_raised_and_anchored() {
        assert_eq!(
            apply("## How does it work?").unwrap(),
            "(How-does-it-work)=\n# How does it work?"
        );
    }

    #[test]
    fn test_following_lines_are_kept() {
        assert_eq!(
            apply("## Setup\nRun the installer first.").unwrap(),
            "(Setup)=\n# Setup\nRun the installer first."
        );
    }

    #[test]
    fn test_other_levels_do_not_match() {
        assert!(apply("# Title").is_none());
        assert!(apply("### Sub").is_none());
        assert!(apply("##NoSpace").is_none());
    }
}
