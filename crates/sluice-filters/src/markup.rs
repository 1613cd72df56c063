//! Markup filters: tag and comment stripping.

use crate::util::map_strings;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use sluice_core::{parse_options, Filter, Options, Result};
use std::collections::HashSet;
use std::sync::LazyLock;

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"</?\s*([A-Za-z][A-Za-z0-9:-]*)(?:[^>"']|"[^"]*"|'[^']*')*>"#).unwrap()
});

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StripTagsOptions {
    allowed_tags: Vec<String>,
    allow_comments: bool,
}

/// Remove HTML/XML tags and comments, keeping an allow-list of tags.
#[derive(Debug, Default, Clone)]
pub struct StripTags {
    allowed: HashSet<String>,
    allow_comments: bool,
}

impl StripTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed.extend(tags.into_iter().map(|t| t.as_ref().to_lowercase()));
        self
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: StripTagsOptions = parse_options("StripTags", options)?;
        let mut filter = Self::new().allow(opts.allowed_tags);
        filter.allow_comments = opts.allow_comments;
        Ok(filter)
    }

    pub fn strip(&self, text: &str) -> String {
        let text = if self.allow_comments {
            text.to_string()
        } else {
            RE_COMMENT.replace_all(text, "").into_owned()
        };
        RE_TAG
            .replace_all(&text, |caps: &regex::Captures| {
                if self.allowed.contains(&caps[1].to_lowercase()) {
                    caps[0].to_string()
                } else {
                    String::new()
                }
            })
            .into_owned()
    }
}

impl Filter for StripTags {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| self.strip(s)))
    }

    fn name(&self) -> &str {
        "StripTags"
    }
}
