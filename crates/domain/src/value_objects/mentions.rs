//! `@name` addressee handling for spoken lines.
//!
//! A line such as `@Ron, Hermione where is Harry?` addresses Ron and Hermione.
//! Names are runs of ASCII word characters or CJK ideographs; several names in
//! one group are separated by `,` or the full-width `，`.

use std::sync::OnceLock;

use regex_lite::Regex;

static MENTION_REGEX: OnceLock<Regex> = OnceLock::new();

fn mention_regex() -> &'static Regex {
    MENTION_REGEX.get_or_init(|| {
        Regex::new(r"@([\w\x{4e00}-\x{9fa5}]+(?:[,，]\s*[\w\x{4e00}-\x{9fa5}]+)*)")
            .expect("MENTION_REGEX pattern is invalid")
    })
}

/// Addressees pulled out of a line, and the line without them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mentions {
    pub roles: Vec<String>,
    pub message: String,
}

impl Mentions {
    pub fn first_role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }
}

pub fn parse_mentions(text: &str) -> Mentions {
    let re = mention_regex();
    let roles: Vec<String> = re
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|group| {
            group
                .as_str()
                .split([',', '，'])
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    if roles.is_empty() {
        return Mentions {
            roles,
            message: text.to_string(),
        };
    }

    let message = re.replace_all(text, "").trim().to_string();
    Mentions { roles, message }
}

/// Display prefix for a line addressed to `bid`: `"@ a, b  "`, or nothing.
pub fn addressee_prefix(bid: &[String]) -> String {
    if bid.is_empty() {
        String::new()
    } else {
        format!("@ {}  ", bid.join(", "))
    }
}
