use crate::config::ImportPrefixRule;

/// Result of running one specifier through the rewrite rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteOutcome {
    Rewritten(String),
    /// Relative specifier with no matching rule.
    Unmatched,
    /// Package or absolute specifier; rules do not apply.
    NotRelative,
}

pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Rewrite a relative import specifier through the ordered prefix rules.
/// Longest matching prefix wins; ties resolve to the earlier rule.
pub fn rewrite_specifier(specifier: &str, rules: &[ImportPrefixRule]) -> RewriteOutcome {
    if !is_relative(specifier) {
        return RewriteOutcome::NotRelative;
    }

    // max_by_key would keep the last of equal-length prefixes; the first
    // matching rule must win ties, so track the best by strict improvement.
    let mut best: Option<&ImportPrefixRule> = None;
    for rule in rules {
        if !specifier.starts_with(rule.prefix.as_str()) {
            continue;
        }
        if best.is_none_or(|b| rule.prefix.len() > b.prefix.len()) {
            best = Some(rule);
        }
    }

    match best {
        Some(rule) => {
            let rest = &specifier[rule.prefix.len()..];
            RewriteOutcome::Rewritten(format!("{}{}", rule.replacement, rest))
        }
        None => RewriteOutcome::Unmatched,
    }
}
