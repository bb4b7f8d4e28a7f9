use crate::error::{BootError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Innermost placeholders only; outer ones are handled on later passes.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^${}:]+)(?::([^${}]*))?\}").expect("valid placeholder regex"));

const MAX_PASSES: usize = 32;

/// Replace `${key}` and `${key:default}` references using `lookup`.
///
/// In strict mode an unresolvable placeholder, or one that never settles, is
/// an error. Otherwise it is left untouched.
pub(super) fn resolve<F>(text: &str, lookup: F, strict: bool) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut current = text.to_string();
    for _ in 0..MAX_PASSES {
        if !current.contains("${") {
            return Ok(current);
        }
        let mut missing: Option<String> = None;
        let next = PLACEHOLDER
            .replace_all(&current, |caps: &Captures<'_>| {
                let key = caps[1].trim();
                match lookup(key).or_else(|| caps.get(2).map(|d| d.as_str().to_string())) {
                    Some(value) => value,
                    None => {
                        missing.get_or_insert_with(|| key.to_string());
                        caps[0].to_string()
                    }
                }
            })
            .into_owned();
        if let Some(key) = missing {
            if strict {
                return Err(BootError::Placeholder(format!(
                    "Could not resolve placeholder '{}' in value \"{}\"",
                    key, text
                )));
            }
        }
        if next == current {
            return Ok(current);
        }
        current = next;
    }
    if strict && PLACEHOLDER.is_match(&current) {
        return Err(BootError::Placeholder(format!(
            "Circular placeholder reference in value \"{}\"",
            text
        )));
    }
    Ok(current)
}
