use anyhow::{anyhow, Result};

/// Resolves a typed student reference against the roster names.
pub fn resolve_student<'a>(query: &str, names: &[&'a str]) -> Result<&'a str> {
    // 1. Exact match
    if let Some(name) = names.iter().find(|n| **n == query) {
        return Ok(*name);
    }

    // 2. Prefix match
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(anyhow!("Student name is required"));
    }
    let matches: Vec<&str> = names
        .iter()
        .filter(|n| n.to_lowercase().starts_with(&needle))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(anyhow!("Unknown student: '{}'", query)),
        _ => Err(anyhow!("Ambiguous student: '{}' matches {:?}", query, matches)),
    }
}
