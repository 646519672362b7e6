//! Cobertura-style XML reports (as written by `coverage xml`).
//!
//! Only `<class filename=...>` and the `<line number=... hits=...>` elements
//! beneath it matter, so the document is scanned tag by tag instead of being
//! built into a tree.

use super::{normalize_key, FileCoverage};
use crate::errors::AuditError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*(/?)\s*([A-Za-z_][\w:.\-]*)([^>]*)>").expect("tag pattern is valid")
});

// Comments, CDATA sections and processing instructions hold no elements
static NON_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>|<\?.*?\?>").expect("non-markup pattern is valid")
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.\-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute pattern is valid")
});

fn attribute<'a>(attributes: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE.captures_iter(attributes).find_map(|cap| {
        if &cap[1] == name {
            cap.get(2).or_else(|| cap.get(3)).map(|m| m.as_str())
        } else {
            None
        }
    })
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn parse_number<T: std::str::FromStr>(
    attributes: &str,
    name: &str,
    origin: &Path,
) -> Result<T, AuditError> {
    let raw = attribute(attributes, name).ok_or_else(|| {
        AuditError::invalid_report(origin, format!("<line> element without a {} attribute", name))
    })?;
    raw.trim().parse().map_err(|_| {
        AuditError::invalid_report(origin, format!("invalid {} value {:?} on <line>", name, raw))
    })
}

pub fn parse_cobertura(
    source: &str,
    origin: &Path,
) -> Result<BTreeMap<String, FileCoverage>, AuditError> {
    let mut files: BTreeMap<String, FileCoverage> = BTreeMap::new();
    let mut saw_root = false;
    let mut current: Option<String> = None;

    let markup = NON_MARKUP.replace_all(source, "");
    for cap in TAG.captures_iter(&markup) {
        let closing = &cap[1] == "/";
        let name = &cap[2];
        let attributes = &cap[3];
        let self_closing = attributes.trim_end().ends_with('/');

        match (closing, name) {
            (false, "coverage") => saw_root = true,
            (false, "class") => {
                let Some(filename) = attribute(attributes, "filename") else {
                    return Err(AuditError::invalid_report(
                        origin,
                        "<class> element without a filename attribute",
                    ));
                };
                let key = normalize_key(&unescape(filename));
                files.entry(key.clone()).or_default();
                current = if self_closing { None } else { Some(key) };
            }
            (true, "class") => current = None,
            (false, "line") => {
                // Lines outside a class (e.g. package summaries) carry no file
                let Some(file) = current.as_ref() else {
                    continue;
                };
                let number: usize = parse_number(attributes, "number", origin)?;
                let hits: u64 = parse_number(attributes, "hits", origin)?;
                if let Some(coverage) = files.get_mut(file) {
                    coverage.record_line(number, hits);
                }
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(AuditError::invalid_report(
            origin,
            "missing <coverage> root element",
        ));
    }

    Ok(files)
}
