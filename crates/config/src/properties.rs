//! Flat `key=value` properties text
//!
//! Follows the long-standing properties file convention: `#`/`!` comments,
//! `=`, `:` or whitespace separators, backslash line continuations and
//! `\uXXXX` escapes.

use std::borrow::Cow;
use std::collections::HashMap;
use tuning_types::ConfigError;

/// Key to raw string mapping read from a properties file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse complete properties text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut properties = Self::new();
        parse_into(text, &mut properties)?;
        Ok(properties)
    }

    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Decode raw file bytes.
///
/// Valid UTF-8 is used as is; anything else is read as ISO-8859-1, which
/// cannot fail.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Parse `text` into `properties`.
///
/// Stops at the first malformed line. Entries read before it stay in
/// `properties`.
pub fn parse_into(text: &str, properties: &mut Properties) -> Result<(), ConfigError> {
    let normalized = text.replace("\r\n", "\n");
    let mut lines = normalized.split(['\n', '\r']).enumerate();

    while let Some((index, raw)) = lines.next() {
        let first = raw.trim_start_matches(is_blank);
        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let line = index + 1;
        let mut logical = first.to_string();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        let key = unescape(key, line)?;
        let value = unescape(value, line)?;
        properties.insert(key, value);
    }

    Ok(())
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Odd number of trailing backslashes
fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if !escaped && (c == '=' || c == ':') {
            key_end = i;
            value_start = i + 1;
            has_separator = true;
            break;
        }
        if !escaped && is_blank(c) {
            key_end = i;
            value_start = i + 1;
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    let rest = &line[value_start..];
    let mut skip = 0;
    for (i, c) in rest.char_indices() {
        if is_blank(c) {
            skip = i + c.len_utf8();
        } else if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            skip = i + 1;
        } else {
            skip = i;
            break;
        }
    }

    (&line[..key_end], &rest[skip..])
}

fn unescape(raw: &str, line: usize) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_units(&mut units, &mut out);
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else { break };
        if escape == 'u' {
            let hex: String = chars.by_ref().take(4).collect();
            let unit = (hex.len() == 4)
                .then(|| u16::from_str_radix(&hex, 16).ok())
                .flatten()
                .filter(|_| hex.chars().all(|h| h.is_ascii_hexdigit()))
                .ok_or_else(|| ConfigError::Parse {
                    line,
                    message: format!("Malformed \\uXXXX encoding: \\u{hex}"),
                })?;
            units.push(unit);
            continue;
        }
        flush_units(&mut units, &mut out);
        out.push(match escape {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\x0c',
            other => other,
        });
    }
    flush_units(&mut units, &mut out);

    Ok(out)
}

/// Surrogate pairs arrive as two consecutive `\u` escapes
fn flush_units(units: &mut Vec<u16>, out: &mut String) {
    if units.is_empty() {
        return;
    }
    out.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}
