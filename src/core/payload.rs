//! Decrypted payload handling.
//!
//! sops hands back a document in the requested format. Before it becomes a
//! step output every scalar value in it is registered with the host for
//! masking. Nested structures are flattened into dotted keys so no leaf is
//! missed.

use std::collections::HashSet;

use serde_json::Value as Json;
use serde_yaml::Value as Yaml;

use super::sops::OutputFormat;
use crate::error::{PayloadError, Result};

/// Raw sops output together with the format it was produced in.
#[derive(Clone, PartialEq, Eq)]
pub struct DecryptedPayload {
    raw: String,
    format: OutputFormat,
}

impl std::fmt::Debug for DecryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedPayload")
            .field("format", &self.format)
            .field("len", &self.raw.len())
            .finish()
    }
}

impl DecryptedPayload {
    pub fn new(raw: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            raw: raw.into(),
            format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Flat key/value view of the document, in document order.
    ///
    /// # Errors
    ///
    /// Returns `PayloadError` when the document does not parse in its format.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let mut entries = Vec::new();
        match self.format {
            OutputFormat::Json => {
                let value: Json = serde_json::from_str(&self.raw).map_err(PayloadError::from)?;
                flatten_json("", &value, &mut entries);
            }
            OutputFormat::Yaml => {
                let value: Yaml = serde_yaml::from_str(&self.raw).map_err(PayloadError::from)?;
                flatten_yaml("", &value, &mut entries);
            }
            OutputFormat::Dotenv => parse_dotenv(&self.raw, &mut entries),
        }
        Ok(entries)
    }

    /// Literal strings to mask, without duplicates.
    ///
    /// Masking is line-based, so multi-line values contribute one entry per
    /// line. Empty strings are dropped. yaml is emitted as written, so its
    /// scalars are masked as they appear in the document; `0x1F` stays
    /// `0x1F` rather than `31`.
    pub fn secrets(&self) -> Result<Vec<String>> {
        let values = match self.format {
            OutputFormat::Yaml => {
                let value: Yaml = serde_yaml::from_str(&self.raw).map_err(PayloadError::from)?;
                let mut values = Vec::new();
                yaml_strings(&value, &mut values);
                yaml_scalar_tokens(&self.raw, &mut values);
                values
            }
            OutputFormat::Json | OutputFormat::Dotenv => {
                self.entries()?.into_iter().map(|(_, value)| value).collect()
            }
        };

        let mut seen = HashSet::new();
        let mut secrets = Vec::new();
        for line in values.iter().flat_map(|value| value.split('\n')) {
            let line = line.trim_end_matches('\r');
            if !line.is_empty() && seen.insert(line) {
                secrets.push(line.to_string());
            }
        }
        Ok(secrets)
    }

    /// Value published as the `data` output.
    ///
    /// json is re-serialized from the parsed document; yaml and dotenv are
    /// passed through untouched.
    pub fn output(&self) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value: Json = serde_json::from_str(&self.raw).map_err(PayloadError::from)?;
                Ok(serde_json::to_string(&value).map_err(PayloadError::from)?)
            }
            OutputFormat::Yaml | OutputFormat::Dotenv => Ok(self.raw.clone()),
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn flatten_json(prefix: &str, value: &Json, out: &mut Vec<(String, String)>) {
    match value {
        Json::Null => {}
        Json::Bool(b) => out.push((prefix.to_string(), b.to_string())),
        Json::Number(n) => out.push((prefix.to_string(), n.to_string())),
        Json::String(s) => out.push((prefix.to_string(), s.clone())),
        Json::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_json(&join(prefix, &i.to_string()), item, out);
            }
        }
        Json::Object(map) => {
            for (key, item) in map {
                flatten_json(&join(prefix, key), item, out);
            }
        }
    }
}

fn yaml_key(key: &Yaml) -> String {
    match key {
        Yaml::String(s) => s.clone(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn flatten_yaml(prefix: &str, value: &Yaml, out: &mut Vec<(String, String)>) {
    match value {
        Yaml::Null => {}
        Yaml::Bool(b) => out.push((prefix.to_string(), b.to_string())),
        Yaml::Number(n) => out.push((prefix.to_string(), n.to_string())),
        Yaml::String(s) => out.push((prefix.to_string(), s.clone())),
        Yaml::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_yaml(&join(prefix, &i.to_string()), item, out);
            }
        }
        Yaml::Mapping(map) => {
            for (key, item) in map {
                flatten_yaml(&join(prefix, &yaml_key(key)), item, out);
            }
        }
        Yaml::Tagged(tagged) => flatten_yaml(prefix, &tagged.value, out),
    }
}

/// String leaves of a yaml document.
fn yaml_strings(value: &Yaml, out: &mut Vec<String>) {
    match value {
        Yaml::String(s) => out.push(s.clone()),
        Yaml::Sequence(items) => items.iter().for_each(|item| yaml_strings(item, out)),
        Yaml::Mapping(map) => map.values().for_each(|item| yaml_strings(item, out)),
        Yaml::Tagged(tagged) => yaml_strings(&tagged.value, out),
        Yaml::Null | Yaml::Bool(_) | Yaml::Number(_) => {}
    }
}

/// Scalar values as written on `key: value` and `- value` lines.
fn yaml_scalar_tokens(raw: &str, out: &mut Vec<String>) {
    for line in raw.lines() {
        let line = line.trim();
        let item = line.strip_prefix("- ");
        let entry = item.unwrap_or(line);

        match entry.split_once(": ") {
            Some((_, value)) => push_yaml_token(value, out),
            None if item.is_some() => push_yaml_token(entry, out),
            None => {}
        }
    }
}

fn push_yaml_token(value: &str, out: &mut Vec<String>) {
    let value = value.trim();
    if value.is_empty() || value.starts_with(['#', '|', '>']) {
        return;
    }

    let flow = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .or_else(|| value.strip_prefix('{').and_then(|v| v.strip_suffix('}')));
    if let Some(inner) = flow {
        for part in inner.split(',') {
            push_yaml_token(part.split_once(": ").map_or(part, |(_, v)| v), out);
        }
        return;
    }

    // Trailing comment
    if let Some((before, _)) = value.split_once(" #") {
        push_token(unquote(before.trim()), out);
    }
    push_token(unquote(value), out);
}

fn push_token(token: &str, out: &mut Vec<String>) {
    if !token.is_empty() {
        out.push(token.to_string());
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}

/// `KEY=value` lines; blank lines and comments are skipped.
fn parse_dotenv(raw: &str, out: &mut Vec<(String, String)>) {
    for line in raw.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().trim_start_matches("export ").trim();
            let value = unquote(value.trim());
            out.push((key.to_string(), value.to_string()));
        }
    }
}
