use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::error::EditError;

#[derive(Clone, Copy, Debug)]
pub struct EditOpts {
    /// Spaces per nesting level in resolved and committed text.
    pub indent: usize,
    /// Keep a timestamped copy of the previous file contents before a file store write.
    pub backup_on_save: bool,
}

impl Default for EditOpts {
    fn default() -> Self {
        Self {
            indent: 2,
            backup_on_save: false,
        }
    }
}

/// A JSON value paired with its serialized text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    value: Value,
    text: String,
}

impl Document {
    /// Parse `text`, keeping it as the document's text form.
    pub fn parse(text: &str) -> Result<Self, EditError> {
        let value = serde_json::from_str(text)?;
        Ok(Self {
            value,
            text: text.to_string(),
        })
    }

    /// Canonical document for `value`: its pretty-printed text.
    pub fn from_value(value: Value, opts: &EditOpts) -> Self {
        let text = to_pretty(&value, opts.indent);
        Self { value, text }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Pretty-print with `indent` spaces per level.
pub fn to_pretty(value: &Value, indent: usize) -> String {
    let pad = vec![b' '; indent];
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&pad));
    // Serializing a Value into memory only fails on invalid map keys, which Value cannot hold.
    if value.serialize(&mut ser).is_err() {
        return "null".to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| "null".to_string())
}
