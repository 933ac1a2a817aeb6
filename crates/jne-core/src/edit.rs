// Path-addressed read and write over serde_json::Value.
// Highlights:
// - `resolve` never fails: malformed documents and missing nodes read as `null`.
// - `assign` never touches its input; it returns an edited structural copy.
// - Missing intermediates are created by looking at the next segment:
//   an index makes an array, a key makes an object.
use serde_json::{Map, Value};

use crate::document::{EditOpts, to_pretty};
use crate::error::EditError;
use crate::path::{Path, Segment, parse_index};

/// Most `null` slots an assignment may add past the end of an array.
pub const MAX_ARRAY_PADDING: usize = 1 << 16;

/// Borrow the node at `path`, or `None` if any step is absent.
pub fn resolve_value<'a>(value: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut cur = value;
    for seg in path.segments() {
        cur = step(cur, seg)?;
    }
    Some(cur)
}

fn step<'a>(cur: &'a Value, seg: &Segment) -> Option<&'a Value> {
    match (cur, seg) {
        (Value::Object(map), Segment::Key(k)) => map.get(k),
        (Value::Object(map), Segment::Index(i)) => map.get(&i.to_string()),
        (Value::Array(arr), Segment::Index(i)) => arr.get(*i),
        (Value::Array(arr), Segment::Key(k)) => parse_index(k).and_then(|i| arr.get(i)),
        _ => None,
    }
}

/// Pretty-printed node at `path` inside `document_text`, or `"null"`.
pub fn resolve(document_text: &str, path: &Path) -> String {
    resolve_with(document_text, path, &EditOpts::default())
}

pub fn resolve_with(document_text: &str, path: &Path, opts: &EditOpts) -> String {
    let root: Value = match serde_json::from_str(document_text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("document does not parse, resolving {} as null: {}", path, e);
            return "null".to_string();
        }
    };
    match resolve_value(&root, path) {
        Some(v) => to_pretty(v, opts.indent),
        None => "null".to_string(),
    }
}

/// Copy of `document` with the node at `path` replaced by `new_value`.
///
/// An empty path replaces the whole document. Absent or `null` slots along the
/// way become containers chosen by the following segment; arrays are padded
/// with `null` when written past their end.
///
/// Fails with [`EditError::NotAContainer`] when the path runs through a scalar
/// or uses a non-index key on an array, and with [`EditError::IndexOutOfRange`]
/// when an index would pad an array by more than [`MAX_ARRAY_PADDING`].
pub fn assign(document: &Value, path: &Path, new_value: Value) -> Result<Value, EditError> {
    let segments = path.segments();
    let Some((last, init)) = segments.split_last() else {
        return Ok(new_value);
    };
    let mut copy = document.clone();
    ensure_container(&mut copy, &segments[0]);
    let mut cur = &mut copy;
    for (depth, seg) in init.iter().enumerate() {
        let slot = slot_mut(cur, seg, segments, depth)?;
        ensure_container(slot, &segments[depth + 1]);
        cur = slot;
    }
    *slot_mut(cur, last, segments, init.len())? = new_value;
    Ok(copy)
}

/// Parse `text` and [`assign`] it. Nothing is built when the text is malformed.
pub fn assign_text(document: &Value, path: &Path, text: &str) -> Result<Value, EditError> {
    let new_value: Value = serde_json::from_str(text)?;
    assign(document, path, new_value)
}

fn ensure_container(slot: &mut Value, next: &Segment) {
    if !slot.is_null() {
        return;
    }
    *slot = match next {
        Segment::Index(_) => Value::Array(Vec::new()),
        Segment::Key(_) => Value::Object(Map::new()),
    };
    tracing::trace!("created {} for missing intermediate", if slot.is_array() { "array" } else { "object" });
}

fn slot_mut<'a>(
    cur: &'a mut Value,
    seg: &Segment,
    segments: &[Segment],
    depth: usize,
) -> Result<&'a mut Value, EditError> {
    let index = match (&*cur, seg) {
        (Value::Array(_), Segment::Index(i)) => Some(*i),
        (Value::Array(_), Segment::Key(k)) => parse_index(k),
        _ => None,
    };
    match cur {
        Value::Object(map) => {
            let key = match seg {
                Segment::Key(k) => k.clone(),
                Segment::Index(i) => i.to_string(),
            };
            Ok(map.entry(key).or_insert(Value::Null))
        }
        Value::Array(arr) => match index {
            Some(i) => {
                if i >= arr.len() {
                    let new_len = i
                        .checked_add(1)
                        .filter(|n| n - arr.len() <= MAX_ARRAY_PADDING)
                        .ok_or_else(|| EditError::IndexOutOfRange {
                            path: Path::new(segments[..depth].to_vec()).to_string(),
                            index: i,
                        })?;
                    arr.resize(new_len, Value::Null);
                }
                Ok(&mut arr[i])
            }
            None => Err(not_a_container(segments, depth)),
        },
        _ => Err(not_a_container(segments, depth)),
    }
}

fn not_a_container(segments: &[Segment], depth: usize) -> EditError {
    EditError::NotAContainer {
        path: Path::new(segments[..depth].to_vec()).to_string(),
    }
}
