// Structural paths into a JSON document.
// - `Segment` is a member key or an array index.
// - `Display` renders the `$["customer"][0]["name"]` label shown next to a node.
// - `from_pointer`/`to_pointer` bridge to RFC 6901 JSON Pointer (`/customer/0/name`).
use std::fmt;

use crate::error::EditError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Segment::Key(s.to_string())
    }
}

impl From<String> for Segment {
    fn from(s: String) -> Self {
        Segment::Key(s)
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "[{}]", i),
            // Keys are written verbatim; embedded quotes are not escaped.
            Segment::Key(k) => write!(f, "[\"{}\"]", k),
        }
    }
}

/// Ordered sequence of segments. The empty path is the document root.
///
/// A `Path` is never changed in place; `child` and `parent` return new paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, seg: impl Into<Segment>) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(seg.into());
        Path { segments }
    }

    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.segments.split_last()?;
        Some(Path { segments: init.to_vec() })
    }

    /// Parse an RFC 6901 pointer. Canonical decimal tokens (`0`, `12`, not `012`)
    /// become indices, everything else a key. `""` is the root; any other
    /// input must start with `/`.
    pub fn from_pointer(pointer: &str) -> Result<Path, EditError> {
        if pointer.is_empty() {
            return Ok(Path::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(EditError::InvalidPointer(pointer.to_string()));
        };
        let segments = rest
            .split('/')
            .map(|tok| {
                let tok = unescape_token(tok);
                match parse_index(&tok) {
                    Some(i) => Segment::Index(i),
                    None => Segment::Key(tok),
                }
            })
            .collect();
        Ok(Path { segments })
    }

    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            out.push('/');
            match seg {
                Segment::Index(i) => out.push_str(&i.to_string()),
                Segment::Key(k) => out.push_str(&escape_token(k)),
            }
        }
        out
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path { segments }
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Path { segments: iter.into_iter().collect() }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for seg in &self.segments {
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

/// `Some(n)` when `s` is a canonical array index: digits only, no leading zero.
pub(crate) fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

fn unescape_token(tok: &str) -> String {
    let s = tok.replace("~1", "/");
    s.replace("~0", "~")
}

fn escape_token(tok: &str) -> String {
    let s = tok.replace('~', "~0");
    s.replace('/', "~1")
}
