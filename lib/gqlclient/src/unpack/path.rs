use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location inside the response `data` currently being unpacked.
///
/// Rendered with dots between object keys and brackets around list indices,
/// e.g. `user.friends[2].name`. The root renders as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackPath {
    segments: Vec<Segment>,
}

impl UnpackPath {
    /// Creates a path pointing at the root of `data`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descends into an object member.
    pub fn push_key(&mut self, key: &str) {
        self.segments.push(Segment::Key(key.to_string()));
    }

    /// Descends into a list element.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    /// Goes back to the parent location.
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Returns `true` when the path points at the root of `data`.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Renders the location of `key` below this path without descending.
    pub fn child(&self, key: &str) -> String {
        let mut child = self.clone();
        child.push_key(key);
        child.to_string()
    }
}

impl fmt::Display for UnpackPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if position == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
