use tickprof_protocol::SharedStr;

/// A profiler location, stored as its individual path segments.
///
/// Paths compare segment by segment, so every descendant of a path sorts
/// directly after it. The sample store relies on this to find children
/// with a range scan instead of substring arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationPath {
    segments: Vec<SharedStr>,
}

impl LocationPath {
    /// Name of the synthetic top-level location every profiler pushes first.
    pub const ROOT: &'static str = "root";

    /// The path with no segments (parent of `root`).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root() -> Self {
        Self {
            segments: vec![SharedStr::from(Self::ROOT)],
        }
    }

    /// Split a raw separator-joined path. The empty string is the empty path;
    /// empty segments elsewhere are kept.
    pub fn parse(raw: &str, separator: char) -> Self {
        if raw.is_empty() {
            return Self::empty();
        }
        Self {
            segments: raw.split(separator).map(SharedStr::from).collect(),
        }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SharedStr>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[SharedStr] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_segment(&self) -> Option<&SharedStr> {
        self.segments.last()
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: impl Into<SharedStr>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        Self { segments }
    }

    /// Whether `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &LocationPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Exactly one segment below `parent`.
    pub fn is_direct_child_of(&self, parent: &LocationPath) -> bool {
        self.segments.len() == parent.segments.len() + 1 && self.starts_with(parent)
    }

    pub fn join(&self, separator: char) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(segment);
        }
        out
    }
}
