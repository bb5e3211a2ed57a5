use std::time::Instant;

use tickprof_protocol::SharedStr;

/// Shown when no comment can be picked.
pub const COMMENT_UNAVAILABLE: &str = "Witty comment unavailable :(";

/// Flavour lines for the report banner. Purely cosmetic.
pub const DEFAULT_COMMENTS: &[&str] = &[
    "Every tick counts.",
    "Now measured in ticks and feelings.",
    "Twenty ticks a second, or at least that was the plan.",
    "The numbers do not lie, but they do round.",
    "Somewhere a scheduler is sighing.",
    "Hot paths ahead.",
    "Less lag, more ticks.",
    "Brought to you by the letter T.",
    "Unspecified time is still time.",
    "Profiling: the art of blaming the right function.",
    "It was fast on my machine.",
    "Counting so you don't have to.",
    "Percentages may not add up in the presence of clock skew.",
    "Have you tried doing less work?",
];

/// Source of the one-line comment printed under the report banner.
pub trait CommentSource: Send + Sync {
    fn comment(&self) -> SharedStr;
}

/// Picks a comment from a pool using a monotonic clock sample.
#[derive(Debug, Clone)]
pub struct ClockComment {
    pool: Vec<SharedStr>,
    origin: Instant,
}

impl ClockComment {
    pub fn new() -> Self {
        Self::with_pool(DEFAULT_COMMENTS.iter().copied().map(SharedStr::from))
    }

    pub fn with_pool(pool: impl IntoIterator<Item = SharedStr>) -> Self {
        Self {
            pool: pool.into_iter().collect(),
            origin: Instant::now(),
        }
    }

    fn sample_nanos(&self) -> Option<u128> {
        Instant::now()
            .checked_duration_since(self.origin)
            .map(|elapsed| elapsed.as_nanos())
    }
}

impl Default for ClockComment {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentSource for ClockComment {
    fn comment(&self) -> SharedStr {
        let len = self.pool.len() as u128;
        match self.sample_nanos() {
            Some(nanos) if len > 0 => {
                let index = (nanos % len) as usize;
                self.pool[index].clone()
            }
            _ => SharedStr::from(COMMENT_UNAVAILABLE),
        }
    }
}

/// Always returns the same comment.
#[derive(Debug, Clone)]
pub struct FixedComment(pub SharedStr);

impl FixedComment {
    pub fn new(comment: impl Into<SharedStr>) -> Self {
        Self(comment.into())
    }
}

impl CommentSource for FixedComment {
    fn comment(&self) -> SharedStr {
        self.0.clone()
    }
}
