pub mod config;
pub mod model;
pub mod parsers;
pub mod persist;
pub mod views;

pub use config::{BuildMode, ReportConfig};
pub use model::{LocationInfo, LocationPath, ProfileError, ProfileResult, SampleStore};
pub use views::comment::{ClockComment, CommentSource, FixedComment};
pub use views::report::ReportRenderer;
