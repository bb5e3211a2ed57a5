pub mod shared_str;
pub mod snapshot;
pub mod types;

pub use shared_str::SharedStr;
pub use snapshot::{LocationRecord, PATH_SEPARATOR, ProfileSnapshot};
pub use types::RunWindow;
