pub mod location;
pub mod path;
pub mod profile;
pub mod store;

pub use location::LocationInfo;
pub use path::LocationPath;
pub use profile::{ProfileError, ProfileResult};
pub use store::SampleStore;
