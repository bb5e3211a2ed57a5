use thiserror::Error;
use tickprof_protocol::ProfileSnapshot;

use crate::model::{ProfileError, ProfileResult};

#[derive(Debug, Error)]
pub enum SnapshotParseError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid run window: {0}")]
    Window(#[from] ProfileError),
}

/// Parse a JSON [`ProfileSnapshot`] into a validated [`ProfileResult`].
///
/// Location keys are split on `separator`.
pub fn parse_snapshot(data: &[u8], separator: char) -> Result<ProfileResult, SnapshotParseError> {
    let snapshot: ProfileSnapshot = serde_json::from_slice(data)?;
    tracing::debug!(
        locations = snapshot.locations.len(),
        "parsed profiler snapshot"
    );
    Ok(ProfileResult::from_snapshot(snapshot, separator)?)
}
