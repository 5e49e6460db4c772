use enigo::{Enigo, Mouse, Settings};

use crate::errors::{SyncError, SyncResult};
use crate::perception::types::ScreenPoint;

/// Current mouse cursor location in global desktop coordinates.
/// Blocking: call from `spawn_blocking`.
pub fn cursor_location() -> SyncResult<ScreenPoint> {
    let enigo = Enigo::new(&Settings::default())
        .map_err(|e| SyncError::Input(format!("failed to open input connection: {e}")))?;
    let (x, y) = enigo
        .location()
        .map_err(|e| SyncError::Input(format!("failed to read cursor location: {e}")))?;
    Ok(ScreenPoint::new(x, y))
}
