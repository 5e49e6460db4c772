pub mod cursor;
pub mod screenshot;
pub mod traits;
pub mod types;

pub use screenshot::Frame;
pub use traits::{DesktopScreen, ScreenSource, StaticScreen};
pub use types::{Rgb, ScreenPoint, ScreenshotMeta};
