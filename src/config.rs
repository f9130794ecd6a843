//! Application configuration constants.

use std::time::Duration;

/// Images narrower than this after preview decoding are not shown.
pub const MIN_IMAGE_WIDTH: u32 = 400;

/// Previews are decoded to fit inside a square of this size.
pub const PREVIEW_BOUND: u32 = 400;

/// Delay between a geometry change and the write of the window bounds.
pub const WINDOW_STATE_SAVE_DELAY: Duration = Duration::from_secs(1);

/// Preference node that holds the main window state.
pub const PREFERENCES_NAMESPACE: &str = "image-snatcher";

/// Directory (below the user config dir) and file name of the preference store.
pub const PREFERENCES_DIR: &str = "image-snatcher";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Lock screen asset cache on Windows, relative to the user's home directory.
pub const WINDOWS_ASSETS_COMPONENTS: [&str; 6] = [
    "AppData",
    "Local",
    "Packages",
    "Microsoft.Windows.ContentDeliveryManager_cw5n1h2txyewy",
    "LocalState",
    "Assets",
];

/// Screen saver wallpaper collection shipped with macOS.
pub const MACOS_ASSETS_PATH: &str = "/Library/Screen Savers/Default Collections";

/// Save dialog filter.
pub const PNG_FILTER_NAME: &str = "Portable Network Graphics";
pub const PNG_EXTENSION: &str = "png";

/// Prefix of temporary files written for the external viewer.
pub const TEMP_FILE_PREFIX: &str = "image_";
