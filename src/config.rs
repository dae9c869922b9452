//! Runtime configuration from the environment

use std::path::PathBuf;

const DEFAULT_APP: &str = "cluster";
const DEFAULT_YDOTOOL: &str = "ydotool";
const DEFAULT_CLIPBOARD_CMD: &str = "xclip -selection clipboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Application targeted until a client focuses another one
    pub default_app: String,
    /// ydotool binary used for input injection
    pub ydotool: String,
    /// Command line that reads clipboard text from stdin
    pub clipboard_cmd: String,
    /// Where file-format screenshots are written
    pub screenshot_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_app: DEFAULT_APP.to_string(),
            ydotool: DEFAULT_YDOTOOL.to_string(),
            clipboard_cmd: DEFAULT_CLIPBOARD_CMD.to_string(),
            screenshot_dir: std::env::temp_dir(),
        }
    }
}

impl Config {
    /// Read `HANDPUPPET_*` variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            // An explicitly empty default app disables focusing, so only
            // unset falls back here.
            default_app: lookup("HANDPUPPET_DEFAULT_APP").unwrap_or(defaults.default_app),
            ydotool: get("HANDPUPPET_YDOTOOL").unwrap_or(defaults.ydotool),
            clipboard_cmd: get("HANDPUPPET_CLIPBOARD_CMD").unwrap_or(defaults.clipboard_cmd),
            screenshot_dir: get("HANDPUPPET_SCREENSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.screenshot_dir),
        }
    }
}
