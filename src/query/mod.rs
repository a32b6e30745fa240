//! Query-string configuration for collage requests.
//!
//! Parses strings like `?w=1024&h=320&bg=white` into [`CollageOptions`]
//! and applies them on top of a [`CollageConfig`](crate::CollageConfig).
//! Nothing here fails: bad input produces [`ParseWarning`]s and the
//! affected setting keeps its configured value.
//!
//! | Key | Setting | Accepted |
//! |---|---|---|
//! | `w`, `width` | maximum output width | 256–4096 |
//! | `h`, `height` | normalization height | 128–1024 |
//! | `maxw`, `maxwidth` | maximum output width | ≥ 1 |
//! | `maxh`, `maxheight` | maximum output height | ≥ 1 |
//! | `bg`, `bgcolor` | canvas background | hex or CSS3 name |
//! | `quality` | JPEG quality | 1–100 |
//!
//! # Example
//!
//! ```
//! use zencollage::query;
//!
//! let result = query::parse("w=1024&h=320&bg=white");
//! assert!(result.warnings.is_empty());
//! assert_eq!(result.options.width, Some(1024));
//! assert_eq!(result.options.height, Some(320));
//! ```

mod color;
mod parse;

pub use color::parse_color;
pub use parse::{HEIGHT_RANGE, QUALITY_RANGE, WIDTH_RANGE};

use alloc::string::String;
use alloc::vec::Vec;

use crate::constraint::CanvasColor;

/// Settings parsed from a query string. `None` = keep the configured value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollageOptions {
    /// `w`/`width`: maximum output width.
    pub width: Option<u32>,
    /// `h`/`height`: normalization height.
    pub height: Option<u32>,
    /// `maxw`: maximum output width, without the `w` range check.
    pub max_width: Option<u32>,
    /// `maxh`: maximum output height.
    pub max_height: Option<u32>,
    pub background: Option<CanvasColor>,
    pub quality: Option<u8>,
}

impl CollageOptions {
    /// Overlay these options on `config`. `width` takes precedence over
    /// `max_width` when both are present.
    #[cfg(feature = "std")]
    pub fn apply(&self, config: crate::collage::CollageConfig) -> crate::collage::CollageConfig {
        let mut config = config;
        if let Some(h) = self.height {
            config.normalize_height = h;
        }
        if let Some(w) = self.width.or(self.max_width) {
            config.max_output.width = w;
        }
        if let Some(h) = self.max_height {
            config.max_output.height = h;
        }
        if let Some(bg) = self.background {
            config.background = bg;
        }
        if let Some(q) = self.quality {
            config = config.jpeg_quality(q);
        }
        config
    }
}

/// Result of parsing a query string.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub options: CollageOptions,
    /// Non-fatal problems, in query order.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal warning from query string parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A key appeared more than once (last value wins).
    DuplicateKey { key: String, value: String },
    /// A key is not a collage setting.
    KeyNotRecognized { key: String, value: String },
    /// A key was recognized but its value was unparseable or out of range.
    ValueInvalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Parse a query string (with or without leading `?`).
pub fn parse(query: &str) -> ParseResult {
    let (options, warnings) = parse::parse_query(query);
    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "query string produced warnings");
    }
    ParseResult { options, warnings }
}
