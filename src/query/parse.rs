//! Query string tokenizer and value parsers.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use super::color::parse_color;
use super::{CollageOptions, ParseWarning};

/// Accepted `w`/`width` values (maximum output width).
pub const WIDTH_RANGE: RangeInclusive<u32> = 256..=4096;
/// Accepted `h`/`height` values (normalization height).
pub const HEIGHT_RANGE: RangeInclusive<u32> = 128..=1024;
/// Accepted `quality` values.
pub const QUALITY_RANGE: RangeInclusive<u32> = 1..=100;

pub(crate) fn parse_query(query: &str) -> (CollageOptions, Vec<ParseWarning>) {
    let mut opts = CollageOptions::default();
    let mut warnings = Vec::new();

    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let mut key = percent_decode(raw_key);
        key.make_ascii_lowercase();
        let value = percent_decode(raw_value);
        dispatch_key(&key, &value, &mut opts, &mut warnings);
    }

    (opts, warnings)
}

fn dispatch_key(
    key: &str,
    value: &str,
    opts: &mut CollageOptions,
    warnings: &mut Vec<ParseWarning>,
) {
    let mut w = Warn {
        key,
        value,
        warnings,
    };
    match key {
        "w" | "width" => {
            let parsed = w.ranged("w", WIDTH_RANGE);
            w.set(&mut opts.width, parsed);
        }
        "h" | "height" => {
            let parsed = w.ranged("h", HEIGHT_RANGE);
            w.set(&mut opts.height, parsed);
        }
        "maxw" | "maxwidth" => {
            let parsed = w.ranged("maxw", 1..=u32::MAX);
            w.set(&mut opts.max_width, parsed);
        }
        "maxh" | "maxheight" => {
            let parsed = w.ranged("maxh", 1..=u32::MAX);
            w.set(&mut opts.max_height, parsed);
        }
        "bg" | "bgcolor" => {
            let parsed = parse_color(value);
            if parsed.is_none() {
                w.invalid("bgcolor", "expected hex color or CSS3 color name");
            }
            w.set(&mut opts.background, parsed);
        }
        "quality" => {
            let parsed = w.ranged("quality", QUALITY_RANGE).map(|q| q as u8);
            w.set(&mut opts.quality, parsed);
        }
        _ => w.warnings.push(ParseWarning::KeyNotRecognized {
            key: String::from(key),
            value: String::from(value),
        }),
    }
}

/// Warning sink for one key/value pair.
struct Warn<'a> {
    key: &'a str,
    value: &'a str,
    warnings: &'a mut Vec<ParseWarning>,
}

impl Warn<'_> {
    fn invalid(&mut self, key: &'static str, reason: &'static str) {
        self.warnings.push(ParseWarning::ValueInvalid {
            key,
            value: String::from(self.value),
            reason,
        });
    }

    /// Integer within `range`, or a warning.
    fn ranged(&mut self, key: &'static str, range: RangeInclusive<u32>) -> Option<u32> {
        match self.value.trim().parse::<u32>() {
            Ok(v) if range.contains(&v) => Some(v),
            Ok(_) => {
                self.invalid(key, "out of range");
                None
            }
            Err(_) => {
                self.invalid(key, "expected a positive integer");
                None
            }
        }
    }

    /// Store `parsed`, warning when the field was already set. Last wins.
    fn set<T>(&mut self, field: &mut Option<T>, parsed: Option<T>) {
        let Some(v) = parsed else { return };
        if field.is_some() {
            self.warnings.push(ParseWarning::DuplicateKey {
                key: String::from(self.key),
                value: String::from(self.value),
            });
        }
        *field = Some(v);
    }
}

/// Percent-decode a URL component; `+` is a space. Malformed escapes pass
/// through literally, and decoded bytes that are not UTF-8 are replaced.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                        continue;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::CanvasColor;

    #[test]
    fn parses_every_key() {
        let (opts, warnings) = parse_query("w=1024&h=320&maxw=3000&maxh=2000&bg=white&quality=90");
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(opts.width, Some(1024));
        assert_eq!(opts.height, Some(320));
        assert_eq!(opts.max_width, Some(3000));
        assert_eq!(opts.max_height, Some(2000));
        assert_eq!(opts.background, Some(CanvasColor::white()));
        assert_eq!(opts.quality, Some(90));
    }

    #[test]
    fn long_aliases_and_case() {
        let (opts, warnings) = parse_query("?Width=512&HEIGHT=256&BgColor=%23000");
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(opts.width, Some(512));
        assert_eq!(opts.height, Some(256));
        assert_eq!(
            opts.background,
            Some(CanvasColor::Srgb {
                r: 0,
                g: 0,
                b: 0,
                a: 255
            })
        );
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let (opts, warnings) = parse_query("w=256&h=1024");
        assert!(warnings.is_empty());
        assert_eq!(opts.width, Some(256));
        assert_eq!(opts.height, Some(1024));

        let (opts, _) = parse_query("w=4096&h=128");
        assert_eq!(opts.width, Some(4096));
        assert_eq!(opts.height, Some(128));
    }

    #[test]
    fn out_of_range_falls_back_with_warning() {
        let (opts, warnings) = parse_query("w=255&h=1025&quality=0");
        assert_eq!(opts.width, None);
        assert_eq!(opts.height, None);
        assert_eq!(opts.quality, None);
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|w| matches!(
            w,
            ParseWarning::ValueInvalid {
                reason: "out of range",
                ..
            }
        )));
    }

    #[test]
    fn unparseable_value_warns() {
        let (opts, warnings) = parse_query("w=wide&bg=notacolor");
        assert_eq!(opts.width, None);
        assert_eq!(opts.background, None);
        assert_eq!(
            warnings,
            [
                ParseWarning::ValueInvalid {
                    key: "w",
                    value: String::from("wide"),
                    reason: "expected a positive integer",
                },
                ParseWarning::ValueInvalid {
                    key: "bgcolor",
                    value: String::from("notacolor"),
                    reason: "expected hex color or CSS3 color name",
                },
            ]
        );
    }

    #[test]
    fn duplicate_key_warns_last_wins() {
        let (opts, warnings) = parse_query("w=800&width=400");
        assert_eq!(opts.width, Some(400));
        assert_eq!(
            warnings,
            [ParseWarning::DuplicateKey {
                key: String::from("width"),
                value: String::from("400"),
            }]
        );
    }

    #[test]
    fn unknown_key_warns() {
        let (_, warnings) = parse_query("w=800&mode=crop");
        assert_eq!(
            warnings,
            [ParseWarning::KeyNotRecognized {
                key: String::from("mode"),
                value: String::from("crop"),
            }]
        );
    }

    #[test]
    fn empty_pairs_are_skipped() {
        let (opts, warnings) = parse_query("&&w=300&");
        assert!(warnings.is_empty());
        assert_eq!(opts.width, Some(300));
    }

    #[test]
    fn percent_decoding() {
        assert_eq!(percent_decode("a+b%20c"), "a b c");
        assert_eq!(percent_decode("%23fff"), "#fff");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%4"), "%4");
    }
}
