//! Minimal TOML reader for the receiver configuration
//!
//! Handles the subset the configuration file uses, without allocating:
//!
//! - `[section]` headers
//! - `key = value` pairs (string, integer, boolean)
//! - Comments (`# ...`), also after a value
//!
//! Arrays, inline tables, multi-line strings and dotted keys are not
//! supported. The full file is checked with a real TOML parser when the
//! firmware is built, so this reader only has to accept valid input.
//!
//! ```toml
//! [matrix]
//! width = 64
//! height = 32
//!
//! [network]
//! hostname = "glimmer"
//! port = 65506
//!
//! [timing]
//! data_timeout_s = 2
//! refresh_hz = 512
//! idle_poll_ms = 20
//! ```
//!
//! Sections this module does not know are skipped, so board-specific
//! sections can live in the same file and be read with [`entries`].

use super::{ConfigError, ReceiverConfig};

/// Parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line is neither a header, a pair nor a comment
    InvalidLine { line: usize },
    /// Value has the wrong type or is out of range
    InvalidValue { line: usize },
    /// Key not known in its section
    UnknownKey { line: usize },
    /// Parsed values do not form a usable configuration
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// One `key = value` pair and the section it appeared in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Section name, empty before the first header
    pub section: &'a str,
    pub key: &'a str,
    /// Raw value, comment stripped, quotes kept
    pub value: &'a str,
    /// 1-based line number
    pub line: usize,
}

impl<'a> Entry<'a> {
    /// Value as a quoted string
    pub fn string(&self) -> Result<&'a str, ParseError> {
        self.value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .ok_or(ParseError::InvalidValue { line: self.line })
    }

    /// Value as an integer
    pub fn int<T: core::str::FromStr>(&self) -> Result<T, ParseError> {
        strip_underscores(self.value)
            .parse()
            .map_err(|_| ParseError::InvalidValue { line: self.line })
    }

    /// Value as a boolean
    pub fn bool(&self) -> Result<bool, ParseError> {
        match self.value {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ParseError::InvalidValue { line: self.line }),
        }
    }
}

/// Longest integer literal accepted, underscores included
const MAX_INT_LEN: usize = 24;

/// Drop digit separators (`6_454`)
///
/// Literals too long to be an integer come back empty and fail the parse.
fn strip_underscores(value: &str) -> heapless::String<MAX_INT_LEN> {
    let mut out = heapless::String::new();
    for c in value.chars().filter(|c| *c != '_') {
        if out.push(c).is_err() {
            out.clear();
            break;
        }
    }
    out
}

/// Iterate over the `key = value` pairs of `input`
pub fn entries(input: &str) -> impl Iterator<Item = Result<Entry<'_>, ParseError>> {
    let mut section = "";
    input
        .lines()
        .enumerate()
        .filter_map(move |(i, raw)| {
            let line = i + 1;
            let text = strip_comment(raw).trim();
            if text.is_empty() {
                return None;
            }

            if let Some(header) = text.strip_prefix('[') {
                return match header.strip_suffix(']') {
                    Some(name) if !name.trim().is_empty() => {
                        section = name.trim();
                        None
                    }
                    _ => Some(Err(ParseError::InvalidLine { line })),
                };
            }

            let Some((key, value)) = text.split_once('=') else {
                return Some(Err(ParseError::InvalidLine { line }));
            };
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                return Some(Err(ParseError::InvalidLine { line }));
            }

            Some(Ok(Entry {
                section,
                key,
                value,
                line,
            }))
        })
}

/// Parse a configuration file on top of the defaults
///
/// Keys that are absent keep their default value. The result is
/// validated before it is returned.
pub fn parse_config(input: &str) -> Result<ReceiverConfig, ParseError> {
    let mut config = ReceiverConfig::default();

    for entry in entries(input) {
        let entry = entry?;
        match (entry.section, entry.key) {
            ("matrix", "width") => config.width = entry.int()?,
            ("matrix", "height") => config.height = entry.int()?,
            ("network", "hostname") => config.set_hostname(entry.string()?)?,
            ("network", "port") => config.port = entry.int()?,
            ("timing", "data_timeout_s") => config.data_timeout_s = entry.int()?,
            ("timing", "refresh_hz") => config.refresh_hz = entry.int()?,
            ("timing", "idle_poll_ms") => config.idle_poll_ms = entry.int()?,
            ("matrix" | "network" | "timing", _) => {
                return Err(ParseError::UnknownKey { line: entry.line })
            }
            _ => {}
        }
    }

    config.validate()?;
    Ok(config)
}

/// Drop a trailing `# comment`, ignoring `#` inside quotes
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..i],
            _ => {}
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Stage left panel
[matrix]
width = 128
height = 64

[network]
hostname = "stage-left"   # announced over DHCP
port = 6_454

[timing]
data_timeout_s = 5
refresh_hz = 400
idle_poll_ms = 10

[panel]
bit_planes = 6
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.width, 128);
        assert_eq!(config.height, 64);
        assert_eq!(config.hostname.as_str(), "stage-left");
        assert_eq!(config.port, 6454);
        assert_eq!(config.data_timeout_s, 5);
        assert_eq!(config.refresh_hz, 400);
        assert_eq!(config.idle_poll_ms, 10);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(ReceiverConfig::default()));
        assert_eq!(parse_config("# nothing\n\n"), Ok(ReceiverConfig::default()));
    }

    #[test]
    fn test_foreign_sections_readable_through_entries() {
        let planes = entries(SAMPLE)
            .filter_map(Result::ok)
            .find(|e| e.section == "panel" && e.key == "bit_planes")
            .map(|e| e.int::<u8>());
        assert_eq!(planes, Some(Ok(6)));
    }

    #[test]
    fn test_line_numbers_in_errors() {
        let input = "[matrix]\nwidth = 64\nheight = tall\n";
        assert_eq!(
            parse_config(input),
            Err(ParseError::InvalidValue { line: 3 })
        );

        let input = "[matrix]\ndepth = 3\n";
        assert_eq!(parse_config(input), Err(ParseError::UnknownKey { line: 2 }));

        let input = "[matrix\n";
        assert_eq!(parse_config(input), Err(ParseError::InvalidLine { line: 1 }));

        let input = "[network]\nhostname\n";
        assert_eq!(parse_config(input), Err(ParseError::InvalidLine { line: 2 }));
    }

    #[test]
    fn test_unquoted_hostname_rejected() {
        let input = "[network]\nhostname = glimmer\n";
        assert_eq!(
            parse_config(input),
            Err(ParseError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_hash_inside_string_kept() {
        let input = "[network]\nhostname = \"panel#2\" # comment\n";
        assert_eq!(parse_config(input).unwrap().hostname.as_str(), "panel#2");
    }

    #[test]
    fn test_result_is_validated() {
        let input = "[matrix]\nwidth = 0\n";
        assert_eq!(
            parse_config(input),
            Err(ParseError::Invalid(ConfigError::EmptyMatrix))
        );

        let input = "[matrix]\nwidth = 70000\n";
        assert_eq!(
            parse_config(input),
            Err(ParseError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_bool_values() {
        let entry = entries("[x]\nflag = true\n").next().unwrap().unwrap();
        assert_eq!(entry.bool(), Ok(true));
        let entry = entries("[x]\nflag = 1\n").next().unwrap().unwrap();
        assert_eq!(entry.bool(), Err(ParseError::InvalidValue { line: 2 }));
    }
}
