//! Channel identifier resolution.
//!
//! Users paste whatever they have: a full stream URL copied from the
//! browser, or just the channel name. [`resolve`] accepts both and
//! produces a [`ChannelHandle`], the only form the rest of the system
//! ever sees.

use std::fmt;

use serde::Serialize;

use crate::ProtocolError;

/// The streaming site whose channel URLs we recognize.
const CHANNEL_DOMAIN: &str = "twitch.tv/";

/// Canonical channel name: lowercase ASCII word characters only.
///
/// The inner string is private so a handle can only come out of
/// [`resolve`] and always satisfies `^\w+$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChannelHandle(String);

impl ChannelHandle {
    /// Returns the canonical name, e.g. `"ninja"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name with its first letter uppercased, e.g. `"Ninja"`.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes a channel URL or bare name into a [`ChannelHandle`].
///
/// Accepted shapes (case-insensitive, surrounding whitespace ignored):
///
/// ```text
/// [http(s)://][www.]twitch.tv/<name>[/]
/// <name>
/// ```
///
/// where `<name>` is one or more ASCII letters, digits or underscores.
///
/// ```rust
/// use chatdraw_protocol::resolve;
///
/// assert_eq!(resolve("https://twitch.tv/Ninja/").unwrap().as_str(), "ninja");
/// assert_eq!(resolve("shroud").unwrap().as_str(), "shroud");
/// assert!(resolve("twitch.tv/a b").is_err());
/// ```
///
/// # Errors
/// Returns [`ProtocolError::ChannelNotFound`] for any other input.
pub fn resolve(raw: &str) -> Result<ChannelHandle, ProtocolError> {
    let input = raw.trim();
    let name = url_channel(input)
        .or_else(|| is_word(input).then_some(input))
        .ok_or_else(|| ProtocolError::ChannelNotFound(raw.to_string()))?;
    Ok(ChannelHandle(name.to_ascii_lowercase()))
}

/// Extracts `<name>` from `[http(s)://][www.]twitch.tv/<name>[/]`.
fn url_channel(input: &str) -> Option<&str> {
    let mut rest = input;
    for prefix in ["https://", "http://"] {
        if let Some(stripped) = strip_prefix_ignore_case(rest, prefix) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = strip_prefix_ignore_case(rest, "www.") {
        rest = stripped;
    }
    let rest = strip_prefix_ignore_case(rest, CHANNEL_DOMAIN)?;
    let name = rest.strip_suffix('/').unwrap_or(rest);
    is_word(name).then_some(name)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// `^\w+$` over ASCII.
pub(crate) fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> String {
        resolve(raw).expect("should resolve").as_str().to_string()
    }

    #[test]
    fn test_resolve_full_url_with_trailing_slash_lowercases() {
        assert_eq!(name("https://twitch.tv/Ninja/"), "ninja");
    }

    #[test]
    fn test_resolve_accepts_every_url_shape() {
        for raw in [
            "twitch.tv/shroud",
            "twitch.tv/shroud/",
            "www.twitch.tv/shroud",
            "http://www.twitch.tv/shroud",
            "https://www.twitch.tv/shroud/",
            "HTTPS://WWW.TWITCH.TV/Shroud",
        ] {
            assert_eq!(name(raw), "shroud", "input: {raw}");
        }
    }

    #[test]
    fn test_resolve_bare_name_lowercases() {
        assert_eq!(name("xQc_42"), "xqc_42");
    }

    #[test]
    fn test_resolve_trims_surrounding_whitespace() {
        assert_eq!(name("  ninja \n"), "ninja");
    }

    #[test]
    fn test_resolve_rejects_other_shapes() {
        for raw in [
            "",
            "   ",
            "two words",
            "twitch.tv/",
            "twitch.tv/ninja/videos",
            "twitch.tv/ninja?tab=about",
            "https://youtube.com/ninja",
            "ftp://twitch.tv/ninja",
            "ninja!",
            "#ninja",
            "ниндзя",
        ] {
            assert_eq!(
                resolve(raw),
                Err(ProtocolError::ChannelNotFound(raw.to_string())),
                "input: {raw:?}"
            );
        }
    }

    #[test]
    fn test_display_name_capitalizes_first_letter() {
        assert_eq!(resolve("ninja").unwrap().display_name(), "Ninja");
        assert_eq!(resolve("_x").unwrap().display_name(), "_x");
    }

    #[test]
    fn test_channel_handle_serializes_as_plain_string() {
        let handle = resolve("Ninja").unwrap();
        assert_eq!(serde_json::to_string(&handle).unwrap(), "\"ninja\"");
    }
}
