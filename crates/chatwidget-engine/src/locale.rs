//! Localized user-visible strings.

use serde::{Deserialize, Serialize};

/// Supported widget locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Persian (right-to-left).
    #[default]
    Fa,
    /// English.
    En,
}

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Value for the HTML `dir` attribute.
    pub fn as_attr(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl Locale {
    /// Parse a locale code such as `fa` or `en-US`.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "fa" => Some(Locale::Fa),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// Text direction for this locale.
    pub fn direction(self) -> Direction {
        match self {
            Locale::Fa => Direction::Rtl,
            Locale::En => Direction::Ltr,
        }
    }

    /// Built-in string table.
    pub fn strings(self) -> Strings {
        match self {
            Locale::Fa => Strings {
                greeting: "سلام! من دستیار هوشمند شما برای محصولات الکترونیکی هستم. سوال خود را بپرسید."
                    .into(),
                typing: "در حال نوشتن...".into(),
                server_error: "متاسفانه خطایی در سرور رخ داد. لطفا دوباره تلاش کنید.".into(),
                connection_error: "خطا در برقراری ارتباط با سرور. آیا سرور در حال اجراست؟".into(),
            },
            Locale::En => Strings {
                greeting: "Hi! I'm your electronics shopping assistant. Ask me anything.".into(),
                typing: "Typing...".into(),
                server_error: "Sorry, something went wrong on the server. Please try again."
                    .into(),
                connection_error: "Could not reach the server. Is it running?".into(),
            },
        }
    }
}

/// Fixed user-visible strings of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strings {
    /// Greeting shown once on load.
    pub greeting: String,
    /// Label of the typing indicator.
    pub typing: String,
    /// Shown when the server answers with a non-success status.
    pub server_error: String,
    /// Shown when the request could not complete.
    pub connection_error: String,
}

impl Default for Strings {
    fn default() -> Self {
        Locale::default().strings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_persian() {
        assert_eq!(Locale::default(), Locale::Fa);
        assert_eq!(Locale::default().direction(), Direction::Rtl);
        assert_eq!(Strings::default().typing, "در حال نوشتن...");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Locale::from_code("en-US"), Some(Locale::En));
        assert_eq!(Locale::from_code("FA"), Some(Locale::Fa));
        assert_eq!(Locale::from_code("de"), None);
    }

    #[test]
    fn test_error_strings_are_distinct() {
        for locale in [Locale::Fa, Locale::En] {
            let s = locale.strings();
            assert_ne!(s.server_error, s.connection_error);
            assert!(!s.greeting.is_empty());
        }
    }
}
