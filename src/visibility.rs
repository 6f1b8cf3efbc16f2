// Post visibility levels
//
// Used by the renderer (badge and hide-sensitive filter) and by compose
// (the `visibility` form field). Servers may send levels this client does
// not know (e.g. "limited"); those are shown with the direct badge but are
// not hidden.

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
    Direct,
    /// Any level not listed above. Never posted.
    #[serde(skip)]
    Other,
}

impl Visibility {
    pub fn parse(s: &str) -> Self {
        match s {
            "public" => Self::Public,
            "unlisted" => Self::Unlisted,
            "private" => Self::Private,
            "direct" => Self::Direct,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
            Self::Direct => "direct",
            Self::Other => "other",
        }
    }

    /// Followers-only and direct posts are hidden unless show-sensitive is on
    pub fn is_sensitive(&self) -> bool {
        matches!(self, Self::Private | Self::Direct)
    }

    /// Inline badge shown after the author line, `None` for public posts
    pub fn badge(&self, icons: bool) -> Option<&'static str> {
        let badge = match (self, icons) {
            (Self::Public, _) => return None,
            (Self::Unlisted, true) => "🔓",
            (Self::Private, true) => "🔒",
            (Self::Direct | Self::Other, true) => "✉",
            (Self::Unlisted, false) => "<UNLIST>",
            (Self::Private, false) => "<PRIVATE>",
            (Self::Direct | Self::Other, false) => "<!DIRECT!>",
        };
        Some(badge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_values() {
        for v in [
            Visibility::Public,
            Visibility::Unlisted,
            Visibility::Private,
            Visibility::Direct,
        ] {
            assert_eq!(Visibility::parse(v.as_str()), v);
        }
        assert_eq!(Visibility::parse("limited"), Visibility::Other);
    }

    #[test]
    fn only_private_and_direct_are_sensitive() {
        assert!(!Visibility::Public.is_sensitive());
        assert!(!Visibility::Unlisted.is_sensitive());
        assert!(Visibility::Private.is_sensitive());
        assert!(Visibility::Direct.is_sensitive());
        assert!(!Visibility::Other.is_sensitive());
    }

    #[test]
    fn badges_have_plain_text_fallbacks() {
        assert_eq!(Visibility::Public.badge(true), None);
        assert_eq!(Visibility::Unlisted.badge(false), Some("<UNLIST>"));
        assert_eq!(Visibility::Private.badge(false), Some("<PRIVATE>"));
        assert_eq!(Visibility::Direct.badge(false), Some("<!DIRECT!>"));
        assert_eq!(Visibility::Direct.badge(true), Some("✉"));
        assert_eq!(Visibility::Other.badge(false), Some("<!DIRECT!>"));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Visibility::Unlisted).unwrap();
        assert_eq!(json, "\"unlisted\"");
    }
}
