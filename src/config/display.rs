//! Display toggles and timeline scope
//!
//! The three display toggles change how events are rendered; the timeline
//! scope only selects which endpoints the client talks to.

use serde::Deserialize;

/// Rendering toggles consumed by the renderer and the terminal surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Drop all colors (bold is kept)
    pub monochrome: bool,
    /// Show private and direct posts instead of hiding them
    pub show_sensitive: bool,
    /// Use emoji icons; plain-text fallbacks when false
    pub icons: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            monochrome: false,
            show_sensitive: false,
            icons: true,
        }
    }
}

impl DisplayOptions {
    /// Marker printed before a media attachment URL
    pub fn link_marker(&self) -> &'static str {
        if self.icons {
            "🔗"
        } else {
            "<LINK>"
        }
    }
}

/// Which timeline to load and stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimelineScope {
    /// Home timeline and user stream (default)
    #[default]
    Home,
    /// Local public timeline
    Local,
    /// Federated public timeline
    Public,
}

impl TimelineScope {
    /// Parse scope string from config or env
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "home" => Some(Self::Home),
            "local" => Some(Self::Local),
            "public" => Some(Self::Public),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Local => "local",
            Self::Public => "public",
        }
    }

    /// Path under `api/v1/streaming/`
    pub fn stream_path(&self) -> &'static str {
        match self {
            Self::Home => "user",
            Self::Local => "public/local",
            Self::Public => "public",
        }
    }

    /// Path and query under `api/v1/timelines/`
    pub fn timeline_path(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Local => "public?local=true",
            Self::Public => "public?local=false",
        }
    }
}
