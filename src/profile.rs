//! Backend profiles and text direction
//!
//! A profile binds a display name (a hospital or language the user picks)
//! to the backend routing identifier sent with every request and to the
//! direction text is laid out in. Profiles are static configuration: the
//! [`ProfileCatalog`] is built once from the loaded config and looked up by
//! display name.

use crate::error::{ChatlineError, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text direction policy of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left-to-right text, rendered as-is
    #[default]
    Ltr,
    /// Right-to-left text, rendered right-aligned inside RTL isolates
    Rtl,
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ltr => write!(f, "LTR"),
            Self::Rtl => write!(f, "RTL"),
        }
    }
}

impl TextDirection {
    /// Parse a text direction from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use chatline::profile::TextDirection;
    ///
    /// assert_eq!(TextDirection::parse_str("rtl").unwrap(), TextDirection::Rtl);
    /// assert!(TextDirection::parse_str("up").is_err());
    /// ```
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "ltr" | "left-to-right" => Ok(Self::Ltr),
            "rtl" | "right-to-left" => Ok(Self::Rtl),
            other => Err(format!("Unknown text direction: {}", other)),
        }
    }

    /// Returns true for right-to-left profiles
    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Rtl)
    }
}

/// A named configuration binding a backend identifier and a text direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    display_name: String,
    backend_id: String,
    text_direction: TextDirection,
    placeholder: String,
}

impl Profile {
    /// Create a new profile
    ///
    /// # Examples
    ///
    /// ```
    /// use chatline::profile::{Profile, TextDirection};
    ///
    /// let profile = Profile::new("Arabic", "id-ar", TextDirection::Rtl);
    /// assert_eq!(profile.display_name(), "Arabic");
    /// assert!(profile.text_direction().is_rtl());
    /// ```
    pub fn new(
        display_name: impl Into<String>,
        backend_id: impl Into<String>,
        text_direction: TextDirection,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            backend_id: backend_id.into(),
            text_direction,
            placeholder: default_placeholder(text_direction).to_string(),
        }
    }

    /// Replace the input hint shown by the presentation layer
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn backend_id(&self) -> &str {
        &self.backend_id
    }

    pub fn text_direction(&self) -> TextDirection {
        self.text_direction
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Colored tag for prompts, e.g. `[English]`
    pub fn colored_tag(&self) -> String {
        match self.text_direction {
            TextDirection::Ltr => format!("[{}]", self.display_name.cyan()),
            TextDirection::Rtl => format!("[{}]", self.display_name.magenta()),
        }
    }
}

/// Input hint used when a profile does not configure one
pub fn default_placeholder(direction: TextDirection) -> &'static str {
    match direction {
        TextDirection::Ltr => "Ask a query...",
        TextDirection::Rtl => "أدخل سؤالك هنا...",
    }
}

/// The closed, ordered set of selectable profiles
///
/// The first entry is the default profile of a new session.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: Vec<Profile>,
}

impl ProfileCatalog {
    /// Build a catalog from an ordered list of profiles
    ///
    /// # Errors
    ///
    /// Returns [`ChatlineError::Config`] if the list is empty, a display name
    /// is blank or repeated, or a backend identifier is blank.
    pub fn new(profiles: Vec<Profile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(
                ChatlineError::Config("At least one profile must be configured".to_string())
                    .into(),
            );
        }

        for (idx, profile) in profiles.iter().enumerate() {
            if profile.display_name.trim().is_empty() {
                return Err(ChatlineError::Config(format!(
                    "Profile #{} has an empty display name",
                    idx + 1
                ))
                .into());
            }
            if profile.backend_id.trim().is_empty() {
                return Err(ChatlineError::Config(format!(
                    "Missing backend identifier for profile '{}'",
                    profile.display_name
                ))
                .into());
            }
            if profiles[..idx]
                .iter()
                .any(|p| p.display_name == profile.display_name)
            {
                return Err(ChatlineError::Config(format!(
                    "Duplicate profile name: {}",
                    profile.display_name
                ))
                .into());
            }
        }

        Ok(Self { profiles })
    }

    /// Look up a profile by its exact display name
    pub fn get(&self, display_name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.display_name == display_name)
    }

    /// Look up a profile ignoring ASCII case, preferring an exact match
    pub fn find(&self, display_name: &str) -> Option<&Profile> {
        let wanted = display_name.trim();
        self.get(wanted).or_else(|| {
            self.profiles
                .iter()
                .find(|p| p.display_name.eq_ignore_ascii_case(wanted))
        })
    }

    /// Look up a profile or fail with a configuration error naming the
    /// available choices
    pub fn require(&self, display_name: &str) -> Result<&Profile> {
        self.find(display_name).ok_or_else(|| {
            ChatlineError::Config(format!(
                "Unknown profile: {}. Must be one of: {}",
                display_name,
                self.names().join(", ")
            ))
            .into()
        })
    }

    pub fn default_profile(&self) -> &Profile {
        // `new` guarantees at least one entry
        &self.profiles[0]
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.display_name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
