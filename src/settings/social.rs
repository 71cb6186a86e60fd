//! Social account providers.

use std::fmt;
use std::str::FromStr;

use crate::errors::StoreError;
use crate::models::SocialAccountPatch;

/// Providers a user can link to their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    Github,
    Linkedin,
    Google,
}

impl SocialPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Github => "github",
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Google => "google",
        }
    }

    /// Public profile page for `username`. Google accounts have none.
    pub fn profile_url(&self, username: &str) -> Option<String> {
        match self {
            SocialPlatform::Github => Some(format!("https://github.com/{}", username)),
            SocialPlatform::Linkedin => Some(format!("https://linkedin.com/in/{}", username)),
            SocialPlatform::Google => None,
        }
    }

    /// Patch recording a successful connection as `username`.
    pub fn connected_patch(&self, username: &str) -> SocialAccountPatch {
        match self {
            SocialPlatform::Google => SocialAccountPatch {
                connected: Some(true),
                email: Some(username.to_string()),
                ..Default::default()
            },
            _ => SocialAccountPatch {
                connected: Some(true),
                username: Some(username.to_string()),
                url: self.profile_url(username),
                ..Default::default()
            },
        }
    }

    /// Patch blanking the account after a disconnect.
    pub fn disconnected_patch(&self) -> SocialAccountPatch {
        match self {
            SocialPlatform::Google => SocialAccountPatch {
                connected: Some(false),
                email: Some(String::new()),
                ..Default::default()
            },
            _ => SocialAccountPatch {
                connected: Some(false),
                username: Some(String::new()),
                url: Some(String::new()),
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialPlatform {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(SocialPlatform::Github),
            "linkedin" => Ok(SocialPlatform::Linkedin),
            "google" => Ok(SocialPlatform::Google),
            other => Err(StoreError::UnknownPlatform(other.to_string())),
        }
    }
}
