use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Separator between permission code segments.
pub const SEGMENT_SEPARATOR: char = ':';

/// Segment matching any single segment, or the whole rest when trailing.
pub const WILDCARD: &str = "*";

/// Grant held by administrators: allows every code.
pub const ALL_PERMISSIONS: &str = "*:*:*";

/// Permission codes granted to the current user.
///
/// Codes are colon separated (`system:menu:edit`). A grant allows a code when
/// it equals the code, when it is a segment-aligned prefix of it
/// (`system:menu` allows `system:menu:edit`, `system:me` does not), or when
/// its `*` segments stand in for the differing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PermissionSet {
    grants: Vec<String>,
}

impl PermissionSet {
    /// Build a set, dropping blank grants.
    pub fn new<I, S>(grants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let grants = grants
            .into_iter()
            .map(Into::into)
            .map(|grant: String| grant.trim().to_owned())
            .filter(|grant| !grant.is_empty())
            .collect();
        Self { grants }
    }

    /// Parse a JSON array of grant strings.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn grants(&self) -> &[String] {
        &self.grants
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Whether any grant allows `code`. Blank codes are always allowed.
    pub fn allows(&self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return true;
        }
        self.grants.iter().any(|grant| grant_allows(grant, code))
    }

    pub fn allows_any<'a>(
        &self,
        codes: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        codes.into_iter().any(|code| self.allows(code))
    }

    pub fn allows_all<'a>(
        &self,
        codes: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        codes.into_iter().all(|code| self.allows(code))
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(grants: Vec<String>) -> Self {
        Self::new(grants)
    }
}

impl From<PermissionSet> for Vec<String> {
    fn from(set: PermissionSet) -> Self {
        set.grants
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

fn grant_allows(grant: &str, code: &str) -> bool {
    if grant == ALL_PERMISSIONS {
        return true;
    }

    let mut grant_segments = grant.split(SEGMENT_SEPARATOR).peekable();
    let mut code_segments = code.split(SEGMENT_SEPARATOR);

    while let Some(expected) = grant_segments.next() {
        let last = grant_segments.peek().is_none();
        match code_segments.next() {
            Some(_) if expected == WILDCARD && last => return true,
            Some(actual) if expected == WILDCARD || expected == actual => {},
            Some(_) => return false,
            // Grant is more specific than the code.
            None => return false,
        }
    }

    true
}
