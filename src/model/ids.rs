use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::ACTION_ID_KIND;
use crate::constants::ISSUE_ID_KIND;
use crate::CallerError;
use crate::Result;

/// Identifier of a configured safety source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SourceId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Composite identity of one issue in one report.
///
/// Two ids are equal only if every component matches, so a report pushed with
/// a new `session` yields fresh ids for all of its issues even when the
/// source reuses issue keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueId {
    pub source_id: SourceId,
    pub user_id: UserId,
    pub issue_key: String,
    pub issue_type_id: String,
    pub session: String,
}

impl IssueId {
    pub fn new(
        source_id: SourceId,
        user_id: UserId,
        issue_key: impl Into<String>,
        issue_type_id: impl Into<String>,
        session: impl Into<String>,
    ) -> Self {
        Self {
            source_id,
            user_id,
            issue_key: issue_key.into(),
            issue_type_id: issue_type_id.into(),
            session: session.into(),
        }
    }

    /// Opaque, transport safe form handed to callers.
    ///
    /// Infallible: every component is a string or an integer, which the id
    /// codec always serializes.
    pub fn encode(&self) -> String {
        encode_component(self)
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let id: IssueId = decode_component(encoded, ISSUE_ID_KIND)?;
        id.validate(ISSUE_ID_KIND)?;
        Ok(id)
    }

    fn validate(
        &self,
        kind: &'static str,
    ) -> Result<()> {
        if self.source_id.is_empty() || self.issue_key.is_empty() {
            return Err(CallerError::MalformedId {
                kind,
                reason: "source id and issue key must not be empty".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Display for IssueId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Identity of one action of one issue: the owning [`IssueId`] plus the
/// source supplied action key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId {
    pub issue_id: IssueId,
    pub action_key: String,
}

impl ActionId {
    pub fn new(
        issue_id: IssueId,
        action_key: impl Into<String>,
    ) -> Self {
        Self {
            issue_id,
            action_key: action_key.into(),
        }
    }

    pub fn encode(&self) -> String {
        encode_component(self)
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let id: ActionId = decode_component(encoded, ACTION_ID_KIND)?;
        id.issue_id.validate(ACTION_ID_KIND)?;
        if id.action_key.is_empty() {
            return Err(CallerError::MalformedId {
                kind: ACTION_ID_KIND,
                reason: "action key must not be empty".into(),
            }
            .into());
        }
        Ok(id)
    }
}

impl fmt::Display for ActionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Fixed-width integers and no trailing bytes, so every id has exactly one
/// accepted encoding.
fn id_codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

fn encode_component<T: Serialize>(value: &T) -> String {
    // Only fails for unsupported serde shapes or a size limit, neither of
    // which applies to ids built from strings and a u32
    let bytes = id_codec()
        .serialize(value)
        .expect("id components are plain strings and integers");
    URL_SAFE_NO_PAD.encode(bytes)
}

fn decode_component<T: DeserializeOwned>(
    encoded: &str,
    kind: &'static str,
) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|e| CallerError::MalformedId {
        kind,
        reason: e.to_string(),
    })?;
    id_codec().deserialize(&bytes).map_err(|e| {
        CallerError::MalformedId {
            kind,
            reason: e.to_string(),
        }
        .into()
    })
}
