//! Offset tokens of the form `<prefix><id>`, e.g. `order_417`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Logical streams with their own ID space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    Orders,
    OrderItems,
    Customers,
}

impl StreamKind {
    pub const fn offset_prefix(self) -> &'static str {
        match self {
            StreamKind::Orders => "order_",
            StreamKind::OrderItems => "item_",
            StreamKind::Customers => "customer_",
        }
    }

    pub fn token(self, id: u64) -> OffsetToken {
        OffsetToken { kind: self, id }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Orders => f.write_str("orders"),
            StreamKind::OrderItems => f.write_str("order items"),
            StreamKind::Customers => f.write_str("customers"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetToken {
    pub kind: StreamKind,
    pub id: u64,
}

impl OffsetToken {
    /// Parses a token produced for `kind`.
    pub fn parse(kind: StreamKind, raw: &str) -> Result<Self, CoreError> {
        let prefix = kind.offset_prefix();
        let suffix = raw.strip_prefix(prefix).ok_or_else(|| CoreError::OffsetPrefix {
            token: raw.to_string(),
            prefix,
        })?;
        let id = suffix.parse::<u64>().map_err(|source| CoreError::OffsetValue {
            token: raw.to_string(),
            source,
        })?;
        Ok(Self { kind, id })
    }

    /// Reads a channel's latest committed token.
    ///
    /// `Ok(None)` means the channel has never committed: the token is absent,
    /// empty, or the literal `NULL` some clients report for fresh channels.
    pub fn parse_committed(kind: StreamKind, raw: Option<&str>) -> Result<Option<Self>, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("NULL") => Ok(None),
            Some(token) => Self::parse(kind, token).map(Some),
        }
    }
}

impl fmt::Display for OffsetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.offset_prefix(), self.id)
    }
}
