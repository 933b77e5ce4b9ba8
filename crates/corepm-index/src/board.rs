//! Boards bundled in a platform release's manifest.

use std::fmt;

use serde::Serialize;

/// A USB vendor/product identifier pair, stored as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UsbId {
    /// Vendor id (4 hex digits).
    pub vid: String,
    /// Product id (4 hex digits).
    pub pid: String,
}

impl UsbId {
    /// Build an id pair, normalising both halves.
    ///
    /// Accepts the `0x2341` spelling used by board definitions as well as
    /// plain `2341`. Returns `None` unless both halves are exactly four hex
    /// digits.
    pub fn new(vid: &str, pid: &str) -> Option<Self> {
        Some(UsbId {
            vid: normalize_hex(vid)?,
            pid: normalize_hex(pid)?,
        })
    }

    /// Parse a `vvvv:pppp` pair.
    pub fn parse(pair: &str) -> Option<Self> {
        let (vid, pid) = pair.split_once(':')?;
        UsbId::new(vid, pid)
    }
}

fn normalize_hex(value: &str) -> Option<String> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(digits.to_ascii_lowercase())
    } else {
        None
    }
}

impl fmt::Display for UsbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.vid, self.pid)
    }
}

/// A hardware product described by a platform release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Display name, e.g. "Arduino MKRZero".
    pub name: String,
    /// USB identifiers the board enumerates with.
    pub usb_ids: Vec<UsbId>,
}

impl Board {
    /// Create a board with no USB identifiers.
    pub fn new(name: impl Into<String>) -> Self {
        Board {
            name: name.into(),
            usb_ids: Vec::new(),
        }
    }

    /// Add a USB identifier.
    pub fn with_usb_id(mut self, id: UsbId) -> Self {
        self.usb_ids.push(id);
        self
    }

    /// Whether the board advertises the given `vvvv:pppp` string.
    ///
    /// The comparison is literal against the normalised pair, so anything
    /// that is not a well-formed lowercase pair never matches.
    pub fn has_usb_id(&self, pair: &str) -> bool {
        self.usb_ids.iter().any(|id| id.to_string() == pair)
    }

    /// Whether the board advertises exactly this vendor/product pair.
    pub fn provides(&self, vid: &str, pid: &str) -> bool {
        self.usb_ids.iter().any(|id| id.vid == vid && id.pid == pid)
    }
}
