//! Contact model and its legacy wire format.
//!
//! The remote store speaks abbreviated column names (`fname`, `pnumber`,
//! `curCloseness`, ...); the serde attributes below are the only place that
//! mapping lives.

pub mod store;

pub use store::{ContactStore, ImportSummary};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel for unset interaction targets.
pub const UNSET: i64 = -1;

fn default_unset() -> i64 {
    UNSET
}

fn default_active_flag() -> i64 {
    1
}

/// Relationship intimacy on a fixed six-point scale.
///
/// Encoded on the wire as its index `0..=5`; any other index fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Closeness {
    #[default]
    Undefined,
    Stranger,
    Acquaintances,
    Friends,
    CloseFriends,
    BestFriends,
}

impl Closeness {
    pub const ALL: [Closeness; 6] = [
        Closeness::Undefined,
        Closeness::Stranger,
        Closeness::Acquaintances,
        Closeness::Friends,
        Closeness::CloseFriends,
        Closeness::BestFriends,
    ];

    pub fn index(self) -> i64 {
        self as i64
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(self) -> &'static str {
        match self {
            Closeness::Undefined => "Undefined",
            Closeness::Stranger => "Stranger",
            Closeness::Acquaintances => "Acquaintances",
            Closeness::Friends => "Friends",
            Closeness::CloseFriends => "Close Friends",
            Closeness::BestFriends => "Best Friends",
        }
    }
}

impl TryFrom<i64> for Closeness {
    type Error = String;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or_else(|| format!("closeness index {index} outside 0..=5"))
    }
}

impl From<Closeness> for i64 {
    fn from(c: Closeness) -> Self {
        c.index()
    }
}

impl fmt::Display for Closeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the index or the label, case-insensitively
/// (`"3"`, `"friends"`, `"close friends"`, `"close-friends"`).
impl FromStr for Closeness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<i64>() {
            return Self::try_from(index);
        }
        let wanted: String = trimmed
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|c| {
                c.label()
                    .chars()
                    .filter(|ch| ch.is_alphanumeric())
                    .flat_map(char::to_lowercase)
                    .eq(wanted.chars())
            })
            .ok_or_else(|| format!("unknown closeness '{s}'"))
    }
}

/// Normalize user-entered phone text to its digits.
///
/// Spaces, `-`, `(`, `)`, `.` and a leading `+` are dropped. Anything else
/// that is not a digit, an empty result, or an overflowing number yields `0`.
pub fn parse_phone_number(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let mut digits = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '(' | ')' | '.' => {}
            _ => return 0,
        }
    }
    digits.parse().unwrap_or(0)
}

/// A tracked person, as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Assigned by the remote store; `None` until created.
    #[serde(rename = "contactid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "fname")]
    pub first_name: String,
    #[serde(rename = "lname")]
    pub last_name: String,
    #[serde(rename = "pnumber", default)]
    pub phone_number: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "curCloseness", default)]
    pub current_closeness: Closeness,
    #[serde(rename = "desiredCloseness", default)]
    pub desired_closeness: Closeness,
    #[serde(rename = "minIFCount", default = "default_unset")]
    pub min_interaction_count: i64,
    #[serde(rename = "minIFTime", default = "default_unset")]
    pub min_interaction_time: i64,
    #[serde(rename = "descript", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Soft-delete marker; carried through untouched.
    #[serde(rename = "activeflag", default = "default_active_flag")]
    pub active_flag: i64,
}

impl Contact {
    /// A not-yet-persisted contact with every optional field unset.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: 0,
            email: None,
            current_closeness: Closeness::Undefined,
            desired_closeness: Closeness::Undefined,
            min_interaction_count: UNSET,
            min_interaction_time: UNSET,
            description: None,
            label: None,
            location: None,
            active_flag: default_active_flag(),
        }
    }

    pub fn display_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            (first, "") => first.to_string(),
            ("", last) => last.to_string(),
            (first, last) => format!("{first} {last}"),
        }
    }

    /// Whether closeness has a gap the user wants to close.
    pub fn wants_closer(&self) -> bool {
        self.desired_closeness > self.current_closeness
    }
}

/// A contact picked from the device address book.
///
/// Only the name is guaranteed; phone and email may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceContact {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<&DeviceContact> for Contact {
    fn from(device: &DeviceContact) -> Self {
        let mut contact = Contact::new(device.first_name.trim(), device.last_name.trim());
        contact.phone_number = device.phone.as_deref().map_or(0, parse_phone_number);
        contact.email = device
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        contact
    }
}
