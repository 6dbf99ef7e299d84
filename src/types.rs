//! Domain types returned to and accepted from callers.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub type ZoneId = i64;
pub type RecordId = i64;
pub type SubnetId = i64;
pub type InterfaceId = i64;
pub type LocationId = i64;
pub type UserId = i64;
pub type UserAllowId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
}

/// The DHCP subnet a CIDR resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetIdentity {
    pub subnet_id: SubnetId,
    pub zone_id: ZoneId,
    pub vlan_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub ip: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCreateRequest {
    pub subnet_id: SubnetId,
    pub zone_id: ZoneId,
    pub ip: String,
    pub name: String,
    pub location_id: LocationId,
}

/// DNS record types and their numeric codes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    A,
    /// A record with an automatically maintained PTR.
    APtr,
    Cname,
    Mx,
    Ns,
    Txt,
    Srv,
    Ds,
    Sshfp,
    Tlsa,
    Caa,
}

impl RecordType {
    pub const ALL: [RecordType; 11] = [
        RecordType::A,
        RecordType::APtr,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Txt,
        RecordType::Srv,
        RecordType::Ds,
        RecordType::Sshfp,
        RecordType::Tlsa,
        RecordType::Caa,
    ];

    pub fn code(self) -> i64 {
        match self {
            RecordType::A => 0,
            RecordType::APtr => 1,
            RecordType::Cname => 2,
            RecordType::Mx => 3,
            RecordType::Ns => 4,
            RecordType::Txt => 5,
            RecordType::Srv => 6,
            RecordType::Ds => 7,
            RecordType::Sshfp => 8,
            RecordType::Tlsa => 9,
            RecordType::Caa => 10,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::APtr => "A+PTR",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
            RecordType::Ds => "DS",
            RecordType::Sshfp => "SSHFP",
            RecordType::Tlsa => "TLSA",
            RecordType::Caa => "CAA",
        }
    }
}

impl TryFrom<i64> for RecordType {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self, Error> {
        Self::from_code(code).ok_or_else(|| Error::unknown_enum("record type", code))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
    Deleted,
}

impl RecordStatus {
    pub fn code(self) -> i64 {
        match self {
            RecordStatus::Active => 0,
            RecordStatus::Inactive => 1,
            RecordStatus::Deleted => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(RecordStatus::Active),
            1 => Some(RecordStatus::Inactive),
            2 => Some(RecordStatus::Deleted),
            _ => None,
        }
    }
}

impl TryFrom<i64> for RecordStatus {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self, Error> {
        Self::from_code(code).ok_or_else(|| Error::unknown_enum("record status", code))
    }
}

/// A DNS resource record as reported by the service.
///
/// `status` is `None` when the listing endpoint sent no usable value.
/// Rows synthesized by the merged view (inherited SOA nameservers) carry
/// `id == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub record_type: RecordType,
    pub name: String,
    pub description: String,
    pub destination: String,
    pub ttl: i64,
    pub status: Option<RecordStatus>,
    pub location_id: LocationId,
    /// Logically deleted; the merged view keeps such rows.
    pub deleted: bool,
}

/// Fields sent when creating or updating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInput {
    pub record_type: RecordType,
    pub name: String,
    pub description: String,
    pub destination: String,
    pub ttl: i64,
    pub status: RecordStatus,
    pub location_id: LocationId,
}

impl RecordInput {
    pub fn new(
        record_type: RecordType,
        name: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            name: name.into(),
            description: String::new(),
            destination: destination.into(),
            ttl: 0,
            status: RecordStatus::Active,
            location_id: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthGroup {
    SuperAdmin,
    User,
}

impl AuthGroup {
    /// Numeric value used in form bodies.
    pub fn code(self) -> i64 {
        match self {
            AuthGroup::SuperAdmin => 1,
            AuthGroup::User => 2,
        }
    }

    /// Name used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthGroup::SuperAdmin => "SuperAdmin",
            AuthGroup::User => "User",
        }
    }
}

impl FromStr for AuthGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "SuperAdmin" => Ok(AuthGroup::SuperAdmin),
            "User" => Ok(AuthGroup::User),
            other => Err(Error::unknown_enum("auth group", other)),
        }
    }
}

impl fmt::Display for AuthGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: i64,
    pub name: String,
    #[serde(rename = "groupname")]
    pub group_name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub description: String,
    pub modified_by: String,
    pub modified_date: DateTime<Utc>,
    pub password_changed_date: DateTime<Utc>,
    pub auth_group: AuthGroup,
    pub groups: Vec<UserGroup>,
}

/// Input for `create_user`. An empty `allowed_ids` means "no restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub description: String,
    pub force_password_change: bool,
    pub auth_group: AuthGroup,
    pub allowed_ids: Vec<UserAllowId>,
}

/// Partial update for `update_user`; `None` fields are left unchanged
/// server-side and are not sent at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub description: Option<String>,
    pub auth_group: Option<AuthGroup>,
    pub allowed_ids: Option<Vec<UserAllowId>>,
}

impl UserUpdate {
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}
