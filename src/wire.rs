//! Response shapes as the service actually sends them, and their
//! normalization into the types in [`crate::types`].
//!
//! The service is loose with JSON types: the same integer field may be a
//! number on one endpoint, a numeric string on another and `null` on a
//! synthesized row. Everything here decodes defensively and leaves the
//! strictness decisions to the `TryFrom` conversions.
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::types::{
    InterfaceInfo, Record, RecordInput, RecordStatus, RecordType, SubnetIdentity, UserAccount,
    UserGroup, Zone,
};

/// `YYYY-MM-DD HH:MM:SS`, no offset; interpreted as UTC.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// 2^63; `i64::MAX as f64` rounds up to this, so the upper bound is exclusive.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Loose {
    fn to_i64(&self) -> Option<i64> {
        match self {
            Loose::Int(v) => Some(*v),
            Loose::Float(v) if v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(v) => {
                Some(*v as i64)
            }
            Loose::Float(_) => None,
            Loose::Bool(b) => Some(i64::from(*b)),
            Loose::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Integer that may arrive as a number, a numeric string, `""` or `null`.
/// Missing values become 0; a non-numeric string is an error.
fn loose_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Loose::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(v) => v
            .to_i64()
            .ok_or_else(|| D::Error::custom("expected an integer or numeric string")),
    }
}

/// Like [`loose_i64`] but anything unusable becomes `None` instead of failing.
fn loose_opt_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?.and_then(|v| v.to_i64()))
}

/// `1`, `"1"` and `true` are set; `0`, `""`, `null` and absence are not.
fn loose_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_opt_i64(deserializer)?.is_some_and(|v| v != 0))
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|err| Error::decode(field, err))
}

pub(crate) fn decode<T>(what: &'static str, body: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(body).map_err(|err| Error::decode(what, err))
}

// ---- zones ----

#[derive(Debug, Deserialize)]
pub(crate) struct ZoneRow {
    #[serde(deserialize_with = "loose_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

impl From<ZoneRow> for Zone {
    fn from(row: ZoneRow) -> Self {
        Zone {
            id: row.id,
            name: row.name,
        }
    }
}

// ---- records ----

/// Row from `/=/record` and `/=/record_merged`.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordRow {
    #[serde(default, deserialize_with = "loose_i64")]
    pub id: i64,
    #[serde(rename = "type", deserialize_with = "loose_i64")]
    pub record_type: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub destination: String,
    #[serde(default, deserialize_with = "loose_i64")]
    pub ttl: i64,
    #[serde(default, deserialize_with = "loose_opt_i64")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub location_id: i64,
    #[serde(default, deserialize_with = "loose_flag")]
    pub deleted: bool,
}

impl RecordRow {
    /// Whether this row is the one `input` just created.
    pub fn matches_created(&self, input: &RecordInput) -> bool {
        self.record_type == input.record_type.code()
            && self.name == input.name
            && self.destination == input.destination
    }

    pub fn is(&self, name: &str, record_type: RecordType) -> bool {
        self.record_type == record_type.code() && self.name == name
    }
}

impl TryFrom<RecordRow> for Record {
    type Error = Error;

    fn try_from(row: RecordRow) -> Result<Self> {
        let status = row.status.and_then(RecordStatus::from_code);
        Ok(Record {
            id: row.id,
            record_type: RecordType::try_from(row.record_type)?,
            name: row.name,
            description: row.description,
            destination: row.destination,
            ttl: row.ttl,
            deleted: row.deleted || status == Some(RecordStatus::Deleted),
            status,
            location_id: row.location_id,
        })
    }
}

/// Single record from `/=/record/{zone}/{record}`. Status is always present
/// and must be a known code.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordDetail {
    #[serde(deserialize_with = "loose_i64")]
    pub id: i64,
    #[serde(rename = "type", deserialize_with = "loose_i64")]
    pub record_type: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub destination: String,
    #[serde(default, deserialize_with = "loose_i64")]
    pub ttl: i64,
    #[serde(deserialize_with = "loose_i64")]
    pub status: i64,
    #[serde(default, deserialize_with = "loose_i64")]
    pub location_id: i64,
}

impl TryFrom<RecordDetail> for Record {
    type Error = Error;

    fn try_from(detail: RecordDetail) -> Result<Self> {
        let status = RecordStatus::try_from(detail.status)?;
        Ok(Record {
            id: detail.id,
            record_type: RecordType::try_from(detail.record_type)?,
            name: detail.name,
            description: detail.description,
            destination: detail.destination,
            ttl: detail.ttl,
            status: Some(status),
            location_id: detail.location_id,
            deleted: status == RecordStatus::Deleted,
        })
    }
}

// ---- dhcp ----

#[derive(Debug, Deserialize)]
pub(crate) struct SubnetRow {
    #[serde(deserialize_with = "loose_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "loose_i64")]
    pub vlan_no: i64,
    #[serde(default, deserialize_with = "loose_i64")]
    pub zone_id: i64,
}

impl From<SubnetRow> for SubnetIdentity {
    fn from(row: SubnetRow) -> Self {
        SubnetIdentity {
            subnet_id: row.id,
            zone_id: row.zone_id,
            vlan_number: row.vlan_no,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FreeIp {
    pub data: FreeIpData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FreeIpData {
    pub ip_address: String,
}

/// Answer to interface create and rename. `status` is `0` or `"0"`
/// depending on the deployment and is not interpreted.
#[derive(Debug, Deserialize)]
pub(crate) struct InterfaceAck {
    #[serde(deserialize_with = "loose_i64")]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterfaceRow {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub destination: String,
}

impl From<InterfaceRow> for InterfaceInfo {
    fn from(row: InterfaceRow) -> Self {
        InterfaceInfo {
            ip: row.destination,
            name: row.name,
        }
    }
}

// ---- users ----

/// `{"status": "0", "data": {"id": 144}}`
#[derive(Debug, Deserialize)]
pub(crate) struct UserAck {
    pub data: UserAckData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserAckData {
    #[serde(deserialize_with = "loose_i64")]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRow {
    #[serde(deserialize_with = "loose_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub modified_by: String,
    pub modified_date: String,
    pub passwd_changed_date: String,
    pub auth_group: String,
    #[serde(default)]
    pub groups: Vec<UserGroup>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(UserAccount {
            modified_date: parse_timestamp("modified_date", &row.modified_date)?,
            password_changed_date: parse_timestamp(
                "passwd_changed_date",
                &row.passwd_changed_date,
            )?,
            auth_group: row.auth_group.parse()?,
            id: row.id,
            username: row.username,
            name: row.name,
            description: row.description,
            modified_by: row.modified_by,
            groups: row.groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn record_row_tolerates_mixed_shapes() {
        let rows: Vec<RecordRow> = decode(
            "records",
            r#"[
                {"id": 1, "type": 0, "name": "a", "destination": "10.0.0.1",
                 "description": null, "ttl": 0, "status": "0", "location_id": 0, "deleted": ""},
                {"id": null, "type": 4, "name": ".", "destination": "a.ns.example.",
                 "ttl": "3600", "status": -1, "location_id": null, "deleted": 1},
                {"id": "7", "type": "5", "name": "txt", "destination": "v=spf1"}
            ]"#,
        )
        .unwrap();

        let records: Vec<Record> = rows
            .into_iter()
            .map(Record::try_from)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records[0].status, Some(RecordStatus::Active));
        assert_eq!(records[0].description, "");
        assert!(!records[0].deleted);

        assert_eq!(records[1].id, 0);
        assert_eq!(records[1].ttl, 3600);
        assert_eq!(records[1].status, None);
        assert_eq!(records[1].location_id, 0);
        assert!(records[1].deleted);

        assert_eq!(records[2].id, 7);
        assert_eq!(records[2].record_type, RecordType::Txt);
        assert_eq!(records[2].status, None);
    }

    #[test]
    fn record_row_rejects_garbage_integers() {
        let res: Result<Vec<RecordRow>> =
            decode("records", r#"[{"id": "abc", "type": 0, "name": "a"}]"#);
        assert!(matches!(res, Err(Error::Decode { what: "records", .. })));
    }

    #[test]
    fn whole_floats_decode_only_within_i64_range() {
        let rows: Vec<RecordRow> = decode(
            "records",
            r#"[{"id": 64694.0, "type": 0.0, "name": "a", "ttl": 3.6e3}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].id, 64694);
        assert_eq!(rows[0].ttl, 3600);

        for id in ["1e300", "-1e300", "9223372036854775808.0", "1.5"] {
            let body = format!(r#"[{{"id": {id}, "type": 0, "name": "a"}}]"#);
            let res: Result<Vec<RecordRow>> = decode("records", &body);
            assert!(
                matches!(res, Err(Error::Decode { what: "records", .. })),
                "{id} should be rejected"
            );
        }
    }

    #[test]
    fn record_detail_requires_known_status() {
        let detail: RecordDetail = decode(
            "record",
            r#"{"id": 9, "type": 2, "name": "www", "destination": "web.",
                "ttl": 300, "status": 7, "location_id": 1}"#,
        )
        .unwrap();
        assert!(matches!(
            Record::try_from(detail),
            Err(Error::UnknownEnumValue { kind: "record status", .. })
        ));
    }

    #[test]
    fn timestamps_are_naive_utc() {
        let ts = parse_timestamp("modified_date", "2024-12-03 14:17:22").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 12, 3, 14, 17, 22).unwrap());

        let err = parse_timestamp("modified_date", "2024-12-03T14:17:22Z").unwrap_err();
        assert!(matches!(err, Error::Decode { what: "modified_date", .. }));
    }
}
