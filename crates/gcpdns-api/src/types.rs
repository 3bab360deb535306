//! Wire types for the Cloud DNS v1 REST API.
//!
//! Field names mirror the JSON representation (camelCase). These are
//! transport-layer shapes; `gcpdns-core` converts them into domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Managed zones ───────────────────────────────────────────────────

/// A managed zone resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZone {
    /// Server-assigned numeric id (absent on creation requests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// User-assigned zone name, unique within the project.
    pub name: String,

    /// The zone's DNS name, always dot-terminated (e.g. "example.com.").
    pub dns_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Delegated name servers, populated by the API.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_servers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZonesResponse {
    #[serde(default)]
    pub managed_zones: Vec<ManagedZone>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

// ── Resource record sets ────────────────────────────────────────────

/// A resource record set resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Fully-qualified, dot-terminated DNS name.
    pub name: String,

    /// The record type, e.g. "A" or "TXT".
    #[serde(rename = "type")]
    pub record_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Record data strings, as the API stores them.
    #[serde(default)]
    pub rrdatas: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RrsetsResponse {
    #[serde(default)]
    pub rrsets: Vec<ResourceRecordSet>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

// ── Changes ─────────────────────────────────────────────────────────

/// An atomic additions/deletions request against a zone's record sets.
///
/// Cloud DNS has no record update primitive; every mutation is a Change
/// listing the record sets to add and/or remove.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additions: Vec<ResourceRecordSet>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<ResourceRecordSet>,

    /// Server-assigned id (absent on requests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// "pending" or "done"; absent on requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Change {
    /// A change that adds a single record set.
    pub fn addition(rrset: ResourceRecordSet) -> Self {
        Self {
            additions: vec![rrset],
            ..Self::default()
        }
    }

    /// A change that removes a single record set.
    pub fn deletion(rrset: ResourceRecordSet) -> Self {
        Self {
            deletions: vec![rrset],
            ..Self::default()
        }
    }
}
