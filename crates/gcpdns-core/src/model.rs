//! Domain model: zones, record sets, and record types.
//!
//! These are the canonical shapes the reconciler and CLI work with.
//! Conversions to and from the `gcpdns-api` wire types live here too,
//! so the rest of the crate never touches camelCase JSON fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::normalize;

/// Default TTL in seconds when a row or flag doesn't specify one.
pub const DEFAULT_TTL: u32 = 300;

// ── Record types ────────────────────────────────────────────────────

/// DNS record types supported by Cloud DNS.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordType {
    A,
    AAAA,
    CAA,
    CNAME,
    DNSKEY,
    DS,
    MX,
    NAPTR,
    NS,
    PTR,
    SOA,
    SPF,
    SRV,
    SSHFP,
    TLSA,
    TXT,
}

impl RecordType {
    /// Whether this type's record data are domain names that must be
    /// dot-terminated (CNAME targets, MX exchanges, and so on).
    pub fn has_domain_data(self) -> bool {
        matches!(
            self,
            Self::CNAME | Self::MX | Self::NS | Self::PTR | Self::SRV
        )
    }
}

// ── Zones ───────────────────────────────────────────────────────────

/// A hosted DNS zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Fully-qualified, dot-terminated DNS name (e.g. "example.com.").
    pub dns_name: String,

    /// Provider-assigned identifier, unique within the project.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub name_servers: Vec<String>,

    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl Zone {
    /// Build a zone from raw input, normalizing the DNS name and
    /// defaulting the provider name when absent.
    pub fn new(dns_name: &str, gcp_name: Option<&str>, description: Option<&str>) -> Self {
        let dns_name = normalize::fqdn(dns_name);
        let name = match gcp_name {
            Some(n) if !n.is_empty() => n.to_owned(),
            _ => Self::default_gcp_name(&dns_name),
        };
        Self {
            dns_name,
            name,
            description: description.map(ToOwned::to_owned),
            name_servers: Vec::new(),
            created: None,
        }
    }

    /// Default provider name for a DNS name: trailing dot stripped,
    /// remaining dots replaced with dashes ("example.com." -> "example-com").
    pub fn default_gcp_name(dns_name: &str) -> String {
        dns_name.trim_end_matches('.').replace('.', "-")
    }

    /// Whether this zone hosts `record_name` (equal to the apex or a
    /// subdomain of it, on a label boundary).
    pub fn hosts(&self, record_name: &str) -> bool {
        record_name == self.dns_name || record_name.ends_with(&format!(".{}", self.dns_name))
    }
}

impl From<gcpdns_api::types::ManagedZone> for Zone {
    fn from(mz: gcpdns_api::types::ManagedZone) -> Self {
        Self {
            dns_name: mz.dns_name,
            name: mz.name,
            description: mz.description,
            name_servers: mz.name_servers,
            created: mz.creation_time,
        }
    }
}

impl From<Zone> for gcpdns_api::types::ManagedZone {
    fn from(zone: Zone) -> Self {
        Self {
            id: None,
            name: zone.name,
            dns_name: zone.dns_name,
            description: zone.description,
            name_servers: Vec::new(),
            creation_time: None,
        }
    }
}

// ── Record sets ─────────────────────────────────────────────────────

/// A resource record set: the (name, record_type) pair is its natural
/// key within a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Fully-qualified, dot-terminated DNS name.
    pub name: String,

    pub record_type: RecordType,

    /// Time to live in seconds.
    pub ttl: u32,

    /// Ordered record data strings.
    pub data: Vec<String>,
}

impl RecordSet {
    /// Natural-key match against another name/type pair.
    pub fn matches(&self, name: &str, record_type: RecordType) -> bool {
        self.name == name && self.record_type == record_type
    }

    /// Human-readable natural key, e.g. "www.example.com. A".
    pub fn key(&self) -> String {
        format!("{} {}", self.name, self.record_type)
    }
}

impl TryFrom<gcpdns_api::types::ResourceRecordSet> for RecordSet {
    type Error = CoreError;

    fn try_from(rrset: gcpdns_api::types::ResourceRecordSet) -> Result<Self, Self::Error> {
        let record_type = rrset.record_type.parse().map_err(|_| {
            CoreError::validation(format!("unsupported record type: {}", rrset.record_type))
        })?;
        Ok(Self {
            name: rrset.name,
            record_type,
            ttl: rrset.ttl.unwrap_or(DEFAULT_TTL),
            data: rrset.rrdatas,
        })
    }
}

impl From<RecordSet> for gcpdns_api::types::ResourceRecordSet {
    fn from(rs: RecordSet) -> Self {
        Self {
            name: rs.name,
            record_type: rs.record_type.to_string(),
            ttl: Some(rs.ttl),
            rrdatas: rs.data,
        }
    }
}
