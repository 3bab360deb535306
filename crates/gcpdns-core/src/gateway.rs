//! The remote resource gateway.
//!
//! `DnsGateway` is the narrow interface the reconciler drives; the one
//! concrete implementation adapts `gcpdns_api::DnsClient`. Tests inject
//! an in-memory fake implementing the same trait.

use async_trait::async_trait;
use tracing::{debug, warn};

use gcpdns_api::types::Change;

use crate::error::CoreError;
use crate::model::{RecordSet, RecordType, Zone};

/// Primitive operations the hosting provider exposes.
///
/// Create and delete only: there is no record update primitive, so a
/// replace is an explicit delete followed by a create at a higher layer.
#[async_trait]
pub trait DnsGateway: Send + Sync {
    async fn list_zones(&self) -> Result<Vec<Zone>, CoreError>;

    async fn list_record_sets(&self, zone: &Zone) -> Result<Vec<RecordSet>, CoreError>;

    /// Fails with [`CoreError::Conflict`] when the provider already
    /// hosts the zone name.
    async fn create_zone(&self, zone: &Zone) -> Result<Zone, CoreError>;

    /// Fails with [`CoreError::NotFound`] when the zone is absent.
    /// Deleting a zone cascades to its record sets provider-side.
    async fn delete_zone(&self, zone: &Zone) -> Result<(), CoreError>;

    /// Fails with [`CoreError::Conflict`] when a record set with the
    /// same (name, record_type) key exists in the zone.
    async fn create_record_set(
        &self,
        zone: &Zone,
        rrset: &RecordSet,
    ) -> Result<RecordSet, CoreError>;

    /// Fails with [`CoreError::NotFound`] when the record set is absent.
    /// Takes the full record set because the provider requires the
    /// current data to be named in the deletion.
    async fn delete_record_set(&self, zone: &Zone, rrset: &RecordSet) -> Result<(), CoreError>;
}

// ── Cloud DNS adapter ───────────────────────────────────────────────

/// `DnsGateway` implementation backed by the Cloud DNS API.
pub struct CloudGateway {
    client: gcpdns_api::DnsClient,
}

impl CloudGateway {
    pub fn new(client: gcpdns_api::DnsClient) -> Self {
        Self { client }
    }

    pub fn project(&self) -> &str {
        self.client.project()
    }
}

#[async_trait]
impl DnsGateway for CloudGateway {
    async fn list_zones(&self) -> Result<Vec<Zone>, CoreError> {
        let zones = self.client.list_all_managed_zones().await?;
        Ok(zones.into_iter().map(Zone::from).collect())
    }

    async fn list_record_sets(&self, zone: &Zone) -> Result<Vec<RecordSet>, CoreError> {
        let rrsets = self.client.list_all_rrsets(&zone.name).await?;
        // Types this tool doesn't manage (e.g. DNSSEC material) are
        // skipped rather than failing the whole listing.
        Ok(rrsets
            .into_iter()
            .filter_map(|rrset| match RecordSet::try_from(rrset) {
                Ok(rs) => Some(rs),
                Err(e) => {
                    warn!("skipping record set: {e}");
                    None
                }
            })
            .collect())
    }

    async fn create_zone(&self, zone: &Zone) -> Result<Zone, CoreError> {
        debug!(dns_name = %zone.dns_name, name = %zone.name, "creating managed zone");
        match self.client.create_managed_zone(&zone.clone().into()).await {
            Ok(created) => Ok(Zone::from(created)),
            Err(e) if e.is_conflict() => Err(CoreError::Conflict {
                entity: "zone",
                key: zone.dns_name.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_zone(&self, zone: &Zone) -> Result<(), CoreError> {
        debug!(dns_name = %zone.dns_name, name = %zone.name, "deleting managed zone");
        match self.client.delete_managed_zone(&zone.name).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Err(CoreError::NotFound {
                entity: "zone",
                key: zone.dns_name.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_record_set(
        &self,
        zone: &Zone,
        rrset: &RecordSet,
    ) -> Result<RecordSet, CoreError> {
        debug!(key = %rrset.key(), zone = %zone.name, "creating record set");
        let change = Change::addition(rrset.clone().into());
        match self.client.create_change(&zone.name, &change).await {
            Ok(_) => Ok(rrset.clone()),
            Err(e) if e.is_conflict() => Err(CoreError::Conflict {
                entity: "record set",
                key: rrset.key(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_record_set(&self, zone: &Zone, rrset: &RecordSet) -> Result<(), CoreError> {
        debug!(key = %rrset.key(), zone = %zone.name, "deleting record set");
        let change = Change::deletion(rrset.clone().into());
        match self.client.create_change(&zone.name, &change).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(CoreError::NotFound {
                entity: "record set",
                key: rrset.key(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Zone resolution ─────────────────────────────────────────────────

/// Pick the zone hosting `record_name`: the longest dns_name that is a
/// suffix of the record name on a label boundary.
pub fn find_zone_for<'z>(zones: &'z [Zone], record_name: &str) -> Option<&'z Zone> {
    zones
        .iter()
        .filter(|z| z.hosts(record_name))
        .max_by_key(|z| z.dns_name.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_zone_prefers_longest_suffix() {
        let zones = vec![
            Zone::new("example.com", None, None),
            Zone::new("sub.example.com", None, None),
            Zone::new("example.org", None, None),
        ];

        let found = find_zone_for(&zones, "host.sub.example.com.").expect("zone");
        assert_eq!(found.dns_name, "sub.example.com.");

        let apex = find_zone_for(&zones, "example.com.").expect("zone");
        assert_eq!(apex.dns_name, "example.com.");

        assert!(find_zone_for(&zones, "example.net.").is_none());
    }
}
