//! Single-entity operations over a [`DnsGateway`].
//!
//! Holds the per-run zone list cache and implements the create/replace/
//! delete semantics shared by the CLI's single commands and the batch
//! reconciler. Remote state is fetched fresh per service instance --
//! nothing survives across runs.

use tracing::{debug, info};

use crate::dump::{RecordDump, RecordInfo, ZoneDump};
use crate::error::CoreError;
use crate::gateway::{self, DnsGateway};
use crate::model::{RecordSet, RecordType, Zone};
use crate::normalize;

/// What to do when a create hits an entity that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnExisting {
    /// Fail the operation with a Conflict error (the default).
    #[default]
    Error,
    /// Delete the existing entity, then create the new one.
    Replace,
    /// Leave the existing entity untouched and report a skip.
    Skip,
}

/// The observable effect of a single applied operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Created,
    Replaced,
    Deleted,
    /// An entity with the same key exists and the policy was `Skip`.
    SkippedExisting,
    /// A delete found nothing to remove (idempotent success).
    SkippedAbsent,
}

/// Stateless-between-runs operations facade over a gateway.
pub struct DnsService<'g> {
    gateway: &'g dyn DnsGateway,
    zones: Option<Vec<Zone>>,
}

impl<'g> DnsService<'g> {
    pub fn new(gateway: &'g dyn DnsGateway) -> Self {
        Self {
            gateway,
            zones: None,
        }
    }

    // ── Zone lookup ─────────────────────────────────────────────────

    /// The zone list, fetched lazily and cached for this run.
    async fn zones(&mut self) -> Result<&[Zone], CoreError> {
        if self.zones.is_none() {
            self.zones = Some(self.gateway.list_zones().await?);
        }
        Ok(self.zones.as_deref().unwrap_or_default())
    }

    /// Drop the cached zone list after a zone mutation.
    fn invalidate_zones(&mut self) {
        self.zones = None;
    }

    /// Find a zone by provider name or DNS name.
    pub async fn get_zone(&mut self, name: &str) -> Result<Zone, CoreError> {
        let dns_name = normalize::fqdn(name);
        self.zones()
            .await?
            .iter()
            .find(|z| z.name == name || z.dns_name == dns_name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "zone",
                key: name.to_owned(),
            })
    }

    /// Find the zone hosting a record name (longest-suffix match).
    pub async fn find_zone_for(&mut self, record_name: &str) -> Result<Zone, CoreError> {
        gateway::find_zone_for(self.zones().await?, record_name)
            .cloned()
            .ok_or_else(|| CoreError::ZoneNotFound {
                name: record_name.to_owned(),
            })
    }

    // ── Zone operations ─────────────────────────────────────────────

    /// Create a zone, honoring the on-existing policy. The existing
    /// check matches on DNS name *or* provider name, since either
    /// collision would be rejected remotely.
    pub async fn create_zone(
        &mut self,
        dns_name: &str,
        gcp_name: Option<&str>,
        description: Option<&str>,
        on_existing: OnExisting,
    ) -> Result<Effect, CoreError> {
        let zone = Zone::new(dns_name, gcp_name, description);

        let existing = self
            .zones()
            .await?
            .iter()
            .find(|z| z.dns_name == zone.dns_name || z.name == zone.name)
            .cloned();

        match existing {
            None => {
                info!(dns_name = %zone.dns_name, "creating zone");
                self.gateway.create_zone(&zone).await?;
                self.invalidate_zones();
                Ok(Effect::Created)
            }
            Some(found) => match on_existing {
                OnExisting::Error => Err(CoreError::Conflict {
                    entity: "zone",
                    key: format!("{} ({})", found.dns_name, found.name),
                }),
                OnExisting::Skip => {
                    debug!(dns_name = %found.dns_name, "zone exists, skipping");
                    Ok(Effect::SkippedExisting)
                }
                OnExisting::Replace => {
                    info!(dns_name = %found.dns_name, "replacing zone");
                    self.gateway.delete_zone(&found).await?;
                    self.gateway.create_zone(&zone).await?;
                    self.invalidate_zones();
                    Ok(Effect::Replaced)
                }
            },
        }
    }

    /// Delete a zone by provider name or DNS name. Absent zones are an
    /// idempotent success, not an error.
    pub async fn delete_zone(&mut self, name: &str) -> Result<Effect, CoreError> {
        match self.get_zone(name).await {
            Ok(zone) => {
                info!(dns_name = %zone.dns_name, "deleting zone");
                self.gateway.delete_zone(&zone).await?;
                self.invalidate_zones();
                Ok(Effect::Deleted)
            }
            Err(CoreError::NotFound { .. }) => {
                debug!(name, "zone absent, nothing to delete");
                Ok(Effect::SkippedAbsent)
            }
            Err(e) => Err(e),
        }
    }

    // ── Record operations ───────────────────────────────────────────

    /// Create a record set from raw `|`-delimited data, honoring the
    /// on-existing policy. A replace is an explicit delete followed by
    /// a create: a crash in between leaves the name briefly absent,
    /// which matches the provider's primitive operations.
    pub async fn create_record_set(
        &mut self,
        name: &str,
        record_type: RecordType,
        ttl: u32,
        raw_data: &str,
        on_existing: OnExisting,
    ) -> Result<Effect, CoreError> {
        if ttl == 0 {
            return Err(CoreError::validation("ttl must be a positive integer"));
        }

        let name = normalize::fqdn(name);
        let zone = self.find_zone_for(&name).await?;
        let data = normalize::normalize_rrdata(record_type, normalize::split_data(raw_data)?);
        let rrset = RecordSet {
            name: name.clone(),
            record_type,
            ttl,
            data,
        };

        let existing = self
            .gateway
            .list_record_sets(&zone)
            .await?
            .into_iter()
            .find(|r| r.matches(&name, record_type));

        match existing {
            None => {
                info!(key = %rrset.key(), ttl, "adding record set");
                self.gateway.create_record_set(&zone, &rrset).await?;
                Ok(Effect::Created)
            }
            Some(old) => match on_existing {
                OnExisting::Error => Err(CoreError::Conflict {
                    entity: "record set",
                    key: format!("{} {} {:?}", old.key(), old.ttl, old.data),
                }),
                OnExisting::Skip => {
                    debug!(key = %old.key(), "record set exists, skipping");
                    Ok(Effect::SkippedExisting)
                }
                OnExisting::Replace => {
                    info!(key = %old.key(), "replacing record set");
                    self.gateway.delete_record_set(&zone, &old).await?;
                    self.gateway.create_record_set(&zone, &rrset).await?;
                    Ok(Effect::Replaced)
                }
            },
        }
    }

    /// Delete a record set by natural key. Absent targets (including a
    /// name no hosted zone covers) are an idempotent success.
    pub async fn delete_record_set(
        &mut self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Effect, CoreError> {
        let name = normalize::fqdn(name);
        let zone = match self.find_zone_for(&name).await {
            Ok(zone) => zone,
            Err(CoreError::ZoneNotFound { .. }) => {
                debug!(%name, "no zone hosts this name, nothing to delete");
                return Ok(Effect::SkippedAbsent);
            }
            Err(e) => return Err(e),
        };

        let existing = self
            .gateway
            .list_record_sets(&zone)
            .await?
            .into_iter()
            .find(|r| r.matches(&name, record_type));

        match existing {
            Some(old) => {
                info!(key = %old.key(), "deleting record set");
                self.gateway.delete_record_set(&zone, &old).await?;
                Ok(Effect::Deleted)
            }
            None => {
                debug!(%name, %record_type, "record set absent, nothing to delete");
                Ok(Effect::SkippedAbsent)
            }
        }
    }

    // ── Dumps ───────────────────────────────────────────────────────

    /// All managed zones, optionally with each zone's record identities.
    pub async fn dump_zones(&mut self, include_records: bool) -> Result<Vec<ZoneDump>, CoreError> {
        let zones = self.zones().await?.to_vec();
        let mut out = Vec::with_capacity(zones.len());
        for zone in zones {
            let zone_records = if include_records {
                self.gateway
                    .list_record_sets(&zone)
                    .await?
                    .into_iter()
                    .map(|r| RecordInfo {
                        record_type: r.record_type,
                        name: r.name,
                    })
                    .collect()
            } else {
                Vec::new()
            };
            out.push(ZoneDump {
                dns_name: zone.dns_name,
                name: zone.name,
                created: zone.created,
                description: zone.description,
                name_servers: zone.name_servers,
                zone_records,
            });
        }
        Ok(out)
    }

    /// All record sets of one zone (by provider name or DNS name).
    pub async fn dump_records(&mut self, zone_name: &str) -> Result<Vec<RecordDump>, CoreError> {
        let zone = self.get_zone(zone_name).await?;
        Ok(self
            .gateway
            .list_record_sets(&zone)
            .await?
            .into_iter()
            .map(|r| RecordDump {
                name: r.name,
                record_type: r.record_type,
                ttl: r.ttl,
                data: r.data,
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{FakeGateway, rrset};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_record_resolves_longest_matching_zone() {
        let gateway = FakeGateway::with_zones(&["example.com.", "sub.example.com."]);
        let mut service = DnsService::new(&gateway);

        let effect = service
            .create_record_set(
                "host.sub.example.com",
                RecordType::A,
                300,
                "192.0.2.7",
                OnExisting::Error,
            )
            .await
            .unwrap();

        assert_eq!(effect, Effect::Created);
        assert_eq!(gateway.records_in("sub.example.com.").len(), 1);
        assert!(gateway.records_in("example.com.").is_empty());
    }

    #[tokio::test]
    async fn create_record_without_zone_fails() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let mut service = DnsService::new(&gateway);

        let err = service
            .create_record_set("www.example.org", RecordType::A, 300, "192.0.2.7", OnExisting::Error)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ZoneNotFound { .. }));
    }

    #[tokio::test]
    async fn replace_policy_swaps_record_data() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        gateway.seed_record(
            "example.com.",
            rrset("a.example.com.", RecordType::A, 300, &["1.2.3.4"]),
        );
        let mut service = DnsService::new(&gateway);

        let effect = service
            .create_record_set("a.example.com.", RecordType::A, 300, "5.6.7.8", OnExisting::Replace)
            .await
            .unwrap();

        assert_eq!(effect, Effect::Replaced);
        let records = gateway.records_in("example.com.");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, vec!["5.6.7.8"]);
    }

    #[tokio::test]
    async fn zero_ttl_is_rejected() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let mut service = DnsService::new(&gateway);

        let err = service
            .create_record_set("a.example.com.", RecordType::A, 0, "1.2.3.4", OnExisting::Error)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn get_zone_matches_provider_name_and_dns_name() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let mut service = DnsService::new(&gateway);

        assert_eq!(
            service.get_zone("example.com").await.unwrap().name,
            "example-com"
        );
        assert_eq!(
            service.get_zone("example-com").await.unwrap().dns_name,
            "example.com."
        );
        assert!(service.get_zone("missing.org").await.is_err());
    }

    #[tokio::test]
    async fn zone_create_conflicts_on_provider_name_collision() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let mut service = DnsService::new(&gateway);

        // Different DNS name, but colliding provider name.
        let err = service
            .create_zone("example.net", Some("example-com"), None, OnExisting::Error)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn dump_zones_includes_record_identities() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        gateway.seed_record(
            "example.com.",
            rrset("www.example.com.", RecordType::A, 300, &["192.0.2.1"]),
        );
        let mut service = DnsService::new(&gateway);

        let dump = service.dump_zones(true).await.unwrap();
        assert_eq!(dump.len(), 1);
        assert_eq!(dump[0].zone_records.len(), 1);
        assert_eq!(dump[0].zone_records[0].to_string(), "A:www.example.com.");

        let without = service.dump_zones(false).await.unwrap();
        assert!(without[0].zone_records.is_empty());
    }

    #[tokio::test]
    async fn dump_records_lists_zone_contents() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        gateway.seed_record(
            "example.com.",
            rrset("example.com.", RecordType::MX, 3600, &["10 mail.example.com."]),
        );
        let mut service = DnsService::new(&gateway);

        let dump = service.dump_records("example-com").await.unwrap();
        assert_eq!(dump.len(), 1);
        assert_eq!(dump[0].record_type, RecordType::MX);
        assert_eq!(dump[0].data, vec!["10 mail.example.com."]);
    }
}
