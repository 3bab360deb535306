//! In-memory `DnsGateway` fake for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::gateway::DnsGateway;
use crate::model::{RecordSet, RecordType, Zone};

/// In-memory gateway holding zones and their record sets behind a mutex.
///
/// Mirrors the provider's contract: create conflicts on existing keys,
/// delete fails on absent ones, zone deletion cascades to records.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<Vec<(Zone, Vec<RecordSet>)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway pre-seeded with empty zones for the given DNS names.
    pub fn with_zones(dns_names: &[&str]) -> Self {
        let gateway = Self::new();
        {
            let mut state = gateway.state.lock().expect("lock");
            for dns_name in dns_names {
                state.push((Zone::new(dns_name, None, None), Vec::new()));
            }
        }
        gateway
    }

    pub fn seed_record(&self, zone_dns_name: &str, rrset: RecordSet) {
        let mut state = self.state.lock().expect("lock");
        let entry = state
            .iter_mut()
            .find(|(z, _)| z.dns_name == zone_dns_name)
            .expect("seed_record: zone not present");
        entry.1.push(rrset);
    }

    pub fn zone_dns_names(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("lock")
            .iter()
            .map(|(z, _)| z.dns_name.clone())
            .collect()
    }

    pub fn records_in(&self, zone_dns_name: &str) -> Vec<RecordSet> {
        self.state
            .lock()
            .expect("lock")
            .iter()
            .find(|(z, _)| z.dns_name == zone_dns_name)
            .map(|(_, records)| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DnsGateway for FakeGateway {
    async fn list_zones(&self) -> Result<Vec<Zone>, CoreError> {
        Ok(self
            .state
            .lock()
            .expect("lock")
            .iter()
            .map(|(z, _)| z.clone())
            .collect())
    }

    async fn list_record_sets(&self, zone: &Zone) -> Result<Vec<RecordSet>, CoreError> {
        Ok(self.records_in(&zone.dns_name))
    }

    async fn create_zone(&self, zone: &Zone) -> Result<Zone, CoreError> {
        let mut state = self.state.lock().expect("lock");
        if state
            .iter()
            .any(|(z, _)| z.dns_name == zone.dns_name || z.name == zone.name)
        {
            return Err(CoreError::Conflict {
                entity: "zone",
                key: zone.dns_name.clone(),
            });
        }
        state.push((zone.clone(), Vec::new()));
        Ok(zone.clone())
    }

    async fn delete_zone(&self, zone: &Zone) -> Result<(), CoreError> {
        let mut state = self.state.lock().expect("lock");
        let before = state.len();
        state.retain(|(z, _)| z.dns_name != zone.dns_name);
        if state.len() == before {
            return Err(CoreError::NotFound {
                entity: "zone",
                key: zone.dns_name.clone(),
            });
        }
        Ok(())
    }

    async fn create_record_set(
        &self,
        zone: &Zone,
        rrset: &RecordSet,
    ) -> Result<RecordSet, CoreError> {
        let mut state = self.state.lock().expect("lock");
        let entry = state
            .iter_mut()
            .find(|(z, _)| z.dns_name == zone.dns_name)
            .ok_or_else(|| CoreError::NotFound {
                entity: "zone",
                key: zone.dns_name.clone(),
            })?;
        if entry
            .1
            .iter()
            .any(|r| r.matches(&rrset.name, rrset.record_type))
        {
            return Err(CoreError::Conflict {
                entity: "record set",
                key: rrset.key(),
            });
        }
        entry.1.push(rrset.clone());
        Ok(rrset.clone())
    }

    async fn delete_record_set(&self, zone: &Zone, rrset: &RecordSet) -> Result<(), CoreError> {
        let mut state = self.state.lock().expect("lock");
        let entry = state
            .iter_mut()
            .find(|(z, _)| z.dns_name == zone.dns_name)
            .ok_or_else(|| CoreError::NotFound {
                entity: "zone",
                key: zone.dns_name.clone(),
            })?;
        let before = entry.1.len();
        entry
            .1
            .retain(|r| !r.matches(&rrset.name, rrset.record_type));
        if entry.1.len() == before {
            return Err(CoreError::NotFound {
                entity: "record set",
                key: rrset.key(),
            });
        }
        Ok(())
    }
}

/// Convenience constructor for record sets in tests.
pub fn rrset(name: &str, record_type: RecordType, ttl: u32, data: &[&str]) -> RecordSet {
    RecordSet {
        name: name.into(),
        record_type,
        ttl,
        data: data.iter().map(|&d| d.to_owned()).collect(),
    }
}
