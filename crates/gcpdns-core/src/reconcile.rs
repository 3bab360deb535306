//! Batch reconciliation of desired-state CSV tables.
//!
//! Rows are applied strictly in input order -- a delete of key K
//! followed by a create of K must execute delete-then-create, so no
//! reordering or concurrency is allowed within a batch. Each row's
//! outcome is recorded; `ignore_errors` decides whether a failure
//! aborts the run or the batch continues to the end.

use std::io::Read;

use serde::Serialize;
use tracing::{error, info};

use crate::batch::{self, CsvRow, RecordRow, RowAction, ZoneRow};
use crate::dump;
use crate::error::CoreError;
use crate::gateway::DnsGateway;
use crate::model::{DEFAULT_TTL, RecordType};
use crate::normalize;
use crate::service::{DnsService, Effect, OnExisting};

// ── Options ─────────────────────────────────────────────────────────

/// Run-level knobs for a batch application.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Attempt every row even after failures; the batch still reports
    /// failure overall if any row failed.
    pub ignore_errors: bool,

    /// Policy for `create` rows whose key already exists remotely.
    /// `replace` rows always replace, regardless of this setting.
    pub on_existing: OnExisting,
}

// ── Outcomes ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// The row's operation changed remote state.
    Applied,
    /// Nothing to do (absent delete target, or skip-existing policy).
    Skipped,
    Failed,
}

/// Per-row result of a batch run.
#[derive(Debug, Serialize)]
pub struct RowOutcome {
    /// 1-based CSV line number (the header is line 1).
    pub line: u64,
    pub action: String,
    pub key: String,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RowOutcome {
    fn from_effect(line: u64, action: &str, key: String, effect: Effect) -> Self {
        let (status, detail) = match effect {
            Effect::Created => (RowStatus::Applied, "created"),
            Effect::Replaced => (RowStatus::Applied, "replaced existing"),
            Effect::Deleted => (RowStatus::Applied, "deleted"),
            Effect::SkippedExisting => (RowStatus::Skipped, "already exists"),
            Effect::SkippedAbsent => (RowStatus::Skipped, "nothing to delete"),
        };
        Self {
            line,
            action: action.to_owned(),
            key,
            status,
            detail: Some(detail.to_owned()),
        }
    }

    fn failed(line: u64, action: &str, key: String, err: &CoreError) -> Self {
        Self {
            line,
            action: action.to_owned(),
            key,
            status: RowStatus::Failed,
            detail: Some(err.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == RowStatus::Failed
    }
}

/// Aggregated result of one batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<RowOutcome>,
    /// True when the run stopped early because `ignore_errors` was off.
    pub aborted: bool,
}

impl BatchReport {
    /// True when every attempted row succeeded.
    pub fn is_success(&self) -> bool {
        !self.aborted && self.outcomes.iter().all(|o| !o.is_failure())
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

// ── Reconciler ──────────────────────────────────────────────────────

/// Applies desired-state tables against a gateway, row by row.
pub struct Reconciler<'g> {
    service: DnsService<'g>,
    opts: ApplyOptions,
}

impl<'g> Reconciler<'g> {
    pub fn new(gateway: &'g dyn DnsGateway, opts: ApplyOptions) -> Self {
        Self {
            service: DnsService::new(gateway),
            opts,
        }
    }

    // ── CSV entry points ────────────────────────────────────────────

    /// Apply a zones CSV (`action, dns_name, gcp_name?, description?,
    /// record_info?`).
    pub async fn apply_zones_csv<R: Read>(&mut self, input: R) -> Result<BatchReport, CoreError> {
        info!("applying zones CSV");
        let rows = batch::parse_rows::<ZoneRow, _>(input)?;
        Ok(self.apply_zone_rows(rows).await)
    }

    /// Apply a record-sets CSV (`action, name, record_type, ttl?, data`).
    pub async fn apply_record_sets_csv<R: Read>(
        &mut self,
        input: R,
    ) -> Result<BatchReport, CoreError> {
        info!("applying record sets CSV");
        let rows = batch::parse_rows::<RecordRow, _>(input)?;
        Ok(self.apply_record_rows(rows).await)
    }

    // ── Row loops ───────────────────────────────────────────────────

    pub async fn apply_zone_rows(&mut self, rows: Vec<CsvRow<ZoneRow>>) -> BatchReport {
        let mut report = BatchReport::default();
        for row in rows {
            let outcome = match row.parsed {
                Ok(ref zone_row) => {
                    let key = normalize::fqdn(&zone_row.dns_name);
                    match self.apply_zone_row(zone_row).await {
                        Ok(effect) => {
                            RowOutcome::from_effect(row.line, &zone_row.action, key, effect)
                        }
                        Err(e) => RowOutcome::failed(row.line, &zone_row.action, key, &e),
                    }
                }
                Err(ref e) => RowOutcome::failed(row.line, "-", "-".to_owned(), e),
            };

            if self.push_and_maybe_abort(&mut report, outcome) {
                break;
            }
        }
        report
    }

    pub async fn apply_record_rows(&mut self, rows: Vec<CsvRow<RecordRow>>) -> BatchReport {
        let mut report = BatchReport::default();
        for row in rows {
            let outcome = match row.parsed {
                Ok(ref record_row) => {
                    let key = format!(
                        "{} {}",
                        normalize::fqdn(&record_row.name),
                        record_row.record_type.to_uppercase()
                    );
                    match self.apply_record_row(record_row).await {
                        Ok(effect) => {
                            RowOutcome::from_effect(row.line, &record_row.action, key, effect)
                        }
                        Err(e) => RowOutcome::failed(row.line, &record_row.action, key, &e),
                    }
                }
                Err(ref e) => RowOutcome::failed(row.line, "-", "-".to_owned(), e),
            };

            if self.push_and_maybe_abort(&mut report, outcome) {
                break;
            }
        }
        report
    }

    /// Record an outcome; returns true when the run must stop.
    fn push_and_maybe_abort(&self, report: &mut BatchReport, outcome: RowOutcome) -> bool {
        let failed = outcome.is_failure();
        if failed {
            error!(
                line = outcome.line,
                key = %outcome.key,
                detail = outcome.detail.as_deref().unwrap_or(""),
                "row failed"
            );
        }
        report.outcomes.push(outcome);
        if failed && !self.opts.ignore_errors {
            report.aborted = true;
            return true;
        }
        false
    }

    // ── Per-row dispatch ────────────────────────────────────────────

    async fn apply_zone_row(&mut self, row: &ZoneRow) -> Result<Effect, CoreError> {
        let action: RowAction = row.action.parse()?;
        if row.dns_name.is_empty() {
            return Err(CoreError::validation("missing dns_name"));
        }

        match action {
            RowAction::Create => {
                self.service
                    .create_zone(
                        &row.dns_name,
                        row.gcp_name.as_deref(),
                        row.description.as_deref(),
                        self.opts.on_existing,
                    )
                    .await
            }
            RowAction::Replace => {
                self.service
                    .create_zone(
                        &row.dns_name,
                        row.gcp_name.as_deref(),
                        row.description.as_deref(),
                        OnExisting::Replace,
                    )
                    .await
            }
            RowAction::Delete => {
                // Listed record sets go first, then the zone itself;
                // the provider cascades whatever remains.
                if let Some(ref info) = row.record_info {
                    for record in dump::parse_record_info(info)? {
                        self.service
                            .delete_record_set(&record.name, record.record_type)
                            .await?;
                    }
                }
                self.service.delete_zone(&row.dns_name).await
            }
        }
    }

    async fn apply_record_row(&mut self, row: &RecordRow) -> Result<Effect, CoreError> {
        let action: RowAction = row.action.parse()?;
        let record_type: RecordType = row.record_type.parse().map_err(|_| {
            CoreError::validation(format!("invalid record type {:?}", row.record_type))
        })?;

        match action {
            RowAction::Delete => self.service.delete_record_set(&row.name, record_type).await,
            RowAction::Create | RowAction::Replace => {
                let data = row
                    .data
                    .as_deref()
                    .ok_or_else(|| CoreError::validation("missing data"))?;
                let ttl = row.ttl.unwrap_or(DEFAULT_TTL);
                let on_existing = if action == RowAction::Replace {
                    OnExisting::Replace
                } else {
                    self.opts.on_existing
                };
                self.service
                    .create_record_set(&row.name, record_type, ttl, data, on_existing)
                    .await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{FakeGateway, rrset};
    use pretty_assertions::assert_eq;

    fn reconciler(gateway: &FakeGateway, opts: ApplyOptions) -> Reconciler<'_> {
        Reconciler::new(gateway, opts)
    }

    // ── Record batches ──────────────────────────────────────────────

    #[tokio::test]
    async fn create_against_empty_remote_normalizes_name() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let csv = "action,name,record_type,ttl,data\n\
                   create,a.example.com,A,300,1.2.3.4\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        let records = gateway.records_in("example.com.");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a.example.com.");
        assert_eq!(records[0].data, vec!["1.2.3.4"]);
    }

    #[tokio::test]
    async fn delete_then_create_of_same_key_runs_in_order() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        gateway.seed_record(
            "example.com.",
            rrset("a.example.com.", RecordType::A, 300, &["1.2.3.4"]),
        );
        let csv = "action,name,record_type,ttl,data\n\
                   delete,a.example.com.,A,,\n\
                   create,a.example.com.,A,600,5.6.7.8\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        let records = gateway.records_in("example.com.");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ttl, 600);
        assert_eq!(records[0].data, vec!["5.6.7.8"]);
    }

    #[tokio::test]
    async fn create_over_existing_key_without_replace_conflicts() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        gateway.seed_record(
            "example.com.",
            rrset("a.example.com.", RecordType::A, 300, &["1.2.3.4"]),
        );
        let csv = "action,name,record_type,ttl,data\n\
                   create,a.example.com.,A,300,5.6.7.8\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.outcomes[0].status, RowStatus::Failed);
        assert!(
            report.outcomes[0]
                .detail
                .as_deref()
                .unwrap()
                .contains("already exists")
        );
        // Remote state untouched.
        assert_eq!(
            gateway.records_in("example.com.")[0].data,
            vec!["1.2.3.4"]
        );
    }

    #[tokio::test]
    async fn replace_row_leaves_exactly_one_record() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        gateway.seed_record(
            "example.com.",
            rrset("a.example.com.", RecordType::A, 300, &["1.2.3.4"]),
        );
        let csv = "action,name,record_type,ttl,data\n\
                   replace,a.example.com.,A,300,5.6.7.8\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        let records = gateway.records_in("example.com.");
        assert_eq!(records.len(), 1, "old record must be gone");
        assert_eq!(records[0].data, vec!["5.6.7.8"]);
    }

    #[tokio::test]
    async fn replace_of_absent_key_is_a_plain_create() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let csv = "action,name,record_type,ttl,data\n\
                   replace,new.example.com.,A,300,9.9.9.9\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.outcomes[0].detail.as_deref(), Some("created"));
        assert_eq!(gateway.records_in("example.com.").len(), 1);
    }

    #[tokio::test]
    async fn deleting_absent_key_is_not_an_error() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let csv = "action,name,record_type,ttl,data\n\
                   delete,ghost.example.com.,TXT,,\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.outcomes[0].status, RowStatus::Skipped);
    }

    #[tokio::test]
    async fn ignore_errors_attempts_every_row() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let csv = "action,name,record_type,ttl,data\n\
                   create,a.example.com.,A,300,1.1.1.1\n\
                   frobnicate,b.example.com.,A,300,2.2.2.2\n\
                   create,c.example.com.,A,300,3.3.3.3\n";

        let opts = ApplyOptions {
            ignore_errors: true,
            ..ApplyOptions::default()
        };
        let report = reconciler(&gateway, opts)
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert!(!report.is_success());
        assert!(!report.aborted);
        assert_eq!(report.failed_count(), 1);
        // The two valid rows were still applied.
        assert_eq!(gateway.records_in("example.com.").len(), 2);
    }

    #[tokio::test]
    async fn without_ignore_errors_run_stops_at_first_failure() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let csv = "action,name,record_type,ttl,data\n\
                   create,a.example.com.,A,300,1.1.1.1\n\
                   frobnicate,b.example.com.,A,300,2.2.2.2\n\
                   create,c.example.com.,A,300,3.3.3.3\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        // Report covers rows up to and including the failure.
        assert_eq!(report.outcomes.len(), 2);
        assert!(report.aborted);
        assert_eq!(report.outcomes[1].status, RowStatus::Failed);
        // The third row never ran.
        assert_eq!(gateway.records_in("example.com.").len(), 1);
    }

    #[tokio::test]
    async fn malformed_row_is_isolated_per_row() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        // Second row is missing its data field for a create.
        let csv = "action,name,record_type,ttl,data\n\
                   create,a.example.com.,A,300,1.1.1.1\n\
                   create,b.example.com.,A,300,\n\
                   create,c.example.com.,A,300,3.3.3.3\n";

        let opts = ApplyOptions {
            ignore_errors: true,
            ..ApplyOptions::default()
        };
        let report = reconciler(&gateway, opts)
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcomes[1].status, RowStatus::Failed);
        assert_eq!(report.outcomes[1].line, 3);
        assert_eq!(gateway.records_in("example.com.").len(), 2);
    }

    #[tokio::test]
    async fn empty_data_segment_fails_validation() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let csv = "action,name,record_type,ttl,data\n\
                   create,ns.example.com.,NS,300,ns1.example.com|\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(!report.is_success());
        assert!(
            report.outcomes[0]
                .detail
                .as_deref()
                .unwrap()
                .contains("empty segment")
        );
    }

    #[tokio::test]
    async fn skip_existing_policy_records_a_skip() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        gateway.seed_record(
            "example.com.",
            rrset("a.example.com.", RecordType::A, 300, &["1.2.3.4"]),
        );
        let csv = "action,name,record_type,ttl,data\n\
                   create,a.example.com.,A,300,5.6.7.8\n";

        let opts = ApplyOptions {
            on_existing: OnExisting::Skip,
            ..ApplyOptions::default()
        };
        let report = reconciler(&gateway, opts)
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.outcomes[0].status, RowStatus::Skipped);
        assert_eq!(
            gateway.records_in("example.com.")[0].data,
            vec!["1.2.3.4"]
        );
    }

    #[tokio::test]
    async fn mx_and_txt_data_are_normalized_on_the_way_in() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let long_txt = "k".repeat(600);
        let csv = format!(
            "action,name,record_type,ttl,data\n\
             create,example.com.,MX,300,10 mail.example.com|20 backup.example.com\n\
             create,example.com.,TXT,300,{long_txt}\n"
        );

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_record_sets_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        let records = gateway.records_in("example.com.");
        let mx = records
            .iter()
            .find(|r| r.record_type == RecordType::MX)
            .unwrap();
        assert_eq!(
            mx.data,
            vec!["10 mail.example.com.", "20 backup.example.com."]
        );

        let txt = records
            .iter()
            .find(|r| r.record_type == RecordType::TXT)
            .unwrap();
        let chunks = crate::normalize::parse_txt_chunks(&txt.data[0]).unwrap();
        assert_eq!(chunks.concat(), long_txt);
    }

    // ── Zone batches ────────────────────────────────────────────────

    #[tokio::test]
    async fn zone_create_and_delete_rows_apply_in_order() {
        let gateway = FakeGateway::with_zones(&["old.example.org."]);
        let csv = "action,dns_name,gcp_name,description\n\
                   create,example.com,,Primary zone\n\
                   delete,old.example.org,,\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_zones_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(gateway.zone_dns_names(), vec!["example.com."]);
    }

    #[tokio::test]
    async fn zone_delete_is_idempotent() {
        let gateway = FakeGateway::new();
        let csv = "action,dns_name\ndelete,ghost.example.com\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_zones_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.outcomes[0].status, RowStatus::Skipped);
    }

    #[tokio::test]
    async fn zone_create_over_existing_conflicts() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let csv = "action,dns_name\ncreate,example.com\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_zones_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.outcomes[0].status, RowStatus::Failed);
    }

    #[tokio::test]
    async fn zone_delete_row_removes_listed_record_sets_first() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        gateway.seed_record(
            "example.com.",
            rrset("www.example.com.", RecordType::A, 300, &["192.0.2.1"]),
        );
        let csv = "action,dns_name,record_info\n\
                   delete,example.com,A:www.example.com.\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_zones_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        assert!(gateway.zone_dns_names().is_empty());
    }

    #[tokio::test]
    async fn zone_replace_row_recreates_the_zone() {
        let gateway = FakeGateway::with_zones(&["example.com."]);
        let csv = "action,dns_name,gcp_name,description\n\
                   replace,example.com,example-com,rebuilt\n";

        let report = reconciler(&gateway, ApplyOptions::default())
            .apply_zones_csv(csv.as_bytes())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.outcomes[0].detail.as_deref(), Some("replaced existing"));
        assert_eq!(gateway.zone_dns_names(), vec!["example.com."]);
    }
}
