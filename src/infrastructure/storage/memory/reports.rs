//! In-memory malfunction report store
//!
//! Keeps a denormalised approved-count per station next to the reports so
//! `approved_count` never scans. The counter only moves on a transition
//! into or out of APPROVED.

use std::collections::BTreeSet;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, MalfunctionReport, ReportRepository, ReportStatus, ReportText,
};

#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: DashMap<Uuid, MalfunctionReport>,
    approved_counts: DashMap<i32, u32>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn increment(&self, station_id: i32) {
        *self.approved_counts.entry(station_id).or_insert(0) += 1;
    }

    fn decrement(&self, station_id: i32) {
        if let Some(mut count) = self.approved_counts.get_mut(&station_id) {
            *count = count.saturating_sub(1);
        }
        self.approved_counts.remove_if(&station_id, |_, count| *count == 0);
    }

    fn sorted(mut reports: Vec<MalfunctionReport>) -> Vec<MalfunctionReport> {
        reports.sort_by(|a, b| a.filed_at.cmp(&b.filed_at).then(a.id.cmp(&b.id)));
        reports
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn save(&self, station_id: i32, report_text: &ReportText) -> DomainResult<Uuid> {
        let report = MalfunctionReport::new(station_id, report_text.clone());
        let id = report.id;
        self.reports.insert(id, report);
        Ok(id)
    }

    async fn has_duplicate(&self, station_id: i32, report_text: &str) -> DomainResult<bool> {
        Ok(self
            .reports
            .iter()
            .any(|r| r.station_id == station_id && r.report_text.as_str() == report_text))
    }

    async fn find(&self, report_id: Uuid) -> DomainResult<Option<MalfunctionReport>> {
        Ok(self.reports.get(&report_id).map(|r| r.clone()))
    }

    async fn set_status(
        &self,
        report_id: Uuid,
        status: ReportStatus,
    ) -> DomainResult<ReportStatus> {
        let mut report = self
            .reports
            .get_mut(&report_id)
            .ok_or_else(|| DomainError::report_not_found(report_id))?;

        let previous = report.status;
        report.status = status;

        // Counter is updated while the report entry is still locked.
        match (previous.is_approved(), status.is_approved()) {
            (false, true) => self.increment(report.station_id),
            (true, false) => self.decrement(report.station_id),
            _ => {}
        }

        debug!(%report_id, station_id = report.station_id, %previous, %status, "Report status set");
        Ok(previous)
    }

    async fn approved_count(&self, station_id: i32) -> DomainResult<u32> {
        Ok(self
            .approved_counts
            .get(&station_id)
            .map(|c| *c)
            .unwrap_or(0))
    }

    async fn all(&self) -> DomainResult<Vec<MalfunctionReport>> {
        Ok(Self::sorted(
            self.reports.iter().map(|r| r.value().clone()).collect(),
        ))
    }

    async fn pending(&self) -> DomainResult<Vec<MalfunctionReport>> {
        Ok(Self::sorted(
            self.reports
                .iter()
                .filter(|r| r.is_pending())
                .map(|r| r.value().clone())
                .collect(),
        ))
    }

    async fn affected_station_ids(&self) -> DomainResult<BTreeSet<i32>> {
        Ok(self
            .approved_counts
            .iter()
            .filter(|e| *e.value() > 0)
            .map(|e| *e.key())
            .collect())
    }

    async fn clear(&self, station_id: i32) -> DomainResult<()> {
        self.reports.retain(|_, r| r.station_id != station_id);
        self.approved_counts.remove(&station_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ReportText {
        ReportText::parse(s).unwrap()
    }

    async fn recount(repo: &InMemoryReportRepository, station_id: i32) -> u32 {
        repo.all()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.station_id == station_id && r.status.is_approved())
            .count() as u32
    }

    #[tokio::test]
    async fn save_creates_pending_report() {
        let repo = InMemoryReportRepository::new();
        let id = repo.save(7, &text("Broken cable")).await.unwrap();

        let report = repo.find(id).await.unwrap().unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.station_id, 7);
        assert_eq!(repo.pending().await.unwrap().len(), 1);
        assert_eq!(repo.approved_count(7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn save_does_not_enforce_duplicates() {
        let repo = InMemoryReportRepository::new();
        repo.save(7, &text("Broken cable")).await.unwrap();
        repo.save(7, &text("Broken cable")).await.unwrap();
        assert_eq!(repo.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn has_duplicate_matches_station_and_exact_text() {
        let repo = InMemoryReportRepository::new();
        let id = repo.save(7, &text("Broken cable")).await.unwrap();
        repo.set_status(id, ReportStatus::Rejected).await.unwrap();

        assert!(repo.has_duplicate(7, "Broken cable").await.unwrap());
        assert!(!repo.has_duplicate(8, "Broken cable").await.unwrap());
        assert!(!repo.has_duplicate(7, "broken cable").await.unwrap());
    }

    #[tokio::test]
    async fn set_status_unknown_report_fails() {
        let repo = InMemoryReportRepository::new();
        let err = repo
            .set_status(Uuid::new_v4(), ReportStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn approval_counter_is_symmetric() {
        let repo = InMemoryReportRepository::new();
        let id = repo.save(7, &text("No power")).await.unwrap();

        assert_eq!(
            repo.set_status(id, ReportStatus::Approved).await.unwrap(),
            ReportStatus::Pending
        );
        assert_eq!(repo.approved_count(7).await.unwrap(), 1);

        // re-approving does not double count
        repo.set_status(id, ReportStatus::Approved).await.unwrap();
        assert_eq!(repo.approved_count(7).await.unwrap(), 1);

        repo.set_status(id, ReportStatus::Rejected).await.unwrap();
        assert_eq!(repo.approved_count(7).await.unwrap(), 0);
        assert!(repo.affected_station_ids().await.unwrap().is_empty());

        // rejecting a rejected report leaves the counter alone
        repo.set_status(id, ReportStatus::Rejected).await.unwrap();
        assert_eq!(repo.approved_count(7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn affected_stations_have_approved_reports() {
        let repo = InMemoryReportRepository::new();
        let a = repo.save(1, &text("a")).await.unwrap();
        repo.save(2, &text("b")).await.unwrap();
        let c = repo.save(3, &text("c")).await.unwrap();
        repo.set_status(a, ReportStatus::Approved).await.unwrap();
        repo.set_status(c, ReportStatus::Approved).await.unwrap();

        let affected = repo.affected_station_ids().await.unwrap();
        assert_eq!(affected.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test]
    async fn clear_removes_only_that_station() {
        let repo = InMemoryReportRepository::new();
        for i in 0..3 {
            let id = repo.save(7, &text(&format!("report {i}"))).await.unwrap();
            repo.set_status(id, ReportStatus::Approved).await.unwrap();
        }
        let other = repo.save(8, &text("other")).await.unwrap();
        repo.set_status(other, ReportStatus::Approved).await.unwrap();

        repo.clear(7).await.unwrap();

        assert_eq!(repo.approved_count(7).await.unwrap(), 0);
        assert_eq!(repo.approved_count(8).await.unwrap(), 1);
        assert!(repo.all().await.unwrap().iter().all(|r| r.station_id == 8));
        assert!(!repo.affected_station_ids().await.unwrap().contains(&7));
    }

    #[tokio::test]
    async fn counter_matches_recount() {
        let repo = InMemoryReportRepository::new();
        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(repo.save(4, &text(&format!("r{i}"))).await.unwrap());
        }
        for (i, id) in ids.iter().enumerate() {
            let status = if i % 3 == 0 {
                ReportStatus::Rejected
            } else {
                ReportStatus::Approved
            };
            repo.set_status(*id, status).await.unwrap();
        }
        repo.set_status(ids[1], ReportStatus::Rejected).await.unwrap();

        assert_eq!(repo.approved_count(4).await.unwrap(), recount(&repo, 4).await);
        assert_eq!(repo.approved_count(4).await.unwrap(), 3);
    }
}
