//! Monitoring scheduler
//!
//! Periodically reconciles stored `is_overdue` flags with the true SLA
//! state and emits an event for every meaningful transition. One pass over
//! the candidate set is a *tick*; ticks never overlap, and the scheduled
//! loop and the operator-facing manual trigger share the identical
//! [`SlaMonitor::run_tick`] code path.

use crate::error::{Error, Result};
use crate::sink::{AuditRecord, AuditSink, NotificationSink};
use crate::store::{RequestStore, SlaFieldUpdate};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sla_core::{MonitorConfig, RequestSnapshot, SlaEvaluator, SlaEvent, SlaState};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One request that could not be processed during a tick
#[derive(Debug, Clone)]
pub struct TickFailure {
    /// Request whose update failed
    pub request_id: Uuid,
    /// Failure description
    pub reason: String,
}

/// Outcome summary of a single tick
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Instant all candidates were judged against
    pub started_at: DateTime<Utc>,
    /// Number of non-terminal candidates fetched
    pub candidates: usize,
    /// Requests newly marked overdue
    pub became_overdue: usize,
    /// Approaching-deadline warnings emitted
    pub warnings: usize,
    /// Per-request failures, isolated from their siblings
    pub failures: Vec<TickFailure>,
}

enum CandidateOutcome {
    Unchanged,
    BecameOverdue,
    Warned,
    Failed(TickFailure),
}

/// Recurring SLA monitor
///
/// Holds the single-flight execution lock: only one tick runs at a time,
/// whether scheduled or manually triggered.
pub struct SlaMonitor {
    store: Arc<dyn RequestStore>,
    notifications: Arc<dyn NotificationSink>,
    audit: Arc<dyn AuditSink>,
    evaluator: SlaEvaluator,
    tick_interval: Duration,
    running: Mutex<()>,
    // deadline each request was last warned for; an extension changes the
    // deadline and thereby re-arms the warning
    warned: DashMap<Uuid, DateTime<Utc>>,
}

impl SlaMonitor {
    /// Create a monitor over the given boundary implementations
    pub fn new(
        config: &MonitorConfig,
        store: Arc<dyn RequestStore>,
        notifications: Arc<dyn NotificationSink>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store,
            notifications,
            audit,
            evaluator: SlaEvaluator::new(chrono::Duration::minutes(config.upcoming_window_minutes)),
            tick_interval: Duration::from_secs(config.tick_interval_secs),
            running: Mutex::new(()),
            warned: DashMap::new(),
        })
    }

    /// Run one tick against the current wall-clock time.
    ///
    /// This is the manual-trigger entry point; the scheduled loop calls the
    /// same function. Fails with [`Error::TickInProgress`] when another
    /// tick is still running.
    pub async fn run_tick(&self) -> Result<TickReport> {
        self.run_tick_at(Utc::now()).await
    }

    /// Run one tick judging every candidate against the supplied instant.
    ///
    /// `now` is captured once per tick so all candidates are evaluated
    /// against the same reading; exposing it as a parameter also lets a
    /// pass be replayed for auditing.
    pub async fn run_tick_at(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let _guard = self.running.try_lock().map_err(|_| Error::TickInProgress)?;

        // A fetch failure aborts the whole tick; the next scheduled
        // interval is the retry.
        let candidates = self.store.fetch_non_terminal().await?;
        debug!("SLA tick at {}: {} candidates", now, candidates.len());

        let candidate_ids: HashSet<Uuid> = candidates.iter().map(|r| r.id).collect();
        self.warned.retain(|id, _| candidate_ids.contains(id));

        let outcomes = futures::future::join_all(
            candidates.iter().map(|request| self.process_candidate(request, now)),
        )
        .await;

        let mut report = TickReport {
            started_at: now,
            candidates: candidates.len(),
            became_overdue: 0,
            warnings: 0,
            failures: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                CandidateOutcome::Unchanged => {}
                CandidateOutcome::BecameOverdue => report.became_overdue += 1,
                CandidateOutcome::Warned => report.warnings += 1,
                CandidateOutcome::Failed(failure) => report.failures.push(failure),
            }
        }

        if report.failures.is_empty() {
            info!(
                "SLA tick complete: {} candidates, {} newly overdue, {} warnings",
                report.candidates, report.became_overdue, report.warnings
            );
        } else {
            warn!(
                "SLA tick complete with {} failures: {} candidates, {} newly overdue, {} warnings",
                report.failures.len(),
                report.candidates,
                report.became_overdue,
                report.warnings
            );
        }

        Ok(report)
    }

    /// Start the scheduled loop.
    ///
    /// Runs one tick per interval. A tick that outlasts the interval causes
    /// the next firing to be skipped, not queued.
    pub async fn run(self: Arc<Self>) {
        info!(
            "Starting SLA monitor loop with {}s interval",
            self.tick_interval.as_secs()
        );

        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match self.run_tick().await {
                Ok(report) => {
                    debug!(
                        "Scheduled tick done: {} candidates, {} failures",
                        report.candidates,
                        report.failures.len()
                    );
                }
                // A manual trigger is holding the lock; this interval's
                // pass is dropped, not queued.
                Err(Error::TickInProgress) => {
                    debug!("Tick already in progress, skipping scheduled pass");
                }
                Err(e) => {
                    warn!("SLA tick failed, retrying next interval: {}", e);
                }
            }
        }
    }

    async fn process_candidate(&self, request: &RequestSnapshot, now: DateTime<Utc>) -> CandidateOutcome {
        match self.evaluator.evaluate(request.status, request.sla_deadline, now) {
            SlaState::Overdue if !request.is_overdue => self.mark_overdue(request, now).await,
            SlaState::Upcoming => self.warn_approaching(request, now).await,
            // The monitor never un-marks an overdue request; only an
            // explicit extension clears the flag.
            _ => CandidateOutcome::Unchanged,
        }
    }

    async fn mark_overdue(&self, request: &RequestSnapshot, now: DateTime<Utc>) -> CandidateOutcome {
        // Evaluator only returns Overdue for a present deadline
        let deadline = match request.sla_deadline {
            Some(deadline) => deadline,
            None => return CandidateOutcome::Unchanged,
        };

        // Persist first; events follow only a durable state change.
        if let Err(e) = self
            .store
            .update_sla_fields(request.id, request.version, SlaFieldUpdate::mark_overdue())
            .await
        {
            warn!("Failed to mark request {} overdue: {}", request.id, e);
            return CandidateOutcome::Failed(TickFailure {
                request_id: request.id,
                reason: e.to_string(),
            });
        }

        info!("Request {} became overdue (deadline {})", request.id, deadline);

        let event = SlaEvent::became_overdue(request.id, deadline, now);
        self.emit(&event, request.assigned_user_id).await;
        self.audit_record(AuditRecord::became_overdue(request.id, deadline, now))
            .await;

        CandidateOutcome::BecameOverdue
    }

    async fn warn_approaching(&self, request: &RequestSnapshot, now: DateTime<Utc>) -> CandidateOutcome {
        let deadline = match request.sla_deadline {
            Some(deadline) => deadline,
            None => return CandidateOutcome::Unchanged,
        };

        // Warn once per (request, deadline); an extension re-arms.
        if self.warned.get(&request.id).map(|entry| *entry) == Some(deadline) {
            return CandidateOutcome::Unchanged;
        }
        self.warned.insert(request.id, deadline);

        debug!(
            "Request {} approaching deadline {} (now {})",
            request.id, deadline, now
        );

        let event = SlaEvent::approaching_deadline(request.id, deadline, now);
        self.emit(&event, request.assigned_user_id).await;

        CandidateOutcome::Warned
    }

    // Sink delivery is fire-and-forget: failures are logged, never allowed
    // to fail a persisted state change.
    async fn emit(&self, event: &SlaEvent, target: Option<Uuid>) {
        if let Err(e) = self.notifications.deliver(event, target).await {
            warn!(
                "Notification delivery failed for request {}: {}",
                event.request_id, e
            );
        }
    }

    async fn audit_record(&self, record: AuditRecord) {
        let entity_id = record.entity_id;
        if let Err(e) = self.audit.record(record).await {
            warn!("Audit write failed for request {}: {}", entity_id, e);
        }
    }
}
