//! # Workflow Engine
//!
//! Applies one action to one audience of a release:
//!
//! 1. resolve the audience; widen it to every partner for release actions;
//! 2. reject outright if any audience process is in one of the action's
//!    blocking states;
//! 3. move each audience process along its table edge, or eject it when the
//!    table has no edge for its state;
//! 4. notify partners and the customer per the action's email audience;
//! 5. purge ejected processes and any partner left empty.
//!
//! Steps 1–3 can fail; when they do the caller gets their release back
//! untouched and no notification is sent. Steps 4 and 5 cannot fail:
//! notifier errors are recorded, not propagated.
//!
//! The engine is stateless apart from its shared, immutable definition, so
//! one instance can serve any number of release lineages. Callers must
//! still serialize writes within one lineage.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use cutover_core::{ExecutionId, PartnerId, ProcessId, Timestamp};
use cutover_release::{Partner, Release};
use cutover_state::{Action, EmailAudience, ProcessState};

use crate::audience::Audience;
use crate::definition::WorkflowDefinition;
use crate::notify::{Notification, NotificationKind, Notifier, Recipient};
use crate::outcome::{
    DeliveryStatus, Execution, ExecutionReport, NotificationRecord, Rejection, TransitionCause,
    TransitionRecord,
};

/// Delivery error recorded when a notifier panics.
const NOTIFIER_PANICKED: &str = "notifier panicked";

/// Order in which notification groups are dispatched.
const DISPATCH_ORDER: [EmailAudience; 3] = [
    EmailAudience::NonEjectedPartners,
    EmailAudience::EjectedPartners,
    EmailAudience::Customer,
];

#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    definition: Arc<WorkflowDefinition>,
}

impl WorkflowEngine {
    pub fn new(definition: Arc<WorkflowDefinition>) -> Self {
        Self { definition }
    }

    /// An engine over [`WorkflowDefinition::standard`].
    pub fn standard() -> Self {
        Self::new(Arc::new(WorkflowDefinition::standard()))
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    pub fn next_state(&self, state: ProcessState, action: Action) -> Option<ProcessState> {
        self.definition.next_state(state, action)
    }

    pub fn actions_for_states(&self, states: &[ProcessState]) -> Vec<Action> {
        self.definition.actions_for_states(states)
    }

    /// Actions applicable to the states of the checked processes.
    pub fn bulk_actions(&self, release: &Release) -> Vec<Action> {
        let mut states = Vec::new();
        for process in release.checked_processes() {
            if !states.contains(&process.state()) {
                states.push(process.state());
            }
        }
        self.actions_for_states(&states)
    }

    /// Apply `action` to `audience`. See the module docs for the steps.
    pub fn execute_action(
        &self,
        release: &Release,
        action: Action,
        audience: &Audience,
        notifier: &mut dyn Notifier,
    ) -> Execution {
        let id = ExecutionId::new();
        let span = tracing::info_span!("execute_action", execution = %id, action = action.name());
        let _guard = span.enter();

        match self.try_execute(id, release, action, audience, notifier) {
            Ok((release, report)) => {
                tracing::info!(
                    transitions = report.transitions.len(),
                    purged = report.purged_processes.len(),
                    removed_partners = report.removed_partners.len(),
                    notifications = report.notifications.len(),
                    "action applied"
                );
                Execution::Applied { release, report }
            }
            Err(rejection) => {
                match &rejection {
                    Rejection::Internal(_) => {
                        tracing::error!(error = %rejection, "action aborted")
                    }
                    _ => tracing::warn!(error = %rejection, "action rejected"),
                }
                Execution::Rejected {
                    release: release.clone(),
                    rejection,
                }
            }
        }
    }

    fn try_execute(
        &self,
        id: ExecutionId,
        release: &Release,
        action: Action,
        audience: &Audience,
        notifier: &mut dyn Notifier,
    ) -> Result<(Release, ExecutionReport), Rejection> {
        // Audience, widened for release actions.
        let mut partners = audience.resolve(release)?;
        let widened = action.is_release_action() && partners.len() < release.partners().len();
        if widened {
            tracing::debug!(requested = partners.len(), "release action widened to all partners");
            partners = release.partner_ids();
        }
        let audience_processes = release.processes_of(&partners);

        // Precondition gate.
        let blocked_by = action.block_for_states();
        if !blocked_by.is_empty() {
            let mut blocking = Vec::new();
            let mut processes = Vec::new();
            for process in &audience_processes {
                if blocked_by.contains(&process.state()) {
                    if !blocking.contains(&process.state()) {
                        blocking.push(process.state());
                    }
                    processes.push(process.id().clone());
                }
            }
            if !processes.is_empty() {
                return Err(Rejection::Blocked {
                    action,
                    blocking,
                    processes,
                });
            }
        }

        // Transitions.
        let mut transitions = Vec::with_capacity(audience_processes.len());
        let mut updates = BTreeMap::new();
        for process in &audience_processes {
            let partner = release
                .owner_of(process.id())
                .ok_or_else(|| {
                    Rejection::Internal(format!("process {} has no owner", process.id()))
                })?;
            let from = process.state();
            let (to, cause) = match self.definition.next_state(from, action) {
                Some(to) if to == from => (to, TransitionCause::SelfLoop),
                Some(to) => (to, TransitionCause::Edge),
                None => {
                    tracing::warn!(
                        process = %process.id(),
                        partner = %partner.id(),
                        state = from.name(),
                        action = action.name(),
                        "no transition defined; ejecting process"
                    );
                    (ProcessState::Ejected, TransitionCause::Fallback)
                }
            };
            if to != from {
                tracing::debug!(
                    process = %process.id(),
                    from = from.name(),
                    to = to.name(),
                    "transition"
                );
                updates.insert(process.id().clone(), to);
            }
            transitions.push(TransitionRecord {
                process: process.id().clone(),
                partner: partner.id().clone(),
                from,
                to,
                cause,
            });
        }
        // Every update id comes from this release, so this only fails if the
        // roster and the audience disagree.
        let transitioned = release
            .with_process_states(&updates)
            .map_err(|e| Rejection::Internal(e.to_string()))?;

        // Notifications. From here on nothing can reject.
        let valid: Vec<ProcessId> = transitions
            .iter()
            .filter(|t| t.is_valid())
            .map(|t| t.process.clone())
            .collect();
        let ejected: Vec<ProcessId> = transitions
            .iter()
            .filter(|t| t.is_ejection())
            .map(|t| t.process.clone())
            .collect();
        let mut notifications = Vec::new();
        for group in DISPATCH_ORDER {
            if !action.notifies(group) {
                continue;
            }
            let template = action.template(group);
            match group {
                EmailAudience::NonEjectedPartners => {
                    for partner in transitioned.partners_for_processes(&valid) {
                        notifications.push(partner_notification(
                            NotificationKind::PartnerUpdate,
                            partner,
                            template,
                            action,
                        ));
                    }
                }
                EmailAudience::EjectedPartners => {
                    for partner in transitioned.partners_for_processes(&ejected) {
                        notifications.push(partner_notification(
                            NotificationKind::PartnerEjection,
                            partner,
                            template,
                            action,
                        ));
                    }
                }
                EmailAudience::Customer => notifications.push(Notification {
                    kind: NotificationKind::Customer,
                    recipient: Recipient::Customer,
                    template,
                    action,
                }),
            }
        }
        let notifications: Vec<NotificationRecord> = notifications
            .into_iter()
            .map(|notification| deliver(notifier, notification))
            .collect();

        // Purge.
        let purged = transitioned.purge_ejected();
        let purged_processes: Vec<ProcessId> = transitioned
            .processes()
            .filter(|p| purged.process(p.id()).is_none())
            .map(|p| p.id().clone())
            .collect();
        let removed_partners: Vec<PartnerId> = transitioned
            .partner_ids()
            .into_iter()
            .filter(|id| purged.partner(id).is_none())
            .collect();
        for partner in &removed_partners {
            tracing::info!(partner = %partner, "partner removed from release");
        }

        let report = ExecutionReport {
            id,
            executed_at: Timestamp::now(),
            action,
            audience: partners,
            widened,
            transitions,
            purged_processes,
            removed_partners,
            notifications,
        };
        Ok((purged, report))
    }
}

fn partner_notification(
    kind: NotificationKind,
    partner: &Partner,
    template: &'static str,
    action: Action,
) -> Notification {
    Notification {
        kind,
        recipient: Recipient::Partner {
            id: partner.id().clone(),
            name: partner.name().to_string(),
        },
        template,
        action,
    }
}

/// Hand one notification to the notifier. Neither an error nor a panic
/// escapes; both are recorded as a failed delivery.
fn deliver(notifier: &mut dyn Notifier, notification: Notification) -> NotificationRecord {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| notifier.notify(&notification)));
    let delivery = match outcome {
        Ok(Ok(())) => DeliveryStatus::Delivered,
        Ok(Err(e)) => {
            tracing::warn!(
                recipient = %notification.recipient,
                template = notification.template,
                error = %e,
                "notification failed"
            );
            DeliveryStatus::Failed {
                error: e.to_string(),
            }
        }
        Err(_) => {
            tracing::warn!(
                recipient = %notification.recipient,
                template = notification.template,
                "notifier panicked"
            );
            DeliveryStatus::Failed {
                error: NOTIFIER_PANICKED.to_string(),
            }
        }
    };
    NotificationRecord {
        notification,
        delivery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotifyError, RecordingNotifier};
    use cutover_release::demo_release;
    use cutover_state::{Action as A, ProcessState as S};

    fn pid(s: &str) -> ProcessId {
        ProcessId::new(s).unwrap()
    }

    fn partner(s: &str) -> PartnerId {
        PartnerId::new(s).unwrap()
    }

    fn applied(execution: Execution) -> (Release, ExecutionReport) {
        match execution {
            Execution::Applied { release, report } => (release, report),
            Execution::Rejected { rejection, .. } => panic!("rejected: {rejection}"),
        }
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&mut self, _: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Unavailable("smtp down".into()))
        }
    }

    struct PanickingNotifier;

    impl Notifier for PanickingNotifier {
        fn notify(&mut self, _: &Notification) -> Result<(), NotifyError> {
            panic!("mail relay crashed")
        }
    }

    #[test]
    fn bulk_actions_follow_checked_processes() {
        let engine = WorkflowEngine::standard();
        let release = demo_release().unwrap();
        assert!(engine.bulk_actions(&release).is_empty());

        let release = release.with_partner_checked(&partner("ASIM"), true).unwrap();
        assert_eq!(engine.bulk_actions(&release), vec![A::SendMigrationT45Letter]);
    }

    #[test]
    fn release_action_is_widened_and_reported() {
        let engine = WorkflowEngine::standard();
        let release = demo_release().unwrap();
        let (next, report) = applied(engine.execute_action(
            &release,
            A::SendMigrationT45Letter,
            &Audience::Partner(partner("ASIM")),
            &mut RecordingNotifier::default(),
        ));
        assert!(report.widened);
        assert_eq!(report.audience.len(), 4);
        assert_eq!(report.transitions.len(), 10);
        assert_eq!(next.states(), vec![S::MigrationT45LetterSent]);
    }

    #[test]
    fn scoped_action_is_not_widened() {
        let engine = WorkflowEngine::standard();
        let release = demo_release()
            .unwrap()
            .with_process_state(&pid("ASIM_1"), S::MigrationT45StageComplete)
            .unwrap();
        let (next, report) = applied(engine.execute_action(
            &release,
            A::RequestConnectionInfo,
            &Audience::Partner(partner("HASSAN")),
            &mut RecordingNotifier::default(),
        ));
        assert!(!report.widened);
        assert_eq!(report.audience, vec![partner("HASSAN")]);
        // HASSAN_1 is at START: no edge, ejected, and HASSAN had one line.
        assert_eq!(report.fallback_count(), 1);
        assert_eq!(report.removed_partners, vec![partner("HASSAN")]);
        assert!(next.partner(&partner("HASSAN")).is_none());
        assert_eq!(next.process(&pid("ASIM_1")).unwrap().state(), S::MigrationT45StageComplete);
    }

    #[test]
    fn blocked_action_returns_input_and_sends_nothing() {
        let engine = WorkflowEngine::standard();
        let release = demo_release()
            .unwrap()
            .with_process_state(&pid("AAMIR_3"), S::MigrationT45StageComplete)
            .unwrap();
        let mut notifier = RecordingNotifier::default();
        let execution = engine.execute_action(
            &release,
            A::SendMigrationT15Letter,
            &Audience::All,
            &mut notifier,
        );
        assert_eq!(execution.release(), &release);
        assert_eq!(
            execution.rejection(),
            Some(&Rejection::Blocked {
                action: A::SendMigrationT15Letter,
                blocking: vec![S::MigrationT45StageComplete],
                processes: vec![pid("AAMIR_3")],
            })
        );
        assert!(notifier.sent.is_empty());
    }

    #[test]
    fn unknown_partner_rejected_before_anything_happens() {
        let engine = WorkflowEngine::standard();
        let release = demo_release().unwrap();
        let execution = engine.execute_action(
            &release,
            A::AcknowledgeMigrationLetter,
            &Audience::Partner(partner("ZED")),
            &mut RecordingNotifier::default(),
        );
        assert!(!execution.is_applied());
        assert_eq!(execution.into_release(), release);
    }

    #[test]
    fn customer_notified_once_and_partners_per_group() {
        let engine = WorkflowEngine::standard();
        let release = demo_release().unwrap();
        let mut notifier = RecordingNotifier::default();
        applied(engine.execute_action(
            &release,
            A::SendMigrationT45Letter,
            &Audience::All,
            &mut notifier,
        ));

        let customers = notifier
            .sent
            .iter()
            .filter(|n| n.kind == NotificationKind::Customer)
            .count();
        let updates: Vec<_> = notifier
            .sent
            .iter()
            .filter(|n| n.kind == NotificationKind::PartnerUpdate)
            .map(|n| n.recipient.to_string())
            .collect();
        assert_eq!(customers, 1);
        assert_eq!(
            updates,
            vec!["Asim <ASIM>", "Aamir <AAMIR>", "Hassan <HASSAN>", "Ahmed <AHMED>"]
        );
        assert!(notifier.sent.iter().all(|n| n.template == "migration-t45-letter"));
        assert_eq!(notifier.sent.last().unwrap().kind, NotificationKind::Customer);
    }

    #[test]
    fn ejected_partners_get_ejection_notice() {
        let engine = WorkflowEngine::standard();
        let release = demo_release().unwrap();
        let (sent, _) = applied(engine.execute_action(
            &release,
            A::SendMigrationT45Letter,
            &Audience::All,
            &mut RecordingNotifier::default(),
        ));
        let acked = sent
            .with_process_state(&pid("ASIM_1"), S::MigrationT45LetterAcknowledged)
            .unwrap();

        let mut notifier = RecordingNotifier::default();
        let (done, report) = applied(engine.execute_action(
            &acked,
            A::FinalizeMigrationT45Stage,
            &Audience::All,
            &mut notifier,
        ));
        // Nine processes take the explicit T-45 ejection edge.
        assert_eq!(report.ejections().count(), 9);
        assert_eq!(report.fallback_count(), 0);
        assert_eq!(done.processes().count(), 1);
        assert_eq!(done.partner_ids(), vec![partner("ASIM")]);

        let ejection_notices: Vec<_> = notifier
            .sent
            .iter()
            .filter(|n| n.kind == NotificationKind::PartnerEjection)
            .map(|n| n.template)
            .collect();
        assert_eq!(ejection_notices.len(), 4);
        assert!(ejection_notices.iter().all(|t| *t == "release-ejection"));
        assert!(notifier
            .sent
            .iter()
            .all(|n| n.kind != NotificationKind::PartnerUpdate));
    }

    #[test]
    fn notifier_failure_does_not_roll_back() {
        let engine = WorkflowEngine::standard();
        let release = demo_release().unwrap();
        let (next, report) = applied(engine.execute_action(
            &release,
            A::SendMigrationT45Letter,
            &Audience::All,
            &mut FailingNotifier,
        ));
        assert_eq!(next.states(), vec![S::MigrationT45LetterSent]);
        assert_eq!(report.failed_notifications().count(), 5);
    }

    #[test]
    fn notifier_panic_is_recorded_and_state_still_commits() {
        let engine = WorkflowEngine::standard();
        let release = demo_release().unwrap();
        let execution = std::panic::catch_unwind(AssertUnwindSafe(|| {
            engine.execute_action(
                &release,
                A::SendMigrationT45Letter,
                &Audience::All,
                &mut PanickingNotifier,
            )
        }))
        .expect("notifier panic escaped execute_action");
        let (next, report) = applied(execution);
        assert_eq!(next.processes().count(), 10);
        assert_eq!(next.states(), vec![S::MigrationT45LetterSent]);
        assert_eq!(report.failed_notifications().count(), 5);
        assert!(report.failed_notifications().all(|n| n.delivery
            == DeliveryStatus::Failed {
                error: NOTIFIER_PANICKED.to_string()
            }));
    }

    #[test]
    fn purge_report_covers_stale_ejections_outside_the_audience() {
        let engine = WorkflowEngine::standard();
        let release = demo_release()
            .unwrap()
            .with_process_state(&pid("AHMED_2"), S::Ejected)
            .unwrap()
            .with_process_state(&pid("HASSAN_1"), S::ConnectionInfoRequested)
            .unwrap();
        let (next, report) = applied(engine.execute_action(
            &release,
            A::SendReminder,
            &Audience::Partner(partner("HASSAN")),
            &mut RecordingNotifier::default(),
        ));
        assert_eq!(report.ejections().count(), 0);
        assert_eq!(report.purged_processes, vec![pid("AHMED_2")]);
        assert!(report.removed_partners.is_empty());
        assert!(next.process(&pid("AHMED_2")).is_none());
        assert!(next.process(&pid("AHMED_1")).is_some());
    }

    #[test]
    fn self_loop_records_without_changing_state() {
        let engine = WorkflowEngine::standard();
        let release = demo_release()
            .unwrap()
            .with_process_state(&pid("HASSAN_1"), S::ConnectionInfoRequested)
            .unwrap();
        let (next, report) = applied(engine.execute_action(
            &release,
            A::SendReminder,
            &Audience::Partner(partner("HASSAN")),
            &mut RecordingNotifier::default(),
        ));
        assert_eq!(next, release);
        assert_eq!(report.transitions[0].cause, TransitionCause::SelfLoop);
        assert!(report.notifications.is_empty());
    }
}
