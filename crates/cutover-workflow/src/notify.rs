//! # Notification Collaborator
//!
//! The engine decides who should hear about an execution and with which
//! template; a [`Notifier`] decides how. Delivery is synchronous and
//! best-effort: a failed or panicking delivery is logged and recorded on the
//! execution report, and never undoes state that was already applied.

use serde::Serialize;
use thiserror::Error;

use cutover_core::PartnerId;
use cutover_state::Action;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A partner whose processes moved along the table.
    PartnerUpdate,
    /// A partner that lost process lines to ejection.
    PartnerEjection,
    /// The customer running the release.
    Customer,
}

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recipient {
    Partner { id: PartnerId, name: String },
    Customer,
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Partner { id, name } => write!(f, "{name} <{id}>"),
            Self::Customer => f.write_str("customer"),
        }
    }
}

/// One message the engine wants sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient: Recipient,
    /// Template identifier, e.g. `migration-t45-letter`.
    pub template: &'static str,
    pub action: Action,
}

/// Delivery failure reported by a [`Notifier`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),

    #[error("{recipient} rejected the message: {reason}")]
    Rejected { recipient: String, reason: String },
}

/// Delivers notifications on behalf of the engine.
///
/// Implementations should return promptly. The engine calls `notify` inline
/// and has no timeout of its own.
pub trait Notifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Vec<Notification>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.push(notification.clone());
        Ok(())
    }
}

/// Emits one `tracing` event per notification.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    customer: String,
}

impl LogNotifier {
    /// `customer` is the display name used for customer-directed messages.
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        let recipient = match &notification.recipient {
            Recipient::Customer => self.customer.clone(),
            partner => partner.to_string(),
        };
        tracing::info!(
            kind = ?notification.kind,
            recipient = %recipient,
            template = notification.template,
            action = notification.action.name(),
            "notification sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partner_note() -> Notification {
        Notification {
            kind: NotificationKind::PartnerUpdate,
            recipient: Recipient::Partner {
                id: PartnerId::new("ASIM").unwrap(),
                name: "Asim".into(),
            },
            template: "migration-t45-letter",
            action: Action::SendMigrationT45Letter,
        }
    }

    #[test]
    fn recording_notifier_keeps_order() {
        let mut notifier = RecordingNotifier::default();
        let customer = Notification {
            kind: NotificationKind::Customer,
            recipient: Recipient::Customer,
            ..partner_note()
        };
        notifier.notify(&partner_note()).unwrap();
        notifier.notify(&customer).unwrap();
        assert_eq!(notifier.sent, vec![partner_note(), customer]);
    }

    #[test]
    fn log_notifier_never_fails() {
        let mut notifier = LogNotifier::new("Contoso");
        assert!(notifier.notify(&partner_note()).is_ok());
    }

    #[test]
    fn recipient_display() {
        assert_eq!(partner_note().recipient.to_string(), "Asim <ASIM>");
        assert_eq!(Recipient::Customer.to_string(), "customer");
    }

    #[test]
    fn serializes_for_reports() {
        let json = serde_json::to_value(partner_note()).unwrap();
        assert_eq!(json["kind"], "partner_update");
        assert_eq!(json["recipient"]["type"], "partner");
        assert_eq!(json["recipient"]["id"], "ASIM");
        assert_eq!(json["action"], "SEND_MIGRATION_T45_LETTER");
    }
}
