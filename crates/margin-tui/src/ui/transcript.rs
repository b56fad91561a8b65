use chrono::{DateTime, Local};
use margin_core::report::AnalysisReport;

/// One entry in the conversation view.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEntry {
    User {
        text: String,
        at: DateTime<Local>,
    },
    Agent {
        text: String,
        at: DateTime<Local>,
    },
    /// Placeholder shown while a submission is in flight. Tagged with the
    /// request id so its removal can be keyed to exactly one response.
    Pending {
        text: String,
        request: u64,
    },
    Report {
        report: AnalysisReport,
        at: DateTime<Local>,
    },
}

/// Append-only conversation state. The single exception to append-only is
/// the removal of a pending placeholder once its response (or failure)
/// arrives.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    pub fn push_user(&mut self, text: String) {
        self.entries.push(ChatEntry::User {
            text,
            at: Local::now(),
        });
    }

    pub fn push_agent(&mut self, text: String) {
        self.entries.push(ChatEntry::Agent {
            text,
            at: Local::now(),
        });
    }

    pub fn push_pending(&mut self, text: String, request: u64) {
        self.entries.push(ChatEntry::Pending { text, request });
    }

    pub fn push_report(&mut self, report: AnalysisReport) {
        self.entries.push(ChatEntry::Report {
            report,
            at: Local::now(),
        });
    }

    /// Removes the pending placeholder for `request`. Returns false if it
    /// was already gone, so a second removal can never disturb the view.
    pub fn remove_pending(&mut self, request: u64) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !matches!(e, ChatEntry::Pending { request: r, .. } if *r == request));
        self.entries.len() != before
    }

    pub fn has_pending(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e, ChatEntry::Pending { .. }))
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }
}
