//! Grant summaries: wire format, display transform, and the load lifecycle
//! of the summary pane.

use serde::Deserialize;

use crate::tab::SummaryTab;

/// One extracted requirement as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryItem {
    pub item: String,
    pub description: String,
}

/// Body of the document-summary endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SummaryPayload {
    pub grant_name: String,
    pub eligibility_criteria: Vec<SummaryItem>,
    pub required_documents: Vec<SummaryItem>,
    pub project_narrative_sections: Vec<SummaryItem>,
    pub key_deadlines: Vec<SummaryItem>,
}

/// The endpoint answers either with the payload itself or wrapped in `data`
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum SummaryEnvelope {
    Wrapped { data: SummaryPayload },
    Bare(SummaryPayload),
}

impl SummaryEnvelope {
    pub(crate) fn into_payload(self) -> SummaryPayload {
        match self {
            SummaryEnvelope::Wrapped { data } => data,
            SummaryEnvelope::Bare(payload) => payload,
        }
    }
}

/// Display-ready summary: each section is a newline-joined markdown list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantSummary {
    pub grant_name: String,
    pub eligibility: String,
    pub documents: String,
    pub narrative: String,
    pub deadlines: String,
}

impl GrantSummary {
    pub fn from_payload(payload: &SummaryPayload) -> Self {
        Self {
            grant_name: payload.grant_name.clone(),
            eligibility: format_section(&payload.eligibility_criteria),
            documents: format_section(&payload.required_documents),
            narrative: format_section(&payload.project_narrative_sections),
            deadlines: format_section(&payload.key_deadlines),
        }
    }

    pub fn section(&self, tab: SummaryTab) -> &str {
        match tab {
            SummaryTab::Eligibility => &self.eligibility,
            SummaryTab::Documents => &self.documents,
            SummaryTab::Narrative => &self.narrative,
            SummaryTab::Deadlines => &self.deadlines,
        }
    }
}

/// Render records as `- **item**: description`, one per line, input order kept
pub fn format_section(items: &[SummaryItem]) -> String {
    items
        .iter()
        .map(|entry| format!("- **{}**: {}", entry.item, entry.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Identifies one summary load. Only the most recently issued ticket may
/// update the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub document: String,
}

/// State of the summary pane: what is shown and which load is current
#[derive(Debug, Default)]
pub struct SummaryView {
    pub summary: GrantSummary,
    pub active_tab: SummaryTab,
    pub loading: bool,
    document: Option<String>,
    generation: u64,
}

impl SummaryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Start a load for `document`, superseding any load still in flight
    pub fn begin_load(&mut self, document: &str) -> LoadTicket {
        self.generation += 1;
        self.document = Some(document.to_string());
        self.loading = true;
        tracing::info!(document, generation = self.generation, "loading grant summary");
        LoadTicket {
            generation: self.generation,
            document: document.to_string(),
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
            && self.document.as_deref() == Some(ticket.document.as_str())
    }

    /// Apply the outcome of a load. Returns false when the ticket was
    /// superseded and the outcome was dropped.
    pub fn finish_load<E: std::fmt::Display>(
        &mut self,
        ticket: &LoadTicket,
        outcome: Result<SummaryPayload, E>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::warn!(
                document = %ticket.document,
                generation = ticket.generation,
                "discarding stale summary response"
            );
            return false;
        }

        match outcome {
            Ok(payload) => {
                self.summary = GrantSummary::from_payload(&payload);
                tracing::info!(document = %ticket.document, grant = %self.summary.grant_name, "grant summary loaded");
            }
            Err(e) => {
                tracing::error!(document = %ticket.document, "Error loading grant summary: {}", e);
            }
        }
        self.loading = false;
        true
    }

    /// Follow a location fragment. Unknown fragments leave the tab alone.
    pub fn apply_fragment(&mut self, fragment: &str) -> bool {
        match SummaryTab::from_fragment(fragment) {
            Some(tab) => {
                self.active_tab = tab;
                true
            }
            None => false,
        }
    }

    pub fn select_tab(&mut self, tab: SummaryTab) {
        self.active_tab = tab;
    }

    pub fn active_section(&self) -> &str {
        self.summary.section(self.active_tab)
    }
}
