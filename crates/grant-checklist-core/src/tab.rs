/// One of the four summary categories shown as tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryTab {
    #[default]
    Eligibility,
    Documents,
    Narrative,
    Deadlines,
}

impl SummaryTab {
    pub fn all() -> [SummaryTab; 4] {
        [
            SummaryTab::Eligibility,
            SummaryTab::Documents,
            SummaryTab::Narrative,
            SummaryTab::Deadlines,
        ]
    }

    /// Fragment token for this tab (the part after `#` in a location)
    pub fn as_fragment(&self) -> &'static str {
        match self {
            SummaryTab::Eligibility => "eligibility",
            SummaryTab::Documents => "documents",
            SummaryTab::Narrative => "narrative",
            SummaryTab::Deadlines => "deadlines",
        }
    }

    /// Map a location fragment to a tab. A leading `#` is ignored; anything
    /// outside the four known tokens yields `None`.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let token = fragment.strip_prefix('#').unwrap_or(fragment);
        Self::all().into_iter().find(|tab| tab.as_fragment() == token)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryTab::Eligibility => "Eligibility Criteria",
            SummaryTab::Documents => "Required Documents",
            SummaryTab::Narrative => "Project Narrative Components",
            SummaryTab::Deadlines => "Key Deadlines",
        }
    }

    /// Guidance line shown above the tab's bullet list
    pub fn blurb(&self) -> &'static str {
        match self {
            SummaryTab::Eligibility => {
                "Ensure you adhere to the extracted eligibility criteria before continuing with your application."
            }
            SummaryTab::Documents => "Include the following documents in your proposal.",
            SummaryTab::Narrative => {
                "The following sections must be included in the project narrative. Navigate to the chatbot through the toolbar for help crafting a narrative draft."
            }
            SummaryTab::Deadlines => "Note the following key deadlines for this grant.",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SummaryTab::Eligibility => 0,
            SummaryTab::Documents => 1,
            SummaryTab::Narrative => 2,
            SummaryTab::Deadlines => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::all().get(idx).copied()
    }

    pub fn next(&self) -> Self {
        Self::from_index((self.index() + 1) % 4).unwrap_or_default()
    }

    pub fn prev(&self) -> Self {
        Self::from_index((self.index() + 3) % 4).unwrap_or_default()
    }
}
