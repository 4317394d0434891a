//! Document locations as typed by the user: `document[?folder=name][#tab]`

use reqwest::Url;
use uuid::Uuid;

use crate::error::ApiError;
use crate::tab::SummaryTab;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    pub document: String,
    pub folder: Option<String>,
    pub fragment: Option<String>,
}

impl DocumentLocation {
    /// Split a location string into document, folder and fragment.
    ///
    /// Returns `None` when no document identifier is present.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        let (rest, fragment) = match input.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_string())),
            None => (input, None),
        };

        let (document, query) = match rest.split_once('?') {
            Some((doc, query)) => (doc, Some(query)),
            None => (rest, None),
        };

        let folder = query.and_then(folder_param);

        if document.is_empty() {
            return None;
        }

        Some(Self {
            document: document.to_string(),
            folder,
            fragment: fragment.filter(|f| !f.is_empty()),
        })
    }

    /// Folder the document belongs to, falling back to the document itself
    pub fn effective_folder(&self) -> &str {
        self.folder.as_deref().unwrap_or(&self.document)
    }

    /// Tab requested by the fragment, if it names one
    pub fn requested_tab(&self) -> Option<SummaryTab> {
        self.fragment.as_deref().and_then(SummaryTab::from_fragment)
    }
}

/// Percent-decoded `folder` value of a query string
fn folder_param(query: &str) -> Option<String> {
    let url = Url::parse(&format!("http://localhost/?{}", query)).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "folder")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Link into a fresh drafting session for `document`. Every call mints a new
/// session id.
pub fn playground_link(base_url: &str, document: &str) -> Result<String, ApiError> {
    // Without a trailing slash, `join` would replace the last path segment
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    let base = Url::parse(&normalized).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
    let path = format!("chatbot/playground/{}", Uuid::new_v4());
    let mut url = base
        .join(&path)
        .map_err(|_| ApiError::InvalidUrl(format!("{}{}", normalized, path)))?;
    url.query_pairs_mut().append_pair("folder", document);
    Ok(url.to_string())
}
