// src/config/state.rs
use super::options::AppOptions;

#[derive(Clone, Debug, Default)]
pub struct GuiState {
    /// Which institutions are selected in the left panel
    pub selected_institutions: Vec<String>,

    /// Active tab index into router::PAGES
    pub current_page_index: usize,

    /// Authors page -> only researchers that already have an ORCID
    pub authors_only_with_orcid: bool,
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}

impl AppState {
    pub fn with_options(options: AppOptions) -> Self {
        Self { options, gui: GuiState::default() }
    }
}
