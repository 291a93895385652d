use ratatui::widgets::ListState;

use crate::filters::CategoryField;

/// Popup state for picking a categorical filter value. The first list entry
/// is always the "All" sentinel.
#[derive(Default)]
pub struct SelectModal {
    pub active: bool,
    pub field: Option<CategoryField>,
    pub options: Vec<String>,
    pub list_state: ListState,
}

impl SelectModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of list entries including the "All" sentinel.
    pub fn entry_count(&self) -> usize {
        self.options.len() + 1
    }

    /// Open the popup for a field. The highlight starts on the current
    /// selection, or on "All" when the selection is stale or unset.
    pub fn open(&mut self, field: CategoryField, options: Vec<String>, current: Option<&str>) {
        let highlighted = current
            .and_then(|value| options.iter().position(|opt| opt == value))
            .map(|idx| idx + 1)
            .unwrap_or(0);
        self.active = true;
        self.field = Some(field);
        self.options = options;
        self.list_state = ListState::default();
        self.list_state.select(Some(highlighted));
    }

    pub fn close(&mut self) {
        self.active = false;
        self.field = None;
        self.options.clear();
        self.list_state = ListState::default();
    }

    pub fn next(&mut self) {
        let count = self.entry_count();
        let idx = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((idx + 1) % count));
    }

    pub fn previous(&mut self) {
        let count = self.entry_count();
        let idx = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((idx + count - 1) % count));
    }

    /// The highlighted choice; inner `None` is the "All" sentinel.
    pub fn choice(&self) -> Option<Option<String>> {
        let idx = self.list_state.selected()?;
        if idx == 0 {
            Some(None)
        } else {
            self.options.get(idx - 1).map(|value| Some(value.clone()))
        }
    }
}
