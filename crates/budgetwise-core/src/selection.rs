use budgetwise_domain::{InsightKind, DEFAULT_SELECTED_INSIGHTS};

/// Ordered, capped list of insight kinds the user pinned to the overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightSelection {
    kinds: Vec<InsightKind>,
    max: usize,
}

/// Result of [`InsightSelection::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// The selection is full; nothing was evicted.
    AtCapacity,
}

impl InsightSelection {
    pub fn new(max: usize) -> Self {
        Self {
            kinds: Vec::new(),
            max,
        }
    }

    /// Builds a selection from stored kinds, dropping duplicates and anything past `max`.
    pub fn from_kinds(kinds: impl IntoIterator<Item = InsightKind>, max: usize) -> Self {
        let mut selection = Self::new(max);
        for kind in kinds {
            if selection.kinds.len() >= max {
                break;
            }
            if !selection.contains(kind) {
                selection.kinds.push(kind);
            }
        }
        selection
    }

    pub fn toggle(&mut self, kind: InsightKind) -> ToggleOutcome {
        if let Some(pos) = self.kinds.iter().position(|selected| *selected == kind) {
            self.kinds.remove(pos);
            return ToggleOutcome::Deselected;
        }
        if self.is_full() {
            return ToggleOutcome::AtCapacity;
        }
        self.kinds.push(kind);
        ToggleOutcome::Selected
    }

    pub fn contains(&self, kind: InsightKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_full(&self) -> bool {
        self.kinds.len() >= self.max
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn kinds(&self) -> &[InsightKind] {
        &self.kinds
    }

    pub fn into_kinds(self) -> Vec<InsightKind> {
        self.kinds
    }
}

impl Default for InsightSelection {
    fn default() -> Self {
        Self::from_kinds(InsightKind::ALL, DEFAULT_SELECTED_INSIGHTS)
    }
}
