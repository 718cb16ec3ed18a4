//! Single-choice selection of blocks, grouped by category.
//!
//! The presentation layer asks [`Selector::available_in`] for the blocks of the
//! active tab, shows them in a picker and hands the chosen id back to
//! [`Selector::select`]. A [`Session`] follows one render cycle at a time.

use serde::Serialize;

use crate::model::Category;
use crate::registry::{Registry, RegistryError};
use crate::render::RenderResult;

/// One entry of a selection control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Choice<'r> {
    pub id: &'r str,
    pub label: &'r str,
}

/// What a category has to offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Availability<'r> {
    /// Nothing registered yet; the UI should say so instead of showing a blank control.
    Empty { category: Category },
    Choices(Vec<Choice<'r>>),
}

impl<'r> Availability<'r> {
    pub fn choices(&self) -> &[Choice<'r>] {
        match self {
            Availability::Empty { .. } => &[],
            Availability::Choices(c) => c,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Availability::Empty { .. })
    }

    /// User-facing explanation of an empty category.
    pub fn message(&self) -> Option<String> {
        match self {
            Availability::Empty { category } => Some(format!(
                "{} charts are coming soon. No blocks are available in this section yet.",
                category.title().trim_end_matches(" Data")
            )),
            Availability::Choices(_) => None,
        }
    }
}

/// The block chosen for the current render cycle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub category: Category,
    pub id: String,
}

/// Read-only view over a [`Registry`] for selection controls.
#[derive(Clone, Copy, Debug)]
pub struct Selector<'r> {
    registry: &'r Registry,
}

impl<'r> Selector<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn available_in(&self, category: Category) -> Availability<'r> {
        let choices: Vec<Choice<'r>> = self
            .registry
            .list_by_category(category)
            .map(|d| Choice {
                id: d.id.as_str(),
                label: d.display_label.as_str(),
            })
            .collect();
        if choices.is_empty() {
            Availability::Empty { category }
        } else {
            Availability::Choices(choices)
        }
    }

    pub fn select(&self, id: &str) -> Result<Selection, RegistryError> {
        let descriptor = self.registry.get(id)?;
        Ok(Selection {
            category: descriptor.category,
            id: descriptor.id.clone(),
        })
    }

    /// Selections for every block of a category, in registration order.
    pub fn all_in(&self, category: Category) -> Vec<Selection> {
        self.registry
            .list_by_category(category)
            .map(|d| Selection {
                category,
                id: d.id.clone(),
            })
            .collect()
    }
}

/// Where the current render cycle stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleState {
    Unselected,
    Selected(Selection),
    Rendered(Selection),
    Degraded { selection: Selection, message: String },
}

impl CycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CycleState::Rendered(_) | CycleState::Degraded { .. })
    }
}

/// Tracks the active tab and the state of the block selected in it.
#[derive(Clone, Debug)]
pub struct Session {
    active: Option<Category>,
    state: CycleState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            active: None,
            state: CycleState::Unselected,
        }
    }

    pub fn active_tab(&self) -> Option<Category> {
        self.active
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    /// Switch tabs. Always restarts the cycle.
    pub fn activate_tab(&mut self, category: Category) {
        self.active = Some(category);
        self.state = CycleState::Unselected;
    }

    /// Choose a block. Switches the active tab to the block's category.
    /// On error the session keeps its previous state.
    pub fn choose(&mut self, selector: &Selector<'_>, id: &str) -> Result<Selection, RegistryError> {
        let selection = selector.select(id)?;
        self.active = Some(selection.category);
        self.state = CycleState::Selected(selection.clone());
        Ok(selection)
    }

    /// Record the outcome of rendering the current selection.
    ///
    /// Results for a block other than the selected one are ignored, as is any
    /// result arriving while nothing is selected.
    pub fn finish(&mut self, result: &RenderResult) {
        let CycleState::Selected(selection) = &self.state else {
            return;
        };
        if selection.id != result.id() {
            return;
        }
        let selection = selection.clone();
        self.state = match result {
            RenderResult::Rendered { .. } => CycleState::Rendered(selection),
            RenderResult::Degraded(d) => CycleState::Degraded {
                selection,
                message: d.message.clone(),
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockContent, BlockDescriptor};

    fn registry() -> Registry {
        let mut reg = Registry::new();
        for (id, label) in [("yield", "Yield per Acre"), ("cert", "Certification Status")] {
            reg.register(BlockDescriptor::new(
                id,
                Category::Economic,
                label,
                BlockContent::Fragment {
                    markup: "<b>x</b>".into(),
                },
                200,
            ))
            .unwrap();
        }
        reg
    }

    #[test]
    fn empty_category_reports_explicit_state() {
        let reg = registry();
        let avail = Selector::new(&reg).available_in(Category::Social);
        assert!(avail.is_empty());
        assert!(avail.choices().is_empty());
        assert_eq!(
            avail.message().as_deref(),
            Some("Social charts are coming soon. No blocks are available in this section yet.")
        );
    }

    #[test]
    fn choices_keep_registration_order() {
        let reg = registry();
        let avail = Selector::new(&reg).available_in(Category::Economic);
        let ids: Vec<_> = avail.choices().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["yield", "cert"]);
        assert_eq!(avail.message(), None);
    }

    #[test]
    fn failed_choice_keeps_session_state() {
        let reg = registry();
        let selector = Selector::new(&reg);
        let mut session = Session::new();
        session.choose(&selector, "cert").unwrap();
        assert!(session.choose(&selector, "nope").is_err());
        assert_eq!(
            session.state(),
            &CycleState::Selected(Selection {
                category: Category::Economic,
                id: "cert".into()
            })
        );
        assert_eq!(session.active_tab(), Some(Category::Economic));
    }

    #[test]
    fn activating_a_tab_restarts_the_cycle() {
        let reg = registry();
        let selector = Selector::new(&reg);
        let mut session = Session::new();
        session.choose(&selector, "yield").unwrap();
        session.activate_tab(Category::Geographic);
        assert_eq!(session.state(), &CycleState::Unselected);
        assert!(!session.state().is_terminal());
    }
}
