//! Cascading parent/child select
//!
//! The parent list holds kinds (for example every kind implementing a
//! generic); picking one triggers a fetch of that kind's objects, which become
//! the child list. Each parent selection hands out a [`ChildFetch`] ticket and
//! only the ticket of the latest selection may apply its result, so a slow
//! response for an earlier parent can never overwrite the current children.

use crate::dropdown::SelectOption;

/// Issued when a parent is picked; present it back with the fetched children
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildFetch {
    pub generation: u64,
    pub parent: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Select2StepState {
    Idle,
    /// Child fetch in flight
    ParentSelected { parent: String },
    ChildrenLoaded {
        parent: String,
        children: Vec<SelectOption>,
    },
    ChildSelected {
        parent: String,
        children: Vec<SelectOption>,
        child: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Select2Step {
    state: Select2StepState,
    generation: u64,
}

impl Default for Select2Step {
    fn default() -> Self {
        Self::new()
    }
}

impl Select2Step {
    pub fn new() -> Self {
        Self {
            state: Select2StepState::Idle,
            generation: 0,
        }
    }

    /// Start with a value that is already set, as when editing an object.
    ///
    /// Children still have to be fetched; the returned ticket is for that fetch.
    pub fn with_value(parent: impl Into<String>, child: impl Into<String>) -> (Self, ChildFetch) {
        let mut select = Self::new();
        let fetch = select.select_parent(parent);
        let child = child.into();
        if let Select2StepState::ParentSelected { parent } = &select.state {
            select.state = Select2StepState::ChildSelected {
                parent: parent.clone(),
                children: Vec::new(),
                child,
            };
        }
        (select, fetch)
    }

    pub fn state(&self) -> &Select2StepState {
        &self.state
    }

    pub fn parent(&self) -> Option<&str> {
        match &self.state {
            Select2StepState::Idle => None,
            Select2StepState::ParentSelected { parent }
            | Select2StepState::ChildrenLoaded { parent, .. }
            | Select2StepState::ChildSelected { parent, .. } => Some(parent),
        }
    }

    pub fn children(&self) -> &[SelectOption] {
        match &self.state {
            Select2StepState::ChildrenLoaded { children, .. }
            | Select2StepState::ChildSelected { children, .. } => children,
            _ => &[],
        }
    }

    pub fn child(&self) -> Option<&str> {
        match &self.state {
            Select2StepState::ChildSelected { child, .. } => Some(child),
            _ => None,
        }
    }

    /// A child fetch is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self.state, Select2StepState::ParentSelected { .. })
    }

    /// Pick a parent. Clears the children and any selected child.
    pub fn select_parent(&mut self, parent: impl Into<String>) -> ChildFetch {
        self.generation += 1;
        let parent = parent.into();
        self.state = Select2StepState::ParentSelected {
            parent: parent.clone(),
        };
        ChildFetch {
            generation: self.generation,
            parent,
        }
    }

    /// Apply fetched children. Returns `false` and leaves the state untouched
    /// when `fetch` is not the latest ticket.
    pub fn children_loaded(&mut self, fetch: &ChildFetch, children: Vec<SelectOption>) -> bool {
        if fetch.generation != self.generation {
            tracing::debug!(
                stale = fetch.generation,
                current = self.generation,
                parent = %fetch.parent,
                "Dropping stale child options"
            );
            return false;
        }

        let state = std::mem::replace(&mut self.state, Select2StepState::Idle);
        self.state = match state {
            Select2StepState::ParentSelected { parent } => {
                Select2StepState::ChildrenLoaded { parent, children }
            }
            // a preset value keeps its child once the options arrive
            Select2StepState::ChildSelected { parent, child, .. } => {
                Select2StepState::ChildSelected {
                    parent,
                    children,
                    child,
                }
            }
            Select2StepState::ChildrenLoaded { parent, .. } => {
                Select2StepState::ChildrenLoaded { parent, children }
            }
            Select2StepState::Idle => Select2StepState::Idle,
        };
        true
    }

    /// Pick a child of the current parent; returns `(parent, child)` to report
    /// upward, or `None` when no parent is selected
    pub fn select_child(&mut self, child: impl Into<String>) -> Option<(String, String)> {
        let state = std::mem::replace(&mut self.state, Select2StepState::Idle);
        let (parent, children) = match state {
            Select2StepState::ChildrenLoaded { parent, children }
            | Select2StepState::ChildSelected {
                parent, children, ..
            } => (parent, children),
            Select2StepState::ParentSelected { parent } => (parent, Vec::new()),
            Select2StepState::Idle => return None,
        };
        let child = child.into();
        self.state = Select2StepState::ChildSelected {
            parent: parent.clone(),
            children,
            child: child.clone(),
        };
        Some((parent, child))
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = Select2StepState::Idle;
    }
}
