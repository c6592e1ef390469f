//! Page navigation and per-session selections

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::{AllocationParams, HyperparameterSet, ModelSettings};

/// Workflow pages, in forward order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) enum Page {
    #[default]
    #[serde(rename = "upload_page")]
    Upload,
    #[serde(rename = "hyperparameter_adjustment")]
    HyperparameterAdjustment,
    #[serde(rename = "model_run")]
    ModelRun,
}

/// User-triggered navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavAction {
    Next,
    Back,
}

impl Page {
    pub(crate) fn id(self) -> &'static str {
        match self {
            Page::Upload => "upload_page",
            Page::HyperparameterAdjustment => "hyperparameter_adjustment",
            Page::ModelRun => "model_run",
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Page::Upload => "Data Upload & Validation",
            Page::HyperparameterAdjustment => "Model Hyperparameter Configuration",
            Page::ModelRun => "Model Run",
        }
    }

    /// One step forward or back; the first and last pages hold at their edge.
    pub(crate) fn transition(self, action: NavAction) -> Page {
        match (self, action) {
            (Page::Upload, NavAction::Next) => Page::HyperparameterAdjustment,
            (Page::HyperparameterAdjustment, NavAction::Next) => Page::ModelRun,
            (Page::ModelRun, NavAction::Next) => Page::ModelRun,
            (Page::Upload, NavAction::Back) => Page::Upload,
            (Page::HyperparameterAdjustment, NavAction::Back) => Page::Upload,
            (Page::ModelRun, NavAction::Back) => Page::HyperparameterAdjustment,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What a session should display right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Page(Page),
    AllocationResults,
}

/// Everything one session remembers between commands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct SessionState {
    #[serde(default)]
    pub(crate) page: Page,
    #[serde(default)]
    pub(crate) customer: Option<String>,
    #[serde(default)]
    pub(crate) country: Option<String>,
    #[serde(default)]
    pub(crate) selected_run: Option<String>,
    #[serde(default)]
    pub(crate) selected_model: Option<String>,
    /// `None` until the user changes a range; defaults apply meanwhile
    #[serde(default)]
    pub(crate) hyperparameters: Option<HyperparameterSet>,
    #[serde(default)]
    pub(crate) settings: ModelSettings,
    #[serde(default)]
    pub(crate) allocation: Option<AllocationParams>,
    #[serde(default)]
    pub(crate) view_allocation: bool,
}

impl SessionState {
    /// Move between pages. Selections made on other pages are kept.
    pub(crate) fn navigate(&mut self, action: NavAction) -> Page {
        self.page = self.page.transition(action);
        self.page
    }

    /// Allocation results take over the display while they are open,
    /// whatever page the session is on.
    pub(crate) fn view(&self) -> View {
        if self.view_allocation && self.allocation.is_some() {
            View::AllocationResults
        } else {
            View::Page(self.page)
        }
    }

    pub(crate) fn require_page(&self, required: Page) -> Result<(), AppError> {
        if self.page == required {
            Ok(())
        } else {
            Err(AppError::WrongPage {
                current: self.page,
                required,
            })
        }
    }

    pub(crate) fn hyperparameters(&self) -> HyperparameterSet {
        self.hyperparameters.clone().unwrap_or_default()
    }

    pub(crate) fn set_customer(&mut self, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyCustomer);
        }
        self.customer = Some(name.to_string());
        Ok(())
    }

    /// Switching to another run drops the model chosen from the previous one.
    pub(crate) fn select_run(&mut self, folder: &str) {
        if self.selected_run.as_deref() != Some(folder) {
            self.selected_model = None;
        }
        self.selected_run = Some(folder.to_string());
    }

    pub(crate) fn select_model(&mut self, model: &str) {
        self.selected_model = Some(model.to_string());
    }

    pub(crate) fn open_results(&mut self, params: AllocationParams) {
        self.allocation = Some(params);
        self.view_allocation = true;
    }

    /// Leave the results view and return to chart selection
    pub(crate) fn close_results(&mut self) {
        self.view_allocation = false;
        self.selected_model = None;
    }
}
