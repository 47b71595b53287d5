// DB Migrator Modal State
//
// Visibility of the help and settings dialogs, plus the settings dialog's
// unsaved-changes close flow.

use log::debug;
use migrator_utils::ThemeSink;
use strum_macros::{Display, EnumIter, EnumString};

use crate::persistence::PersistenceResult;
use crate::settings::SettingsStore;

/// Plain open/closed dialog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    open: bool,
}

impl ModalState {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Tabs of the settings dialog, one per settings section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SettingsTab {
    #[default]
    General,
    Console,
    Execution,
    Advanced,
    Theme,
}

/// Result of asking the settings dialog to close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// Unsaved changes exist; the dialog stays open behind a warning
    UnsavedWarning,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsModal {
    open: bool,
    active_tab: SettingsTab,
    unsaved_warning: bool,
}

impl SettingsModal {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn active_tab(&self) -> SettingsTab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: SettingsTab) {
        self.active_tab = tab;
    }

    pub fn shows_unsaved_warning(&self) -> bool {
        self.unsaved_warning
    }

    /// "Save & Close" is only offered while something is unsaved.
    pub fn can_save<S: ThemeSink>(&self, store: &SettingsStore<S>) -> bool {
        store.has_unsaved_changes()
    }

    /// Close unless there are unsaved changes, in which case raise the
    /// warning instead.
    pub fn request_close<S: ThemeSink>(&mut self, store: &SettingsStore<S>) -> CloseOutcome {
        if store.has_unsaved_changes() {
            debug!("Settings dialog close blocked by unsaved changes");
            self.unsaved_warning = true;
            return CloseOutcome::UnsavedWarning;
        }
        self.open = false;
        CloseOutcome::Closed
    }

    /// Persist, then close the dialog and the warning. On a storage error the
    /// dialog stays as it was.
    pub fn save_and_close<S: ThemeSink>(
        &mut self,
        store: &mut SettingsStore<S>,
    ) -> PersistenceResult<()> {
        store.save()?;
        self.open = false;
        self.unsaved_warning = false;
        Ok(())
    }

    /// Close without saving. The edited values stay in memory; only the
    /// unsaved flag is dropped.
    pub fn discard<S: ThemeSink>(&mut self, store: &mut SettingsStore<S>) {
        store.set_unsaved_changes(false);
        self.unsaved_warning = false;
        self.open = false;
    }

    /// Dismiss the warning and keep editing
    pub fn cancel_warning(&mut self) {
        self.unsaved_warning = false;
    }
}
