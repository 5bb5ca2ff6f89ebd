// ABOUTME: Diagnostics accumulator for non-fatal warnings during a redeployment.
// ABOUTME: Collects problems that must not change the outcome but should be shown to users.

/// Collects non-fatal warnings during a run.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn scratch_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ScratchCleanup,
            message: message.into(),
        }
    }

    pub fn app_listing(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::AppListing,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The local scratch directory could not be removed.
    ScratchCleanup,
    /// The final application listing failed after a successful run.
    AppListing,
}
