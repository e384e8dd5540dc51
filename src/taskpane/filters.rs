//! Template/section filter state.
//!
//! The section vocabulary depends on the selected template, so changing the
//! template always drops the section.

use crate::catalog::types::FilterOptions;
use crate::error::FilterError;

/// The user's current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub template_type: Option<String>,
    pub section_name: Option<String>,
}

impl FilterState {
    pub fn has_active_filters(&self) -> bool {
        self.template_type.is_some() || self.section_name.is_some()
    }
}

#[derive(Debug, Default)]
pub struct FilterManager {
    options: Option<FilterOptions>,
    state: FilterState,
    sections: Vec<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl FilterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the vocabulary fetched at startup. Until this happens the
    /// filters are disabled.
    pub fn set_options(&mut self, options: FilterOptions) {
        self.options = Some(options);
        self.recompute_sections();
    }

    pub fn is_enabled(&self) -> bool {
        self.options.is_some()
    }

    pub fn template_types(&self) -> &[String] {
        self.options
            .as_ref()
            .map(|o| o.template_types.as_slice())
            .unwrap_or_default()
    }

    /// Sections valid for the selected template. Empty when no template is
    /// selected, which disables the section dropdown.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn has_active_filters(&self) -> bool {
        self.state.has_active_filters()
    }

    /// Select a template (empty clears it). The section is always cleared.
    pub fn set_template(&mut self, template: &str) -> &[String] {
        self.state.template_type = non_empty(template);
        self.state.section_name = None;
        self.recompute_sections();
        &self.sections
    }

    /// Select a section (empty clears it). Only values from the current
    /// template's vocabulary are accepted; the state is untouched otherwise.
    pub fn set_section(&mut self, section: &str) -> Result<(), FilterError> {
        let Some(section) = non_empty(section) else {
            self.state.section_name = None;
            return Ok(());
        };

        let Some(template) = self.state.template_type.as_deref() else {
            return Err(FilterError::NoTemplate);
        };

        if !self.sections.iter().any(|s| *s == section) {
            return Err(FilterError::UnknownSection {
                template: template.to_string(),
                section,
            });
        }

        self.state.section_name = Some(section);
        Ok(())
    }

    fn recompute_sections(&mut self) {
        self.sections = match (&self.options, &self.state.template_type) {
            (Some(options), Some(template)) => options.sections_for(template).to_vec(),
            _ => Vec::new(),
        };
    }
}
