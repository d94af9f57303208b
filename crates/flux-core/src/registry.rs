//! Section registry.
//!
//! Sections are kept in registration order; that order is the order in
//! which they run and appear in the notebook.

use std::sync::OnceLock;

use flux_model::DatasetKind;

use crate::error::RegistryError;
use crate::section::Section;
use crate::sections::BUILTIN_SECTIONS;

/// Ordered collection of uniquely named sections.
#[derive(Default)]
pub struct SectionRegistry {
    sections: Vec<Box<dyn Section>>,
}

impl SectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in section.
    pub fn builtin() -> Self {
        Self {
            sections: BUILTIN_SECTIONS
                .iter()
                .map(|section| Box::new(*section) as Box<dyn Section>)
                .collect(),
        }
    }

    /// Appends a section.
    ///
    /// # Errors
    ///
    /// `DuplicateSection` if a section with the same name is registered.
    pub fn register(&mut self, section: Box<dyn Section>) -> Result<(), RegistryError> {
        if self.get(section.name()).is_some() {
            return Err(RegistryError::DuplicateSection {
                name: section.name().to_string(),
            });
        }
        self.sections.push(section);
        Ok(())
    }

    /// Sections declaring `kind`, in registration order.
    pub fn applicable(&self, kind: DatasetKind) -> Vec<&dyn Section> {
        self.iter().filter(|section| section.applies_to(kind)).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Section> {
        self.iter().find(|section| section.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Section> + '_ {
        self.sections.iter().map(AsRef::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.iter().map(|section| section.name())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

static BUILTIN_REGISTRY: OnceLock<SectionRegistry> = OnceLock::new();

/// Shared registry of built-in sections, built on first access.
pub fn builtin_registry() -> &'static SectionRegistry {
    BUILTIN_REGISTRY.get_or_init(SectionRegistry::builtin)
}
