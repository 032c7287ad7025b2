//! Registry of slicing-property definitions.

use std::collections::{BTreeMap, BTreeSet};

use prl_core::{PrlError, Property, Result, SlicingPropertyDefinition};

use crate::state::CompilerState;
use crate::syntax::{compile_properties, PrlProperty, PrlSlicingPropertyDefinition};

/// The slicing properties of a model and the ranges used for each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    definitions: BTreeMap<String, SlicingPropertyDefinition>,
}

impl PropertyStore {
    /// Registers a slicing-property declaration.
    ///
    /// Redeclaring a property with the same type is accepted and keeps the
    /// first declaration.
    pub(crate) fn add_slicing_property_definition(
        &mut self,
        definition: &PrlSlicingPropertyDefinition,
        state: &mut CompilerState,
    ) -> bool {
        state.context.line_number = definition.line_number;
        match self.definitions.get(&definition.name) {
            Some(existing) if existing.property_type() != definition.property_type => {
                state.add_error("Slicing property type does not match the defined property type.");
                false
            }
            Some(_) => true,
            None => {
                let compiled =
                    SlicingPropertyDefinition::new(&definition.name, definition.property_type)
                        .with_line_number(definition.line_number);
                self.definitions.insert(definition.name.clone(), compiled);
                true
            }
        }
    }

    /// Checks the properties of a feature definition or rule and records
    /// their ranges in the matching slicing-property definitions.
    pub(crate) fn add_properties(&mut self, properties: &[PrlProperty], state: &mut CompilerState) {
        if !self.check_properties(properties, state) {
            return;
        }
        for property in properties {
            state.context.line_number = property.line_number;
            self.add_property(property, state);
        }
    }

    /// Checks that property names are unique and that every slicing
    /// property has the declared type.
    pub(crate) fn check_properties(
        &self,
        properties: &[PrlProperty],
        state: &mut CompilerState,
    ) -> bool {
        let names: BTreeSet<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        if names.len() != properties.len() {
            state.add_error("Properties in feature or rule are not unique");
            return false;
        }
        let compiled = compile_properties(properties);
        if !self.types_match(&compiled) {
            state.add_error("Property type does not match slicing property type");
            return false;
        }
        true
    }

    fn types_match(&self, properties: &BTreeMap<String, Property>) -> bool {
        self.definitions.values().all(|def| {
            properties
                .get(&def.name)
                .map_or(true, |p| p.property_type() == def.property_type())
        })
    }

    fn add_property(&mut self, property: &PrlProperty, state: &mut CompilerState) -> bool {
        let Some(definition) = self.definitions.get_mut(&property.name) else {
            return true;
        };
        match definition.add_range(&property.range) {
            Ok(()) => true,
            Err(PrlError::PropertyTypeMismatch { name, .. }) => {
                state.add_error(format!(
                    "Property '{}' type is not matching the defined slicing property type",
                    name
                ));
                false
            }
            Err(err) => {
                state.add_error(err);
                false
            }
        }
    }

    /// Whether `name` is a declared slicing property.
    pub fn is_slicing_property(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// The definition of a slicing property.
    ///
    /// # Errors
    ///
    /// Returns [`PrlError::UnknownProperty`] if no property of this name was
    /// declared.
    pub fn definition(&self, name: &str) -> Result<&SlicingPropertyDefinition> {
        self.definitions
            .get(name)
            .ok_or_else(|| PrlError::UnknownProperty(name.to_string()))
    }

    /// All definitions, ordered by name.
    pub fn definitions(&self) -> impl Iterator<Item = &SlicingPropertyDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
