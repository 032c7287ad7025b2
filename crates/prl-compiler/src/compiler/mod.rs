//! The rule-file compiler.
//!
//! Compilation runs in three phases. Slicing properties are registered
//! first, then feature definitions (including the pseudo features of group
//! rules), then rules. Every phase reports its problems as diagnostics in
//! the [`CompilerState`]; rules are only compiled if the definitions are
//! free of errors.

mod constraint;


use std::time::Instant;

use prl_core::{BooleanFeature, EnumFeature, FeatureTarget, IntFeature, Rule, Theory};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CompileError;
use crate::model::{PrlModel, PrlModelHeader, PrlVersion};
use crate::state::CompilerState;
use crate::store::{FeatureStore, PropertyStore, TheoryMap};
use crate::syntax::{
    compile_properties, PrlFeatureDefinition, PrlFeatureRule, PrlRule, PrlRuleFile, PrlRuleKind,
};

use constraint::ConstraintCompiler;

/// Compiles parsed rule files into [`PrlModel`]s.
///
/// # Example
///
/// ```
/// use prl_compiler::syntax::{PrlConstraint, PrlFeatureDefinition, PrlRule, PrlRuleFile, PrlRuleKind};
/// use prl_compiler::PrlCompiler;
///
/// let mut file = PrlRuleFile::default();
/// file.rule_set.feature_definitions.push(PrlFeatureDefinition::boolean("a"));
/// file.rule_set.rules.push(PrlRule::new(PrlRuleKind::Constraint(PrlConstraint::feature("b"))));
///
/// let mut compiler = PrlCompiler::new();
/// let model = compiler.compile(&file);
/// assert!(compiler.has_errors());
/// assert_eq!(compiler.errors(), ["No feature definition found for b"]);
/// assert!(model.rules().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct PrlCompiler {
    state: CompilerState,
}

impl PrlCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[String] {
        self.state.errors()
    }

    pub fn warnings(&self) -> &[String] {
        self.state.warnings()
    }

    pub fn infos(&self) -> &[String] {
        self.state.infos()
    }

    pub fn has_errors(&self) -> bool {
        self.state.has_errors()
    }

    pub fn state(&self) -> &CompilerState {
        &self.state
    }

    /// Compiles a rule file.
    ///
    /// The model is always returned; check [`has_errors`](Self::has_errors)
    /// before using it.
    pub fn compile(&mut self, rule_file: &PrlRuleFile) -> PrlModel {
        let start = Instant::now();
        info!(
            event = "compile_start",
            file = rule_file.file_name.as_deref().unwrap_or("<unnamed>"),
            slicing_properties = rule_file.slicing_property_definitions.len(),
            feature_definitions = rule_file.rule_set.feature_definitions.len(),
            rules = rule_file.rule_set.rules.len(),
        );

        let header = PrlModelHeader {
            version: PrlVersion::new(rule_file.header.major, rule_file.header.minor),
            properties: compile_properties(&rule_file.header.properties),
        };

        let t1 = Instant::now();
        let mut property_store = self.compile_slicing_properties(rule_file);
        let t2 = Instant::now();
        let feature_store = self.compile_features(rule_file, &mut property_store);
        let t3 = Instant::now();
        let rules = if self.state.has_errors() {
            Vec::new()
        } else {
            self.compile_rules(rule_file, &mut property_store, &feature_store)
        };
        let t4 = Instant::now();
        self.state.context.clear();

        let properties = property_store.len();
        let definitions = feature_store.len();
        self.state.add_info(format!(
            "Compiled {} slicing property definition{} in {} ms.",
            properties,
            plural(properties),
            (t2 - t1).as_millis()
        ));
        self.state.add_info(format!(
            "Compiled {} feature definition{} in {} ms.",
            definitions,
            plural(definitions),
            (t3 - t2).as_millis()
        ));
        self.state.add_info(format!(
            "Compiled {} rule{} in {} ms.",
            rules.len(),
            plural(rules.len()),
            (t4 - t3).as_millis()
        ));

        info!(
            event = "compile_end",
            feature_definitions = definitions,
            rules = rules.len(),
            errors = self.state.errors().len(),
            duration_ms = start.elapsed().as_millis() as u64,
        );
        PrlModel::new(header, feature_store, rules, property_store)
    }

    fn compile_slicing_properties(&mut self, rule_file: &PrlRuleFile) -> PropertyStore {
        let mut store = PropertyStore::default();
        for definition in &rule_file.slicing_property_definitions {
            store.add_slicing_property_definition(definition, &mut self.state);
        }
        self.state.context.clear();
        debug!(event = "slicing_properties_compiled", count = store.len());
        store
    }

    fn compile_features(
        &mut self,
        rule_file: &PrlRuleFile,
        property_store: &mut PropertyStore,
    ) -> FeatureStore {
        let mut store = FeatureStore::default();
        for definition in &rule_file.rule_set.feature_definitions {
            self.state.context.feature = Some(definition.code.clone());
            self.state.context.line_number = definition.line_number;
            if is_invalid_name(&definition.code) {
                self.state
                    .add_error(format!("Feature name invalid: {}", definition.code));
                continue;
            }
            property_store.add_properties(&definition.properties, &mut self.state);
            if !self.state.has_errors() {
                store.add_definition(definition.compile(), property_store, false, &mut self.state);
            }
        }
        for rule in &rule_file.rule_set.rules {
            let PrlRuleKind::Group { group, .. } = &rule.kind else {
                continue;
            };
            self.state.context.feature = Some(group.clone());
            self.state.context.line_number = rule.line_number;
            if is_invalid_name(group) {
                self.state.add_error(format!("Rule name invalid: {}", group));
                continue;
            }
            property_store.check_properties(&rule.properties, &mut self.state);
            if !self.state.has_errors() {
                store.add_definition(
                    group_definition(group, rule).compile(),
                    property_store,
                    true,
                    &mut self.state,
                );
            }
        }
        self.state.context.clear();
        debug!(event = "features_compiled", count = store.len());
        store
    }

    fn compile_rules(
        &mut self,
        rule_file: &PrlRuleFile,
        property_store: &mut PropertyStore,
        feature_store: &FeatureStore,
    ) -> Vec<Rule> {
        let theories = feature_store.theory_map(rule_file.rule_set.features(), &mut self.state);
        if self.state.has_errors() {
            return Vec::new();
        }
        let mut rules = Vec::with_capacity(rule_file.rule_set.rules.len());
        for rule in &rule_file.rule_set.rules {
            // A generated id only labels diagnostics; the compiled rule keeps
            // its empty id.
            self.state.context.rule_id = Some(if rule.id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                rule.id.clone()
            });
            let errors = self.state.errors().len();
            property_store.add_properties(&rule.properties, &mut self.state);
            if self.state.errors().len() > errors {
                continue;
            }
            self.state.context.line_number = rule.line_number;
            match compile_rule(rule, &theories) {
                // Once an error was reported, rules are only checked.
                Ok(compiled) if !self.state.has_errors() => rules.push(compiled),
                Ok(_) => {}
                Err(err) => self.state.add_error(err),
            }
        }
        rules
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn is_invalid_name(code: &str) -> bool {
    code.contains('.')
}

fn group_definition(group: &str, rule: &PrlRule) -> PrlFeatureDefinition {
    PrlFeatureDefinition {
        description: rule.description.clone(),
        properties: rule.properties.clone(),
        line_number: rule.line_number,
        ..PrlFeatureDefinition::boolean(group)
    }
}

/// Compiles one rule against the resolved theories.
fn compile_rule(rule: &PrlRule, theories: &TheoryMap) -> Result<Rule, CompileError> {
    let cc = ConstraintCompiler::new(theories);
    let compiled = match &rule.kind {
        PrlRuleKind::Constraint(c) => Rule::constraint(cc.compile(c)?),
        PrlRuleKind::Inclusion { condition, then } => {
            Rule::inclusion(cc.compile(condition)?, cc.compile(then)?)
        }
        PrlRuleKind::Exclusion {
            condition,
            then_not,
        } => Rule::exclusion(cc.compile(condition)?, cc.compile(then_not)?),
        PrlRuleKind::IfThenElse {
            condition,
            then,
            otherwise,
        } => Rule::if_then_else(
            cc.compile(condition)?,
            cc.compile(then)?,
            cc.compile(otherwise)?,
        ),
        PrlRuleKind::Definition {
            feature,
            definition,
        } => Rule::definition(
            cc.unversioned_boolean_feature(feature)?,
            cc.compile(definition)?,
        )?,
        PrlRuleKind::Group {
            group_type,
            group,
            content,
        } => Rule::group(
            *group_type,
            cc.unversioned_boolean_feature(group)?,
            cc.boolean_features(content)?,
        ),
        PrlRuleKind::Mandatory(feature_rule) => {
            Rule::mandatory(feature_target(feature_rule, theories)?)
        }
        PrlRuleKind::Forbidden(feature_rule) => {
            Rule::forbidden(feature_target(feature_rule, theories)?)
        }
    };
    Ok(compiled
        .with_id(rule.id.clone())
        .with_description(rule.description.clone())
        .with_properties(compile_properties(&rule.properties))
        .with_line_number(rule.line_number))
}

fn feature_target(
    rule: &PrlFeatureRule,
    theories: &TheoryMap,
) -> Result<FeatureTarget, CompileError> {
    let code = rule.feature.as_str();
    let theory = theories
        .get(code)
        .ok_or_else(|| CompileError::UnknownFeature(code.to_string()))?;
    match (theory, &rule.enum_value, rule.int_value) {
        (Theory::Bool, None, None) => Ok(FeatureTarget::Boolean(BooleanFeature::new(code))),
        (Theory::Bool, _, _) => Err(CompileError::InvalidBooleanAssignment),
        (Theory::VersionedBool, None, Some(version)) => Ok(FeatureTarget::Version(
            BooleanFeature::versioned(code),
            version,
        )),
        (Theory::VersionedBool, _, _) => Err(CompileError::InvalidVersionedAssignment),
        (Theory::Enum, Some(value), None) => {
            Ok(FeatureTarget::Enum(EnumFeature::new(code), value.clone()))
        }
        (Theory::Enum, _, _) => Err(CompileError::InvalidEnumAssignment),
        (Theory::Int, None, Some(value)) => Ok(FeatureTarget::Int(IntFeature::new(code), value)),
        (Theory::Int, _, _) => Err(CompileError::InvalidIntAssignment),
    }
}
