//! Rule-file pipeline that hides the compiler and transpiler wiring.

use std::path::Path;
use std::time::Instant;

use prl_compiler::syntax::PrlRuleFile;
use prl_compiler::{PrlCompiler, PrlModel};
use prl_config::PrlConfig;
use prl_core::{Constraint, SliceSelection};
use prl_transpiler::logic::FormulaFactory;
use prl_transpiler::{transpile_model_with_constraints, ModelTranslation, TranspilerError};
use thiserror::Error;
use tracing::{info, warn};

/// Why a rule file could not be transpiled.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The compiler reported errors; they are listed in order
    #[error("Rule file has {} compiler error(s): {}", .0.len(), .0.join("; "))]
    Compile(Vec<String>),

    #[error(transparent)]
    Transpile(#[from] TranspilerError),
}

/// A compiled and transpiled rule file.
#[derive(Debug, Clone)]
pub struct TranspiledRuleFile {
    pub model: PrlModel,
    pub translation: ModelTranslation,
    /// Compiler warnings of the rule file
    pub warnings: Vec<String>,
}

/// Compiles a rule file and transpiles all of its slice sets.
///
/// The formulas of the result belong to `f`.
///
/// # Errors
///
/// Fails with [`PipelineError::Compile`] if the compiler reports any error
/// and with [`PipelineError::Transpile`] if transpilation fails.
///
/// # Example
///
/// ```
/// use prl::prelude::*;
/// use prl::transpile_rule_file;
///
/// let mut rule_file = PrlRuleFile::default();
/// rule_file.rule_set.feature_definitions.push(PrlFeatureDefinition::boolean("a"));
/// rule_file.rule_set.rules.push(PrlRule::new(PrlRuleKind::Constraint(PrlConstraint::feature("a"))));
///
/// let f = FormulaFactory::new();
/// let result = transpile_rule_file(&f, &rule_file, &[], &[], &PrlConfig::default()).unwrap();
/// assert_eq!(result.translation.len(), 1);
/// assert!(result.warnings.is_empty());
/// ```
pub fn transpile_rule_file(
    f: &FormulaFactory,
    rule_file: &PrlRuleFile,
    selectors: &[SliceSelection],
    additional_constraints: &[Constraint],
    config: &PrlConfig,
) -> Result<TranspiledRuleFile, PipelineError> {
    let start = Instant::now();
    let mut compiler = PrlCompiler::new();
    let model = compiler.compile(rule_file);
    if compiler.has_errors() {
        warn!(event = "rule_file_rejected", errors = compiler.errors().len());
        return Err(PipelineError::Compile(compiler.errors().to_vec()));
    }
    let translation =
        transpile_model_with_constraints(f, &model, selectors, additional_constraints, config)?;

    let elapsed = start.elapsed();
    info!(
        event = "rule_file_transpiled",
        rules = model.rules().len(),
        slice_sets = translation.len(),
        warnings = compiler.warnings().len(),
        duration_ms = elapsed.as_millis() as u64,
    );
    Ok(TranspiledRuleFile {
        model,
        translation,
        warnings: compiler.warnings().to_vec(),
    })
}

/// Loads the configuration at `path`, falling back to the defaults if the
/// file is missing or invalid.
pub fn load_config(path: impl AsRef<Path>) -> PrlConfig {
    let path = path.as_ref();
    match PrlConfig::load(path) {
        Ok(config) => config,
        Err(error) => {
            warn!(event = "config_fallback", path = %path.display(), error = %error);
            PrlConfig::default()
        }
    }
}
