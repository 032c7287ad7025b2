//! Formula helpers on top of the logicng formula factory.
//!
//! Translations refer to variables by name and build their formulas in one
//! shared [`FormulaFactory`]; a formula can only be inspected through the
//! factory that created it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

pub use logicng::formulas::{EncodedFormula, FormulaFactory, Variable};

/// Names of the variables a solver model sets to true.
pub type Model = BTreeSet<String>;

/// Variable renaming by name.
pub type Renaming = BTreeMap<String, String>;

fn variables<'n>(f: &FormulaFactory, names: impl IntoIterator<Item = &'n str>) -> Vec<Variable> {
    names.into_iter().map(|name| f.var(name)).collect()
}

/// At most one of the named variables is true.
pub fn amo<'n>(f: &FormulaFactory, names: impl IntoIterator<Item = &'n str>) -> EncodedFormula {
    let variables = variables(f, names);
    if variables.len() < 2 {
        return f.verum();
    }
    f.amo(variables.as_slice())
}

/// Exactly one of the named variables is true.
pub fn exo<'n>(f: &FormulaFactory, names: impl IntoIterator<Item = &'n str>) -> EncodedFormula {
    let names: Vec<&str> = names.into_iter().collect();
    match names.as_slice() {
        [] => f.falsum(),
        [single] => f.variable(single),
        _ => f.exo(variables(f, names).as_slice()),
    }
}

/// Disjunction of the named variables.
pub fn any<'n>(f: &FormulaFactory, names: impl IntoIterator<Item = &'n str>) -> EncodedFormula {
    let operands: Vec<EncodedFormula> = names.into_iter().map(|name| f.variable(name)).collect();
    f.or(&operands)
}

/// Renames the variables of `formula`.
pub fn rename(f: &FormulaFactory, formula: EncodedFormula, renaming: &Renaming) -> EncodedFormula {
    if renaming.is_empty() {
        return formula;
    }
    let substitution: HashMap<Variable, EncodedFormula> = renaming
        .iter()
        .map(|(from, to)| (f.var(from), f.variable(to)))
        .collect();
    f.substitute(formula, &substitution)
}

/// Replaces the given variables by constants.
pub fn restrict(
    f: &FormulaFactory,
    formula: EncodedFormula,
    values: &BTreeMap<String, bool>,
) -> EncodedFormula {
    if values.is_empty() {
        return formula;
    }
    let substitution: HashMap<Variable, EncodedFormula> = values
        .iter()
        .map(|(name, value)| (f.var(name), f.constant(*value)))
        .collect();
    f.substitute(formula, &substitution)
}

/// Evaluates `formula`; variables outside `model` are false.
pub fn evaluate(f: &FormulaFactory, formula: EncodedFormula, model: &Model) -> bool {
    let values = variable_names(f, formula)
        .into_iter()
        .map(|name| {
            let value = model.contains(&name);
            (name, value)
        })
        .collect();
    is_verum(f, restrict(f, formula, &values))
}

/// Names of the variables occurring in `formula`, sorted.
pub fn variable_names(f: &FormulaFactory, formula: EncodedFormula) -> BTreeSet<String> {
    formula
        .variables(f)
        .iter()
        .map(|variable| variable.name(f).to_string())
        .collect()
}

pub fn is_verum(f: &FormulaFactory, formula: EncodedFormula) -> bool {
    formula == f.verum()
}

pub fn is_falsum(f: &FormulaFactory, formula: EncodedFormula) -> bool {
    formula == f.falsum()
}

/// The formula in logicng syntax, e.g. `a => ~b`.
pub fn render(f: &FormulaFactory, formula: EncodedFormula) -> String {
    formula.to_string(f)
}
