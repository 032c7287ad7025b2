//! Diagnostics collected during a compilation.

use std::fmt;

/// Where the compiler currently is; prefixed to every diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerContext {
    pub feature: Option<String>,
    pub rule_id: Option<String>,
    pub line_number: Option<u32>,
}

impl CompilerContext {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.feature.is_none() && self.rule_id.is_none() && self.line_number.is_none()
    }
}

impl fmt::Display for CompilerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            self.feature.as_ref().map(|v| format!("feature={}", v)),
            self.rule_id.as_ref().map(|v| format!("ruleId={}", v)),
            self.line_number.map(|v| format!("lineNumber={}", v)),
        ]
        .into_iter()
        .flatten()
        .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Errors, warnings and infos of one compilation.
///
/// # Example
///
/// ```
/// use prl_compiler::CompilerState;
///
/// let mut state = CompilerState::new();
/// state.add_info("started");
/// state.context.feature = Some("a".to_string());
/// state.context.line_number = Some(3);
/// state.add_error("Feature name invalid: a");
///
/// assert!(state.has_errors());
/// assert_eq!(state.infos(), ["started"]);
/// assert_eq!(state.errors(), ["[feature=a, lineNumber=3] Feature name invalid: a"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompilerState {
    errors: Vec<String>,
    warnings: Vec<String>,
    infos: Vec<String>,
    pub context: CompilerContext,
}

impl CompilerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn add_error(&mut self, message: impl fmt::Display) {
        let message = self.tagged(message);
        tracing::debug!(event = "compile_error", message = %message);
        self.errors.push(message);
    }

    pub fn add_warning(&mut self, message: impl fmt::Display) {
        let message = self.tagged(message);
        self.warnings.push(message);
    }

    pub fn add_info(&mut self, message: impl fmt::Display) {
        let message = self.tagged(message);
        self.infos.push(message);
    }

    fn tagged(&self, message: impl fmt::Display) -> String {
        if self.context.is_empty() {
            message.to_string()
        } else {
            format!("{} {}", self.context, message)
        }
    }
}
