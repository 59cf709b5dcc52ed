//! Compiler Options
//!
//! Knobs for the two phases of the pipeline. Defaults reproduce the reference
//! behavior: 100-byte text variables, a 200-byte concatenation buffer,
//! first-declaration-wins on duplicate names.

/// Options consulted while the tree is being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Check call arity and argument types against the callee's parameters.
    pub validate_calls: bool,
    /// Turn a second declaration of a name into an error instead of ignoring it.
    pub reject_redeclaration: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            validate_calls: true,
            reject_redeclaration: false,
        }
    }
}

impl BuildOptions {
    pub fn with_validate_calls(mut self, validate_calls: bool) -> Self {
        self.validate_calls = validate_calls;
        self
    }

    pub fn with_reject_redeclaration(mut self, reject_redeclaration: bool) -> Self {
        self.reject_redeclaration = reject_redeclaration;
        self
    }
}

/// Options consulted while emitting C.
///
/// Fields are only reachable through the setters, which keep both buffer
/// capacities at two bytes or more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Size in bytes of every `Text` variable buffer, terminator included.
    text_capacity: usize,
    /// Size in bytes of the scratch buffer used for concatenation.
    concat_capacity: usize,
    /// Spaces per nesting level.
    indent_width: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            text_capacity: 100,
            concat_capacity: 200,
            indent_width: 4,
        }
    }
}

impl EmitOptions {
    pub fn with_text_capacity(mut self, text_capacity: usize) -> Self {
        self.text_capacity = text_capacity.max(2);
        self
    }

    pub fn with_concat_capacity(mut self, concat_capacity: usize) -> Self {
        self.concat_capacity = concat_capacity.max(2);
        self
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    pub fn text_capacity(&self) -> usize {
        self.text_capacity
    }

    pub fn concat_capacity(&self) -> usize {
        self.concat_capacity
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width
    }
}

/// Options for a whole "build, then emit" run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub build: BuildOptions,
    pub emit: EmitOptions,
}

impl CompilerOptions {
    pub fn with_build(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    pub fn with_emit(mut self, emit: EmitOptions) -> Self {
        self.emit = emit;
        self
    }
}
