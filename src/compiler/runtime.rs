//! Runtime Shims
//!
//! Small C helpers prepended to the generated program. They supply what the
//! target's own operators do not: bounded text copies, concatenation into a
//! fixed buffer, and division/modulo that stop the program on a zero divisor.
//!
//! Shims are requested while the tree is emitted and only the requested ones
//! (plus their dependencies) end up in the output.

use std::collections::BTreeSet;

/// Headers every generated program includes.
const BASE_INCLUDES: [&str; 3] = ["stdio.h", "stdlib.h", "string.h"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shim {
    TextCopy,
    TextConcat,
    DivInt,
    ModInt,
    DivFloat,
    ModFloat,
}

impl Shim {
    pub fn name(self) -> &'static str {
        match self {
            Shim::TextCopy => "rt_text_copy",
            Shim::TextConcat => "rt_text_concat",
            Shim::DivInt => "rt_div_int",
            Shim::ModInt => "rt_mod_int",
            Shim::DivFloat => "rt_div_float",
            Shim::ModFloat => "rt_mod_float",
        }
    }

    fn dependencies(self) -> &'static [Shim] {
        match self {
            Shim::TextConcat => &[Shim::TextCopy],
            _ => &[],
        }
    }

    fn needs_math(self) -> bool {
        self == Shim::ModFloat
    }

    fn source(self) -> &'static str {
        match self {
            Shim::TextCopy => {
                "static char *rt_text_copy(char *dst, const char *src, size_t cap) {
    size_t len = strlen(src);
    if (len >= cap) {
        len = cap - 1;
    }
    memmove(dst, src, len);
    dst[len] = '\\0';
    return dst;
}"
            }
            Shim::TextConcat => {
                "static char *rt_text_concat(char *buf, size_t cap, const char *left, const char *right) {
    size_t used;
    rt_text_copy(buf, left, cap);
    used = strlen(buf);
    rt_text_copy(buf + used, right, cap - used);
    return buf;
}"
            }
            Shim::DivInt => {
                "static long long rt_div_int(long long left, long long right) {
    if (right == 0) {
        fprintf(stderr, \"runtime error: division by zero\\n\");
        exit(EXIT_FAILURE);
    }
    return left / right;
}"
            }
            Shim::ModInt => {
                "static long long rt_mod_int(long long left, long long right) {
    if (right == 0) {
        fprintf(stderr, \"runtime error: modulo by zero\\n\");
        exit(EXIT_FAILURE);
    }
    return left % right;
}"
            }
            Shim::DivFloat => {
                "static double rt_div_float(double left, double right) {
    if (right == 0.0) {
        fprintf(stderr, \"runtime error: division by zero\\n\");
        exit(EXIT_FAILURE);
    }
    return left / right;
}"
            }
            Shim::ModFloat => {
                "static double rt_mod_float(double left, double right) {
    if (right == 0.0) {
        fprintf(stderr, \"runtime error: modulo by zero\\n\");
        exit(EXIT_FAILURE);
    }
    return fmod(left, right);
}"
            }
        }
    }
}

/// Tracks which shims and headers the program being emitted needs.
#[derive(Debug, Default)]
pub struct Runtime {
    shims: BTreeSet<Shim>,
    math: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `shim` as used if not already and returns its C name.
    pub fn require(&mut self, shim: Shim) -> &'static str {
        if self.shims.insert(shim) {
            tracing::trace!(shim = shim.name(), "runtime shim required");
            for &dependency in shim.dependencies() {
                self.require(dependency);
            }
            if shim.needs_math() {
                self.math = true;
            }
        }
        shim.name()
    }

    pub fn require_math(&mut self) {
        self.math = true;
    }

    pub fn is_required(&self, shim: Shim) -> bool {
        self.shims.contains(&shim)
    }

    pub fn includes(&self) -> Vec<&'static str> {
        let mut includes = BASE_INCLUDES.to_vec();
        if self.math {
            includes.push("math.h");
        }
        includes
    }

    /// Definitions of every required shim, in dependency order.
    pub fn definitions(&self) -> Vec<&'static str> {
        self.shims.iter().map(|shim| shim.source()).collect()
    }
}
