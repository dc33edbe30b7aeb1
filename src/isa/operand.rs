use std::fmt::{self, Debug, Display, Formatter};

/// An explicit operand of an instruction form.
///
/// The type tag comes straight from the instruction set document: literal
/// constants ("1", "3"), fixed registers ("al", "xmm0", ...), register
/// classes by width ("r8".."r64", "mm", "xmm", "ymm"), memory classes by
/// width ("m".."m512"), relative offsets ("rel8", "rel32") and immediates
/// ("imm8".."imm64"). Unrecognised tags are kept as-is; the derived
/// predicates simply return false for them.
#[derive(Clone, PartialEq, Eq)]
pub struct Operand {
    pub kind: String,
    pub is_input: bool,
    pub is_output: bool,
}

impl Operand {
    pub fn new(kind: impl Into<String>, is_input: bool, is_output: bool) -> Operand {
        Operand {
            kind: kind.into(),
            is_input,
            is_output,
        }
    }

    /// Whether this operand names a variable, i.e. a register or memory
    /// location the instruction reads or writes.
    pub fn is_variable(&self) -> bool {
        self.is_input || self.is_output
    }

    pub fn is_register(&self) -> bool {
        matches!(
            self.kind.as_str(),
            "al" | "cl"
                | "ax"
                | "eax"
                | "rax"
                | "xmm0"
                | "r8"
                | "r16"
                | "r32"
                | "r64"
                | "r8l"
                | "r16l"
                | "r32l"
                | "mm"
                | "xmm"
                | "ymm"
        )
    }

    pub fn is_memory(&self) -> bool {
        matches!(
            self.kind.as_str(),
            "m" | "m8" | "m16" | "m32" | "m64" | "m80" | "m128" | "m256" | "m512"
        )
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match (self.is_input, self.is_output) {
            (false, false) => write!(f, "{}", self.kind),
            (true, false) => write!(f, "[in] {}", self.kind),
            (false, true) => write!(f, "[out] {}", self.kind),
            (true, true) => write!(f, "[in/out] {}", self.kind),
        }
    }
}

impl Debug for Operand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self, f)
    }
}
