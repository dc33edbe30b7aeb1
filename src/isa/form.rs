use std::collections::HashSet;
use std::fmt::{self, Debug, Display, Formatter};

use itertools::Itertools;

use crate::isa::{Encoding, IsaExtension, Operand};

/// MMX technology state required or forced by an instruction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmxMode {
    /// The form requires the MMX technology state to be clear.
    Fpu,
    /// The form causes a transition to the MMX technology state.
    Mmx,
}

impl MmxMode {
    pub fn from_id(id: &str) -> Option<MmxMode> {
        match id {
            "FPU" => Some(MmxMode::Fpu),
            "MMX" => Some(MmxMode::Mmx),
            _ => None,
        }
    }
}

/// XMM register access mode of an instruction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmmMode {
    /// The form accesses XMM registers in legacy SSE mode.
    Sse,
    /// The form accesses XMM registers in AVX mode.
    Avx,
}

impl XmmMode {
    pub fn from_id(id: &str) -> Option<XmmMode> {
        match id {
            "SSE" => Some(XmmMode::Sse),
            "AVX" => Some(XmmMode::Avx),
            _ => None,
        }
    }
}

/// One operand-signature variant of an instruction.
///
/// The operand list is index-stable: every operand reference inside the
/// form's encodings is a position in `operands`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionForm {
    /// Form name in Intel-style assembly (matches the instruction
    /// mnemonic).
    pub name: String,
    /// Form name in the GNU assembler (gas).
    pub gas_name: String,
    /// Form name in the Go/Plan 9 assembler. None means the form is not
    /// expressible there.
    pub go_name: Option<String>,
    /// None means the form neither affects nor cares about the MMX
    /// technology state.
    pub mmx_mode: Option<MmxMode>,
    /// None means the form does not touch XMM registers.
    pub xmm_mode: Option<XmmMode>,
    pub operands: Vec<Operand>,
    /// Registers implicitly read by the form.
    pub implicit_inputs: HashSet<String>,
    /// Registers implicitly written by the form.
    pub implicit_outputs: HashSet<String>,
    /// Extensions required to execute the form, in declaration order.
    /// Duplicates are preserved.
    pub isa_extensions: Vec<IsaExtension>,
    /// Alternative encodings; the encoder picks one.
    pub encodings: Vec<Encoding>,
}

impl InstructionForm {
    pub fn new(name: impl Into<String>, gas_name: impl Into<String>) -> InstructionForm {
        InstructionForm {
            name: name.into(),
            gas_name: gas_name.into(),
            go_name: None,
            mmx_mode: None,
            xmm_mode: None,
            operands: Vec::new(),
            implicit_inputs: HashSet::new(),
            implicit_outputs: HashSet::new(),
            isa_extensions: Vec::new(),
            encodings: Vec::new(),
        }
    }
}

impl Display for InstructionForm {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.operands.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(
                f,
                "{} {}",
                self.name,
                self.operands.iter().map(|operand| &operand.kind).join(", ")
            )
        }
    }
}
