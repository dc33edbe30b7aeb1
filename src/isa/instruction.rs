use std::fmt::{self, Debug, Display, Formatter};

use crate::isa::InstructionForm;

/// An instruction mnemonic together with all of its forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Instruction name in Intel-style assembly.
    pub name: String,
    /// A one-line description of what the instruction does.
    pub summary: String,
    pub forms: Vec<InstructionForm>,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ({} forms)", self.name, self.forms.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_counts_forms() {
        let instruction = Instruction {
            name: "CPUID".into(),
            summary: "CPU Identification".into(),
            forms: vec![InstructionForm::new("CPUID", "cpuid")],
        };
        assert_eq!(instruction.to_string(), "CPUID (1 forms)");
    }
}
