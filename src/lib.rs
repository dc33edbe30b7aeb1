pub mod isa;
pub mod loader;

pub use isa::error::LoadError;
pub use isa::{
    BitSource, Component, Encoding, Instruction, InstructionForm, IsaExtension, MmxMode, ModRm,
    ModRmMode, Opcode, Operand, Prefix, RegField, Rex, Vex, VvvvField, XmmMode,
};
pub use loader::load;
