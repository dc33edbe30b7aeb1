mod component;
mod encoding;
mod extension;
mod form;
mod instruction;
mod operand;
pub mod error;

pub use component::{
    BitSource, Component, ModRm, ModRmMode, Opcode, Prefix, RegField, Rex, Vex, VvvvField,
};
pub use encoding::Encoding;
pub use extension::IsaExtension;
pub use form::{InstructionForm, MmxMode, XmmMode};
pub use instruction::Instruction;
pub use operand::Operand;

pub type Result<T> = std::result::Result<T, error::LoadError>;
