use thiserror::Error;

/// Errors raised while loading an instruction set document.
///
/// Every variant is fatal: the loader aborts at the first violation and
/// returns no partial model.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed instruction set document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected document root: kind {kind:?}, name {name:?}")]
    UnexpectedRoot { kind: String, name: String },

    #[error("{mnemonic}: {attribute} refers to operand {index} but the form has {count} operands")]
    OperandOutOfRange {
        mnemonic: String,
        attribute: &'static str,
        index: usize,
        count: usize,
    },

    #[error("{tag} component is missing the {attribute} attribute")]
    MissingAttribute {
        tag: &'static str,
        attribute: &'static str,
    },

    #[error("{tag} component supplies both {first} and {second}")]
    AttributeConflict {
        tag: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{tag}.{attribute} must be \"0\", \"1\" or \"ignored\", got {value:?}")]
    InvalidBit {
        tag: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("prefix byte must be 0x66, 0xF2 or 0xF3, got {byte:#04X}")]
    InvalidPrefixByte { byte: u16 },

    #[error("opcode byte {byte:#X} is out of range")]
    InvalidOpcodeByte { byte: u16 },

    #[error("{mnemonic}: opcode addend refers to operand {index}, which is not a register")]
    AddendNotRegister { mnemonic: String, index: usize },

    #[error("VEX {attribute} value {value:#07b} is not allowed")]
    InvalidVexSelector {
        attribute: &'static str,
        value: u8,
    },

    #[error("VEX.vvvv literal must be \"1111\", got {value:?}")]
    InvalidVvvv { value: String },

    #[error("ModRM literal mode must be 0b11, got {value:#04b}")]
    InvalidModRmMode { value: u8 },

    #[error("ModRM literal reg must be within [0, 7], got {value}")]
    InvalidModRmReg { value: u8 },

    #[error("{mnemonic}: ModRM mode is bound to operand {mode} but rm to operand {rm}")]
    ModeRmMismatch {
        mnemonic: String,
        mode: usize,
        rm: usize,
    },

    #[error("{tag} size must be one of {allowed}, got {size}")]
    InvalidWidth {
        tag: &'static str,
        allowed: &'static str,
        size: u32,
    },

    #[error("{mnemonic}: unknown ISA extension {id:?}")]
    UnknownExtension { mnemonic: String, id: String },

    #[error("{mnemonic}: unknown {attribute} value {value:?}")]
    UnknownTechnologyMode {
        mnemonic: String,
        attribute: &'static str,
        value: String,
    },
}
