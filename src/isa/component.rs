use std::fmt::{self, Debug, Display, Formatter};

/// Where the value of a single encoded bit comes from.
///
/// A bit is either fixed by the encoding, left for the encoder to pick
/// (`Ignored`), or taken from the register number of one of the owning
/// form's operands, referenced by position.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum BitSource {
    Literal0,
    Literal1,
    Ignored,
    Operand(usize),
}

impl BitSource {
    pub fn literal(bit: bool) -> BitSource {
        if bit {
            BitSource::Literal1
        } else {
            BitSource::Literal0
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, BitSource::Ignored)
    }

    /// The operand index this bit is bound to, if any.
    pub fn operand(&self) -> Option<usize> {
        match self {
            BitSource::Operand(index) => Some(*index),
            _ => None,
        }
    }

    fn filled(self, default: bool) -> BitSource {
        if self.is_ignored() {
            BitSource::literal(default)
        } else {
            self
        }
    }
}

impl Display for BitSource {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BitSource::Literal0 => write!(f, "0"),
            BitSource::Literal1 => write!(f, "1"),
            BitSource::Ignored => write!(f, "ignored"),
            BitSource::Operand(index) => write!(f, "operand #{}", index),
        }
    }
}

impl Debug for BitSource {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self, f)
    }
}

/// A 0x66, 0xF2 or 0xF3 prefix byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub byte: u8,
    /// A mandatory prefix is part of the opcode (common in SSE
    /// instructions) rather than an operand-size or repeat modifier.
    pub is_mandatory: bool,
}

/// The REX prefix. At most one per encoding, immediately before the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rex {
    /// Whether the prefix must be emitted even when no extended register
    /// is used (64-bit operands, or access to dil/sil/bpl/spl).
    pub is_mandatory: bool,
    pub w: BitSource,
    pub r: BitSource,
    /// High bit of the index register number when bound to a memory
    /// operand. Shares its operand with `b` in that case.
    pub x: BitSource,
    /// High bit of the register number, or of the base register number
    /// when bound to a memory operand.
    pub b: BitSource,
}

impl Rex {
    /// A copy of this prefix with every ignored bit replaced by the given
    /// default. Bits that already have a source are left alone.
    pub fn filled(&self, w: bool, r: bool, x: bool, b: bool) -> Rex {
        Rex {
            is_mandatory: self.is_mandatory,
            w: self.w.filled(w),
            r: self.r.filled(r),
            x: self.x.filled(x),
            b: self.b.filled(b),
        }
    }
}

/// The VEX prefix. At most one per encoding, immediately before the opcode,
/// with no other prefix allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vex {
    /// The m-mmmm field selecting the implied leading opcode bytes:
    /// 0b00001 = 0x0F, 0b00010 = 0x0F 0x38, 0b00011 = 0x0F 0x3A.
    /// Only 0b00001 can be encoded in the two-byte VEX form.
    pub mmmmm: u8,
    /// The pp field selecting the implied legacy prefix:
    /// 0b00 = none, 0b01 = 0x66, 0b10 = 0xF3, 0b11 = 0xF2.
    pub pp: u8,
    pub w: BitSource,
    pub l: BitSource,
    pub r: BitSource,
    pub x: BitSource,
    pub b: BitSource,
    pub vvvv: VvvvField,
}

impl Vex {
    /// A copy of this prefix with every ignored bit replaced by the given
    /// default. Bits that already have a source are left alone.
    pub fn filled(&self, w: bool, l: bool, r: bool, x: bool, b: bool) -> Vex {
        Vex {
            mmmmm: self.mmmmm,
            pp: self.pp,
            w: self.w.filled(w),
            l: self.l.filled(l),
            r: self.r.filled(r),
            x: self.x.filled(x),
            b: self.b.filled(b),
            vvvv: self.vvvv,
        }
    }
}

/// The VEX vvvv register specifier.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum VvvvField {
    /// The field is not used and encodes as 0b1111.
    Unused,
    /// The field holds the (inverted) number of the referenced register
    /// operand.
    Operand(usize),
}

impl Debug for VvvvField {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            VvvvField::Unused => write!(f, "unused"),
            VvvvField::Operand(index) => write!(f, "operand #{}", index),
        }
    }
}

/// One opcode byte. An encoding may contain several, not necessarily
/// adjacent.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub byte: u8,
    /// When present, the low three bits of the referenced register
    /// operand's number are ORed into `byte` at emission time.
    pub addend: Option<usize>,
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{:02X}", self.byte)
    }
}

impl Debug for Opcode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self, f)
    }
}

/// Source of the ModRM mode field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModRmMode {
    /// Literal 0b11: register-direct addressing.
    Direct,
    /// The mode is derived from the addressing form of the referenced
    /// operand, which is always the same operand as `ModRm::rm`.
    Operand(usize),
}

/// Source of the ModRM reg field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegField {
    /// A fixed opcode extension in [0, 7].
    Literal(u8),
    /// The low three bits of the referenced register operand's number.
    Operand(usize),
}

/// The ModRM byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRm {
    pub mode: ModRmMode,
    pub reg: RegField,
    /// The register or memory operand encoded by the mode and rm fields.
    pub rm: usize,
}

/// One element of an instruction encoding, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Prefix(Prefix),
    Rex(Rex),
    Vex(Vex),
    Opcode(Opcode),
    ModRm(ModRm),
    ImmediateByte { operand: usize },
    ImmediateWord { operand: usize },
    ImmediateDWord { operand: usize },
    ImmediateQWord { operand: usize },
    CodeOffset8 { operand: usize },
    CodeOffset32 { operand: usize },
    DataOffset32 { operand: usize },
    DataOffset64 { operand: usize },
}

impl Component {
    /// Every operand index this component is bound to. Two entries may
    /// name the same operand, e.g. REX.X and REX.B over one memory
    /// operand.
    pub fn operand_references(&self) -> Vec<usize> {
        match self {
            Component::Prefix(_) => Vec::new(),
            Component::Rex(rex) => [rex.w, rex.r, rex.x, rex.b]
                .iter()
                .filter_map(BitSource::operand)
                .collect(),
            Component::Vex(vex) => {
                let mut references: Vec<usize> = [vex.w, vex.l, vex.r, vex.x, vex.b]
                    .iter()
                    .filter_map(BitSource::operand)
                    .collect();
                if let VvvvField::Operand(index) = vex.vvvv {
                    references.push(index);
                }
                references
            }
            Component::Opcode(opcode) => opcode.addend.into_iter().collect(),
            Component::ModRm(modrm) => {
                let mut references = Vec::new();
                if let ModRmMode::Operand(index) = modrm.mode {
                    references.push(index);
                }
                if let RegField::Operand(index) = modrm.reg {
                    references.push(index);
                }
                references.push(modrm.rm);
                references
            }
            Component::ImmediateByte { operand }
            | Component::ImmediateWord { operand }
            | Component::ImmediateDWord { operand }
            | Component::ImmediateQWord { operand }
            | Component::CodeOffset8 { operand }
            | Component::CodeOffset32 { operand }
            | Component::DataOffset32 { operand }
            | Component::DataOffset64 { operand } => vec![*operand],
        }
    }
}
