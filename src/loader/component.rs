//! Resolves one encoding-component declaration into a [`Component`].
//!
//! Every field that can be literal-or-operand-bound must be resolved by
//! exactly one attribute family; supplying neither or both is a fatal
//! schema violation. Operand references are resolved positionally against
//! the owning form's operand list, which is complete by the time this
//! module runs.

use tracing::warn;

use crate::isa::error::LoadError;
use crate::isa::{
    BitSource, Component, ModRm, ModRmMode, Opcode, Operand, Prefix, RegField, Result, Rex, Vex,
    VvvvField,
};
use crate::loader::schema::RawComponent;

/// Builds the component for one declaration, or None for an unrecognised
/// tag. The tolerant path is deliberate: a document written for a newer
/// schema revision may carry component kinds this model does not know,
/// and skipping them keeps the rest of the encoding loadable.
pub(super) fn resolve(
    mnemonic: &str,
    raw: &RawComponent,
    operands: &[Operand],
) -> Result<Option<Component>> {
    match raw.tag.as_str() {
        "Prefix" => prefix(raw).map(Component::Prefix).map(Some),
        "REX" => rex(mnemonic, raw, operands).map(Component::Rex).map(Some),
        "VEX" => vex(mnemonic, raw, operands).map(Component::Vex).map(Some),
        "Opcode" => opcode(mnemonic, raw, operands)
            .map(Component::Opcode)
            .map(Some),
        "ModRM" => modrm(mnemonic, raw, operands)
            .map(Component::ModRm)
            .map(Some),
        "Immediate" => immediate(mnemonic, raw, operands).map(Some),
        "CodeOffset" => code_offset(mnemonic, raw, operands).map(Some),
        "DataOffset" => data_offset(mnemonic, raw, operands).map(Some),
        other => {
            warn!(mnemonic, tag = other, "skipping unknown encoding component");
            Ok(None)
        }
    }
}

fn require<T: Copy>(
    value: Option<T>,
    tag: &'static str,
    attribute: &'static str,
) -> Result<T> {
    value.ok_or(LoadError::MissingAttribute { tag, attribute })
}

fn operand_index(
    mnemonic: &str,
    attribute: &'static str,
    index: usize,
    operands: &[Operand],
) -> Result<usize> {
    if index < operands.len() {
        Ok(index)
    } else {
        Err(LoadError::OperandOutOfRange {
            mnemonic: mnemonic.to_string(),
            attribute,
            index,
            count: operands.len(),
        })
    }
}

fn literal_bit(
    tag: &'static str,
    attribute: &'static str,
    value: &str,
) -> Result<BitSource> {
    match value {
        "0" => Ok(BitSource::Literal0),
        "1" => Ok(BitSource::Literal1),
        "ignored" => Ok(BitSource::Ignored),
        other => Err(LoadError::InvalidBit {
            tag,
            attribute,
            value: other.to_string(),
        }),
    }
}

/// The R bit: a literal `R` attribute or an `R-operand-number` reference
/// to a register operand, never both.
fn resolve_r(
    tag: &'static str,
    mnemonic: &str,
    raw: &RawComponent,
    operands: &[Operand],
) -> Result<BitSource> {
    match (&raw.r, raw.r_operand) {
        (Some(_), Some(_)) => Err(LoadError::AttributeConflict {
            tag,
            first: "R",
            second: "R-operand-number",
        }),
        (Some(value), None) => literal_bit(tag, "R", value),
        (None, Some(index)) => Ok(BitSource::Operand(operand_index(
            mnemonic,
            "R-operand-number",
            index,
            operands,
        )?)),
        (None, None) => Err(LoadError::MissingAttribute {
            tag,
            attribute: "R or R-operand-number",
        }),
    }
}

/// The B and X bits together. A `BX-operand-number` attribute binds both
/// bits to one memory operand (base and index register extensions); it
/// excludes every field-specific B/X attribute. Otherwise B resolves from
/// `B` or `B-operand-number` and X from a literal `X`.
fn resolve_b_x(
    tag: &'static str,
    mnemonic: &str,
    raw: &RawComponent,
    operands: &[Operand],
) -> Result<(BitSource, BitSource)> {
    if let Some(index) = raw.bx_operand {
        let conflicting = [
            ("B", raw.b.is_some()),
            ("B-operand-number", raw.b_operand.is_some()),
            ("X", raw.x.is_some()),
        ];
        for (first, present) in conflicting {
            if present {
                return Err(LoadError::AttributeConflict {
                    tag,
                    first,
                    second: "BX-operand-number",
                });
            }
        }
        let index = operand_index(mnemonic, "BX-operand-number", index, operands)?;
        return Ok((BitSource::Operand(index), BitSource::Operand(index)));
    }

    let b = match (&raw.b, raw.b_operand) {
        (Some(_), Some(_)) => {
            return Err(LoadError::AttributeConflict {
                tag,
                first: "B",
                second: "B-operand-number",
            })
        }
        (Some(value), None) => literal_bit(tag, "B", value)?,
        (None, Some(index)) => {
            BitSource::Operand(operand_index(mnemonic, "B-operand-number", index, operands)?)
        }
        (None, None) => {
            return Err(LoadError::MissingAttribute {
                tag,
                attribute: "B, B-operand-number or BX-operand-number",
            })
        }
    };
    let x = match &raw.x {
        Some(value) => literal_bit(tag, "X", value)?,
        None => {
            return Err(LoadError::MissingAttribute {
                tag,
                attribute: "X or BX-operand-number",
            })
        }
    };
    Ok((b, x))
}

fn prefix(raw: &RawComponent) -> Result<Prefix> {
    let byte = require(raw.byte, "Prefix", "byte")?;
    if !matches!(byte, 0x66 | 0xF2 | 0xF3) {
        return Err(LoadError::InvalidPrefixByte { byte });
    }
    Ok(Prefix {
        byte: byte as u8,
        is_mandatory: require(raw.mandatory, "Prefix", "mandatory")?,
    })
}

fn rex(mnemonic: &str, raw: &RawComponent, operands: &[Operand]) -> Result<Rex> {
    let is_mandatory = require(raw.mandatory, "REX", "mandatory")?;
    let w = literal_bit("REX", "W", require(raw.w.as_deref(), "REX", "W")?)?;
    let r = resolve_r("REX", mnemonic, raw, operands)?;
    let (b, x) = resolve_b_x("REX", mnemonic, raw, operands)?;
    Ok(Rex {
        is_mandatory,
        w,
        r,
        x,
        b,
    })
}

fn vex(mnemonic: &str, raw: &RawComponent, operands: &[Operand]) -> Result<Vex> {
    let w = literal_bit("VEX", "W", require(raw.w.as_deref(), "VEX", "W")?)?;
    let l = literal_bit("VEX", "L", require(raw.l.as_deref(), "VEX", "L")?)?;

    let mmmmm = require(raw.mmmmm, "VEX", "m-mmmm")?;
    if !matches!(mmmmm, 0b00001 | 0b00010 | 0b00011) {
        return Err(LoadError::InvalidVexSelector {
            attribute: "m-mmmm",
            value: mmmmm,
        });
    }
    let pp = require(raw.pp, "VEX", "pp")?;
    if pp > 0b11 {
        return Err(LoadError::InvalidVexSelector {
            attribute: "pp",
            value: pp,
        });
    }

    let r = resolve_r("VEX", mnemonic, raw, operands)?;
    let (b, x) = resolve_b_x("VEX", mnemonic, raw, operands)?;

    let vvvv = match (&raw.vvvv, raw.vvvv_operand) {
        (Some(_), Some(_)) => {
            return Err(LoadError::AttributeConflict {
                tag: "VEX",
                first: "vvvv",
                second: "vvvv-operand-number",
            })
        }
        (Some(value), None) => {
            if value != "1111" {
                return Err(LoadError::InvalidVvvv {
                    value: value.clone(),
                });
            }
            VvvvField::Unused
        }
        (None, Some(index)) => VvvvField::Operand(operand_index(
            mnemonic,
            "vvvv-operand-number",
            index,
            operands,
        )?),
        (None, None) => {
            return Err(LoadError::MissingAttribute {
                tag: "VEX",
                attribute: "vvvv or vvvv-operand-number",
            })
        }
    };

    Ok(Vex {
        mmmmm,
        pp,
        w,
        l,
        r,
        x,
        b,
        vvvv,
    })
}

fn opcode(mnemonic: &str, raw: &RawComponent, operands: &[Operand]) -> Result<Opcode> {
    let byte = require(raw.byte, "Opcode", "byte")?;
    if byte > 0xFF {
        return Err(LoadError::InvalidOpcodeByte { byte });
    }
    let addend = match raw.addend_operand {
        Some(index) => {
            let index = operand_index(mnemonic, "addend-operand-number", index, operands)?;
            if !operands[index].is_register() {
                return Err(LoadError::AddendNotRegister {
                    mnemonic: mnemonic.to_string(),
                    index,
                });
            }
            Some(index)
        }
        None => None,
    };
    Ok(Opcode {
        byte: byte as u8,
        addend,
    })
}

fn modrm(mnemonic: &str, raw: &RawComponent, operands: &[Operand]) -> Result<ModRm> {
    let rm_declared = require(raw.rm_operand, "ModRM", "rm-operand-number")?;
    let rm = operand_index(mnemonic, "rm-operand-number", rm_declared, operands)?;

    let mode = match (raw.mode, raw.mode_operand) {
        (Some(_), Some(_)) => {
            return Err(LoadError::AttributeConflict {
                tag: "ModRM",
                first: "mode",
                second: "mode-operand-number",
            })
        }
        (Some(value), None) => {
            if value != 0b11 {
                return Err(LoadError::InvalidModRmMode { value });
            }
            ModRmMode::Direct
        }
        (None, Some(index)) => {
            // Addressing mode and the r/m operand it describes cannot be
            // set independently when both come from the same operand.
            if index != rm_declared {
                return Err(LoadError::ModeRmMismatch {
                    mnemonic: mnemonic.to_string(),
                    mode: index,
                    rm: rm_declared,
                });
            }
            ModRmMode::Operand(index)
        }
        (None, None) => {
            return Err(LoadError::MissingAttribute {
                tag: "ModRM",
                attribute: "mode or mode-operand-number",
            })
        }
    };

    let reg = match (raw.reg, raw.reg_operand) {
        (Some(_), Some(_)) => {
            return Err(LoadError::AttributeConflict {
                tag: "ModRM",
                first: "reg",
                second: "reg-operand-number",
            })
        }
        (Some(value), None) => {
            if value > 7 {
                return Err(LoadError::InvalidModRmReg { value });
            }
            RegField::Literal(value)
        }
        (None, Some(index)) => RegField::Operand(operand_index(
            mnemonic,
            "reg-operand-number",
            index,
            operands,
        )?),
        (None, None) => {
            return Err(LoadError::MissingAttribute {
                tag: "ModRM",
                attribute: "reg or reg-operand-number",
            })
        }
    };

    Ok(ModRm { mode, reg, rm })
}

fn immediate(
    mnemonic: &str,
    raw: &RawComponent,
    operands: &[Operand],
) -> Result<Component> {
    let size = require(raw.size, "Immediate", "size")?;
    let operand = operand_index(
        mnemonic,
        "operand-number",
        require(raw.operand, "Immediate", "operand-number")?,
        operands,
    )?;
    match size {
        1 => Ok(Component::ImmediateByte { operand }),
        2 => Ok(Component::ImmediateWord { operand }),
        4 => Ok(Component::ImmediateDWord { operand }),
        8 => Ok(Component::ImmediateQWord { operand }),
        other => Err(LoadError::InvalidWidth {
            tag: "Immediate",
            allowed: "1, 2, 4 or 8",
            size: other,
        }),
    }
}

fn code_offset(
    mnemonic: &str,
    raw: &RawComponent,
    operands: &[Operand],
) -> Result<Component> {
    let size = require(raw.size, "CodeOffset", "size")?;
    let operand = operand_index(
        mnemonic,
        "operand-number",
        require(raw.operand, "CodeOffset", "operand-number")?,
        operands,
    )?;
    match size {
        1 => Ok(Component::CodeOffset8 { operand }),
        4 => Ok(Component::CodeOffset32 { operand }),
        other => Err(LoadError::InvalidWidth {
            tag: "CodeOffset",
            allowed: "1 or 4",
            size: other,
        }),
    }
}

fn data_offset(
    mnemonic: &str,
    raw: &RawComponent,
    operands: &[Operand],
) -> Result<Component> {
    let size = require(raw.size, "DataOffset", "size")?;
    let operand = operand_index(
        mnemonic,
        "operand-number",
        require(raw.operand, "DataOffset", "operand-number")?,
        operands,
    )?;
    match size {
        4 => Ok(Component::DataOffset32 { operand }),
        8 => Ok(Component::DataOffset64 { operand }),
        other => Err(LoadError::InvalidWidth {
            tag: "DataOffset",
            allowed: "4 or 8",
            size: other,
        }),
    }
}
