//! One-shot loader for x86-64 instruction set documents.

mod component;
mod form;
mod schema;

use tracing::{debug, info};

use crate::isa::error::LoadError;
use crate::isa::{Instruction, Result};

const ROOT_KIND: &str = "InstructionSet";
const ROOT_NAME: &str = "x86-64";

/// Loads an instruction set document into the resolved in-memory model.
///
/// The load is a single depth-first pass over the document: for each form,
/// the operand list is built first, then every encoding component is
/// resolved against it. The first schema violation aborts the whole load;
/// there is no partial result. The returned model is immutable.
pub fn load(source: &str) -> Result<Vec<Instruction>> {
    let document = schema::parse(source)?;
    if document.kind != ROOT_KIND || document.name != ROOT_NAME {
        return Err(LoadError::UnexpectedRoot {
            kind: document.kind,
            name: document.name,
        });
    }

    let mut instruction_set = Vec::with_capacity(document.instructions.len());
    for raw_instruction in &document.instructions {
        debug!(name = raw_instruction.name.as_str(), "loading instruction");
        let mut forms = Vec::with_capacity(raw_instruction.forms.len());
        for raw_form in &raw_instruction.forms {
            forms.push(form::build(&raw_instruction.name, raw_form)?);
        }
        instruction_set.push(Instruction {
            name: raw_instruction.name.clone(),
            summary: raw_instruction.summary.clone(),
            forms,
        });
    }
    info!(
        instructions = instruction_set.len(),
        "instruction set loaded"
    );
    Ok(instruction_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{BitSource, Component, ModRmMode, RegField};

    fn document(instructions: &str) -> String {
        format!(
            r#"{{ "kind": "InstructionSet", "name": "x86-64", "instructions": [{}] }}"#,
            instructions
        )
    }

    #[test]
    fn root_kind_and_name_are_validated() {
        let err = load(r#"{ "kind": "RegisterSet", "name": "x86-64", "instructions": [] }"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedRoot { .. }));

        let err = load(r#"{ "kind": "InstructionSet", "name": "armv8", "instructions": [] }"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedRoot { .. }));

        assert!(load(&document("")).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(load("not json"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn single_opcode_form_round_trips() {
        let instruction_set = load(&document(
            r#"{
                "name": "BSWAP",
                "summary": "Byte Swap",
                "forms": [{
                    "gas-name": "bswap",
                    "operands": [{ "type": "r32", "input": true, "output": true }],
                    "encodings": [[{ "tag": "Opcode", "byte": 200 }]]
                }]
            }"#,
        ))
        .unwrap();

        assert_eq!(instruction_set.len(), 1);
        let instruction = &instruction_set[0];
        assert_eq!(instruction.name, "BSWAP");
        assert_eq!(instruction.summary, "Byte Swap");
        assert_eq!(instruction.to_string(), "BSWAP (1 forms)");

        let form = &instruction.forms[0];
        assert_eq!(form.operands.len(), 1);
        let operand = &form.operands[0];
        assert!(operand.is_variable());
        assert!(operand.is_register());
        assert!(!operand.is_memory());

        assert_eq!(form.encodings.len(), 1);
        let components = &form.encodings[0].components;
        assert_eq!(components.len(), 1);
        let Component::Opcode(opcode) = components[0] else {
            panic!("expected an Opcode component, got {:?}", components[0]);
        };
        assert_eq!(opcode.byte, 200);
        assert_eq!(opcode.addend, None);
        assert_eq!(opcode.to_string(), "0xC8");
    }

    #[test]
    fn rex_and_modrm_share_the_memory_operand() {
        let instruction_set = load(&document(
            r#"{
                "name": "ADD",
                "summary": "Add",
                "forms": [{
                    "gas-name": "addq",
                    "operands": [
                        { "type": "m64", "input": true, "output": true },
                        { "type": "r64", "input": true }
                    ],
                    "encodings": [[
                        { "tag": "REX", "mandatory": true, "W": "1",
                          "R-operand-number": 1, "BX-operand-number": 0 },
                        { "tag": "Opcode", "byte": 1 },
                        { "tag": "ModRM", "mode-operand-number": 0,
                          "reg-operand-number": 1, "rm-operand-number": 0 }
                    ]]
                }]
            }"#,
        ))
        .unwrap();

        let form = &instruction_set[0].forms[0];
        let components = &form.encodings[0].components;
        assert_eq!(components.len(), 3);

        let Component::Rex(rex) = components[0] else {
            panic!("expected REX first");
        };
        assert_eq!(rex.w, BitSource::Literal1);
        assert_eq!(rex.r, BitSource::Operand(1));
        // B and X resolve to the same memory operand: base and index
        // register extension bits of operand 0.
        assert_eq!(rex.b, BitSource::Operand(0));
        assert_eq!(rex.x, BitSource::Operand(0));

        let Component::ModRm(modrm) = components[2] else {
            panic!("expected ModRM last");
        };
        assert_eq!(modrm.mode, ModRmMode::Operand(0));
        assert_eq!(modrm.reg, RegField::Operand(1));
        assert_eq!(modrm.rm, 0);

        // Every operand reference in the encoding is in bounds.
        for component in components {
            for index in component.operand_references() {
                assert!(index < form.operands.len());
            }
        }
    }

    #[test]
    fn unknown_component_tag_is_skipped_not_fatal() {
        let instruction_set = load(&document(
            r#"{
                "name": "VPADDD",
                "summary": "Add Packed Doubleword Integers",
                "forms": [{
                    "gas-name": "vpaddd",
                    "operands": [{ "type": "xmm", "output": true }],
                    "encodings": [[
                        { "tag": "Opcode", "byte": 254 },
                        { "tag": "EVEX", "anything": "goes" },
                        { "tag": "Immediate", "size": 1, "operand-number": 0 }
                    ]]
                }]
            }"#,
        ))
        .unwrap();

        let components = &instruction_set[0].forms[0].encodings[0].components;
        assert_eq!(components.len(), 2);
        assert!(matches!(components[0], Component::Opcode(_)));
        assert!(matches!(components[1], Component::ImmediateByte { operand: 0 }));
    }

    #[test]
    fn modrm_mode_rm_mismatch_aborts_the_load() {
        let err = load(&document(
            r#"{
                "name": "ADD",
                "summary": "Add",
                "forms": [{
                    "gas-name": "add",
                    "operands": [
                        { "type": "m32", "output": true },
                        { "type": "r32", "input": true }
                    ],
                    "encodings": [[
                        { "tag": "ModRM", "mode-operand-number": 1,
                          "reg-operand-number": 1, "rm-operand-number": 0 }
                    ]]
                }]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(err, LoadError::ModeRmMismatch { .. }));
    }

    #[test]
    fn out_of_range_operand_reference_aborts_the_load() {
        let err = load(&document(
            r#"{
                "name": "JMP",
                "summary": "Jump",
                "forms": [{
                    "gas-name": "jmp",
                    "operands": [{ "type": "rel32", "input": true }],
                    "encodings": [[
                        { "tag": "CodeOffset", "size": 4, "operand-number": 1 }
                    ]]
                }]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::OperandOutOfRange {
                index: 1,
                count: 1,
                ..
            }
        ));
    }

    #[test]
    fn vex_form_resolves_every_field() {
        let instruction_set = load(&document(
            r#"{
                "name": "VPAND",
                "summary": "Packed Bitwise Logical AND",
                "forms": [{
                    "gas-name": "vpand",
                    "xmm-mode": "AVX",
                    "operands": [
                        { "type": "xmm", "output": true },
                        { "type": "xmm", "input": true },
                        { "type": "m128", "input": true }
                    ],
                    "isa-extensions": ["AVX"],
                    "encodings": [[
                        { "tag": "VEX", "W": "ignored", "L": "0",
                          "m-mmmm": 1, "pp": 1,
                          "R-operand-number": 0, "BX-operand-number": 2,
                          "vvvv-operand-number": 1 },
                        { "tag": "Opcode", "byte": 219 },
                        { "tag": "ModRM", "mode-operand-number": 2,
                          "reg-operand-number": 0, "rm-operand-number": 2 }
                    ]]
                }]
            }"#,
        ))
        .unwrap();

        let form = &instruction_set[0].forms[0];
        assert_eq!(form.xmm_mode, Some(crate::isa::XmmMode::Avx));
        assert_eq!(form.isa_extensions, vec![crate::isa::IsaExtension::Avx]);

        let Component::Vex(vex) = form.encodings[0].components[0] else {
            panic!("expected VEX first");
        };
        assert_eq!(vex.mmmmm, 0b00001);
        assert_eq!(vex.pp, 0b01);
        assert!(vex.w.is_ignored());
        assert_eq!(vex.l, BitSource::Literal0);
        assert_eq!(vex.r, BitSource::Operand(0));
        assert_eq!(vex.b, BitSource::Operand(2));
        assert_eq!(vex.x, BitSource::Operand(2));
        assert_eq!(vex.vvvv, crate::isa::VvvvField::Operand(1));
    }
}
