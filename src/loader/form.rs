//! Builds one [`InstructionForm`] from its declaration.
//!
//! Operands are built before anything else: encoding components reference
//! them by position, so the operand list must be complete and index-stable
//! before the first component is resolved.

use crate::isa::error::LoadError;
use crate::isa::{Encoding, InstructionForm, IsaExtension, MmxMode, Operand, Result, XmmMode};
use crate::loader::{component, schema::RawForm};

pub(super) fn build(mnemonic: &str, raw: &RawForm) -> Result<InstructionForm> {
    let mut form = InstructionForm::new(mnemonic, raw.gas_name.clone());
    form.go_name = raw.go_name.clone();

    form.mmx_mode = raw
        .mmx_mode
        .as_deref()
        .map(|id| {
            MmxMode::from_id(id).ok_or_else(|| LoadError::UnknownTechnologyMode {
                mnemonic: mnemonic.to_string(),
                attribute: "mmx-mode",
                value: id.to_string(),
            })
        })
        .transpose()?;
    form.xmm_mode = raw
        .xmm_mode
        .as_deref()
        .map(|id| {
            XmmMode::from_id(id).ok_or_else(|| LoadError::UnknownTechnologyMode {
                mnemonic: mnemonic.to_string(),
                attribute: "xmm-mode",
                value: id.to_string(),
            })
        })
        .transpose()?;

    for raw_operand in &raw.operands {
        form.operands.push(Operand::new(
            raw_operand.kind.clone(),
            raw_operand.input,
            raw_operand.output,
        ));
    }
    for implicit in &raw.implicit_operands {
        if implicit.input {
            form.implicit_inputs.insert(implicit.id.clone());
        }
        if implicit.output {
            form.implicit_outputs.insert(implicit.id.clone());
        }
    }

    for id in &raw.isa_extensions {
        let extension =
            IsaExtension::from_id(id).ok_or_else(|| LoadError::UnknownExtension {
                mnemonic: mnemonic.to_string(),
                id: id.clone(),
            })?;
        form.isa_extensions.push(extension);
    }

    for raw_encoding in &raw.encodings {
        let mut encoding = Encoding::default();
        for raw_component in &raw_encoding.0 {
            if let Some(resolved) = component::resolve(mnemonic, raw_component, &form.operands)? {
                encoding.components.push(resolved);
            }
        }
        form.encodings.push(encoding);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_from_json(json: &str) -> Result<InstructionForm> {
        let raw: RawForm = serde_json::from_str(json).unwrap();
        build("TEST", &raw)
    }

    #[test]
    fn implicit_operands_feed_the_register_sets_only() {
        let form = form_from_json(
            r#"{
                "gas-name": "mul",
                "operands": [{ "type": "r64", "input": true }],
                "implicit-operands": [
                    { "id": "rax", "input": true, "output": true },
                    { "id": "rdx", "output": true }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(form.operands.len(), 1);
        assert!(form.implicit_inputs.contains("rax"));
        assert!(!form.implicit_inputs.contains("rdx"));
        assert!(form.implicit_outputs.contains("rax"));
        assert!(form.implicit_outputs.contains("rdx"));
    }

    #[test]
    fn missing_go_name_means_unsupported() {
        let form = form_from_json(r#"{ "gas-name": "movq" }"#).unwrap();
        assert_eq!(form.go_name, None);
    }

    #[test]
    fn extension_order_and_duplicates_are_preserved() {
        let form = form_from_json(
            r#"{
                "gas-name": "vaesenc",
                "isa-extensions": ["AVX", "AES", "AVX"]
            }"#,
        )
        .unwrap();
        assert_eq!(
            form.isa_extensions,
            vec![IsaExtension::Avx, IsaExtension::Aes, IsaExtension::Avx]
        );
    }

    #[test]
    fn unknown_extension_is_fatal() {
        let err = form_from_json(
            r#"{ "gas-name": "x", "isa-extensions": ["AVX-512"] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::UnknownExtension { .. }));
    }

    #[test]
    fn unknown_technology_mode_is_fatal() {
        let err = form_from_json(
            r#"{ "gas-name": "x", "mmx-mode": "AVX" }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnknownTechnologyMode {
                attribute: "mmx-mode",
                ..
            }
        ));
    }
}
