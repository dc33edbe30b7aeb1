//! The raw, untrusted shape of an instruction set document.
//!
//! These structs mirror the document verbatim; nothing here is validated
//! beyond being well-formed JSON. Resolution and all range/set checks
//! happen in the form builder and component resolver.

use serde::Deserialize;

use crate::isa::Result;

pub fn parse(source: &str) -> Result<RawDocument> {
    Ok(serde_json::from_str(source)?)
}

#[derive(Debug, Deserialize)]
pub struct RawDocument {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub instructions: Vec<RawInstruction>,
}

#[derive(Debug, Deserialize)]
pub struct RawInstruction {
    pub name: String,
    pub summary: String,
    #[serde(default)]
    pub forms: Vec<RawForm>,
}

#[derive(Debug, Deserialize)]
pub struct RawForm {
    #[serde(rename = "gas-name")]
    pub gas_name: String,
    #[serde(rename = "go-name")]
    pub go_name: Option<String>,
    #[serde(rename = "mmx-mode")]
    pub mmx_mode: Option<String>,
    #[serde(rename = "xmm-mode")]
    pub xmm_mode: Option<String>,
    #[serde(default)]
    pub operands: Vec<RawOperand>,
    #[serde(default, rename = "implicit-operands")]
    pub implicit_operands: Vec<RawImplicitOperand>,
    #[serde(default, rename = "isa-extensions")]
    pub isa_extensions: Vec<String>,
    #[serde(default)]
    pub encodings: Vec<RawEncoding>,
}

#[derive(Debug, Deserialize)]
pub struct RawOperand {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub input: bool,
    #[serde(default)]
    pub output: bool,
}

#[derive(Debug, Deserialize)]
pub struct RawImplicitOperand {
    pub id: String,
    #[serde(default)]
    pub input: bool,
    #[serde(default)]
    pub output: bool,
}

/// An encoding is the plain sequence of its component declarations.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct RawEncoding(pub Vec<RawComponent>);

/// One component declaration. A single struct covers every tag; which
/// attributes may, must and must not appear together is the component
/// resolver's concern.
#[derive(Debug, Default, Deserialize)]
pub struct RawComponent {
    pub tag: String,
    pub mandatory: Option<bool>,
    pub byte: Option<u16>,
    #[serde(rename = "W")]
    pub w: Option<String>,
    #[serde(rename = "L")]
    pub l: Option<String>,
    #[serde(rename = "R")]
    pub r: Option<String>,
    #[serde(rename = "X")]
    pub x: Option<String>,
    #[serde(rename = "B")]
    pub b: Option<String>,
    #[serde(rename = "R-operand-number")]
    pub r_operand: Option<usize>,
    #[serde(rename = "B-operand-number")]
    pub b_operand: Option<usize>,
    #[serde(rename = "BX-operand-number")]
    pub bx_operand: Option<usize>,
    #[serde(rename = "m-mmmm")]
    pub mmmmm: Option<u8>,
    pub pp: Option<u8>,
    pub vvvv: Option<String>,
    #[serde(rename = "vvvv-operand-number")]
    pub vvvv_operand: Option<usize>,
    #[serde(rename = "addend-operand-number")]
    pub addend_operand: Option<usize>,
    pub mode: Option<u8>,
    #[serde(rename = "mode-operand-number")]
    pub mode_operand: Option<usize>,
    pub reg: Option<u8>,
    #[serde(rename = "reg-operand-number")]
    pub reg_operand: Option<usize>,
    #[serde(rename = "rm-operand-number")]
    pub rm_operand: Option<usize>,
    pub size: Option<u32>,
    #[serde(rename = "operand-number")]
    pub operand: Option<usize>,
}
