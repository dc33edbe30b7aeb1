use crate::isa::Component;

/// One concrete byte-sequence recipe for an instruction form.
///
/// Component order is the order in which the bytes are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Encoding {
    pub components: Vec<Component>,
}
