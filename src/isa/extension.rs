use std::fmt::{self, Debug, Display, Formatter};

/// An extension to the base x86-64 instruction set that an instruction form
/// may require.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsaExtension {
    Rdtsc,
    Rdtscp,
    Cpuid,
    Popcnt,
    Lzcnt,
    Pclmulqdq,
    Rdrand,
    Rdseed,
    Cmov,
    Mmx,
    Sse,
    Sse2,
    Sse3,
    Ssse3,
    Sse41,
    Sse42,
    Avx,
    Avx2,
    F16c,
    Fma3,
    Bmi,
    Bmi2,
    Adx,
    Aes,
    Sha,
}

impl IsaExtension {
    pub fn from_id(id: &str) -> Option<IsaExtension> {
        match id {
            "RDTSC" => Some(IsaExtension::Rdtsc),
            "RDTSCP" => Some(IsaExtension::Rdtscp),
            "CPUID" => Some(IsaExtension::Cpuid),
            "POPCNT" => Some(IsaExtension::Popcnt),
            "LZCNT" => Some(IsaExtension::Lzcnt),
            "PCLMULQDQ" => Some(IsaExtension::Pclmulqdq),
            "RDRAND" => Some(IsaExtension::Rdrand),
            "RDSEED" => Some(IsaExtension::Rdseed),
            "CMOV" => Some(IsaExtension::Cmov),
            "MMX" => Some(IsaExtension::Mmx),
            "SSE" => Some(IsaExtension::Sse),
            "SSE2" => Some(IsaExtension::Sse2),
            "SSE3" => Some(IsaExtension::Sse3),
            "SSSE3" => Some(IsaExtension::Ssse3),
            "SSE4.1" => Some(IsaExtension::Sse41),
            "SSE4.2" => Some(IsaExtension::Sse42),
            "AVX" => Some(IsaExtension::Avx),
            "AVX2" => Some(IsaExtension::Avx2),
            "F16C" => Some(IsaExtension::F16c),
            "FMA3" => Some(IsaExtension::Fma3),
            "BMI" => Some(IsaExtension::Bmi),
            "BMI2" => Some(IsaExtension::Bmi2),
            "ADX" => Some(IsaExtension::Adx),
            "AES" => Some(IsaExtension::Aes),
            "SHA" => Some(IsaExtension::Sha),
            _ => None,
        }
    }

    /// The extension identifier as it appears in instruction set documents.
    pub fn id(&self) -> &'static str {
        match self {
            IsaExtension::Rdtsc => "RDTSC",
            IsaExtension::Rdtscp => "RDTSCP",
            IsaExtension::Cpuid => "CPUID",
            IsaExtension::Popcnt => "POPCNT",
            IsaExtension::Lzcnt => "LZCNT",
            IsaExtension::Pclmulqdq => "PCLMULQDQ",
            IsaExtension::Rdrand => "RDRAND",
            IsaExtension::Rdseed => "RDSEED",
            IsaExtension::Cmov => "CMOV",
            IsaExtension::Mmx => "MMX",
            IsaExtension::Sse => "SSE",
            IsaExtension::Sse2 => "SSE2",
            IsaExtension::Sse3 => "SSE3",
            IsaExtension::Ssse3 => "SSSE3",
            IsaExtension::Sse41 => "SSE4.1",
            IsaExtension::Sse42 => "SSE4.2",
            IsaExtension::Avx => "AVX",
            IsaExtension::Avx2 => "AVX2",
            IsaExtension::F16c => "F16C",
            IsaExtension::Fma3 => "FMA3",
            IsaExtension::Bmi => "BMI",
            IsaExtension::Bmi2 => "BMI2",
            IsaExtension::Adx => "ADX",
            IsaExtension::Aes => "AES",
            IsaExtension::Sha => "SHA",
        }
    }
}

impl Display for IsaExtension {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl Debug for IsaExtension {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self, f)
    }
}
