/// Pipeline strategy selection.
///
/// `Simple` runs a single OCR pass, skips the median filter and accepts the
/// first catalog hit. `Enhanced` runs every OCR pass, denoises, and verifies
/// each catalog candidate before accepting it.
#[derive(PartialEq, Eq, Clone, Copy, Debug, clap::ValueEnum)]
pub enum Fidelity {
    Simple,
    Enhanced,
}

impl Default for Fidelity {
    fn default() -> Self {
        Self::Enhanced
    }
}

impl std::fmt::Display for Fidelity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Enhanced => write!(f, "enhanced"),
        }
    }
}
