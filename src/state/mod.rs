pub mod analysis_state;

pub use analysis_state::{AnalysisSession, AnalysisState};
