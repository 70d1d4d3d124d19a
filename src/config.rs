use std::path::PathBuf;

/// Run configuration for the document pipeline.
///
/// Defaults match the classic `pandoc` + `pdftk` toolchain; every field can
/// be overridden through an `EXAM_SHEET_*` environment variable.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Markdown-to-PDF compiler program.
    pub compiler: String,
    /// PDF engine handed to the compiler (`--pdf-engine=`).
    pub pdf_engine: String,
    /// Page geometry handed to the compiler (`-V geometry:`).
    pub geometry: String,
    /// PDF merge program.
    pub merger: String,
    /// How many compiler processes may run at once.
    pub max_concurrent_renders: usize,
    /// Where the merged `assignments.pdf` / `answer_key.pdf` land.
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            compiler: "pandoc".to_string(),
            pdf_engine: "xelatex".to_string(),
            geometry: "top=2cm, bottom=1.5cm, left=2cm, right=2cm".to_string(),
            merger: "pdftk".to_string(),
            max_concurrent_renders: 4,
            output_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            compiler: std::env::var("EXAM_SHEET_COMPILER").unwrap_or(default.compiler),
            pdf_engine: std::env::var("EXAM_SHEET_PDF_ENGINE").unwrap_or(default.pdf_engine),
            geometry: std::env::var("EXAM_SHEET_GEOMETRY").unwrap_or(default.geometry),
            merger: std::env::var("EXAM_SHEET_MERGER").unwrap_or(default.merger),
            max_concurrent_renders: std::env::var("EXAM_SHEET_MAX_CONCURRENT")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(default.max_concurrent_renders),
            output_dir: std::env::var("EXAM_SHEET_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),
        }
    }
}
