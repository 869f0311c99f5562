//! Persona-driven analysis of a document collection.
//!
//! Every manifest document is split into sections, the sections are scored
//! against keywords derived from the persona and task, and the best ones are
//! summarized into a [`CollectionReport`].

mod keywords;
mod rank;
mod sections;
mod summary;

use std::fs;
use std::path::Path;

pub use keywords::{related_terms, KeywordSet, CONCEPT_MAP};
pub use rank::{
    rank_sections, score_section, DIETARY_PENALTY, DIETARY_TRIGGER, MAX_RANKED_SECTIONS,
    NON_VEGETARIAN_TERMS, TITLE_MATCH_BONUS,
};
pub use sections::{build_sections, initial_title, MAX_CAPS_TITLE_CHARS, MIN_TITLE_CHARS};
pub use summary::{split_sentences, summarize, DEFAULT_SUMMARY_SENTENCES};

use crate::error::{Error, Result};
use crate::model::{
    CollectionReport, ExtractedSection, Manifest, ReportMetadata, Section, SubsectionAnalysis,
};
use crate::parser::{LayoutAnalyzer, ParseOptions};

/// Options for collection analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// How each PDF is parsed
    pub parse: ParseOptions,
    /// Sentences per refined summary
    pub summary_sentences: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::new().lenient(),
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_summary_sentences(mut self, n: usize) -> Self {
        self.summary_sentences = n;
        self
    }
}

/// Read a collection manifest from a JSON file.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|e| Error::Manifest(format!("{}: {}", path.display(), e)))
}

/// Current local time in ISO-8601 with microseconds.
pub fn processing_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Ranks the sections of a document collection for a persona.
#[derive(Debug, Clone, Default)]
pub struct CollectionAnalyzer {
    options: AnalysisOptions,
}

impl CollectionAnalyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Parse one PDF and split it into sections.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Section>> {
        let path = path.as_ref();
        let layout = LayoutAnalyzer::open(path, self.options.parse.clone())?.analyze()?;
        Ok(build_sections(&layout, path))
    }

    /// Sections of every manifest document found under `base_dir`.
    ///
    /// Missing documents are skipped with a warning; documents that fail to
    /// parse are logged and contribute nothing.
    pub fn collect_sections(&self, manifest: &Manifest, base_dir: &Path) -> Vec<Section> {
        let mut all = Vec::new();
        for doc in &manifest.documents {
            let path = base_dir.join(&doc.filename);
            if !path.exists() {
                log::warn!("Document '{}' not found. Skipping.", doc.filename);
                continue;
            }
            match self.analyze_file(&path) {
                Ok(sections) => {
                    log::info!("{}: {} section(s)", doc.filename, sections.len());
                    all.extend(sections);
                }
                Err(e) => log::error!("Error opening or processing {}: {}", doc.filename, e),
            }
        }
        all
    }

    /// Analyze a manifest whose document names resolve against `base_dir`.
    pub fn analyze(&self, manifest: &Manifest, base_dir: &Path) -> CollectionReport {
        let keywords =
            KeywordSet::from_query(&manifest.persona.role, &manifest.job_to_be_done.task);
        log::debug!("{} keyword(s) for the query", keywords.len());

        let sections = self.collect_sections(manifest, base_dir);
        self.report(manifest, &keywords, sections)
    }

    /// Load a manifest file and analyze it.
    ///
    /// Documents resolve against `base_dir`, or the manifest's directory
    /// when none is given.
    pub fn analyze_manifest_file(
        &self,
        manifest_path: &Path,
        base_dir: Option<&Path>,
    ) -> Result<CollectionReport> {
        let manifest = load_manifest(manifest_path)?;
        let base_dir = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => manifest_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        Ok(self.analyze(&manifest, &base_dir))
    }

    /// Rank `sections` and assemble the report.
    pub fn report(
        &self,
        manifest: &Manifest,
        keywords: &KeywordSet,
        sections: Vec<Section>,
    ) -> CollectionReport {
        let top = rank_sections(sections, keywords);

        let extracted_sections = top
            .iter()
            .enumerate()
            .map(|(i, s)| ExtractedSection {
                document: s.document.clone(),
                section_title: s.title.clone(),
                importance_rank: i + 1,
                page_number: s.page_number,
            })
            .collect();

        let subsection_analysis = top
            .iter()
            .map(|s| SubsectionAnalysis {
                document: s.document.clone(),
                refined_text: summarize(&s.content, keywords, self.options.summary_sentences),
                page_number: s.page_number,
            })
            .collect();

        CollectionReport {
            metadata: ReportMetadata {
                input_documents: manifest.filenames(),
                persona: manifest.persona.role.clone(),
                job_to_be_done: manifest.job_to_be_done.task.clone(),
                processing_timestamp: processing_timestamp(),
            },
            extracted_sections,
            subsection_analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_sections() {
        let manifest = Manifest::new(
            ["guide.pdf", "missing.pdf"],
            "Travel Planner",
            "Plan a trip with friends",
        );
        let keywords =
            KeywordSet::from_query(&manifest.persona.role, &manifest.job_to_be_done.task);
        let sections = vec![
            Section::new("Nightlife", "Bars and clubs. Nightlife for a group.", 3, "guide.pdf"),
            Section::new("History", "Old stones.", 1, "guide.pdf"),
            Section::new("Travel Tips", "Pack light. Plan ahead.", 2, "guide.pdf"),
        ];

        let report = CollectionAnalyzer::default().report(&manifest, &keywords, sections);
        assert_eq!(report.metadata.input_documents, vec!["guide.pdf", "missing.pdf"]);
        assert_eq!(report.metadata.persona, "Travel Planner");
        assert_eq!(report.extracted_sections.len(), 2);
        assert_eq!(report.extracted_sections[0].importance_rank, 1);
        assert_eq!(report.extracted_sections[1].importance_rank, 2);
        assert_eq!(report.subsection_analysis.len(), 2);
        assert_eq!(
            report.subsection_analysis[0].document,
            report.extracted_sections[0].document
        );
    }

    #[test]
    fn test_missing_documents_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(["absent.pdf"], "Traveller", "Plan");
        let report = CollectionAnalyzer::default().analyze(&manifest, dir.path());
        assert!(report.extracted_sections.is_empty());
        assert_eq!(report.metadata.input_documents, vec!["absent.pdf"]);
    }

    #[test]
    fn test_unreadable_document_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"not a pdf").unwrap();
        let manifest = Manifest::new(["broken.pdf"], "Traveller", "Plan");
        let sections = CollectionAnalyzer::default().collect_sections(&manifest, dir.path());
        assert!(sections.is_empty());
    }

    #[test]
    fn test_load_manifest_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("challenge1b_input.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_manifest(&path), Err(Error::Manifest(_))));
        assert!(matches!(
            load_manifest(dir.path().join("nope.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = processing_timestamp();
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000000".len());
        assert_eq!(&ts[10..11], "T");
    }
}
