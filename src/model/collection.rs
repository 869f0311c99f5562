//! Collection manifest (input) and analysis report (output) types.

use serde::{Deserialize, Serialize};

/// A collection manifest: the documents to analyze and who is asking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Free-form challenge metadata, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_info: Option<serde_json::Value>,
    pub documents: Vec<ManifestDocument>,
    #[serde(default)]
    pub persona: Persona,
    #[serde(default)]
    pub job_to_be_done: JobToBeDone,
}

impl Manifest {
    /// Build a manifest from file names and a persona/task pair.
    pub fn new<I, S>(filenames: I, role: impl Into<String>, task: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            challenge_info: None,
            documents: filenames
                .into_iter()
                .map(|f| ManifestDocument {
                    filename: f.into(),
                    title: None,
                })
                .collect(),
            persona: Persona { role: role.into() },
            job_to_be_done: JobToBeDone { task: task.into() },
        }
    }

    /// File names in manifest order.
    pub fn filenames(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}

/// A document reference inside a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestDocument {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobToBeDone {
    #[serde(default)]
    pub task: String,
}

/// The ranked analysis of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionReport {
    pub metadata: ReportMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// ISO-8601 local time
    pub processing_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    /// 1-based rank
    pub importance_rank: usize,
    pub page_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_deserialize() {
        let json = r#"{
            "challenge_info": {"challenge_id": "round_1b_002", "test_case_name": "travel_planner"},
            "documents": [
                {"filename": "South of France - Cities.pdf", "title": "South of France - Cities"},
                {"filename": "South of France - Cuisine.pdf"}
            ],
            "persona": {"role": "Travel Planner"},
            "job_to_be_done": {"task": "Plan a trip of 4 days for a group of 10 college friends."}
        }"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.documents.len(), 2);
        assert_eq!(manifest.persona.role, "Travel Planner");
        assert_eq!(
            manifest.filenames(),
            vec!["South of France - Cities.pdf", "South of France - Cuisine.pdf"]
        );
        assert!(manifest.challenge_info.is_some());
    }

    #[test]
    fn test_manifest_missing_persona_fields() {
        let json = r#"{"documents": [], "persona": {}, "job_to_be_done": {}}"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.persona.role, "");
        assert_eq!(manifest.job_to_be_done.task, "");
    }
}
