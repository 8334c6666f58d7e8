//! Core type definitions for regulation lookup and answer composition

use serde::{Deserialize, Deserializer, Serialize};

/// Label used when an entry carries no subcategory
pub const DEFAULT_SUBCATEGORY_LABEL: &str = "Información";

/// One entry of the traffic regulation corpus.
///
/// Identity is positional within the corpus; there is no id field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationEntry {
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "subcategoria", default)]
    pub subcategory: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(
        rename = "articulo",
        default,
        deserialize_with = "non_empty_article",
        skip_serializing_if = "Option::is_none"
    )]
    pub article: Option<String>, // legal citation, e.g. "Art. 12"
}

impl RegulationEntry {
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            description: description.into(),
            article: None,
        }
    }

    pub fn with_article(mut self, article: impl Into<String>) -> Self {
        let article = article.into();
        self.article = if article.is_empty() { None } else { Some(article) };
        self
    }

    /// Subcategory, or the generic label when the entry has none
    pub fn subcategory_or_default(&self) -> &str {
        if self.subcategory.is_empty() {
            DEFAULT_SUBCATEGORY_LABEL
        } else {
            &self.subcategory
        }
    }
}

// `"articulo": ""` and `"articulo": null` both mean no citation
fn non_empty_article<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

/// Entry paired with its relevance score. Only lives inside one matcher call.
#[derive(Debug, Clone, Copy)]
pub struct ScoredMatch<'a> {
    pub entry: &'a RegulationEntry,
    pub score: usize,    // always >= 1
    pub position: usize, // index in the corpus
}

/// Result of answering one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(rename = "respuesta")]
    pub answer: String,
    #[serde(rename = "fuentes")]
    pub sources: Vec<RegulationEntry>,
    #[serde(rename = "usa_llm")]
    pub used_generator: bool,
}

/// Sampling parameters sent to the text-generation service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub return_full_text: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 300,
            temperature: 0.7,
            top_p: 0.9,
            return_full_text: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_wire_names() {
        let json = r#"{
            "categoria": "Velocidad",
            "subcategoria": "Límite urbano",
            "descripcion": "La velocidad máxima en zona urbana es 50 km/h",
            "articulo": "Art. 12"
        }"#;
        let entry: RegulationEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.category, "Velocidad");
        assert_eq!(entry.subcategory, "Límite urbano");
        assert_eq!(entry.article.as_deref(), Some("Art. 12"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let entry: RegulationEntry = serde_json::from_str(r#"{"descripcion": "Usar casco"}"#).unwrap();
        assert_eq!(entry.category, "");
        assert_eq!(entry.subcategory, "");
        assert_eq!(entry.article, None);
        assert_eq!(entry.subcategory_or_default(), DEFAULT_SUBCATEGORY_LABEL);
    }

    #[test]
    fn test_empty_article_is_absent() {
        let entry: RegulationEntry =
            serde_json::from_str(r#"{"descripcion": "x", "articulo": ""}"#).unwrap();
        assert_eq!(entry.article, None);

        let entry: RegulationEntry =
            serde_json::from_str(r#"{"descripcion": "x", "articulo": null}"#).unwrap();
        assert_eq!(entry.article, None);
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result = serde_json::from_str::<RegulationEntry>(r#"{"descripcion": 42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_query_result_wire_shape() {
        let result = QueryResult {
            answer: "hola".to_string(),
            sources: vec![],
            used_generator: false,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["respuesta"], "hola");
        assert_eq!(value["usa_llm"], false);
        assert!(value["fuentes"].as_array().unwrap().is_empty());
    }
}
