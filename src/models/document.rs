use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(rename = "urlOrPath", default)]
    pub url_or_path: Option<String>,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "projectTitle", default)]
    pub project_title: Option<String>,
    #[serde(rename = "uploadedByName", default)]
    pub uploaded_by_name: Option<String>,
    #[serde(rename = "uploadedAt", default)]
    pub uploaded_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_wire_format() {
        let json = r#"{
            "id": "d3",
            "title": "Field notes",
            "urlOrPath": "/uploads/field-notes.pdf",
            "projectId": "p1",
            "projectTitle": "Coral microbiome survey",
            "uploadedByName": "Grace Hopper",
            "uploadedAt": "2026-04-02T10:30:00Z"
        }"#;
        let document: Document = serde_json::from_str(json).unwrap();
        assert_eq!(document.title, "Field notes");
        assert_eq!(document.uploaded_by_name.as_deref(), Some("Grace Hopper"));
    }
}
