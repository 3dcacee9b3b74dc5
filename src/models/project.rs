use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

impl Project {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled Project")
    }
}

/// Body for creating a project. The backend accepts empty strings for fields
/// the user left blank.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewProject {
    pub title: String,
    pub summary: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_wire_format() {
        let json = r#"{
            "id": "4f2c9b1a",
            "title": "Coral microbiome survey",
            "summary": null,
            "startDate": "2026-01-15",
            "endDate": null
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, "4f2c9b1a");
        assert_eq!(project.start_date.as_deref(), Some("2026-01-15"));
        assert_eq!(project.end_date, None);
    }

    #[test]
    fn test_display_title_falls_back_for_untitled() {
        let project = Project {
            id: "p1".into(),
            title: None,
            summary: None,
            start_date: None,
            end_date: None,
        };
        assert_eq!(project.display_title(), "Untitled Project");

        let blank = Project {
            title: Some(String::new()),
            ..project
        };
        assert_eq!(blank.display_title(), "Untitled Project");
    }
}
