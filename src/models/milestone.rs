use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "projectTitle", default)]
    pub project_title: Option<String>,
    #[serde(rename = "createdByName", default)]
    pub created_by_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewMilestone {
    pub title: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_milestone_wire_format() {
        let json = r#"{
            "id": "m7",
            "title": "Submit ethics application",
            "description": "IRB round two",
            "dueDate": "2026-03-01",
            "isCompleted": true,
            "projectId": "p1",
            "projectTitle": "Coral microbiome survey",
            "createdByName": "Ada Lovelace"
        }"#;
        let milestone: Milestone = serde_json::from_str(json).unwrap();
        assert_eq!(milestone.title, "Submit ethics application");
        assert!(milestone.is_completed);
        assert_eq!(milestone.created_by_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_parse_milestone_with_absent_optionals() {
        let json = r#"{"id":"m1","title":"Kickoff","dueDate":"2026-02-01","projectId":"p1"}"#;
        let milestone: Milestone = serde_json::from_str(json).unwrap();
        assert!(!milestone.is_completed);
        assert_eq!(milestone.project_title, None);
    }
}
