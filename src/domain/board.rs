// Board domain model
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryTarget {
    #[serde(rename = "refId", default)]
    pub ref_id: String,
    #[serde(rename = "target", default)]
    pub expression: String,
}

impl QueryTarget {
    #[cfg(test)]
    pub fn new(ref_id: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            expression: expression.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub datasource: Option<String>,
    pub targets: Vec<QueryTarget>,
}

impl Panel {
    pub fn new(title: String, datasource: Option<String>, targets: Vec<QueryTarget>) -> Self {
        Self {
            title,
            datasource,
            targets,
        }
    }

    /// Expression of the target with the given reference id
    pub fn target_expression(&self, ref_id: &str) -> Option<&str> {
        self.targets
            .iter()
            .find(|t| t.ref_id == ref_id)
            .map(|t| t.expression.as_str())
    }

    /// Panel title as used in event entities: "Disk IO" becomes "Disk_IO"
    pub fn entity_name(&self) -> String {
        self.title.replace(' ', "_")
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    pub slug: String,
    pub panels: Vec<Panel>,
}

impl Board {
    pub fn new(slug: String, panels: Vec<Panel>) -> Self {
        Self { slug, panels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_expression() {
        let panel = Panel::new(
            "CPU".to_string(),
            None,
            vec![
                QueryTarget::new("A", "cpu.value"),
                QueryTarget::new("B", "cpu.other"),
            ],
        );

        assert_eq!(panel.target_expression("B"), Some("cpu.other"));
        assert_eq!(panel.target_expression("C"), None);
    }

    #[test]
    fn test_entity_name() {
        let panel = Panel::new("Disk IO wait".to_string(), None, vec![]);
        assert_eq!(panel.entity_name(), "Disk_IO_wait");
    }
}
