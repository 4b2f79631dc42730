// Events handed to the alerting pipeline
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Warning,
    Critical,
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CheckState::Ok => "ok",
            CheckState::Warning => "warning",
            CheckState::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub entity: String,
    pub check: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
    pub time: i64,
    pub state: CheckState,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let event = Event {
            entity: "grafana.svc1.CPU".to_string(),
            check: "cpu.value".to_string(),
            kind: "service".to_string(),
            details: "check grafana board for detail: http://grafana/dashboard/db/svc1".to_string(),
            time: 1000,
            state: CheckState::Critical,
            summary: "too low".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "service");
        assert_eq!(json["state"], "critical");
        assert_eq!(json["time"], 1000);
        assert_eq!(json.as_object().unwrap().len(), 7);
    }
}
