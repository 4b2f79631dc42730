// Data sources configured in Grafana
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Datasource {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

/// Picks the named data source, or the default one when the panel names none.
pub fn resolve<'a>(all: &'a [Datasource], name: Option<&str>) -> Option<&'a Datasource> {
    match name {
        Some(name) => all.iter().find(|d| d.name == name),
        None => all.iter().find(|d| d.is_default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<Datasource> {
        serde_json::from_str(
            r#"[
                {"name": "graphite-eu", "url": "http://eu:8080", "isDefault": false},
                {"name": "graphite-us", "url": "http://us:8080", "isDefault": true},
                {"name": "elastic"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_by_name() {
        let all = sources();
        assert_eq!(resolve(&all, Some("graphite-eu")).unwrap().url, "http://eu:8080");
        assert_eq!(resolve(&all, Some("missing")), None);
    }

    #[test]
    fn test_resolve_default() {
        let all = sources();
        assert_eq!(resolve(&all, None).unwrap().name, "graphite-us");
        assert_eq!(resolve(&all[..1], None), None);
    }
}
