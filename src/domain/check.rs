// Threshold checks recovered from panel query targets
use super::board::QueryTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundCondition {
    Lower,
    Upper,
}

impl BoundCondition {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "lower" => Some(Self::Lower),
            "upper" => Some(Self::Upper),
            _ => None,
        }
    }
}

/// A bound expression announced by a single query target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundDefinition {
    pub target_ref: String,
    pub condition: BoundCondition,
    pub expression: String,
}

/// Recognizes a bound definition in a raw query expression.
pub type BoundConvention = fn(&str) -> Option<BoundDefinition>;

/// `alias(<expr>, "<ref>_<lower|upper>_bound")`
pub fn alias_suffix_convention(raw: &str) -> Option<BoundDefinition> {
    let expr = raw.trim();
    if !expr.starts_with("alias(") {
        return None;
    }

    let comma = expr.rfind(',')?;
    let close = expr.rfind(')')?;
    if close < comma {
        return None;
    }

    let name = unquote(expr[comma + 1..close].trim())?;
    let stem = name.strip_suffix("_bound")?;
    let (target_ref, condition) = stem.rsplit_once('_')?;
    if target_ref.is_empty() {
        return None;
    }
    let condition = BoundCondition::parse(condition)?;

    let open = expr.find('(')?;
    let inner = expr[open + 1..comma].trim();
    if inner.is_empty() {
        return None;
    }

    Some(BoundDefinition {
        target_ref: target_ref.to_string(),
        condition,
        expression: inner.to_string(),
    })
}

fn unquote(s: &str) -> Option<&str> {
    ['"', '\'']
        .iter()
        .find_map(|q| s.strip_prefix(*q).and_then(|rest| rest.strip_suffix(*q)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub target_ref: String,
    pub lower: Option<String>,
    pub upper: Option<String>,
}

impl Check {
    fn new(target_ref: String) -> Self {
        Self {
            target_ref,
            lower: None,
            upper: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThresholdExtractor {
    convention: BoundConvention,
}

impl Default for ThresholdExtractor {
    fn default() -> Self {
        Self::new(alias_suffix_convention)
    }
}

impl ThresholdExtractor {
    pub fn new(convention: BoundConvention) -> Self {
        Self { convention }
    }

    /// Checks in order of first appearance of their reference id.
    /// Targets that don't follow the convention are ignored.
    pub fn extract(&self, targets: &[QueryTarget]) -> Vec<Check> {
        let mut checks: Vec<Check> = Vec::new();

        for bound in targets.iter().filter_map(|t| (self.convention)(&t.expression)) {
            let idx = match checks.iter().position(|c| c.target_ref == bound.target_ref) {
                Some(idx) => idx,
                None => {
                    checks.push(Check::new(bound.target_ref.clone()));
                    checks.len() - 1
                }
            };

            let check = &mut checks[idx];
            match bound.condition {
                BoundCondition::Lower => check.lower = Some(bound.expression),
                BoundCondition::Upper => check.upper = Some(bound.expression),
            }
        }

        checks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(exprs: &[(&str, &str)]) -> Vec<QueryTarget> {
        exprs
            .iter()
            .map(|(r, e)| QueryTarget::new(*r, *e))
            .collect()
    }

    #[test]
    fn test_alias_lower_bound() {
        let checks = ThresholdExtractor::default().extract(&targets(&[(
            "B",
            r#"alias(X, "foo_lower_bound")"#,
        )]));

        assert_eq!(
            checks,
            vec![Check {
                target_ref: "foo".to_string(),
                lower: Some("X".to_string()),
                upper: None,
            }]
        );
    }

    #[test]
    fn test_lower_and_upper_merge_into_one_check() {
        let checks = ThresholdExtractor::default().extract(&targets(&[
            ("A", "servers.web1.load"),
            ("B", r#"alias(movingAverage(servers.web1.load, 10), "A_lower_bound")"#),
            ("C", r#"alias(scale(servers.web1.load, 2), 'A_upper_bound')"#),
        ]));

        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].target_ref, "A");
        assert_eq!(
            checks[0].lower.as_deref(),
            Some("movingAverage(servers.web1.load, 10)")
        );
        assert_eq!(checks[0].upper.as_deref(), Some("scale(servers.web1.load, 2)"));
    }

    #[test]
    fn test_checks_keep_first_appearance_order() {
        let checks = ThresholdExtractor::default().extract(&targets(&[
            ("C", r#"alias(b.upper, "B_upper_bound")"#),
            ("D", r#"alias(a.lower, "A_lower_bound")"#),
            ("E", r#"alias(b.lower, "B_lower_bound")"#),
        ]));

        let refs: Vec<&str> = checks.iter().map(|c| c.target_ref.as_str()).collect();
        assert_eq!(refs, vec!["B", "A"]);
        assert_eq!(checks[0].lower.as_deref(), Some("b.lower"));
    }

    #[test]
    fn test_malformed_expressions_are_skipped() {
        let malformed = [
            "cpu.value",
            "alias(cpu.value)",
            r#"alias(cpu.value "A_lower_bound")"#,
            r#"alias(cpu.value, "A_lower_bound""#,
            "alias(cpu.value, A_lower_bound)",
            r#"alias(cpu.value, "A_middle_bound")"#,
            r#"alias(cpu.value, "_lower_bound")"#,
            r#"alias(cpu.value, "A_lower")"#,
            r#"alias(, "A_lower_bound")"#,
            r#"alias(cpu.value, "A_lower_bound')"#,
            "",
        ];

        for expr in malformed {
            assert_eq!(alias_suffix_convention(expr), None, "{expr}");
        }
    }

    #[test]
    fn test_leading_whitespace_is_accepted() {
        let bound = alias_suffix_convention(r#"   alias(x.y, "A_upper_bound") "#).unwrap();
        assert_eq!(bound.condition, BoundCondition::Upper);
        assert_eq!(bound.expression, "x.y");
    }

    #[test]
    fn test_underscores_in_reference() {
        let bound = alias_suffix_convention(r#"alias(x.y, "disk_io_lower_bound")"#).unwrap();
        assert_eq!(bound.target_ref, "disk_io");
        assert_eq!(bound.condition, BoundCondition::Lower);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = ThresholdExtractor::default();
        let panel_targets = targets(&[
            ("A", "cpu.value"),
            ("B", r#"alias(cpu.lower, "A_lower_bound")"#),
        ]);

        assert_eq!(extractor.extract(&panel_targets), extractor.extract(&panel_targets));
    }

    #[test]
    fn test_custom_convention() {
        fn prefix(raw: &str) -> Option<BoundDefinition> {
            let rest = raw.strip_prefix("min:")?;
            let (target_ref, expression) = rest.split_once('=')?;
            Some(BoundDefinition {
                target_ref: target_ref.to_string(),
                condition: BoundCondition::Lower,
                expression: expression.to_string(),
            })
        }

        let checks = ThresholdExtractor::new(prefix).extract(&targets(&[
            ("B", "min:A=constantLine(3)"),
            ("C", r#"alias(x, "A_upper_bound")"#),
        ]));

        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].lower.as_deref(), Some("constantLine(3)"));
        assert_eq!(checks[0].upper, None);
    }
}
