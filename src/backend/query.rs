use std::fmt::Display;

/// PostgREST request against one table: column selection, filters, ordering
/// and limits, rendered as query-string pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            params: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn push(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Columns to return; whitespace is dropped so embedded selects can be
    /// written across several lines.
    pub fn select(self, columns: &str) -> Self {
        let compact: String = columns.chars().filter(|c| !c.is_whitespace()).collect();
        self.push("select", compact)
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("eq.{}", value))
    }

    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("neq.{}", value))
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("gte.{}", value))
    }

    pub fn in_list<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.push(column, format!("in.({})", joined))
    }

    /// Disjunction of filters already in `column.op.value` form
    pub fn or<I, V>(self, filters: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let joined = filters
            .into_iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.push("or", format!("({})", joined))
    }

    pub fn order(self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.push("order", format!("{}.{}", column, direction))
    }

    pub fn limit(self, n: usize) -> Self {
        self.push("limit", n.to_string())
    }
}

/// `*term*` pattern for `ilike` filters inside an `or=(...)` group.
/// Characters that would break the filter grammar, and user-supplied
/// wildcards, are removed.
pub fn contains_pattern(term: &str) -> String {
    let cleaned: String = term
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '"' | '\\' | '*' | '%'))
        .collect();
    format!("*{}*", cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(query: &Query) -> Vec<(&str, &str)> {
        query
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_builds_filters_in_order() {
        let query = Query::new("workout_partners")
            .select(
                "id,
                 partner:users!workout_partners_partner_id_fkey (id, name, username)",
            )
            .eq("status", "accepted")
            .in_list("status", ["pending", "accepted"])
            .order("created_at", false)
            .limit(10);

        assert_eq!(query.table(), "workout_partners");
        assert_eq!(
            pairs(&query),
            vec![
                ("select", "id,partner:users!workout_partners_partner_id_fkey(id,name,username)"),
                ("status", "eq.accepted"),
                ("status", "in.(pending,accepted)"),
                ("order", "created_at.desc"),
                ("limit", "10"),
            ]
        );
    }

    #[test]
    fn test_or_group() {
        let query = Query::new("users").or(["username.ilike.*jo*", "email.ilike.*jo*"]);
        assert_eq!(
            pairs(&query),
            vec![("or", "(username.ilike.*jo*,email.ilike.*jo*)")]
        );
    }

    #[test]
    fn test_contains_pattern_strips_grammar_characters() {
        assert_eq!(contains_pattern("  run "), "*run*");
        assert_eq!(contains_pattern("a,b)(c*%"), "*abc*");
    }
}
