//! Query-string parameters, filters and ordering
//!
//! [`QueryParams`] keeps every key once, with its values in insertion order.
//! Keys are stored sorted, so two parameter sets built from the same logical
//! input always encode to the same bytes regardless of call order.

use super::error::{ApiError, ApiResult};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Query key used for ordering directives
pub const ORDER_PARAM: &str = "order";
/// Page size parameter
pub const LIMIT_PARAM: &str = "limit";
/// Page start parameter
pub const OFFSET_PARAM: &str = "offset";

/// Comparison operators accepted by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCondition {
    Gt,
    Gte,
    Lt,
    Lte,
    Range,
    In,
}

impl FilterCondition {
    pub const ALL: [FilterCondition; 6] = [
        FilterCondition::Gt,
        FilterCondition::Gte,
        FilterCondition::Lt,
        FilterCondition::Lte,
        FilterCondition::Range,
        FilterCondition::In,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCondition::Gt => "gt",
            FilterCondition::Gte => "gte",
            FilterCondition::Lt => "lt",
            FilterCondition::Lte => "lte",
            FilterCondition::Range => "range",
            FilterCondition::In => "in",
        }
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCondition {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterCondition::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ApiError::InvalidFilter {
                condition: s.to_string(),
            })
    }
}

impl From<FilterCondition> for String {
    fn from(condition: FilterCondition) -> Self {
        condition.as_str().to_string()
    }
}

/// One filter directive: `{field_name}__{condition}={value}`
///
/// The condition is kept as text so that directives coming from user input
/// can be carried around before they are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteringField {
    pub field_name: String,
    pub condition: String,
    pub value: String,
}

impl FilteringField {
    pub fn new(
        field_name: impl Into<String>,
        condition: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            condition: condition.into(),
            value: value.into(),
        }
    }

    /// Parsed condition, `None` when it is not one of the supported operators
    pub fn condition(&self) -> Option<FilterCondition> {
        self.condition.parse().ok()
    }

    /// Query key for this filter, `None` for unsupported conditions
    pub fn param_key(&self) -> Option<String> {
        self.condition()
            .map(|c| format!("{}__{}", self.field_name, c.as_str()))
    }
}

/// Parses `name:condition:value`; the value may itself contain `:`
impl FromStr for FilteringField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(cond), Some(value)) if !name.is_empty() => {
                Ok(FilteringField::new(name, cond, value))
            }
            _ => Err(format!("expected name:condition:value, got {:?}", s)),
        }
    }
}

/// Accumulated query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `key`, keeping any existing ones
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// Replace every value under `key` with a single one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), vec![value.into()]);
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.params.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Add a filter directive; unsupported conditions are ignored
    ///
    /// Returns whether the filter was added.
    pub fn filter_by(&mut self, field: &FilteringField) -> bool {
        match field.param_key() {
            Some(key) => {
                self.append(key, field.value.clone());
                true
            }
            None => {
                tracing::debug!(
                    "dropping filter on {:?} with unsupported condition {:?}",
                    field.field_name,
                    field.condition
                );
                false
            }
        }
    }

    /// Add a filter directive, rejecting unsupported conditions
    pub fn try_filter_by(&mut self, field: &FilteringField) -> ApiResult<()> {
        let condition: FilterCondition = field.condition.parse()?;
        self.append(
            format!("{}__{}", field.field_name, condition.as_str()),
            field.value.clone(),
        );
        Ok(())
    }

    /// Add an ordering directive; prefix the name with `-` for descending
    pub fn order_by(&mut self, name: impl Into<String>) {
        self.append(ORDER_PARAM, name);
    }

    /// `application/x-www-form-urlencoded` rendering, keys in ascending order
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_and_order_encode_sorted() {
        let mut q = QueryParams::new();
        q.filter_by(&FilteringField::new("field_range", "range", "2:3"));
        q.filter_by(&FilteringField::new("field_gt", FilterCondition::Gt, "3"));
        q.filter_by(&FilteringField::new("field_in", "in", "2,3,4"));
        q.order_by("field3");
        q.order_by("-field4");

        assert_eq!(
            q.encode(),
            "field_gt__gt=3&field_in__in=2%2C3%2C4&field_range__range=2%3A3&order=field3&order=-field4"
        );
    }

    #[test]
    fn unknown_condition_is_dropped() {
        let mut q = QueryParams::new();
        assert!(!q.filter_by(&FilteringField::new("ram", "eq", "2")));
        assert!(q.is_empty());
        assert_eq!(q.encode(), "");
    }

    #[test]
    fn strict_filter_rejects_unknown_condition() {
        let mut q = QueryParams::new();
        let err = q
            .try_filter_by(&FilteringField::new("ram", "like", "2"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidFilter { ref condition } if condition == "like"));
        assert!(q.is_empty());

        q.try_filter_by(&FilteringField::new("ram", "lte", "8")).unwrap();
        assert_eq!(q.get("ram__lte"), Some(&["8".to_string()][..]));
    }

    #[test]
    fn same_field_different_conditions_are_independent_keys() {
        let mut q = QueryParams::new();
        q.filter_by(&FilteringField::new("ram", "gte", "2"));
        q.filter_by(&FilteringField::new("ram", "lt", "16"));
        assert_eq!(q.encode(), "ram__gte=2&ram__lt=16");
    }

    #[test]
    fn set_overwrites_previous_values() {
        let mut q = QueryParams::new();
        q.set(LIMIT_PARAM, "3");
        q.set(OFFSET_PARAM, "0");
        q.set(OFFSET_PARAM, "3");
        assert_eq!(q.encode(), "limit=3&offset=3");
    }

    #[test]
    fn order_preserves_call_order() {
        let mut q = QueryParams::new();
        q.order_by("-b");
        q.order_by("a");
        assert_eq!(q.get(ORDER_PARAM).unwrap(), ["-b", "a"]);
    }

    #[test]
    fn filtering_field_parses_cli_syntax() {
        let f: FilteringField = "created:range:2024-01-01:2024-02-01".parse().unwrap();
        assert_eq!(f.field_name, "created");
        assert_eq!(f.condition(), Some(FilterCondition::Range));
        assert_eq!(f.value, "2024-01-01:2024-02-01");

        assert!("nocondition".parse::<FilteringField>().is_err());
    }
}
