//! Operations and their variables.
//!
//! An [`Operation`] pairs a complete GraphQL document with its name and
//! kind. Before dispatch the client checks the supplied [`Variables`]
//! against the variables the document declares, so a mismatch fails with
//! [`ServiceError::RequestBad`] without touching the transport.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::ServiceError;

/// The root type an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A named GraphQL document.
///
/// Generated code declares operations as constants:
///
/// ```
/// use grafter::{Operation, OperationKind};
///
/// const VIEWER_QUERY: Operation = Operation::query("Viewer", "query Viewer { viewer { id } }");
///
/// assert_eq!(VIEWER_QUERY.kind(), OperationKind::Query);
/// assert_eq!(VIEWER_QUERY.name(), "Viewer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    kind: OperationKind,
    name: Cow<'static, str>,
    text: Cow<'static, str>,
}

impl Operation {
    pub const fn query(name: &'static str, text: &'static str) -> Self {
        Self {
            kind: OperationKind::Query,
            name: Cow::Borrowed(name),
            text: Cow::Borrowed(text),
        }
    }

    pub const fn mutation(name: &'static str, text: &'static str) -> Self {
        Self {
            kind: OperationKind::Mutation,
            name: Cow::Borrowed(name),
            text: Cow::Borrowed(text),
        }
    }

    /// Creates an operation from owned or borrowed text.
    pub fn new(
        kind: OperationKind,
        name: impl Into<Cow<'static, str>>,
        text: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parses the variable definitions of the first operation in the
    /// document.
    ///
    /// ## Errors
    ///
    /// Returns [`ServiceError::ProgrammerFailure`] if the text does not start
    /// with an operation keyword, has no selection set, or its variable
    /// definitions are malformed.
    ///
    /// ## Examples
    ///
    /// ```
    /// use grafter::Operation;
    ///
    /// let op = Operation::query("Posts", "query Posts($first: Int = 10, $after: ID!) { posts { id } }");
    /// let vars = op.declared_variables().unwrap();
    /// assert_eq!(vars.len(), 2);
    /// assert!(vars[0].has_default);
    /// assert!(vars[1].is_required());
    /// ```
    pub fn declared_variables(&self) -> Result<Vec<VariableDefinition>, ServiceError> {
        let malformed = |reason: &str| {
            ServiceError::ProgrammerFailure(format!("malformed operation `{}`: {reason}", self.name))
        };

        let text = self.text.trim_start();
        let keyword_len = ["query", "mutation", "subscription"]
            .iter()
            .find(|keyword| {
                text.starts_with(*keyword)
                    && !text[keyword.len()..].starts_with(|c: char| c.is_alphanumeric() || c == '_')
            })
            .map(|keyword| keyword.len())
            .ok_or_else(|| malformed("missing operation keyword"))?;

        let Some(list) = variable_list(&text[keyword_len..]).map_err(malformed)? else {
            return Ok(Vec::new());
        };

        split_definitions(list)
            .into_iter()
            .map(|segment| parse_definition(segment).ok_or_else(|| malformed("invalid variable definition")))
            .collect()
    }

    /// Checks `variables` against the declared variables.
    ///
    /// ## Errors
    ///
    /// - [`ServiceError::RequestBad`] if a supplied variable is not declared,
    ///   or a non-null variable without a default is missing or null.
    /// - [`ServiceError::ProgrammerFailure`] if the operation text is
    ///   malformed.
    pub fn check_variables(&self, variables: &Variables) -> Result<(), ServiceError> {
        let declared = self.declared_variables()?;

        if let Some(unknown) = variables
            .names()
            .find(|name| !declared.iter().any(|d| d.name == *name))
        {
            return Err(ServiceError::RequestBad(format!(
                "variable `{unknown}` is not declared by operation `{}`",
                self.name
            )));
        }

        if let Some(missing) = declared
            .iter()
            .filter(|d| d.is_required())
            .find(|d| variables.get(&d.name).is_none_or(Value::is_null))
        {
            return Err(ServiceError::RequestBad(format!(
                "operation `{}` requires variable `${}: {}`",
                self.name, missing.name, missing.type_name
            )));
        }

        Ok(())
    }
}

/// One `$name: Type = default` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDefinition {
    /// Name without the leading `$`.
    pub name: String,
    /// Declared type, e.g. `[ID!]!`.
    pub type_name: String,
    pub has_default: bool,
}

impl VariableDefinition {
    /// Returns `true` if the variable is non-null and has no default.
    pub fn is_required(&self) -> bool {
        self.type_name.ends_with('!') && !self.has_default
    }
}

/// Walks an operation header up to its selection set and returns the text
/// between the parentheses of the variable list, if there is one.
///
/// Brackets are matched and string literals skipped, so defaults such as
/// `{limit: 10}` or `"{"` and directive arguments after the list do not end
/// the header early.
fn variable_list(header: &str) -> Result<Option<&str>, &'static str> {
    let mut list_start = None;
    let mut list = None;
    let mut directive = false;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' if depth == 0 => return Ok(list),
            '(' if depth == 0 && !directive && list.is_none() && list_start.is_none() => {
                list_start = Some(i + 1);
                depth += 1;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1).ok_or("unbalanced brackets")?;
                if depth == 0
                    && c == ')'
                    && let Some(start) = list_start.take()
                {
                    list = Some(&header[start..i]);
                }
            }
            '@' if depth == 0 => directive = true,
            _ => {}
        }
    }

    if list_start.is_some() || in_string {
        Err("unterminated variable definitions")
    } else {
        Err("missing selection set")
    }
}

/// Splits a variable definition list at each top-level `$`.
fn split_definitions(list: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in list.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            '$' if depth == 0 => {
                if let Some(s) = start {
                    segments.push(&list[s..i]);
                }
                start = Some(i + 1);
            }
            _ => {}
        }
    }
    match start {
        Some(s) => segments.push(&list[s..]),
        // Non-empty text without any `$` is not a definition list.
        None if !list.trim().is_empty() => segments.push(list),
        None => {}
    }
    segments
}

fn parse_definition(segment: &str) -> Option<VariableDefinition> {
    let segment = segment.trim().trim_end_matches(',').trim();
    let (name, rest) = segment.split_once(':')?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let (type_part, has_default) = match rest.split_once('=') {
        Some((type_part, default)) => (type_part, !default.trim().is_empty()),
        None => (rest, false),
    };
    let type_name: String = type_part
        .split('@')
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect();
    if type_name.is_empty() {
        return None;
    }

    Some(VariableDefinition {
        name: name.to_string(),
        type_name,
        has_default,
    })
}

/// Variables sent with an operation, keyed by name without the `$`.
///
/// ## Examples
///
/// ```
/// use grafter::Variables;
///
/// #[derive(serde::Serialize)]
/// struct SearchVariables { text: String }
///
/// let vars = Variables::from_serialize(&SearchVariables { text: "rust".into() }).unwrap();
/// assert_eq!(vars.get("text"), Some(&serde_json::json!("rust")));
///
/// let same = Variables::new().with("text", "rust");
/// assert_eq!(vars, same);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<String, Value>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable, replacing any previous value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes an argument struct into variables.
    ///
    /// ## Errors
    ///
    /// - [`ServiceError::ProgrammerFailure`] if serialization fails.
    /// - [`ServiceError::RequestBad`] if the value is not a JSON object (or
    ///   unit, which yields no variables).
    pub fn from_serialize<A: Serialize + ?Sized>(arguments: &A) -> Result<Self, ServiceError> {
        let value = serde_json::to_value(arguments)
            .map_err(|e| ServiceError::ProgrammerFailure(format!("failed to serialize variables: {e}")))?;
        match value {
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            Value::Null => Ok(Self::default()),
            other => Err(ServiceError::RequestBad(format!(
                "variables must serialize to an object, got `{other}`"
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(op: &Operation) -> Vec<String> {
        op.declared_variables().unwrap().into_iter().map(|d| d.name).collect()
    }

    #[test]
    fn test_no_variables() {
        let op = Operation::query("Viewer", "query Viewer { viewer { ...AccountFragment } }");
        assert!(op.declared_variables().unwrap().is_empty());
    }

    #[test]
    fn test_parses_definitions_with_defaults_and_lists() {
        let op = Operation::query(
            "Search",
            r#"query Search($text: String!, $ids: [ID!] = ["a,$b", "c"] $first: Int = 10) { search(text: $text) { __typename } }"#,
        );
        let defs = op.declared_variables().unwrap();
        assert_eq!(names(&op), vec!["text", "ids", "first"]);
        assert_eq!(defs[0].type_name, "String!");
        assert!(defs[0].is_required());
        assert_eq!(defs[1].type_name, "[ID!]");
        assert!(defs[1].has_default);
        assert!(!defs[2].is_required());
    }

    #[test]
    fn test_selection_arguments_are_not_definitions() {
        let op = Operation::mutation(
            "CreateAccount",
            "mutation CreateAccount($input: CreateAccountInput!) { createAccount(input: $input) { account { id } } }",
        );
        assert_eq!(names(&op), vec!["input"]);
    }

    #[test]
    fn test_object_default_does_not_end_the_header() {
        let op = Operation::query(
            "Posts",
            "query Posts($filter: PostFilter = {limit: 10, tags: [\"a\"]}, $first: Int!) { posts(filter: $filter) { id } }",
        );
        let defs = op.declared_variables().unwrap();
        assert_eq!(names(&op), vec!["filter", "first"]);
        assert_eq!(defs[0].type_name, "PostFilter");
        assert!(defs[0].has_default);
        assert!(op.check_variables(&Variables::new().with("first", 3)).is_ok());
    }

    #[test]
    fn test_string_default_may_contain_brackets() {
        let op = Operation::query(
            "Search",
            r#"query Search($q: String = "{", $tag: String = ") \"}"){ search(q: $q) { __typename } }"#,
        );
        let defs = op.declared_variables().unwrap();
        assert_eq!(names(&op), vec!["q", "tag"]);
        assert!(defs.iter().all(|d| d.type_name == "String" && d.has_default));
        assert!(op.check_variables(&Variables::new()).is_ok());
    }

    #[test]
    fn test_directive_after_variable_list() {
        let op = Operation::query("Cached", "query Cached($a: Int) @cached(ttl: 5) { value(a: $a) }");
        let defs = op.declared_variables().unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].type_name, "Int");

        let op = Operation::query("Cached", "query Cached @cached(ttl: 5) { value }");
        assert!(op.declared_variables().unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_variable_list_is_programmer_failure() {
        let op = Operation::query("Bad", "query Bad($id: ID! { node(id: $id) { id } }");
        assert!(matches!(op.declared_variables(), Err(ServiceError::ProgrammerFailure(_))));
    }

    #[test]
    fn test_missing_keyword_is_programmer_failure() {
        let op = Operation::query("Bad", "{ viewer { id } }");
        assert!(matches!(op.declared_variables(), Err(ServiceError::ProgrammerFailure(_))));

        let op = Operation::query("Bad", "queryViewer { viewer { id } }");
        assert!(matches!(op.declared_variables(), Err(ServiceError::ProgrammerFailure(_))));
    }

    #[test]
    fn test_missing_selection_set_is_programmer_failure() {
        let op = Operation::query("Bad", "query Bad($id: ID!)");
        assert!(matches!(op.check_variables(&Variables::new()), Err(ServiceError::ProgrammerFailure(_))));
    }

    #[test]
    fn test_unknown_variable_is_request_bad() {
        let op = Operation::query("Node", "query Node($id: ID!) { node(id: $id) { __typename } }");
        let vars = Variables::new().with("id", "1").with("extra", true);
        let err = op.check_variables(&vars).unwrap_err();
        assert!(matches!(err, ServiceError::RequestBad(msg) if msg.contains("extra")));
    }

    #[test]
    fn test_missing_required_variable_is_request_bad() {
        let op = Operation::query("Node", "query Node($id: ID!) { node(id: $id) { __typename } }");
        assert!(matches!(op.check_variables(&Variables::new()), Err(ServiceError::RequestBad(_))));

        let null = Variables::new().with("id", Value::Null);
        assert!(matches!(op.check_variables(&null), Err(ServiceError::RequestBad(_))));

        assert!(op.check_variables(&Variables::new().with("id", "1")).is_ok());
    }

    #[test]
    fn test_defaulted_non_null_may_be_omitted() {
        let op = Operation::query("Posts", "query Posts($first: Int! = 10) { posts(first: $first) { __typename } }");
        assert!(op.check_variables(&Variables::new()).is_ok());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct PostsVariables {
            #[serde(skip_serializing_if = "Option::is_none")]
            first: Option<i32>,
        }

        let vars = Variables::from_serialize(&PostsVariables { first: None }).unwrap();
        assert!(vars.is_empty());
        let vars = Variables::from_serialize(&PostsVariables { first: Some(5) }).unwrap();
        assert_eq!(vars.get("first"), Some(&json!(5)));

        assert!(Variables::from_serialize(&()).unwrap().is_empty());
        assert!(matches!(Variables::from_serialize(&42), Err(ServiceError::RequestBad(_))));
    }

    #[test]
    fn test_variables_serialize_as_object() {
        let vars: Variables = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(serde_json::to_string(&vars).unwrap(), r#"{"a":1,"b":2}"#);
        assert_eq!(vars.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
