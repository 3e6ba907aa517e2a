//! Fragment derivation.
//!
//! A fragment is the set of an object's scalar leaf fields that are not
//! functions, in declaration order. Pagination wrappers (`*Edge`,
//! `*Connection`) never get a fragment.

use grafter_define::ObjectType;

/// Name of the fragment for an object (`AccountFragment`).
pub fn fragment_name(object: &str) -> String {
    format!("{object}Fragment")
}

/// Returns the fields selected by an object's fragment.
pub fn fragment_fields(object: &ObjectType) -> Option<Vec<&str>> {
    if object.is_pagination_wrapper() {
        return None;
    }
    Some(
        object
            .fields
            .iter()
            .filter(|f| f.is_fragment_leaf())
            .map(|f| f.name.as_str())
            .collect(),
    )
}

/// Builds the fragment definition for an object.
///
/// ## Examples
///
/// ```
/// use grafter_define::{FieldDescriptor, ObjectType, TypeRef};
/// use grafter_gen::fragment::build_fragment;
///
/// let account = ObjectType::new("Account")
///     .field(FieldDescriptor::leaf("id", TypeRef::named("ID")))
///     .field(FieldDescriptor::leaf("name", TypeRef::named("String")))
///     .field(FieldDescriptor::leaf("createFn", TypeRef::named("Boolean")).function());
///
/// assert_eq!(
///     build_fragment(&account).unwrap(),
///     "fragment AccountFragment on Account { id name }"
/// );
/// assert!(build_fragment(&ObjectType::new("AccountEdge")).is_none());
/// ```
pub fn build_fragment(object: &ObjectType) -> Option<String> {
    let fields = fragment_fields(object)?;
    let body = if fields.is_empty() {
        " ".to_string()
    } else {
        format!(" {} ", fields.join(" "))
    };
    Some(format!(
        "fragment {} on {} {{{body}}}",
        fragment_name(&object.name),
        object.name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grafter_define::{FieldDescriptor, TypeRef};

    #[test]
    fn account_scenario() {
        let account = ObjectType::new("Account")
            .field(FieldDescriptor::leaf("id", TypeRef::named("ID")))
            .field(FieldDescriptor::leaf("name", TypeRef::named("String")))
            .field(FieldDescriptor::leaf("email", TypeRef::named("String")))
            .field(FieldDescriptor::leaf("createFn", TypeRef::named("Boolean")).function());
        assert_eq!(
            build_fragment(&account).unwrap(),
            "fragment AccountFragment on Account { id name email }"
        );
    }

    #[test]
    fn composite_fields_are_excluded() {
        let post = ObjectType::new("Post")
            .field(FieldDescriptor::composite("author", TypeRef::named("Account")))
            .field(FieldDescriptor::leaf("title", TypeRef::named("String")));
        assert_eq!(fragment_fields(&post).unwrap(), vec!["title"]);
    }

    #[test]
    fn empty_fragment_keeps_wrapper() {
        let empty = ObjectType::new("Marker");
        assert_eq!(
            build_fragment(&empty).unwrap(),
            "fragment MarkerFragment on Marker { }"
        );
    }

    #[test]
    fn pagination_wrappers_have_no_fragment() {
        let connection = ObjectType::new("PostConnection")
            .field(FieldDescriptor::leaf("totalCount", TypeRef::named("Int")));
        assert!(build_fragment(&connection).is_none());
        assert!(build_fragment(&ObjectType::new("PostEdge")).is_none());
    }
}
