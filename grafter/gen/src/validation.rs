//! Pre-generation schema validation.
//!
//! Every check runs before any code is emitted, so a schema that fails here
//! never produces partial output.
//!
//! ## Validation Checks
//!
//! - **Names**: every declared name is a valid GraphQL name, and kind names
//!   (plus generated `Any<Interface>` names) are unique across all categories
//! - **References**: every field and argument type resolves to a declared kind
//! - **Scalars**: every declared scalar has a Rust mapping
//! - **Unions**: members exist and are objects; no empty unions
//! - **Interfaces**: implemented interfaces exist and every interface field is
//!   present on the object with identical arguments and the same or a
//!   narrower type (non-null for nullable, a member object for an interface
//!   or union)
//! - **Leaf flags**: `is_scalar_leaf` agrees with the kind the field resolves to
//!
//! ## Examples
//!
//! ```
//! use grafter_define::prelude::*;
//! use grafter_gen::config::GeneratorConfig;
//! use grafter_gen::validation::validate_schema;
//!
//! let schema = Schema::new()
//!     .with_builtin_scalars()
//!     .with(SchemaKind::Object(
//!         ObjectType::new("Account").field(FieldDescriptor::leaf("id", TypeRef::named("ID"))),
//!     ));
//!
//! assert!(validate_schema(&schema, &GeneratorConfig::default()).is_ok());
//! ```

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};

use grafter_define::{FieldDescriptor, KindCategory, ObjectType, Schema, SchemaKind, TypeRef};

use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::naming::{
    is_valid_name, to_pascal_case, to_screaming_snake_case, to_snake_case,
};

/// Validates a schema before code generation.
///
/// ## Errors
///
/// Returns the first violation found, in declaration order.
pub fn validate_schema(schema: &Schema, config: &GeneratorConfig) -> Result<(), GeneratorError> {
    check_names(schema)?;
    check_scalars(schema, config)?;

    for kind in &schema.kinds {
        check_fields(schema, kind.name(), kind.fields())?;
        match kind {
            SchemaKind::Union(union) => check_union(schema, &union.name, &union.possible_types)?,
            SchemaKind::Object(object) => check_interfaces(schema, object)?,
            SchemaKind::Enum(e) => check_enum_values(&e.name, &e.values)?,
            _ => {}
        }
    }

    check_fields(schema, "Query", &schema.queries)?;
    check_fields(schema, "Mutation", &schema.mutations)?;
    check_operation_names(schema)?;

    Ok(())
}

fn check_names(schema: &Schema) -> Result<(), GeneratorError> {
    let mut seen: HashMap<String, KindCategory> = HashMap::new();

    for kind in &schema.kinds {
        let name = kind.name();
        if !is_valid_name(name) {
            return Err(GeneratorError::CodeGenError(format!(
                "'{name}' is not a valid type name"
            )));
        }
        if seen.insert(name.to_string(), kind.category()).is_some() {
            return Err(GeneratorError::DuplicateName {
                category: kind.category().to_string(),
                name: name.to_string(),
            });
        }
    }

    // Interfaces with implementors get a generated value enum.
    for interface in schema.interfaces() {
        if schema.implementors(&interface.name).next().is_none() {
            continue;
        }
        let generated = any_name(&interface.name);
        if seen.contains_key(&generated) {
            return Err(GeneratorError::DuplicateName {
                category: format!("value enum for interface '{}'", interface.name),
                name: generated,
            });
        }
    }

    let mut constants = HashSet::new();
    for object in schema.objects().filter(|o| !o.is_pagination_wrapper()) {
        let constant = fragment_const_name(&object.name);
        if !constants.insert(constant.clone()) {
            return Err(GeneratorError::DuplicateName {
                category: "fragment constant".to_string(),
                name: constant,
            });
        }
    }

    Ok(())
}

fn check_scalars(schema: &Schema, config: &GeneratorConfig) -> Result<(), GeneratorError> {
    for scalar in schema.scalars() {
        if !config.scalars.contains_key(&scalar.name) {
            return Err(GeneratorError::UnknownScalar {
                name: scalar.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_fields(
    schema: &Schema,
    owner: &str,
    fields: &[FieldDescriptor],
) -> Result<(), GeneratorError> {
    let mut names = HashSet::new();
    let mut rust_names = HashSet::new();

    for field in fields {
        if !is_valid_name(&field.name) {
            return Err(GeneratorError::CodeGenError(format!(
                "'{owner}.{}' is not a valid field name",
                field.name
            )));
        }
        if !names.insert(field.name.as_str()) || !rust_names.insert(to_snake_case(&field.name)) {
            return Err(GeneratorError::DuplicateField {
                owner: owner.to_string(),
                field: field.name.clone(),
            });
        }

        let target = resolve(schema, owner, &field.name, field.type_ref.named_type())?;
        if target.is_leaf() != field.is_scalar_leaf {
            return Err(GeneratorError::InconsistentLeaf {
                owner: owner.to_string(),
                field: field.name.clone(),
                type_name: field.type_ref.named_type().to_string(),
                flagged: if field.is_scalar_leaf { "a scalar leaf" } else { "composite" },
                actual: target.category(),
            });
        }

        if let SchemaKind::Interface(interface) = target
            && schema.implementors(&interface.name).next().is_none()
        {
            return Err(GeneratorError::NoImplementors {
                interface: interface.name.clone(),
                owner: owner.to_string(),
                field: field.name.clone(),
            });
        }

        let mut arg_names = HashSet::new();
        for arg in &field.arguments {
            if !is_valid_name(&arg.name) || !arg_names.insert(to_snake_case(&arg.name)) {
                return Err(GeneratorError::CodeGenError(format!(
                    "argument '{}' of '{owner}.{}' is invalid or repeated",
                    arg.name, field.name
                )));
            }
            let arg_owner = format!("{owner}.{}", field.name);
            resolve(schema, &arg_owner, &arg.name, arg.type_ref.named_type())?;
        }
    }
    Ok(())
}

fn resolve<'a>(
    schema: &'a Schema,
    owner: &str,
    field: &str,
    type_name: &str,
) -> Result<&'a SchemaKind, GeneratorError> {
    schema
        .kind(type_name)
        .ok_or_else(|| GeneratorError::UnresolvedType {
            owner: owner.to_string(),
            field: field.to_string(),
            type_name: type_name.to_string(),
        })
}

fn check_union(schema: &Schema, union: &str, members: &[String]) -> Result<(), GeneratorError> {
    if members.is_empty() {
        return Err(GeneratorError::EmptyUnion {
            union: union.to_string(),
        });
    }
    let mut seen = HashSet::new();
    for member in members {
        let is_object = matches!(schema.kind(member), Some(SchemaKind::Object(_)));
        if !is_object || !seen.insert(member) {
            return Err(GeneratorError::DanglingUnionMember {
                union: union.to_string(),
                member: member.clone(),
            });
        }
    }
    Ok(())
}

fn check_interfaces(schema: &Schema, object: &ObjectType) -> Result<(), GeneratorError> {
    // Field name -> (interface, declared type) of the first interface declaring it.
    let mut declared: HashMap<&str, (&str, &TypeRef)> = HashMap::new();

    for interface_name in &object.interfaces {
        let interface =
            schema
                .interface(interface_name)
                .ok_or_else(|| GeneratorError::UnknownInterface {
                    object: object.name.clone(),
                    interface: interface_name.clone(),
                })?;

        for required in &interface.fields {
            let found = object
                .fields
                .iter()
                .find(|f| f.name == required.name)
                .ok_or_else(|| GeneratorError::MissingInterfaceField {
                    object: object.name.clone(),
                    interface: interface_name.clone(),
                    field: required.name.clone(),
                })?;

            let mismatch = |expected: String, actual: String| GeneratorError::InterfaceFieldMismatch {
                object: object.name.clone(),
                interface: interface_name.clone(),
                field: required.name.clone(),
                expected,
                found: actual,
            };

            let compatible = required.is_function == found.is_function
                && arguments(required) == arguments(found)
                && is_valid_implementation(schema, &found.type_ref, &required.type_ref);
            if !compatible {
                return Err(mismatch(signature(required), signature(found)));
            }

            // The object stores the field as its interfaces declare it, so
            // every interface must agree on that type.
            match declared.entry(required.name.as_str()) {
                Entry::Occupied(entry) => {
                    let (first, ty) = *entry.get();
                    if *ty != required.type_ref {
                        return Err(mismatch(
                            format!("{ty} (as declared by '{first}')"),
                            required.type_ref.to_string(),
                        ));
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert((interface.name.as_str(), &required.type_ref));
                }
            }
        }
    }
    Ok(())
}

/// Whether a field of type `found` may implement an interface field of type
/// `expected`: the same type, narrowed by non-null wrappers or by an object
/// in place of an interface it implements or a union it belongs to.
fn is_valid_implementation(schema: &Schema, found: &TypeRef, expected: &TypeRef) -> bool {
    match (found, expected) {
        (TypeRef::NonNull(found), TypeRef::NonNull(expected)) => {
            is_valid_implementation(schema, found, expected)
        }
        (TypeRef::NonNull(found), expected) => is_valid_implementation(schema, found, expected),
        (TypeRef::List(found), TypeRef::List(expected)) => {
            is_valid_implementation(schema, found, expected)
        }
        (TypeRef::Named(found), TypeRef::Named(expected)) => {
            found == expected || is_member(schema, found, expected)
        }
        _ => false,
    }
}

fn is_member(schema: &Schema, object: &str, wider: &str) -> bool {
    let Some(object) = schema.object(object) else {
        return false;
    };
    match schema.kind(wider) {
        Some(SchemaKind::Interface(_)) => object.interfaces.iter().any(|i| i == wider),
        Some(SchemaKind::Union(union)) => union.possible_types.iter().any(|m| *m == object.name),
        _ => false,
    }
}

fn arguments(field: &FieldDescriptor) -> Vec<(&str, &TypeRef)> {
    field
        .arguments
        .iter()
        .map(|a| (a.name.as_str(), &a.type_ref))
        .collect()
}

/// Renders `name(arg: T, ...): Type` with a `fn` marker for function fields.
fn signature(field: &FieldDescriptor) -> String {
    let args: Vec<String> = field
        .arguments
        .iter()
        .map(|a| format!("{}: {}", a.name, a.type_ref))
        .collect();
    let marker = if field.is_function { "fn " } else { "" };
    format!("{marker}({}) -> {}", args.join(", "), field.type_ref)
}

fn check_enum_values(name: &str, values: &[String]) -> Result<(), GeneratorError> {
    let mut variants = BTreeSet::new();
    for value in values {
        let variant = to_pascal_case(value);
        if !is_valid_name(value) || variant.is_empty() || !variants.insert(variant) {
            return Err(GeneratorError::DuplicateName {
                category: format!("value of enum '{name}'"),
                name: value.clone(),
            });
        }
    }
    Ok(())
}

fn check_operation_names(schema: &Schema) -> Result<(), GeneratorError> {
    let mut seen = HashSet::new();
    for field in schema.queries.iter().chain(&schema.mutations) {
        let pascal = to_pascal_case(&field.name);
        if !seen.insert(pascal.clone()) {
            return Err(GeneratorError::DuplicateName {
                category: "operation".to_string(),
                name: pascal,
            });
        }
    }
    Ok(())
}

/// Name of the generated value enum for an interface.
pub fn any_name(interface: &str) -> String {
    format!("Any{interface}")
}

/// Name of the fragment constant for an object.
pub fn fragment_const_name(object: &str) -> String {
    to_screaming_snake_case(&format!("{object}Fragment"))
}
