//! Loading a [`Schema`] from GraphQL introspection JSON.
//!
//! Accepts the output of the standard introspection query, either wrapped in
//! a response envelope (`{"data": {"__schema": ...}}`) or bare
//! (`{"__schema": ...}`).
//!
//! ## Classification Rules
//!
//! - Types whose name starts with `__` (introspection meta types) are skipped.
//! - The query and mutation root types are hoisted into
//!   [`Schema::queries`] / [`Schema::mutations`] instead of becoming objects.
//! - Objects whose name ends in `Payload` become [`SchemaKind::Payload`].
//! - Objects whose name ends in `Edge` / `Connection` are flagged as
//!   pagination wrappers.
//! - A field with arguments is a function field.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::field::{ArgumentDescriptor, FieldDescriptor};
use crate::kind::{
    EnumType, InputType, InterfaceType, ObjectType, PAYLOAD_SUFFIX, PayloadType, ScalarType,
    SchemaKind, UnionType,
};
use crate::schema::Schema;
use crate::type_ref::TypeRef;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<SchemaHolder>,
    #[serde(rename = "__schema")]
    schema: Option<RawSchema>,
}

#[derive(Debug, Deserialize)]
struct SchemaHolder {
    #[serde(rename = "__schema")]
    schema: RawSchema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    query_type: Option<NamedRef>,
    mutation_type: Option<NamedRef>,
    subscription_type: Option<NamedRef>,
    #[serde(default)]
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum RawKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawType {
    kind: RawKind,
    name: Option<String>,
    description: Option<String>,
    fields: Option<Vec<RawField>>,
    input_fields: Option<Vec<RawInputValue>>,
    interfaces: Option<Vec<RawTypeRef>>,
    enum_values: Option<Vec<RawEnumValue>>,
    possible_types: Option<Vec<RawTypeRef>>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    description: Option<String>,
    #[serde(default)]
    args: Vec<RawInputValue>,
    #[serde(rename = "type")]
    type_ref: RawTypeRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    type_ref: RawTypeRef,
    default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEnumValue {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeRef {
    kind: RawKind,
    name: Option<String>,
    of_type: Option<Box<RawTypeRef>>,
}

/// Parses introspection JSON into a [`Schema`].
///
/// ## Examples
///
/// ```
/// use grafter_define::introspection::parse_introspection;
///
/// let json = r#"{"data":{"__schema":{
///     "queryType":{"name":"Query"},
///     "types":[
///         {"kind":"SCALAR","name":"String"},
///         {"kind":"OBJECT","name":"Query","fields":[
///             {"name":"hello","args":[],"type":{"kind":"SCALAR","name":"String"}}
///         ]}
///     ]
/// }}}"#;
///
/// let schema = parse_introspection(json).unwrap();
/// assert_eq!(schema.queries[0].name, "hello");
/// assert!(schema.object("Query").is_none());
/// ```
///
/// ## Errors
///
/// Returns [`SchemaError`] when the JSON is malformed, carries no `__schema`,
/// or contains a type without a name.
pub fn parse_introspection(json: &str) -> Result<Schema, SchemaError> {
    let envelope: Envelope = serde_json::from_str(json)?;
    let raw = envelope
        .data
        .map(|d| d.schema)
        .or(envelope.schema)
        .ok_or(SchemaError::MissingSchema)?;

    let query_root = raw.query_type.map(|t| t.name);
    let mutation_root = raw.mutation_type.map(|t| t.name);
    let subscription_root = raw.subscription_type.map(|t| t.name);

    let mut schema = Schema::new();

    for raw_type in raw.types {
        let name = raw_type
            .name
            .clone()
            .ok_or_else(|| SchemaError::MissingTypeName {
                context: "top-level type".to_string(),
            })?;

        if name.starts_with("__") {
            continue;
        }

        if query_root.as_deref() == Some(name.as_str()) {
            schema.queries = convert_fields(&name, raw_type.fields.unwrap_or_default())?;
            continue;
        }
        if mutation_root.as_deref() == Some(name.as_str()) {
            schema.mutations = convert_fields(&name, raw_type.fields.unwrap_or_default())?;
            continue;
        }
        if subscription_root.as_deref() == Some(name.as_str()) {
            warn!(name = %name, "subscription root is not supported; skipping");
            continue;
        }

        let kind = convert_type(name, raw_type)?;
        debug!(name = kind.name(), category = %kind.category(), "loaded schema kind");
        schema.kinds.push(kind);
    }

    Ok(schema)
}

fn convert_type(name: String, raw: RawType) -> Result<SchemaKind, SchemaError> {
    let description = raw.description;
    let kind = match raw.kind {
        RawKind::Scalar => SchemaKind::Scalar(ScalarType { name, description }),
        RawKind::Object if name.ends_with(PAYLOAD_SUFFIX) => SchemaKind::Payload(PayloadType {
            fields: convert_fields(&name, raw.fields.unwrap_or_default())?,
            name,
            description,
        }),
        RawKind::Object => {
            let mut object = ObjectType::new(name);
            object.fields = convert_fields(&object.name, raw.fields.unwrap_or_default())?;
            object.interfaces = named_refs(&object.name, raw.interfaces.unwrap_or_default())?;
            object.description = description;
            SchemaKind::Object(object)
        }
        RawKind::Interface => SchemaKind::Interface(InterfaceType {
            fields: convert_fields(&name, raw.fields.unwrap_or_default())?,
            name,
            description,
        }),
        RawKind::Union => SchemaKind::Union(UnionType {
            possible_types: named_refs(&name, raw.possible_types.unwrap_or_default())?,
            name,
            description,
        }),
        RawKind::Enum => SchemaKind::Enum(EnumType {
            values: raw
                .enum_values
                .unwrap_or_default()
                .into_iter()
                .map(|v| v.name)
                .collect(),
            name,
            description,
        }),
        RawKind::InputObject => SchemaKind::Input(InputType {
            fields: raw
                .input_fields
                .unwrap_or_default()
                .into_iter()
                .map(|v| input_field(&name, v))
                .collect::<Result<_, _>>()?,
            name,
            description,
        }),
        RawKind::List | RawKind::NonNull => {
            return Err(SchemaError::UnsupportedKind {
                name,
                kind: format!("{:?}", raw.kind),
            });
        }
    };
    Ok(kind)
}

fn convert_fields(owner: &str, fields: Vec<RawField>) -> Result<Vec<FieldDescriptor>, SchemaError> {
    fields
        .into_iter()
        .map(|field| {
            let (type_ref, leaf) = convert_type_ref(owner, &field.type_ref)?;
            let arguments = field
                .args
                .into_iter()
                .map(|arg| {
                    let (type_ref, _) = convert_type_ref(owner, &arg.type_ref)?;
                    Ok(ArgumentDescriptor {
                        name: arg.name,
                        type_ref,
                        default_value: arg.default_value,
                    })
                })
                .collect::<Result<Vec<_>, SchemaError>>()?;

            let descriptor = if leaf {
                FieldDescriptor::leaf(field.name, type_ref)
            } else {
                FieldDescriptor::composite(field.name, type_ref)
            };
            let mut descriptor = descriptor.with_arguments(arguments);
            descriptor.description = field.description;
            Ok(descriptor)
        })
        .collect()
}

fn input_field(owner: &str, value: RawInputValue) -> Result<FieldDescriptor, SchemaError> {
    let (type_ref, leaf) = convert_type_ref(owner, &value.type_ref)?;
    let mut field = if leaf {
        FieldDescriptor::leaf(value.name, type_ref)
    } else {
        FieldDescriptor::composite(value.name, type_ref)
    };
    field.description = value.description;
    Ok(field)
}

/// Converts a wrapped type reference, returning whether its innermost kind
/// is a leaf (scalar or enum).
fn convert_type_ref(owner: &str, raw: &RawTypeRef) -> Result<(TypeRef, bool), SchemaError> {
    match raw.kind {
        RawKind::List | RawKind::NonNull => {
            let inner = raw
                .of_type
                .as_deref()
                .ok_or_else(|| SchemaError::MissingTypeName {
                    context: format!("wrapped type on `{owner}`"),
                })?;
            let (inner_ref, leaf) = convert_type_ref(owner, inner)?;
            let wrapped = if raw.kind == RawKind::List {
                inner_ref.list()
            } else {
                inner_ref.non_null()
            };
            Ok((wrapped, leaf))
        }
        kind => {
            let name = raw.name.clone().ok_or_else(|| SchemaError::MissingTypeName {
                context: format!("field type on `{owner}`"),
            })?;
            Ok((
                TypeRef::Named(name),
                matches!(kind, RawKind::Scalar | RawKind::Enum),
            ))
        }
    }
}

fn named_refs(owner: &str, refs: Vec<RawTypeRef>) -> Result<Vec<String>, SchemaError> {
    refs.into_iter()
        .map(|r| {
            r.name.ok_or_else(|| SchemaError::MissingTypeName {
                context: format!("type reference on `{owner}`"),
            })
        })
        .collect()
}
