//! Generation tests over the introspection fixture.

use std::fs;

use grafter_define::prelude::*;
use grafter_gen::config::GeneratorConfig;
use grafter_gen::errors::GeneratorError;
use grafter_gen::output::{GeneratedFile, generate, generate_and_write};
use tempfile::TempDir;

const FIXTURE: &str = include_str!("../fixtures/schema.json");

fn fixture() -> Schema {
    parse_introspection(FIXTURE).expect("fixture parses")
}

fn file<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
    &files
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("missing {name}"))
        .content
}

#[test]
fn regeneration_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let config = GeneratorConfig::default();

    generate_and_write(&fixture(), &config, dir.path(), false).unwrap();
    let first: Vec<_> = ["mod.rs", "interfaces.rs", "scalars.rs", "types.rs", "fragments.rs", "operations.rs"]
        .iter()
        .map(|name| fs::read(dir.path().join(name)).unwrap())
        .collect();

    generate_and_write(&fixture(), &config, dir.path(), false).unwrap();
    let second: Vec<_> = ["mod.rs", "interfaces.rs", "scalars.rs", "types.rs", "fragments.rs", "operations.rs"]
        .iter()
        .map(|name| fs::read(dir.path().join(name)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn account_fragment_selects_stored_leaves_in_order() {
    let files = generate(&fixture(), &GeneratorConfig::default()).unwrap();
    let fragments = file(&files, "fragments.rs");
    assert!(fragments.contains("\"fragment AccountFragment on Account { id name email created }\""));
}

#[test]
fn pagination_wrappers_have_no_fragment() {
    let files = generate(&fixture(), &GeneratorConfig::default()).unwrap();
    let fragments = file(&files, "fragments.rs");
    assert!(!fragments.contains("PostEdgeFragment"));
    assert!(!fragments.contains("PostConnectionFragment"));
    assert!(fragments.contains("fragment PostFragment on Post { id title tags }"));
}

#[test]
fn function_fields_are_not_stored() {
    let files = generate(&fixture(), &GeneratorConfig::default()).unwrap();
    let types = file(&files, "types.rs");
    assert!(!types.contains("create_fn"));
    assert!(!types.contains("pub posts:"));
    assert!(types.contains("pub tags: Option<Vec<String>>,"));
}

#[test]
fn payloads_and_operations_are_generated() {
    let files = generate(&fixture(), &GeneratorConfig::default()).unwrap();
    let types = file(&files, "types.rs");
    assert!(types.contains("pub struct RegisterPayload {"));

    let operations = file(&files, "operations.rs");
    assert!(operations.contains("pub const REGISTER_MUTATION: grafter::Operation"));
    assert!(operations.contains("mutation Register($input: RegisterInput!)"));
    assert!(operations.contains("pub struct RegisterVariables {"));
    assert!(operations.contains("pub fn register<T, F>("));
}

#[test]
fn scalar_overrides_flow_into_aliases() {
    let config = GeneratorConfig::from_toml_str(
        r#"
        [scalars]
        Timestamp = "chrono::DateTime<chrono::Utc>"
        "#,
    )
    .unwrap();
    let files = generate(&fixture(), &config).unwrap();
    assert!(file(&files, "scalars.rs").contains("pub type Timestamp = chrono::DateTime<chrono::Utc>;"));
}

#[test]
fn failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("client");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("types.rs"), "// previous output\n").unwrap();

    let schema = fixture().with(SchemaKind::Scalar(ScalarType::new("Decimal")));
    let err = generate_and_write(&schema, &GeneratorConfig::default(), &out, false).unwrap_err();
    assert!(matches!(err, GeneratorError::UnknownScalar { ref name } if name == "Decimal"));

    let entries: Vec<_> = fs::read_dir(&out).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(fs::read_to_string(out.join("types.rs")).unwrap(), "// previous output\n");
}

#[test]
fn dangling_union_member_is_fatal() {
    let schema = fixture().with(SchemaKind::Union(UnionType::new("Feed", ["Account", "Comment"])));
    let err = generate(&schema, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::DanglingUnionMember { ref union, ref member } if union == "Feed" && member == "Comment"
    ));
}

#[test]
fn duplicate_names_are_fatal() {
    let schema = fixture().with(SchemaKind::Enum(EnumType::new("Account", ["A"])));
    let err = generate(&schema, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, GeneratorError::DuplicateName { ref name, .. } if name == "Account"));
}

#[test]
fn unresolved_reference_is_fatal() {
    let schema = fixture().with(SchemaKind::Object(
        ObjectType::new("Comment").field(FieldDescriptor::composite("thread", TypeRef::named("Thread"))),
    ));
    let err = generate(&schema, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, GeneratorError::UnresolvedType { ref type_name, .. } if type_name == "Thread"));
}

#[test]
fn fixture_from_disk_matches_inline() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/schema.json");
    let json = fs::read_to_string(path).unwrap();
    assert_eq!(parse_introspection(&json).unwrap(), fixture());
}
