//! Integration tests for digests of derived types, std collections and graphs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use imprint_core::{
    classify, compute_digest, DigestSink, ErrorKind, Fingerprint, Graph, Imprint, Imprinter, Kind,
    Options, Position, StringFraming, Value,
};
use sha2::Sha256;

fn digest(value: &dyn Imprint) -> Fingerprint {
    compute_digest(value, &mut blake3::Hasher::new()).unwrap()
}

#[derive(Imprint)]
struct Account {
    id: u64,
    owner: String,
    limits: HashMap<String, i64>,
    #[imprint(skip)]
    last_seen: u64,
}

#[derive(Imprint)]
struct Empty;

#[derive(Imprint)]
struct Pair(u8, String);

#[derive(Imprint)]
enum Shape {
    Point,
    Circle { radius: f64 },
    Rect(f64, f64),
}

#[derive(Imprint)]
enum Status {
    #[imprint(rename = "Enabled")]
    On,
    Off,
}

#[derive(Imprint)]
struct Link {
    value: i32,
    next: Option<Box<Link>>,
}

#[derive(Imprint)]
struct Wrapper<T> {
    inner: T,
}

#[derive(Imprint)]
struct Job {
    name: String,
    #[imprint(rename = "handler")]
    run: Value,
}

#[derive(Imprint)]
#[imprint(display)]
struct Version {
    major: u32,
    minor: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

fn account(last_seen: u64) -> Account {
    let mut limits = HashMap::new();
    limits.insert("daily".to_string(), 500);
    limits.insert("monthly".to_string(), 5000);
    limits.insert("single".to_string(), 100);
    Account {
        id: 17,
        owner: "ada".to_string(),
        limits,
        last_seen,
    }
}

fn chain(len: usize) -> Link {
    let mut link = Link { value: 0, next: None };
    for value in 1..len as i32 {
        link = Link {
            value,
            next: Some(Box::new(link)),
        };
    }
    link
}

#[test]
fn determinism_over_repeated_runs() {
    let value = Value::map(
        "dynamic",
        [
            (Value::from("name"), Value::from("widget")),
            (Value::from(3i64), Value::list("Vec<f64>", [Value::from(1.5f64), Value::from(-0.0f64)])),
            (Value::from(true), Value::Nil),
            (Value::from(2u8), Value::typed_nil("demo::Part")),
            (
                Value::from('k'),
                Value::record("demo::Part", "demo", [("id", Value::from(9u32))]),
            ),
        ],
    );

    let first = digest(&value);
    for _ in 0..500 {
        assert_eq!(digest(&value), first);
    }
}

#[test]
fn hash_map_iteration_order_does_not_matter() {
    let expected = digest(&account(0));
    for _ in 0..50 {
        // Each map gets its own random hasher state and iteration order.
        assert_eq!(digest(&account(0)), expected);
    }
}

#[test]
fn insertion_order_does_not_matter() {
    let forward = Value::map(
        "dynamic",
        (0..20u32).map(|i| (Value::from(i), Value::from(i.to_string()))),
    );
    let backward = Value::map(
        "dynamic",
        (0..20u32).rev().map(|i| (Value::from(i), Value::from(i.to_string()))),
    );
    assert_eq!(digest(&forward), digest(&backward));
}

#[test]
fn map_types_differ_only_when_empty() {
    let hashed: HashMap<u8, u8> = [(1, 2), (3, 4)].into_iter().collect();
    let ordered: BTreeMap<u8, u8> = [(1, 2), (3, 4)].into_iter().collect();
    // Non-empty maps do not write their type name.
    assert_eq!(digest(&hashed), digest(&ordered));

    let empty_hashed: HashMap<u8, u8> = HashMap::new();
    let empty_ordered: BTreeMap<u8, u8> = BTreeMap::new();
    assert_ne!(digest(&empty_hashed), digest(&empty_ordered));
}

#[test]
fn type_discrimination() {
    assert_ne!(digest(&0i64), digest(&false));
    assert_ne!(digest(&42i64), digest(&42u64));
    assert_ne!(digest(&42i32), digest(&42i64));
    assert_ne!(digest(&1.0f32), digest(&1.0f64));
    assert_ne!(digest(&""), digest(&Vec::<u8>::new()));
    assert_ne!(digest(&'a'), digest(&97u32));
    assert_ne!(
        digest(&HashMap::<String, String>::new()),
        digest(&HashMap::<i64, String>::new())
    );
    assert_ne!(digest(&None::<i32>), digest(&None::<String>));
    assert_ne!(digest(&Vec::<u8>::new()), digest(&Vec::<String>::new()));
}

#[test]
fn nil_is_distinct_from_empty_pointee() {
    assert_ne!(digest(&None::<Vec<u8>>), digest(&Vec::<u8>::new()));
    assert_ne!(digest(&None::<()>), digest(&()));
    assert_ne!(digest(&None::<Empty>), digest(&Empty));
    assert_ne!(
        digest(&None::<HashMap<String, String>>),
        digest(&HashMap::<String, String>::new())
    );
}

#[test]
fn nil_and_dereferenced_nil_coincide() {
    assert_eq!(digest(&None::<i32>), digest(&Some(None::<i32>)));
    assert_eq!(digest(&None::<String>), digest(&Box::new(None::<String>)));
    assert_eq!(digest(&Value::typed_nil("i32")), digest(&None::<i32>));
}

#[test]
fn nil_trait_object_writes_no_type() {
    assert_eq!(digest(&None::<Box<dyn Imprint>>), digest(&Value::Nil));
    assert_eq!(digest(&None::<Box<dyn Imprint>>), digest(&None::<&dyn Imprint>));
    assert_ne!(digest(&None::<Box<dyn Imprint>>), digest(&None::<Box<u8>>));
}

#[test]
fn indirection_is_transparent() {
    let v = account(3);
    assert_eq!(digest(&v), digest(&&v));
    assert_eq!(digest(&v), digest(&Box::new(account(3))));
    assert_eq!(digest(&7u8), digest(&Some(7u8)));
    assert_eq!(digest(&7u8), digest(&std::rc::Rc::new(7u8)));
}

#[test]
fn dynamic_scalars_match_native_scalars() {
    assert_eq!(digest(&Value::I64(7)), digest(&7i64));
    assert_eq!(digest(&Value::from("x")), digest(&"x".to_string()));
    assert_eq!(digest(&Value::from(2.5f32)), digest(&2.5f32));
}

#[test]
fn skipped_fields_do_not_affect_digest() {
    assert_eq!(digest(&account(1)), digest(&account(2)));

    let mut changed = account(1);
    changed.owner = "grace".to_string();
    assert_ne!(digest(&account(1)), digest(&changed));
}

#[test]
fn unit_struct_is_stable() {
    assert_eq!(digest(&Empty), digest(&Empty));
    assert_ne!(digest(&Empty), digest(&()));
}

#[test]
fn tuple_structs_hash_their_fields() {
    assert_eq!(digest(&Pair(1, "a".to_string())), digest(&Pair(1, "a".to_string())));
    assert_ne!(digest(&Pair(1, "a".to_string())), digest(&Pair(2, "a".to_string())));
}

#[test]
fn enum_variants_are_distinct() {
    let point = digest(&Shape::Point);
    let circle = digest(&Shape::Circle { radius: 1.0 });
    let rect = digest(&Shape::Rect(1.0, 1.0));
    assert_ne!(point, circle);
    assert_ne!(circle, rect);
    assert_ne!(digest(&Shape::Circle { radius: 1.0 }), digest(&Shape::Circle { radius: 2.0 }));
}

#[test]
fn renamed_variants_stay_distinct() {
    assert_ne!(digest(&Status::On), digest(&Status::Off));
    assert_eq!(digest(&Status::On), digest(&Status::On));
}

#[test]
fn generic_types_include_parameters() {
    assert_ne!(
        digest(&Wrapper { inner: 1u8 }),
        digest(&Wrapper { inner: 1u16 })
    );
    assert_eq!(
        digest(&Wrapper { inner: vec![1u8] }),
        digest(&Wrapper { inner: vec![1u8] })
    );
}

#[test]
fn display_types_hash_their_rendering() {
    let a = Version { major: 1, minor: 2 };
    let b = Version { major: 1, minor: 2 };
    let c = Version { major: 1, minor: 3 };
    assert_eq!(digest(&a), digest(&b));
    assert_ne!(digest(&a), digest(&c));
    assert_ne!(digest(&a), digest(&"1.2".to_string()));
}

#[test]
fn sets_ignore_insertion_order() {
    let a: HashSet<&str> = ["x", "y", "z"].into_iter().collect();
    let b: HashSet<&str> = ["z", "y", "x"].into_iter().collect();
    assert_eq!(digest(&a), digest(&b));
}

#[test]
fn self_referential_graph_is_stable() {
    fn build() -> (Graph, imprint_core::NodeId) {
        let mut graph = Graph::new();
        let root = graph.reserve();
        graph
            .set(
                root,
                Value::record(
                    "demo::Node",
                    "demo",
                    [("label", Value::from("root")), ("parent", Value::Ref(root))],
                ),
            )
            .unwrap();
        (graph, root)
    }

    let (first, root) = build();
    let (second, other_root) = build();
    assert_eq!(digest(&first.node(root)), digest(&second.node(other_root)));
}

#[test]
fn shared_nodes_are_hashed_once() {
    let mut graph = Graph::new();
    let leaf = graph.insert(Value::from(5u8));
    let once = graph.insert(Value::list("Vec<ref>", [Value::Ref(leaf)]));
    let twice = graph.insert(Value::list("Vec<ref>", [Value::Ref(leaf), Value::Ref(leaf)]));
    assert_eq!(digest(&graph.node(once)), digest(&graph.node(twice)));
}

#[test]
fn long_reference_chain_exceeds_depth() {
    let mut graph = Graph::new();
    let mut next = graph.insert(Value::from(0i64));
    for _ in 0..150 {
        next = graph.insert(Value::Ref(next));
    }
    let err = compute_digest(&graph.node(next), &mut blake3::Hasher::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
}

#[test]
fn deep_recursive_structure_exceeds_depth() {
    let shallow = chain(10);
    assert!(compute_digest(&shallow, &mut blake3::Hasher::new()).is_ok());

    let deep = chain(150);
    let err = compute_digest(&deep, &mut blake3::Hasher::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    assert_eq!(err.path().first(), Some(&&Position::Field("next".to_string())));
}

#[test]
fn unsupported_values_fail_with_context() {
    let value = Value::map(
        "dynamic",
        [(Value::from("handler"), Value::Function("main::run".to_string()))],
    );
    let err = compute_digest(&value, &mut blake3::Hasher::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert_eq!(err.path(), vec![&Position::Value(0)]);
}

#[test]
fn renamed_fields_appear_in_error_paths() {
    let job = Job {
        name: "nightly".to_string(),
        run: Value::Function("jobs::nightly".to_string()),
    };
    let err = compute_digest(&job, &mut blake3::Hasher::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert_eq!(err.path(), vec![&Position::Field("handler".to_string())]);
}

#[test]
fn rust_crypto_digests_are_sinks() {
    let mut sink = DigestSink::<Sha256>::new();
    let fingerprint = compute_digest(&account(0), &mut sink).unwrap();
    assert_eq!(fingerprint.as_bytes().len(), 32);

    let again = compute_digest(&account(0), &mut DigestSink::<Sha256>::new()).unwrap();
    assert_eq!(fingerprint, again);
    assert_ne!(fingerprint, digest(&account(0)));
}

#[test]
fn string_framing_changes_digest() {
    let framed = Imprinter::new(Options::default().with_string_framing(StringFraming::LengthPrefixed));
    let plain = Imprinter::default();
    let value = ("ab".to_string(), "c".to_string());

    let a = framed.digest(&value, &mut blake3::Hasher::new()).unwrap();
    let b = plain.digest(&value, &mut blake3::Hasher::new()).unwrap();
    assert_ne!(a, b);

    // Length prefixes separate adjacent strings that would otherwise collide.
    let shifted = ("a".to_string(), "bc".to_string());
    let c = framed.digest(&shifted, &mut blake3::Hasher::new()).unwrap();
    assert_ne!(a, c);
}

#[test]
fn options_load_from_toml() {
    let options = Options::from_toml("max_depth = 3").unwrap();
    let imprinter = Imprinter::new(options);
    assert!(imprinter.digest(&chain(1), &mut blake3::Hasher::new()).is_ok());
    let err = imprinter.digest(&chain(3), &mut blake3::Hasher::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
}

#[test]
fn classify_follows_references() {
    let options = Options::default();
    assert_eq!(classify(&Box::new(Some(3i8)), &options).unwrap(), Kind::SignedInteger);
    assert_eq!(classify(&None::<u8>, &options).unwrap(), Kind::Nil);
    assert_eq!(classify(&account(0), &options).unwrap(), Kind::Aggregate);
    assert_eq!(classify(&Shape::Point, &options).unwrap(), Kind::Aggregate);
}
