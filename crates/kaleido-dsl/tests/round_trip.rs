use kaleido_dsl::{parse, print_document};

/// Helper: parse source, print it, parse again, and compare the documents.
fn assert_round_trip(source: &str) {
    let first = parse(source).expect("first parse should succeed");
    let printed = print_document(&first);
    let second = parse(&printed).unwrap_or_else(|err| {
        panic!("second parse (after printing) failed: {err}\n\nPrinted DSL:\n{printed}");
    });
    assert_eq!(first, second, "document changed after round trip:\n{printed}");

    // Printing is stable once normalized.
    assert_eq!(print_document(&second), printed);
}

#[test]
fn round_trip_minimal_model() {
    assert_round_trip("model S { name: string }");
}

#[test]
fn round_trip_all_primitive_types() {
    assert_round_trip(
        "model AllTypes {
            a: string
            b: integer
            c: boolean
            d: timestamp
            e: date
            f: json
            g: float
        }",
    );
}

#[test]
fn round_trip_aliases_and_unknown_types() {
    assert_round_trip("model A {\n  body: text\n  size: bigint\n  ref: uuid\n}");
}

#[test]
fn round_trip_every_attribute() {
    assert_round_trip(
        "model A {
            id: integer @primary @autoIncrement
            email: string @unique @nullable
            state: string @default('draft')
        }",
    );
}

#[test]
fn round_trip_relationships() {
    assert_round_trip(
        "model Post {
            author: belongsTo(User)
            editor_id: belongsTo(User) @nullable
        }
        model User { name: string }",
    );
}

#[test]
fn round_trip_timestamps_shorthand() {
    assert_round_trip("model A {\n  timestamps\n  x: string\n}");
}

#[test]
fn round_trip_drops_noise() {
    let source = "# header\nmodel A {\n  x: varchar(255) @unique @unique # note\n}\ntrailing text";
    assert_round_trip(source);
    let printed = print_document(&parse(source).unwrap());
    assert_eq!(printed, "model A {\n    x: varchar @unique\n}\n");
}

#[test]
fn round_trip_empty_model() {
    assert_round_trip("model Empty {\n}");
}
