//! Property-based tests for the typesystem interpreter
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;
use typesys::{Handler, TypeDatabase};
use typesys_syntax::events::{DocumentEvent, EventReader};
use typesys_syntax::signature;

// =============================================================================
// Document generators
// =============================================================================

/// A directive that may appear inside a complex type entry.
fn directive(i: usize) -> impl Strategy<Value = String> {
    prop_oneof![
        Just(format!("<modify-function signature='f{i}(int)'/>")),
        Just(format!("<add-function signature='g{i}()'/>")),
        Just(format!("<add-field name='field{i}' type='int'>{i}</add-field>")),
        Just(format!("<modify-field name='m{i}' write='false'/>")),
        Just(format!("<inject-code>code{i};</inject-code>")),
        Just(format!(
            "<modify-function signature='h{i}(int)'><modify-argument index='1'><remove-default-expression/></modify-argument></modify-function>"
        )),
    ]
}

fn complex_type(i: usize) -> impl Strategy<Value = String> {
    let tag = prop_oneof![Just("object-type"), Just("value-type"), Just("interface-type")];
    (tag, prop::collection::vec(directive(i), 0..4))
        .prop_map(move |(tag, body)| format!("<{tag} name='T{i}'>{}</{tag}>", body.concat()))
}

fn type_entry(i: usize) -> BoxedStrategy<String> {
    prop_oneof![
        Just(format!("<primitive-type name='p{i}'/>")),
        Just(format!("<enum-type name='E{i}'><reject-enum-value name='V{i}'/></enum-type>")),
        complex_type(i),
        complex_type(i).prop_map(move |inner| format!("<namespace-type name='N{i}'>{inner}</namespace-type>")),
    ]
    .boxed()
}

fn document() -> impl Strategy<Value = String> {
    (0usize..8)
        .prop_flat_map(|n| (0..n).map(type_entry).collect::<Vec<_>>())
        .prop_map(|entries| format!("<typesystem package='Gen'>{}</typesystem>", entries.concat()))
}

// =============================================================================
// Stack balance
// =============================================================================

mod stack_balance {
    use super::*;

    proptest! {
        /// Property: the handler stack is empty exactly when the root tag has closed.
        #[test]
        fn depth_returns_to_zero_at_root_close(source in document()) {
            let mut db = TypeDatabase::new();
            let mut handler = Handler::new(&mut db, true);
            let mut reader = EventReader::new(&source);
            let mut root_closed = false;

            while let Some(event) = reader.next_event().unwrap() {
                prop_assert!(!root_closed, "event after the root closed");
                match &event.node {
                    DocumentEvent::Start { name, attributes } => handler.start_element(name, attributes).unwrap(),
                    DocumentEvent::End { name } => {
                        handler.end_element(name).unwrap();
                        root_closed = name == "typesystem";
                    }
                    DocumentEvent::Text(text) => handler.characters(text),
                }
                prop_assert_eq!(handler.depth() == 0, root_closed);
            }
            prop_assert!(root_closed);
        }

        /// Property: generated documents parse and register every named entry.
        #[test]
        fn generated_documents_parse(source in document()) {
            let mut db = TypeDatabase::new();
            prop_assert!(db.parse_str(&source, true).is_ok());
            prop_assert!(db.warnings().is_empty());
        }
    }
}

// =============================================================================
// Signature grammar
// =============================================================================

fn argument() -> impl Strategy<Value = String> {
    let base = prop_oneof![
        Just("int"),
        Just("const QString &"),
        Just("QList<int>"),
        Just("QMap<int, QString>"),
        Just("const QHash<QString, QList<int> > &"),
        Just("Foo *"),
        Just("char **"),
    ];
    let name = prop_oneof![Just(""), Just(" value"), Just(" other")];
    let default = prop_oneof![Just(""), Just(" = 0"), Just(" = Foo(1, 2)"), Just(" = QString()")];
    (base, name, default).prop_map(|(base, name, default)| format!("{base}{name}{default}"))
}

mod signature_grammar {
    use super::*;

    proptest! {
        /// Property: commas nested in brackets or default values never split an argument.
        #[test]
        fn argument_count_matches(args in prop::collection::vec(argument(), 0..6)) {
            let sig = format!("f({})", args.join(", "));
            let function = signature::parse_function(&sig, "void", 0.0).unwrap();
            prop_assert_eq!(function.arguments.len(), args.len());
        }

        /// Property: normalizing twice changes nothing.
        #[test]
        fn normalization_is_idempotent(args in prop::collection::vec(argument(), 0..6)) {
            let once = signature::normalized_signature(&format!("f( {} )", args.join(" , ")));
            prop_assert_eq!(signature::normalized_signature(&once), once);
        }
    }
}
