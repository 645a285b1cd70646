use core::ops::ControlFlow;
use proptest::prelude::*;
use rustchip_core::tlv::{
    count, find, iterate, ContainerType, Tag, TlvReader, TlvWriter, TraversalError,
    MAX_CONTAINER_DEPTH,
};
use rustchip_core::DecodeError;

#[derive(Debug, Clone)]
enum Node {
    Leaf(Tag, u64),
    Text(Tag, String),
    Container(Tag, ContainerType, Vec<Node>),
}

fn tag_strategy() -> impl Strategy<Value = Tag> {
    prop_oneof![
        Just(Tag::Anonymous),
        (0u8..4).prop_map(Tag::Context),
        (0u32..2).prop_map(Tag::CommonProfile),
        Just(Tag::ImplicitProfile(0x0001_0000)),
    ]
}

fn container_strategy() -> impl Strategy<Value = ContainerType> {
    prop_oneof![
        Just(ContainerType::Structure),
        Just(ContainerType::Array),
        Just(ContainerType::List),
    ]
}

fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        (tag_strategy(), any::<u64>()).prop_map(|(t, v)| Node::Leaf(t, v)),
        (tag_strategy(), "[a-z]{0,8}").prop_map(|(t, s)| Node::Text(t, s)),
    ];
    leaf.prop_recursive(4, 32, 5, |inner| {
        (
            tag_strategy(),
            container_strategy(),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(t, c, kids)| Node::Container(t, c, kids))
    })
}

fn encode(w: &mut TlvWriter<'_>, node: &Node) {
    match node {
        Node::Leaf(tag, v) => w.put_unsigned(*tag, *v).unwrap(),
        Node::Text(tag, s) => w.put_str(*tag, s).unwrap(),
        Node::Container(tag, container, kids) => {
            w.start_container(*tag, *container).unwrap();
            for kid in kids {
                encode(w, kid);
            }
            w.end_container().unwrap();
        }
    }
}

fn flatten(nodes: &[Node], depth: usize, recurse: bool, out: &mut Vec<(Tag, usize)>) {
    for node in nodes {
        match node {
            Node::Leaf(tag, _) | Node::Text(tag, _) => out.push((*tag, depth)),
            Node::Container(tag, _, kids) => {
                out.push((*tag, depth));
                if recurse {
                    flatten(kids, depth + 1, recurse, out);
                }
            }
        }
    }
}

fn visits(reader: &TlvReader<'_>, recurse: bool) -> Vec<(Tag, usize, usize)> {
    let mut seen = Vec::new();
    let mut visitor = |r: &TlvReader<'_>, depth: usize| -> Result<ControlFlow<()>, ()> {
        seen.push((r.tag().unwrap(), depth, r.position()));
        Ok(ControlFlow::Continue(()))
    };
    iterate(reader, &mut visitor, recurse).unwrap();
    seen
}

proptest! {
    #[test]
    fn count_equals_visits_and_model(doc in prop::collection::vec(node_strategy(), 0..5)) {
        let mut buf = vec![0u8; 16 * 1024];
        let mut w = TlvWriter::new(&mut buf);
        for node in &doc {
            encode(&mut w, node);
        }
        let bytes = w.finish().unwrap();
        let reader = TlvReader::new(bytes);

        for recurse in [false, true] {
            let mut model = Vec::new();
            flatten(&doc, 0, recurse, &mut model);
            let seen = visits(&reader, recurse);
            let order: Vec<(Tag, usize)> = seen.iter().map(|(t, d, _)| (*t, *d)).collect();

            prop_assert_eq!(&order, &model);
            prop_assert_eq!(count(&reader, recurse).unwrap(), seen.len());
        }
    }

    #[test]
    fn find_returns_first_reachable_match(
        doc in prop::collection::vec(node_strategy(), 1..5),
        wanted in tag_strategy(),
    ) {
        let mut buf = vec![0u8; 16 * 1024];
        let mut w = TlvWriter::new(&mut buf);
        for node in &doc {
            encode(&mut w, node);
        }
        let bytes = w.finish().unwrap();
        let reader = TlvReader::new(bytes);

        for recurse in [false, true] {
            let seen = visits(&reader, recurse);
            let expected = seen.iter().find(|(t, _, _)| *t == wanted);
            let found = find(&reader, wanted, recurse).unwrap();
            match (expected, found) {
                (None, None) => {}
                (Some((_, _, position)), Some(found)) => {
                    prop_assert_eq!(found.tag(), Some(wanted));
                    prop_assert_eq!(found.position(), *position);
                }
                (expected, found) => {
                    let found = found.map(|r| r.tag());
                    prop_assert!(false, "expected {:?}, found {:?}", expected, found);
                }
            }
        }
    }

    #[test]
    fn truncated_documents_never_panic(
        doc in prop::collection::vec(node_strategy(), 1..5),
        cut in any::<prop::sample::Index>(),
    ) {
        let mut buf = vec![0u8; 16 * 1024];
        let mut w = TlvWriter::new(&mut buf);
        for node in &doc {
            encode(&mut w, node);
        }
        let bytes = w.finish().unwrap();
        let truncated = &bytes[..cut.index(bytes.len())];

        for recurse in [false, true] {
            let _ = count(&TlvReader::new(truncated), recurse);
        }
    }
}

#[test]
fn abort_on_second_element_visits_exactly_twice() {
    let mut buf = [0u8; 32];
    let mut w = TlvWriter::new(&mut buf);
    for v in 0..5 {
        w.put_unsigned(Tag::Context(v), u64::from(v)).unwrap();
    }
    let reader = TlvReader::new(w.finish().unwrap());

    #[derive(Debug, PartialEq)]
    struct LimitReached;

    for recurse in [false, true] {
        let mut calls = 0usize;
        let mut visitor = |_: &TlvReader<'_>, _: usize| -> Result<ControlFlow<()>, LimitReached> {
            calls += 1;
            if calls == 2 {
                Err(LimitReached)
            } else {
                Ok(ControlFlow::Continue(()))
            }
        };
        let result = iterate(&reader, &mut visitor, recurse);
        assert_eq!(result, Err(TraversalError::Visitor(LimitReached)));
        assert_eq!(calls, 2);
    }
}

#[test]
fn decode_error_is_distinct_from_visitor_error() {
    let doc: [u8; 3] = [0x15, 0x24, 0x01];
    let mut visitor = |_: &TlvReader<'_>, _: usize| -> Result<ControlFlow<()>, DecodeError> {
        Ok(ControlFlow::Continue(()))
    };
    let err = iterate(&TlvReader::new(&doc), &mut visitor, true).unwrap_err();
    assert_eq!(err, TraversalError::Decode(DecodeError::UnexpectedEof));
}

fn nested_arrays(levels: usize) -> Vec<u8> {
    let mut doc = vec![0x16; levels];
    doc.resize(2 * levels, 0x18);
    doc
}

#[test]
fn traversal_stops_past_the_nesting_limit() {
    let doc = nested_arrays(MAX_CONTAINER_DEPTH);
    let reader = TlvReader::new(&doc);
    assert_eq!(count(&reader, false), Ok(1));
    assert_eq!(count(&reader, true), Ok(MAX_CONTAINER_DEPTH));

    for levels in [MAX_CONTAINER_DEPTH + 1, 5000] {
        let doc = nested_arrays(levels);
        let reader = TlvReader::new(&doc);
        for recurse in [false, true] {
            assert_eq!(count(&reader, recurse), Err(DecodeError::NestingTooDeep));
            assert_eq!(
                find(&reader, Tag::Context(1), recurse).unwrap_err(),
                DecodeError::NestingTooDeep
            );
        }
    }
}
