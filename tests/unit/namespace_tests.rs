use xmlns_sniff::{DEFAULT_PREFIX, NamespaceDeclaration, NamespaceKey, NamespaceSet};

#[test]
fn test_effective_prefix() {
    let default = NamespaceDeclaration::default_namespace("http://a");
    let no_namespace = NamespaceDeclaration::no_namespace_location("a.xsd");
    let prefixed = NamespaceDeclaration::prefixed("b", "http://b");

    assert_eq!(default.effective_prefix(DEFAULT_PREFIX), "jxt");
    assert_eq!(default.effective_prefix("tei"), "tei");
    assert_eq!(no_namespace.effective_prefix(DEFAULT_PREFIX), "");
    assert_eq!(no_namespace.effective_prefix("tei"), "");
    assert_eq!(prefixed.effective_prefix("tei"), "b");
}

#[test]
fn test_qualify() {
    assert_eq!(
        NamespaceDeclaration::default_namespace("http://a").qualify("div", DEFAULT_PREFIX),
        "jxt:div"
    );
    assert_eq!(
        NamespaceDeclaration::prefixed("dc", "http://purl.org/dc/elements/1.1/")
            .qualify("title", DEFAULT_PREFIX),
        "dc:title"
    );
    assert_eq!(
        NamespaceDeclaration::no_namespace_location("a.xsd").qualify("entry", DEFAULT_PREFIX),
        "entry"
    );
}

#[test]
fn test_identity_ignores_no_namespace_flag() {
    let default = NamespaceDeclaration::default_namespace("http://b");
    let no_namespace = NamespaceDeclaration::no_namespace_location("http://b");

    assert_eq!(default.key(), no_namespace.key());
    assert_ne!(default, no_namespace);

    let mut set = NamespaceSet::new();
    assert!(set.insert(no_namespace.clone()));
    assert!(!set.insert(default.clone()));

    // the first insert is kept, flag included
    let key = NamespaceKey {
        prefix: None,
        url: "http://b".to_string(),
    };
    assert_eq!(set.get(&key), Some(&no_namespace));
    assert!(set.contains(&default));
}

#[test]
fn test_set_preserves_insertion_order() {
    let set: NamespaceSet = [
        NamespaceDeclaration::prefixed("z", "urn:z"),
        NamespaceDeclaration::prefixed("a", "urn:a"),
        NamespaceDeclaration::prefixed("z", "urn:z"),
        NamespaceDeclaration::default_namespace("urn:d"),
    ]
    .into_iter()
    .collect();

    let prefixes: Vec<_> = set.iter().map(|ns| ns.prefix.clone()).collect();
    assert_eq!(
        prefixes,
        vec![Some("z".to_string()), Some("a".to_string()), None]
    );
}

#[test]
fn test_blank_placeholder() {
    let blank = NamespaceDeclaration::blank();
    assert_eq!(blank.prefix.as_deref(), Some(""));
    assert!(blank.url.is_empty());
    assert!(blank.no_namespace);
    assert_eq!(blank.effective_prefix(DEFAULT_PREFIX), "");
}

#[test]
fn test_serde_shape() {
    let declaration = NamespaceDeclaration::prefixed("xi", "http://www.w3.org/2001/XInclude");
    let value = serde_json::to_value(&declaration).unwrap();

    assert_eq!(value["prefix"], "xi");
    assert_eq!(value["no_namespace"], false);

    let back: NamespaceDeclaration = serde_json::from_value(value).unwrap();
    assert_eq!(back, declaration);
}
