use pretty_assertions::assert_eq;
use xmlnest::{parse, Attributes, Declaration, Document, Element, Error};

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|&(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}

#[test]
fn test_empty_string() {
    let doc = parse("", false).unwrap();
    assert_eq!(doc, Document::new());
    assert!(doc.declaration.is_none());
    assert!(doc.root.is_none());
}

#[test]
fn test_only_declaration() {
    let xml = r#"
    <?xml version="1.0" encoding="utf-8" ?> 
    "#;
    let doc = parse(xml, false).unwrap();
    assert_eq!(
        doc.declaration,
        Some(Declaration {
            attributes: attrs(&[("version", "1.0"), ("encoding", "utf-8")]),
        })
    );
    assert!(doc.root.is_none());
}

#[test]
fn test_declaration_after_comment() {
    let xml = "<!-- generated -->\n<?xml version='1.1'?>\n<a/>";
    let doc = parse(xml, false).unwrap();
    assert_eq!(doc.declaration_attribute("version"), Some("1.1"));
    assert_eq!(doc.root, Some(Element::new("a")));
}

#[test]
fn test_only_element() {
    let doc = parse("\n    <tagA></tagA>\n    ", false).unwrap();
    assert_eq!(doc.root, Some(Element::new("tagA")));
    assert!(doc.declaration.is_none());
}

#[test]
fn test_multiple_elements() {
    let xml = "\n    <tagA></tagA>\n    <tagB></tagB>\n    ";
    match parse(xml, false) {
        Err(Error::MultipleRoots { count }) => assert_eq!(count, 2),
        other => panic!("expected a root cardinality error, got {other:?}"),
    }
}

#[test]
fn test_self_close_element() {
    for xml in ["<tagA/>", "<tagA />", "\n  <tagA\n  />\n"] {
        let doc = parse(xml, false).unwrap();
        assert_eq!(doc.root, Some(Element::new("tagA")), "{xml}");
    }

    let doc = parse(r#"<tagA xmlns="DAV:" />"#, false).unwrap();
    assert_eq!(
        doc.root,
        Some(Element::new("tagA").with_attribute("xmlns", "DAV:"))
    );
}

#[test]
fn test_open_and_close_pairs() {
    let doc = parse("<tagA>\n    something\n    </tagA>", false).unwrap();
    assert_eq!(doc.root, Some(Element::new("tagA").with_content("something")));

    let doc = parse("<tagA xmlns=\"DAV:\" >\n    something\n    </tagA>", false).unwrap();
    assert_eq!(
        doc.root,
        Some(
            Element::new("tagA")
                .with_attribute("xmlns", "DAV:")
                .with_content("something")
        )
    );
}

#[test]
fn test_attribute_quote_styles() {
    for xml in [r#"<a v="1"/>"#, "<a v='1'/>", "<a v=1/>", "<a v = \"1\" ></a>"] {
        let root = parse(xml, false).unwrap().root.unwrap();
        assert_eq!(root.attribute("v"), Some("1"), "{xml}");
    }
}

#[test]
fn test_cdata_content() {
    let doc = parse("<tagA>\n    <![CDATA[123一二三]]>\n    </tagA>", false).unwrap();
    assert_eq!(
        doc.root,
        Some(Element::new("tagA").with_content("<![CDATA[123一二三]]>"))
    );
}

#[test]
fn test_cdata_with_markup_characters() {
    let root = parse(r#"<x><![CDATA[<x>&"'\]]></x>"#, false).unwrap().root.unwrap();
    assert_eq!(root.content.as_deref(), Some(r#"<![CDATA[<x>&"'\]]>"#));
    assert_eq!(root.text().unwrap(), r#"<x>&"'\"#);
}

#[test]
fn test_special_cdata_inner_text() {
    let xml = r#"
    <?xml version="1.0" encoding="utf-8" ?>
    <Henan><![CDATA[<efg>!*#<"'></Henan>]]></Henan>
    "#;
    let root = parse(xml, false).unwrap().root.unwrap();
    assert_eq!(root.content.as_deref(), Some(r#"<![CDATA[<efg>!*#<"'></Henan>]]>"#));

    let xml = r#"<Henan><![CDATA[<efg>!*#\<"'></Henan>]]></Henan>"#;
    let root = parse(xml, false).unwrap().root.unwrap();
    assert_eq!(root.content.as_deref(), Some(r#"<![CDATA[<efg>!*#\<"'></Henan>]]>"#));
}

#[test]
fn test_child_element() {
    let xml = r#"
    <?xml version="1.0" encoding="utf-8" ?>
    <D:propfind xmlns:D="DAV:">
        <D:allprop/>
    </D:propfind>
    "#;
    let root = parse(xml, false).unwrap().root.unwrap();
    assert_eq!(root.name(), "D:propfind");
    assert_eq!(root.children(), [Element::new("D:allprop")]);
}

#[test]
fn test_multiple_child_elements() {
    let xml = r#"
    <?xml version="1.0" encoding="utf-8" ?>
    <parent>
        <child/>
        <child/>
    </parent>
    "#;
    let root = parse(xml, false).unwrap().root.unwrap();
    assert_eq!(root.children().len(), 2);

    let xml = r#"
    <?xml version="1.0" encoding="utf-8" ?>
    <parent>
        <childA/>
        <childA/>
        <childB>B</childB>
    </parent>
    "#;
    let root = parse(xml, false).unwrap().root.unwrap();
    let names: Vec<&str> = root.children().iter().map(Element::name).collect();
    assert_eq!(names, ["childA", "childA", "childB"]);
    assert!(root.content.is_none());
}

#[test]
fn test_mixed_content() {
    let xml = r#"
    <?xml version="1.0" encoding="utf-8" ?>
    <father>
        I have a son named John<fullname>Johnson</fullname>.
    </father>
    "#;
    let root = parse(xml, false).unwrap().root.unwrap();
    assert_eq!(
        root.children(),
        [Element::new("fullname").with_content("Johnson")]
    );
    assert_eq!(root.content.as_deref(), Some("I have a son named John."));
}

#[test]
fn test_comments_are_stripped() {
    let xml = "<!-- a --><root><!-- b -->text<!-- <child/> --></root><!-- c -->";
    let doc = parse(xml, false).unwrap();
    assert_eq!(doc.root, Some(Element::new("root").with_content("text")));
}

#[test]
fn test_comments_inside_cdata_are_kept() {
    let root = parse("<a><![CDATA[x<!--c-->y]]></a>", false)
        .unwrap()
        .root
        .unwrap();
    assert_eq!(root.content.as_deref(), Some("<![CDATA[x<!--c-->y]]>"));
    assert_eq!(root.text().unwrap(), "x<!--c-->y");
}

#[test]
fn test_deep_structure() {
    let xml = r#"
    <?xml version="1.0" encoding="utf-8" ?>
    <China>
        <Henan></Henan>
        <Shandong>
            <Jinan alias="Quancheng">
                <Lixia />
                <Tianqiao>
                    There is a big train station<station type="train">Tianqiao Station</station>.
                </Tianqiao>
            </Jinan>
        </Shandong>
    </China>
    "#;
    let doc = parse(xml, false).unwrap();
    let expected = Document {
        declaration: Some(Declaration {
            attributes: attrs(&[("version", "1.0"), ("encoding", "utf-8")]),
        }),
        root: Some(
            Element::new("China")
                .with_child(Element::new("Henan"))
                .with_child(
                    Element::new("Shandong").with_child(
                        Element::new("Jinan")
                            .with_attribute("alias", "Quancheng")
                            .with_child(Element::new("Lixia"))
                            .with_child(
                                Element::new("Tianqiao")
                                    .with_content("There is a big train station.")
                                    .with_child(
                                        Element::new("station")
                                            .with_attribute("type", "train")
                                            .with_content("Tianqiao Station"),
                                    ),
                            ),
                    ),
                ),
        ),
    };
    assert_eq!(doc, expected);
}

#[test]
fn test_json_export_matches_tree_shape() {
    let xml = r#"<?xml version="1.0"?><a x="1"><b>t</b><c/></a>"#;
    let json = parse(xml, false).unwrap().to_json(false).unwrap();
    assert_eq!(
        json,
        r#"{"declaration":{"attributes":{"version":"1.0"}},"root":{"name":"a","attributes":{"x":"1"},"children":[{"name":"b","content":"t"},{"name":"c"}]}}"#
    );
}

#[test]
fn test_parsing_is_thread_safe() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let xml = format!("<n{i}><v>{i}</v></n{i}>");
                parse(&xml, false).unwrap().root.unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let root = handle.join().unwrap();
        assert_eq!(root.name(), format!("n{i}"));
        assert_eq!(root.children()[0].content.as_deref(), Some(i.to_string().as_str()));
    }
}
