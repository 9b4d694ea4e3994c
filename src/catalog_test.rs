use super::*;

#[test]
fn default_catalog_has_six_destinations() {
    let cat = Catalog::default();
    let keys: Vec<&str> = cat.entries().iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, ["PIEDMONT", "LOMBARDIA", "VENETO", "TUSCANY", "FRIULI", "PUGLIA"]);
}

#[test]
fn match_label_is_case_insensitive_substring() {
    let cat = Catalog::default();
    assert_eq!(cat.match_label("Tuscany").unwrap().path, "/tuscany");
    assert_eq!(cat.match_label("  friuli venezia giulia ").unwrap().key, "FRIULI");
    assert_eq!(cat.match_label("REGIONE PUGLIA").unwrap().aria_label, "Puglia region");
}

#[test]
fn match_label_unknown_is_none() {
    let cat = Catalog::default();
    assert!(cat.match_label("Sicily").is_none());
    assert!(cat.match_label("").is_none());
    assert!(!cat.names_any("Sardinia"));
    assert!(cat.names_any(" veneto "));
}

#[test]
fn get_by_key() {
    let cat = Catalog::default();
    assert_eq!(cat.get("VENETO").unwrap().path, "/veneto");
    assert!(cat.get("veneto").is_none());
}

#[test]
fn normalize_token_collapses_punctuation() {
    assert_eq!(normalize_token("--Friuli_Venezia  Giulia"), "friuli-venezia-giulia");
    assert_eq!(normalize_token("bottle__link"), "bottle-link");
    assert_eq!(normalize_token("Toscana!"), "toscana");
    assert_eq!(normalize_token("---"), "");
}

#[test]
fn match_token_uses_aliases() {
    let cat = Catalog::default();
    assert_eq!(cat.match_token("Lombardy").unwrap().key, "LOMBARDIA");
    assert_eq!(cat.match_token("apulia").unwrap().key, "PUGLIA");
    assert_eq!(cat.match_token("toscana").unwrap().key, "TUSCANY");
    assert!(cat.match_token("bottle__link").is_none());
    assert!(cat.match_token("").is_none());
}

#[test]
fn catalog_deserializes_from_json_list() {
    let cat: Catalog = serde_json::from_str(
        r#"[{ "key": "ALPS", "path": "/alps", "ariaLabel": "Alps region", "geoAnchor": { "x": 0.1, "y": 0.2 } }]"#,
    )
    .unwrap();
    let alps = cat.get("ALPS").unwrap();
    assert!(alps.aliases.is_empty());
    assert_eq!(alps.geo_anchor, Some(Point::new(0.1, 0.2)));
}
