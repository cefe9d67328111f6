// tests/eutils_parsing.rs
// E-utilities response parsing against recorded fixture bodies.

use literature_digest::ingest::providers::pubmed::{
    parse_efetch_abstracts, parse_esearch, parse_esummary,
};

const ESUMMARY: &str = include_str!("fixtures/esummary.json");
const EFETCH: &str = include_str!("fixtures/efetch.xml");

#[test]
fn esearch_idlist() {
    let body = r#"{"header":{"type":"esearch"},"esearchresult":{"count":"2","retmax":"2","idlist":["40100002","40100001"]}}"#;
    assert_eq!(parse_esearch(body).unwrap(), vec!["40100002", "40100001"]);
}

#[test]
fn esummary_fixture() {
    let m = parse_esummary(ESUMMARY).unwrap();
    assert_eq!(m.len(), 2, "error entries are skipped");

    let a = &m["40100001"];
    assert_eq!(a.venue, "J Orthop Sports Phys Ther");
    assert_eq!(a.pub_date, "2025 Feb");
    assert_eq!(a.doi.as_deref(), Some("10.2519/jospt.2025.12001"));
    assert_eq!(a.pmcid.as_deref(), Some("PMC11800001"));

    let b = &m["40100002"];
    assert_eq!(b.venue, "Physical therapy");
    assert_eq!(
        b.title,
        "Balance training in community-dwelling older adults\u{2014}a cohort study."
    );
    assert_eq!(b.pmcid.as_deref(), Some("PMC11700002"));
}

#[test]
fn efetch_fixture() {
    let m = parse_efetch_abstracts(EFETCH);
    assert_eq!(m.len(), 2);
    assert_eq!(
        m["40100001"],
        "OBJECTIVE: To compare heavy slow resistance with eccentric training. \
         METHODS: Randomized trial (n = 58); 3 times per week for 12 weeks. \
         RESULTS: VISA-A improved in both groups (p < 0.05). \
         CONCLUSIONS: Both programs are effective."
    );
    assert_eq!(
        m["40100002"],
        "Older adults often fear falling. We studied a balance class. Falls decreased significantly."
    );
    assert!(!m.contains_key("40199999"));
}
