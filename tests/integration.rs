//! End-to-end tests: RDF bytes through loading, guarding, extraction,
//! archive aggregation and queries.

use std::io::Write;

use semannot::aggregate::{GraphInput, extract_archive, extract_graph};
use semannot::config::ExtractionConfig;
use semannot::curie::CurieRegistry;
use semannot::extract::AnnotationRecord;
use semannot::graph::load::{RdfSyntax, load_graph};
use semannot::graph::{MemoryGraph, RawNode};
use semannot::outcome::{ErrorStage, ExtractionFailure};
use semannot::query::select;
use semannot::term::Term;
use semannot::{blank, uri};

const MODEL_TTL: &str = r#"
@prefix semsim: <http://bime.uw.edu/semsim/> .
@prefix bqbiol: <http://biomodels.net/biology-qualifiers/> .
@prefix dcterms: <http://purl.org/dc/terms/> .
@prefix ro: <http://www.obofoundry.org/ro/ro.owl#> .
@prefix model: <http://example.org/model#> .

model:glucose semsim:hasPhysicalEntity _:e0 ;
    semsim:hasPhysicalProperty <http://identifiers.org/opb/OPB_00340> .
_:e0 bqbiol:is <http://identifiers.org/CHEBI:17234> ;
    ro:part_of <http://identifiers.org/GO:0005829/> .
model:reaction semsim:hasSourceParticipant model:src ;
    semsim:hasSinkParticipant model:sink ;
    semsim:hasMediatorParticipant model:enzyme ;
    semsim:hasPhysicalProperty <http://identifiers.org/opb/OPB_00592> .
model:leak semsim:hasSourceParticipant model:src2 .
model:m dcterms:creator "A. Modeller" .
"#;

fn load(ttl: &str, source: &str) -> MemoryGraph {
    load_graph(ttl.as_bytes(), RdfSyntax::Turtle, Some(source))
        .into_result()
        .unwrap()
}

fn uri_of(term: &Term) -> &str {
    term.as_uri().unwrap().as_str()
}

#[test]
fn turtle_document_end_to_end() {
    let graph = load(MODEL_TTL, "metadata.ttl");
    let result = extract_graph(&graph, Some("metadata.ttl"), &ExtractionConfig::default())
        .into_result()
        .unwrap();

    assert!(result.extraction_errors.is_empty());
    assert_eq!(result.source.as_deref(), Some("metadata.ttl"));
    assert_eq!(result.triple_count, 10);

    assert_eq!(result.dublin_core.len(), 1);
    assert_eq!(result.qualifiers.len(), 1);

    assert_eq!(result.composites.len(), 1);
    let AnnotationRecord::EntityComposite {
        entities,
        properties,
        ..
    } = &result.composites[0]
    else {
        panic!("expected composite, got {:?}", result.composites[0]);
    };
    assert!(matches!(&entities[0], Term::BlankNode { id } if id.starts_with("_:b")));
    assert_eq!(uri_of(&properties[0]), "https://identifiers.org/opb/OPB_00340");

    assert_eq!(result.processes.len(), 2);
    let full = result
        .processes
        .iter()
        .find(|r| uri_of(r.subject()) == "http://example.org/model#reaction")
        .unwrap();
    let AnnotationRecord::Process {
        sources,
        sinks,
        mediators,
        ..
    } = full
    else {
        panic!("expected process");
    };
    assert!(!sources.is_empty() && !sinks.is_empty() && !mediators.is_empty());

    assert_eq!(result.energy_differentials.len(), 1);
    assert_eq!(
        uri_of(result.energy_differentials[0].subject()),
        "http://example.org/model#reaction"
    );

    assert_eq!(result.opb_frequency.len(), 2);
    assert_eq!(result.opb_frequency["https://identifiers.org/opb/OPB_00592"], 1);
}

#[test]
fn records_serialize_with_type_tags() {
    let graph = load(MODEL_TTL, "metadata.ttl");
    let outcome = extract_graph(&graph, Some("metadata.ttl"), &ExtractionConfig::default());
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["ok"], serde_json::json!(true));
    assert_eq!(json["data"]["composites"][0]["type"], "entity-composite");
    assert_eq!(json["data"]["dublin_core"][0]["type"], "singular");
    assert_eq!(json["data"]["dublin_core"][0]["predicate_key"], "creator");
    assert_eq!(json["data"]["dublin_core"][0]["object"]["kind"], "literal");
    assert_eq!(json["data"]["composites"][0]["subject"]["kind"], "uri");
}

#[test]
fn blank_nodes_are_scoped_by_source() {
    let doc = "_:x <http://bime.uw.edu/semsim/hasPhysicalEntity> <http://example.org/e> .";
    let config = ExtractionConfig::default();
    let ids: Vec<String> = ["a.ttl", "b.ttl"]
        .into_iter()
        .map(|source| {
            let graph = load(doc, source);
            let result = extract_graph(&graph, Some(source), &config)
                .into_result()
                .unwrap();
            result.composites[0].subject().lexical().to_string()
        })
        .collect();
    assert_ne!(ids[0], ids[1]);

    assert_eq!(
        blank::normalize(Some("metadata.rdf"), "b0"),
        blank::normalize(Some("metadata.rdf"), "b0")
    );
    assert_ne!(
        blank::normalize(Some("metadata.rdf"), "b0"),
        blank::normalize(Some("other.rdf"), "b0")
    );
}

#[test]
fn guard_over_limit_runs_no_extractors() {
    let mut graph = MemoryGraph::new();
    for i in 0..15_000 {
        graph
            .insert(
                RawNode::iri(format!("http://example.org/s{i}")),
                "http://bime.uw.edu/semsim/hasPhysicalEntity",
                RawNode::iri("http://example.org/e"),
            )
            .unwrap();
    }
    let config = ExtractionConfig::default().with_max_triples(10_000);
    let failure = extract_graph(&graph, Some("big.rdf"), &config)
        .into_result()
        .unwrap_err();

    assert_eq!(failure.stage, ErrorStage::RdfParse);
    assert_eq!(failure.detail("triple_count"), Some(&serde_json::json!(15_000)));
    assert_eq!(failure.detail("limit"), Some(&serde_json::json!(10_000)));
}

#[test]
fn config_file_limits_archive() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("semannot.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "max_triples = 5").unwrap();
    writeln!(file, "parse_timeout_ms = 1000").unwrap();
    drop(file);

    let config = ExtractionConfig::load(&path).unwrap();
    assert_eq!(config.max_triples, Some(5));

    let small = "<http://example.org/a> <http://bime.uw.edu/semsim/hasSourceParticipant> \
                 <http://example.org/b> .";
    let inputs = vec![
        GraphInput::new("big.ttl", load(MODEL_TTL, "big.ttl")),
        GraphInput::new("small.ttl", load(small, "small.ttl")),
    ];
    let archive = extract_archive(&inputs, Vec::new(), &config)
        .into_result()
        .unwrap();

    assert_eq!(archive.model_count, 1);
    assert_eq!(archive.processes.len(), 1);
    assert_eq!(archive.errors.len(), 1);
    assert_eq!(archive.errors[0].stage, ErrorStage::RdfParse);
}

#[test]
fn parse_failures_become_loading_errors() {
    let broken = load_graph(b"this is not turtle", RdfSyntax::Turtle, Some("broken.ttl"));
    let failure = broken.into_result().unwrap_err();
    assert_eq!(failure.stage, ErrorStage::RdfParse);

    let inputs = vec![GraphInput::new("ok.ttl", load(MODEL_TTL, "ok.ttl"))];
    let loading: Vec<ExtractionFailure> = vec![failure];
    let archive = extract_archive(&inputs, loading, &ExtractionConfig::default())
        .into_result()
        .unwrap();
    assert_eq!(archive.model_count, 1);
    assert_eq!(archive.errors.len(), 1);
    assert_eq!(archive.composites.len(), 1);
}

#[test]
fn query_over_loaded_graph() {
    let graph = load(MODEL_TTL, "metadata.ttl");
    let rows = select(
        &graph,
        "PREFIX semsim: <http://bime.uw.edu/semsim/>
         SELECT ?p ?prop WHERE {
             ?p semsim:hasSourceParticipant ?src .
             OPTIONAL { ?p semsim:hasPhysicalProperty ?prop }
         }",
    )
    .into_result()
    .unwrap();

    assert_eq!(rows.len(), 2);
    let reaction = rows
        .iter()
        .find(|r| r["p"].as_deref() == Some("http://example.org/model#reaction"))
        .unwrap();
    assert_eq!(
        reaction["prop"].as_deref(),
        Some("https://identifiers.org/opb/OPB_00592")
    );
    let leak = rows
        .iter()
        .find(|r| r["p"].as_deref() == Some("http://example.org/model#leak"))
        .unwrap();
    assert_eq!(leak["prop"], None);
}

#[test]
fn query_literals_match_loaded_literals() {
    let ttl = r#"
@prefix dcterms: <http://purl.org/dc/terms/> .
<http://example.org/model#glc> dcterms:title "glucose"@en-US ;
    dcterms:description "a hexose" .
"#;
    let graph = load(ttl, "labels.ttl");
    let tagged = select(
        &graph,
        r#"SELECT ?s WHERE { ?s dcterms:title "glucose"@EN-us ; dcterms:description ?d }"#,
    )
    .into_result()
    .unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(
        tagged[0]["s"].as_deref(),
        Some("http://example.org/model#glc")
    );

    let plain = select(
        &graph,
        r#"SELECT ?s WHERE { ?s dcterms:description "a hexose"^^xsd:string }"#,
    )
    .into_result()
    .unwrap();
    assert_eq!(plain.len(), 1);
}

#[test]
fn malformed_query_is_a_sparql_failure() {
    let graph = load(MODEL_TTL, "metadata.ttl");
    let failure = select(&graph, "SELECT ?x WHERE { ?x").into_result().unwrap_err();
    assert_eq!(failure.stage, ErrorStage::Sparql);
}

#[test]
fn canonical_forms_and_curies() {
    assert_eq!(
        uri::canonicalize(Some("http://identifiers.org/go/GO:0008150")).as_deref(),
        Some("https://identifiers.org/go/GO:0008150")
    );
    assert_eq!(
        uri::canonicalize(Some("http://example.org/resource/")).as_deref(),
        Some("http://example.org/resource")
    );
    assert_eq!(uri::canonicalize(None), None);

    let registry = CurieRegistry::default_registry();
    assert_eq!(registry.compact(&registry.expand("opb:OPB_00340")), "opb:OPB_00340");
    assert_eq!(
        registry.expand("bqbiol:is"),
        "http://biomodels.net/biology-qualifiers/is"
    );
    assert_eq!(registry.expand("unknown:value"), "unknown:value");
    assert_eq!(
        registry.compact("http://unknown.org/value"),
        "http://unknown.org/value"
    );
}
