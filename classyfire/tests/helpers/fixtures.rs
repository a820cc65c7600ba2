//! Classification fixtures and client builders

use super::FakeTransport;
use classyfire::services::ClassificationCache;
use classyfire::{ClassyFire, ClientConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const ASPIRIN_SMILES: &str = "CC(=O)OC1=CC=CC=C1C(O)=O";
pub const ASPIRIN_INCHIKEY: &str = "InChIKey=BSYNRYMUTXBXSQ-UHFFFAOYSA-N";

fn node(name: &str, chemont_id: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{} (test fixture)", name),
        "chemont_id": chemont_id,
        "url": format!("http://classyfire.wishartlab.com/tax_nodes/{}", &chemont_id[10..]),
    })
}

/// ClassyFire-shaped entity payload
pub fn compound_json(smiles: &str, inchikey: &str, kingdom: &str) -> Value {
    json!({
        "smiles": smiles,
        "inchikey": inchikey,
        "kingdom": node(kingdom, "CHEMONTID:0000000"),
        "superclass": node("Benzenoids", "CHEMONTID:0002448"),
        "class": node("Benzene and substituted derivatives", "CHEMONTID:0002279"),
        "subclass": node("Benzoic acids and derivatives", "CHEMONTID:0000256"),
        "intermediate_nodes": [],
        "direct_parent": node("Acylsalicylic acids", "CHEMONTID:0000475"),
        "alternative_parents": [node("Phenol esters", "CHEMONTID:0002476")],
        "molecular_framework": "Aromatic homomonocyclic compounds",
        "substituents": ["Acylsalicylic acid", "Benzoic acid"],
        "description": "This compound belongs to the class of organic compounds known as acylsalicylic acids.",
        "external_descriptors": [
            { "source": "CHEBI", "source_id": "CHEBI:15365", "annotations": ["acetylsalicylic acid"] }
        ],
        "ancestors": ["Organic compounds", "Benzenoids"],
        "predicted_chebi_terms": ["benzoic acids (CHEBI:22723)"],
        "predicted_lipidmaps_terms": [],
        "classification_version": "2.1",
    })
}

/// Configuration with no throttling, for tests that run in real time
pub fn unthrottled_config() -> ClientConfig {
    ClientConfig {
        min_interval: Duration::ZERO,
        retry_delay: Duration::ZERO,
        ..ClientConfig::default()
    }
}

/// Client over `transport` with a process-local cache
pub fn test_client(config: ClientConfig, transport: Arc<FakeTransport>) -> ClassyFire {
    ClassyFire::with_parts(config, transport, ClassificationCache::ephemeral())
}
