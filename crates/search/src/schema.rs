//! Index definition for section records.

use serde_json::{json, Value};

/// Name of the semantic configuration created with the index.
pub const SEMANTIC_CONFIG: &str = "default";

/// Index definition: `id` key, searchable `content`, and filterable metadata.
pub fn index_definition(name: &str) -> Value {
    json!({
        "name": name,
        "fields": [
            { "name": "id", "type": "Edm.String", "key": true },
            { "name": "content", "type": "Edm.String", "searchable": true, "analyzer": "en.microsoft" },
            { "name": "category", "type": "Edm.String", "filterable": true, "facetable": true },
            { "name": "sourcepage", "type": "Edm.String", "filterable": true, "facetable": true },
            { "name": "sourcefile", "type": "Edm.String", "filterable": true, "facetable": true },
        ],
        "semantic": {
            "configurations": [{
                "name": SEMANTIC_CONFIG,
                "prioritizedFields": {
                    "prioritizedContentFields": [{ "fieldName": "content" }]
                }
            }]
        }
    })
}
