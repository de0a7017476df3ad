//! Index settings and field mapping for chat log documents.

use serde_json::{Value, json};

/// Body of the index creation request.
pub fn index_definition(shards: u32, replicas: u32, max_result_window: u32) -> Value {
    json!({
        "settings": {
            "number_of_shards": shards,
            "number_of_replicas": replicas,
            "max_result_window": max_result_window
        },
        "mappings": {
            "properties": {
                "timestamp": {"type": "date"},
                "file_name": {"type": "keyword"},
                "user_id": {"type": "keyword"},
                "conversation": {
                    "type": "nested",
                    "properties": {
                        "role": {"type": "keyword"},
                        "content": {"type": "text", "analyzer": "standard"},
                        "timestamp": {"type": "date"}
                    }
                },
                "metadata": {
                    "properties": {
                        "proxy_time_consumed": {"type": "keyword"},
                        "ip_address": {"type": "ip", "ignore_malformed": true},
                        "machine_id": {"type": "keyword"},
                        "editor_version": {"type": "keyword"},
                        "model": {"type": "keyword"}
                    }
                }
            }
        }
    })
}
