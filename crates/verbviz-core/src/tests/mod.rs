use crate::Schema;
use serde_json::json;

mod dot;
mod schema;

fn echo_time() -> Schema {
    Schema::from_value(json!({
        "modules": [
            {
                "name": "echo",
                "verbs": [
                    {
                        "name": "echo",
                        "metadata": [
                            { "tag": "calls", "calls": [ { "module": "time", "name": "now" } ] }
                        ]
                    }
                ]
            },
            {
                "name": "time",
                "verbs": [ { "name": "now", "metadata": [] } ]
            }
        ]
    }))
    .unwrap()
}

fn shop() -> Schema {
    Schema::from_value(json!({
        "modules": [
            { "name": "builtin", "decls": [ { "kind": "data", "name": "Empty" } ] },
            {
                "name": "inventory",
                "decls": [
                    { "kind": "verb", "name": "reserve", "metadata": [] },
                    { "kind": "verb", "name": "release" },
                    { "kind": "database", "name": "stock" }
                ]
            },
            {
                "name": "checkout",
                "decls": [
                    { "kind": "config", "name": "currency" },
                    {
                        "kind": "verb",
                        "name": "pay",
                        "metadata": [
                            { "tag": "calls", "calls": [
                                { "module": "inventory", "name": "reserve" },
                                { "module": "inventory", "name": "reserve" }
                            ] },
                            { "tag": "ingress", "method": "POST" },
                            { "tag": "calls", "calls": [
                                { "module": "inventory", "name": "release" },
                                { "module": "ledger", "name": "record" }
                            ] }
                        ]
                    },
                    { "kind": "verb", "name": "quote", "metadata": [ { "tag": "calls", "calls": [] } ] }
                ]
            }
        ]
    }))
    .unwrap()
}

fn count_lines_containing(text: &str, needle: &str) -> usize {
    text.lines().filter(|l| l.contains(needle)).count()
}
