// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Property checks over generated csv2json inputs.
// Author: Lukas Bower

use csv2json::{convert_reader, ConvertOptions, Node};
use proptest::prelude::*;
use std::collections::HashMap;

fn options() -> ConvertOptions {
    ConvertOptions::new("generated.csv")
}

// Every key ends in a `_leaf` segment so no key is a prefix of another.
fn key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,2}", 0..3).prop_map(|mut segments| {
        segments.push("_leaf".to_owned());
        segments.join(".")
    })
}

proptest! {
    #[test]
    fn every_row_is_reachable(rows in prop::collection::vec((key_strategy(), "[a-z0-9 ]{0,8}"), 0..24)) {
        let csv: String = rows
            .iter()
            .map(|(key, value)| format!("{key},{value}\n"))
            .collect();
        let tree = convert_reader(csv.as_bytes(), &options()).expect("tree");

        let mut expected: HashMap<&str, &str> = HashMap::new();
        for (key, value) in &rows {
            expected.insert(key.as_str(), value.as_str());
        }
        prop_assert_eq!(tree.leaf_count(), expected.len());
        for (key, value) in expected {
            let segments: Vec<&str> = key.split('.').collect();
            let leaf = tree.get(&segments).and_then(Node::as_leaf);
            prop_assert_eq!(leaf, Some(value.trim()));
        }
    }

    #[test]
    fn conversion_is_deterministic(rows in prop::collection::vec((key_strategy(), "[a-z]{0,4}"), 0..16)) {
        let csv: String = rows
            .iter()
            .map(|(key, value)| format!("{key},{value}\n"))
            .collect();
        let first = convert_reader(csv.as_bytes(), &options()).expect("tree");
        let second = convert_reader(csv.as_bytes(), &options()).expect("tree");
        prop_assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );
    }
}
