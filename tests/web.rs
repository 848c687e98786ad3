//! Tests for the JavaScript-facing API, run with `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use ball_quiz_sim::types::{BatchStats, ResultRow};
use ball_quiz_sim::*;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn test_engine_runs_and_accumulates() {
    let mut engine = SimulationEngine::new(0);
    engine.run(100, r#"{"kind": "Unbiased"}"#).unwrap();
    engine.run(100, r#"{"kind": "FavorA"}"#).unwrap();
    assert_eq!(engine.get_row_count(), 400);
    assert_eq!(engine.get_seed(), 2);

    let rows: Vec<ResultRow> = serde_json::from_str(&engine.get_dataset()).unwrap();
    assert_eq!(rows[0].rigging, "Unbiased");
    assert_eq!(rows[399].rigging, "FavorA");

    let stats: Vec<BatchStats> = serde_json::from_str(&engine.get_stats()).unwrap();
    assert_eq!(stats.len(), 2);

    engine.clear();
    assert_eq!(engine.get_row_count(), 0);
}

#[wasm_bindgen_test]
fn test_engine_is_reproducible() {
    let mut a = SimulationEngine::new(5);
    let mut b = SimulationEngine::new(5);
    a.run(50, r#"{"kind": "Unbiased"}"#).unwrap();
    b.run(50, r#"{"kind": "Unbiased"}"#).unwrap();
    assert_eq!(a.get_dataset(), b.get_dataset());
}

#[wasm_bindgen_test]
fn test_bad_inputs_are_rejected() {
    assert!(SimulationEngine::new_with_config(0, r#"{"team_count": 30}"#).is_err());
    let err = SimulationEngine::new_with_config(0, "not json").err().unwrap();
    assert!(err.as_string().unwrap().starts_with("Config error"));

    let mut engine = SimulationEngine::new(0);
    assert!(engine.run(1, r#"{"kind": "Nope"}"#).is_err());
    assert!(transition_probability(1, 7, 6).is_err());
    assert!(transition_row(6, 6).is_err());
}

#[wasm_bindgen_test]
fn test_transition_exports() {
    let p = transition_probability(4, 5, 6).unwrap();
    assert!((p - 5.0 / 6.0).abs() < 1e-12);

    let table: Vec<Vec<f64>> = serde_json::from_str(&transition_table(6)).unwrap();
    assert_eq!(table.len(), 6);

    let row = transition_row(6, 5).unwrap().to_vec();
    assert_eq!(row.len(), 6);
    assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[wasm_bindgen_test]
fn test_compare_scenarios() {
    let json = compare_scenarios(&SimulationEngine::get_default_config(), 200, 0).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["unbiased"][0]["rigging"], "Unbiased");
    assert_eq!(value["favored"][0]["rigging"], "FavorA");
}
