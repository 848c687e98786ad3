pub mod game;
mod logging;
pub mod model;
pub mod simulation;
pub mod team;
pub mod types;

use simulation::{Dataset, MonteCarloRunner, Scenario};
use types::*;
use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

fn js_error(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_config(config_json: &str) -> Result<GameConfig, JsValue> {
    GameConfig::from_json(config_json).map_err(js_error)
}

/// WASM-exposed Monte-Carlo wrapper; each `run` appends a batch and bumps the seed
#[wasm_bindgen]
pub struct SimulationEngine {
    runner: MonteCarloRunner,
    seed: u64,
    dataset: Dataset,
}

#[wasm_bindgen]
impl SimulationEngine {
    /// Create an engine for the reference game (6 balls, 2 teams)
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> SimulationEngine {
        SimulationEngine {
            runner: MonteCarloRunner::new(GameConfig::default()),
            seed,
            dataset: Dataset::default(),
        }
    }

    /// Create with custom config
    pub fn new_with_config(seed: u64, config_json: &str) -> Result<SimulationEngine, JsValue> {
        let config = parse_config(config_json)?;
        Ok(SimulationEngine {
            runner: MonteCarloRunner::new(config),
            seed,
            dataset: Dataset::default(),
        })
    }

    /// Run a batch of trials for the scenario described by `scenario_json`,
    /// e.g. `{"kind": "Unbiased"}` or `{"kind": "FavorA"}`
    pub fn run(&mut self, trials: usize, scenario_json: &str) -> Result<(), JsValue> {
        let scenario = Scenario::from_json(scenario_json).map_err(js_error)?;
        let factory = scenario.into_factory(&self.runner.config);
        let batch = self
            .runner
            .run(trials, factory.as_ref(), self.seed)
            .map_err(js_error)?;
        self.seed = self.seed.wrapping_add(1);
        self.dataset.extend(batch);
        Ok(())
    }

    /// Seed the next batch will use
    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    /// Number of rows collected so far
    pub fn get_row_count(&self) -> usize {
        self.dataset.len()
    }

    /// Collected rows as a JSON array
    pub fn get_dataset(&self) -> String {
        serde_json::to_string(&self.dataset.rows).unwrap_or_default()
    }

    /// Per-scenario statistics as JSON
    pub fn get_stats(&self) -> String {
        serde_json::to_string(&self.dataset.stats()).unwrap_or_default()
    }

    /// Drop collected rows (keep config and seed)
    pub fn clear(&mut self) {
        self.dataset = Dataset::default();
    }

    pub fn get_config(&self) -> String {
        serde_json::to_string(&self.runner.config).unwrap_or_default()
    }

    /// Get default config as JSON
    pub fn get_default_config() -> String {
        serde_json::to_string(&GameConfig::default()).unwrap_or_default()
    }

    /// Update game config; rows already collected are kept
    pub fn update_config(&mut self, config_json: &str) -> Result<(), JsValue> {
        self.runner.config = parse_config(config_json)?;
        Ok(())
    }
}

/// Probability of going from `p` to `j` active players with `b` balls
#[wasm_bindgen]
pub fn transition_probability(j: usize, p: usize, b: usize) -> Result<f64, JsValue> {
    model::transition_probability(j, p, b).map_err(js_error)
}

/// Full transition table for `b` balls as a JSON matrix
#[wasm_bindgen]
pub fn transition_table(b: usize) -> String {
    serde_json::to_string(&model::transition_table(b)).unwrap_or_default()
}

/// One table row as a typed array
#[wasm_bindgen]
pub fn transition_row(b: usize, p: usize) -> Result<js_sys::Float64Array, JsValue> {
    if p >= b {
        return Err(js_error(GameError::IndexOutOfRange { j: 0, p, b }));
    }
    let row: Vec<f64> = (0..b)
        .map(|j| model::transition_probability(j, p, b))
        .collect::<Result<_, _>>()
        .map_err(js_error)?;
    Ok(js_sys::Float64Array::from(row.as_slice()))
}

/// Compare the unbiased game against the FavorA rigging
#[wasm_bindgen]
pub fn compare_scenarios(config_json: &str, trials: usize, seed: u64) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let runner = MonteCarloRunner::new(config);
    let (unbiased, favored) = runner.compare(trials, seed).map_err(js_error)?;

    let comparison = serde_json::json!({
        "unbiased": unbiased.stats(),
        "favored": favored.stats(),
    });

    serde_json::to_string(&comparison)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
