//! Monte Carlo check: with no true group difference, effects are near zero.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use scorecard_core::Benchmark;
use scorecard_model::BoostingParams;

const ROWS: usize = 400;
const REPLICATIONS: u64 = 5;

struct Draw {
    data: DataFrame,
    focal: Vec<bool>,
}

/// Focal membership is independent of every covariate and outcome.
fn null_draw(seed: u64) -> Draw {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let regions = ["east", "north", "west"];
    let sizes = ["large", "small"];

    let mut region = Vec::with_capacity(ROWS);
    let mut size = Vec::with_capacity(ROWS);
    let mut cost = Vec::with_capacity(ROWS);
    let mut readmitted = Vec::with_capacity(ROWS);
    let mut focal = Vec::with_capacity(ROWS);
    for _ in 0..ROWS {
        let r = rng.gen_range(0..regions.len());
        let s = rng.gen_range(0..sizes.len());
        // Sum of uniforms: roughly normal noise with unit variance.
        let noise: f64 = (0..12).map(|_| rng.r#gen::<f64>()).sum::<f64>() - 6.0;
        region.push(regions[r]);
        size.push(sizes[s]);
        cost.push(10.0 + 2.0 * r as f64 - 1.5 * s as f64 + noise);
        readmitted.push(if rng.gen_bool(0.2 + 0.1 * s as f64) {
            "yes"
        } else {
            "no"
        });
        focal.push(rng.gen_bool(0.3));
    }

    let columns: Vec<Column> = vec![
        Series::new("region".into(), region).into_column(),
        Series::new("size".into(), size).into_column(),
        Series::new("cost".into(), cost).into_column(),
        Series::new("readmitted".into(), readmitted).into_column(),
    ];
    Draw {
        data: DataFrame::new(columns).unwrap(),
        focal,
    }
}

#[test]
fn identical_groups_give_near_zero_effects() {
    let params = BoostingParams::new(0.1, 50);
    let mut mean_cost_effect = 0.0;

    for seed in 0..REPLICATIONS {
        let draw = null_draw(seed);
        let mut benchmark = Benchmark::new(
            &draw.data,
            draw.focal,
            &["region", "size"],
            &["cost", "readmitted"],
        )
        .expect("construct");
        benchmark.fit(&params).expect("fit");
        let effects = benchmark.evaluate(4).expect("evaluate").to_vec();

        assert_eq!(effects.len(), 3);
        assert_eq!(effects[0].outcome, "cost");
        // Standard error is about 0.11 for cost and 0.05 for the indicators.
        assert!(effects[0].effect.abs() < 0.5, "cost effect {}", effects[0].effect);
        assert!(effects[1].effect.abs() < 0.25, "no effect {}", effects[1].effect);
        assert!(effects[2].effect.abs() < 0.25, "yes effect {}", effects[2].effect);
        // The two readmission indicators sum to one, so their effects cancel.
        assert!((effects[1].effect + effects[2].effect).abs() < 1e-3);
        mean_cost_effect += effects[0].effect / REPLICATIONS as f64;
    }

    assert!(mean_cost_effect.abs() < 0.25, "mean effect {mean_cost_effect}");
}

#[test]
fn reweighting_balances_categorical_covariates() {
    let draw = null_draw(42);
    let mut benchmark =
        Benchmark::new(&draw.data, draw.focal, &["region", "size"], &["cost"]).expect("construct");
    benchmark.fit(&BoostingParams::new(0.1, 100)).expect("fit");

    let report = benchmark.calc_balance(3).expect("balance");

    assert_eq!(report.len(), 5);
    let gap = report.max_abs_difference().expect("non-empty report");
    assert!(gap < 0.05, "largest balance gap {gap}");
}
