//! Writes example model artifacts and an example shift file so the
//! dashboard can be tried without a training run.
//!
//! Usage: `generate_sample [models_dir] [data_dir]`

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{Value, json};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Model definitions
// ---------------------------------------------------------------------------

/// A linear ground truth per domain plus the input range it is sampled on.
struct DomainSpec {
    name: &'static str,
    intercept: f64,
    coefficients: [f64; 3],
    ranges: [(f64, f64); 3],
}

const DOMAINS: [DomainSpec; 4] = [
    DomainSpec {
        name: "recovery",
        intercept: 0.80,
        coefficients: [0.015, 0.0005, 0.00002],
        ranges: [(1.0, 8.0), (10.0, 80.0), (500.0, 1500.0)],
    },
    DomainSpec {
        name: "tonnage",
        intercept: 25.0,
        coefficients: [2.1, 3.4, 0.5],
        ranges: [(5.0, 40.0), (10.0, 60.0), (20.0, 100.0)],
    },
    DomainSpec {
        name: "gold",
        intercept: -10.0,
        coefficients: [4.5, 0.05, 0.01],
        ranges: [(1.0, 8.0), (10.0, 80.0), (500.0, 1500.0)],
    },
    DomainSpec {
        name: "silver",
        intercept: -20.0,
        coefficients: [0.3, 1.2, 0.02],
        ranges: [(1.0, 8.0), (10.0, 80.0), (500.0, 1500.0)],
    },
];

impl DomainSpec {
    fn truth(&self, x: &[f64; 3]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }

    fn midpoint(&self) -> [f64; 3] {
        self.ranges.map(|(lo, hi)| (lo + hi) / 2.0)
    }

    fn baseline(&self) -> Value {
        json!({
            "kind": "linear",
            "n_features_in": 3,
            "coefficients": self.coefficients,
            "intercept": self.intercept,
        })
    }

    /// Averaged depth-one trees; leaves are the ground truth at the
    /// centre of each side of the split, plus noise.
    fn tuned(&self, rng: &mut SimpleRng, n_trees: usize) -> Value {
        let mut splits = [0usize; 3];
        let trees: Vec<Value> = (0..n_trees)
            .map(|_| {
                let feature = (rng.next_u64() % 3) as usize;
                splits[feature] += 1;
                let (lo, hi) = self.ranges[feature];
                let threshold = rng.uniform(lo + (hi - lo) * 0.3, lo + (hi - lo) * 0.7);

                let mut left = self.midpoint();
                left[feature] = (lo + threshold) / 2.0;
                let mut right = self.midpoint();
                right[feature] = (threshold + hi) / 2.0;

                let noise = self.truth(&self.midpoint()).abs() * 0.01;
                json!({ "nodes": [
                    { "feature": feature, "threshold": threshold, "left": 1, "right": 2 },
                    { "leaf": self.truth(&left) + rng.gauss(0.0, noise) },
                    { "leaf": self.truth(&right) + rng.gauss(0.0, noise) },
                ]})
            })
            .collect();

        let importances: Vec<f64> = splits
            .iter()
            .map(|&s| s as f64 / n_trees as f64)
            .collect();

        json!({
            "kind": "forest",
            "n_features_in": 3,
            "combine": "mean",
            "feature_importances": importances,
            "trees": trees,
        })
    }
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Shift data
// ---------------------------------------------------------------------------

struct ShiftRow {
    shift: String,
    features: [f64; 3],
    crew_hours: f64,
}

fn shift_rows(rng: &mut SimpleRng, n: usize) -> Vec<ShiftRow> {
    let ranges = DOMAINS[0].ranges;
    (0..n)
        .map(|i| ShiftRow {
            shift: format!("S{:03}", i + 1),
            features: ranges.map(|(lo, hi)| (rng.uniform(lo, hi) * 100.0).round() / 100.0),
            crew_hours: (rng.uniform(60.0, 96.0) * 10.0).round() / 10.0,
        })
        .collect()
}

const SHIFT_HEADERS: [&str; 5] = [
    "Shift",
    "Head Grade_Au gpt",
    "Head Grade_Ag gpt",
    "Tonnage_Processed_tons",
    "Crew_Hours",
];

/// CSV with a byte-order mark, as spreadsheet exports usually have.
fn write_csv(path: &Path, rows: &[ShiftRow]) -> Result<()> {
    let mut file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(b"\xEF\xBB\xBF")?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(SHIFT_HEADERS)?;
    for row in rows {
        let mut record = vec![row.shift.clone()];
        record.extend(row.features.iter().map(|v| v.to_string()));
        record.push(row.crew_hours.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[ShiftRow]) -> Result<()> {
    let shift_array = StringArray::from(rows.iter().map(|r| r.shift.as_str()).collect::<Vec<_>>());
    let feature = |i: usize| Float64Array::from(rows.iter().map(|r| r.features[i]).collect::<Vec<_>>());
    let crew_array = Float64Array::from(rows.iter().map(|r| r.crew_hours).collect::<Vec<_>>());

    let mut fields = vec![Field::new(SHIFT_HEADERS[0], DataType::Utf8, false)];
    fields.extend(
        SHIFT_HEADERS[1..]
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false)),
    );
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(shift_array),
            Arc::new(feature(0)),
            Arc::new(feature(1)),
            Arc::new(feature(2)),
            Arc::new(crew_array),
        ],
    )
    .context("building record batch")?;

    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let models_dir = PathBuf::from(args.next().unwrap_or_else(|| "models".into()));
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".into()));
    std::fs::create_dir_all(&models_dir)?;
    std::fs::create_dir_all(&data_dir)?;

    let mut rng = SimpleRng::new(42);

    for spec in &DOMAINS {
        write_json(
            &models_dir.join(format!("{}_baseline.json", spec.name)),
            &spec.baseline(),
        )?;
        write_json(
            &models_dir.join(format!("{}_tuned.json", spec.name)),
            &spec.tuned(&mut rng, 40),
        )?;
    }

    let rows = shift_rows(&mut rng, 30);
    let csv_path = data_dir.join("shift_data.csv");
    let parquet_path = data_dir.join("shift_data.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} models to {} and {} shifts to {} / {}",
        DOMAINS.len() * 2,
        models_dir.display(),
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
