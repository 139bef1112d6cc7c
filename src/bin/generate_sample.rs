//! Writes a deterministic synthetic launch table as both
//! `spacex_launch_dash.csv` and `spacex_launch_dash.parquet`.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Booster generations in flight order: (category, launches, success rate,
/// payload range in kg, sites flown from).
const ERAS: [(&str, usize, f64, (f64, f64), &[&str]); 5] = [
    ("v1.0", 5, 0.0, (0.0, 700.0), &["CCAFS LC-40"]),
    ("v1.1", 15, 0.2, (500.0, 4500.0), &["CCAFS LC-40", "VAFB SLC-4E"]),
    ("FT", 24, 0.65, (1000.0, 9600.0), &["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]),
    ("B4", 11, 0.55, (2000.0, 9600.0), &["KSC LC-39A", "VAFB SLC-4E", "CCAFS SLC-40"]),
    ("B5", 1, 1.0, (3600.0, 3700.0), &["CCAFS SLC-40"]),
];

struct Row {
    flight_number: i64,
    launch_site: String,
    class: i64,
    payload_mass_kg: f64,
    booster_version: String,
    booster_version_category: String,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for (category, launches, success_rate, (lo, hi), sites) in ERAS {
        for _ in 0..launches {
            let flight_number = rows.len() as i64 + 1;
            let mass = lo + rng.next_f64() * (hi - lo);
            rows.push(Row {
                flight_number,
                launch_site: rng.pick(sites).to_string(),
                class: i64::from(rng.next_f64() < success_rate),
                payload_mass_kg: (mass * 10.0).round() / 10.0,
                booster_version: format!("F9 {category}  B{:04}", 1000 + flight_number),
                booster_version_category: category.to_string(),
            });
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Flight Number",
        "Launch Site",
        "class",
        "Payload Mass (kg)",
        "Booster Version",
        "Booster Version Category",
    ])?;
    for r in rows {
        writer.write_record([
            r.flight_number.to_string(),
            r.launch_site.clone(),
            r.class.to_string(),
            format!("{:.1}", r.payload_mass_kg),
            r.booster_version.clone(),
            r.booster_version_category.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.flight_number))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.launch_site))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.class))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.booster_version))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| &r.booster_version_category),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "spacex_launch_dash.csv")?;
    write_parquet(&rows, "spacex_launch_dash.parquet")?;

    println!(
        "Wrote {} launches to spacex_launch_dash.csv and spacex_launch_dash.parquet",
        rows.len()
    );
    Ok(())
}
