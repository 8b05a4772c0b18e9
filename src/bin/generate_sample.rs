//! Writes example result tables to the current directory for trying out the dashboard.

use anyhow::{Context, Result};

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

    /// p-value skewed toward zero so a fraction of features look significant.
    fn p_value(&mut self) -> f64 {
        self.next_f64().powi(3)
    }

    /// Fraction of missing observations, mostly small.
    fn missing_fraction(&mut self) -> f64 {
        self.next_f64().powi(2) * 0.5
    }
}

const CATEGORIES: [&str; 4] = ["Lipid", "Amino acid", "Carbohydrate", "Nucleotide"];
const CONDITIONS: usize = 3;

fn write_results(path: &str, n_features: usize, rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    let mut header = vec!["feature".to_string(), "Category".to_string()];
    for c in 0..CONDITIONS {
        header.push(format!("C{c}_missing"));
    }
    for c in 1..CONDITIONS {
        header.push(format!("ANCOVA_C{c}_vs_C0"));
    }
    header.push("fold_change".to_string());
    writer.write_record(&header)?;

    for i in 0..n_features {
        let mut record = vec![
            format!("feature_{i:04}"),
            CATEGORIES[i % CATEGORIES.len()].to_string(),
        ];
        for _ in 0..CONDITIONS {
            record.push(format!("{:.3}", rng.missing_fraction()));
        }
        for _ in 1..CONDITIONS {
            record.push(format!("{:.5}", rng.p_value()));
        }
        record.push(format!("{:.3}", 0.25 + rng.next_f64() * 4.0));
        writer.write_record(&record)?;
    }

    writer.flush().with_context(|| format!("writing {path}"))?;
    println!("Wrote {n_features} features to {path}");
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    write_results("sample_results_serum.csv", 400, &mut rng)?;
    write_results("sample_results_urine.csv", 250, &mut rng)?;
    Ok(())
}
