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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const JOBS: &[&str] = &[
    "admin.",
    "blue-collar",
    "entrepreneur",
    "housemaid",
    "management",
    "retired",
    "self-employed",
    "services",
    "student",
    "technician",
    "unemployed",
    "unknown",
];
const MARITAL: &[&str] = &["divorced", "married", "single", "unknown"];
const EDUCATION: &[&str] = &[
    "basic.4y",
    "basic.6y",
    "basic.9y",
    "high.school",
    "professional.course",
    "university.degree",
    "unknown",
];
const FLAGS: &[&str] = &["no", "yes", "unknown"];
const CONTACT: &[&str] = &["cellular", "telephone"];
const MONTHS: &[&str] = &["mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];
const DAYS: &[&str] = &["mon", "tue", "wed", "thu", "fri"];

/// Acceptance probability: young and retired customers convert more often,
/// as in the public bank marketing data.
fn conversion_probability(age: u32, contact: &str) -> f64 {
    let base = match age {
        0..=24 => 0.25,
        25..=59 => 0.09,
        _ => 0.40,
    };
    if contact == "cellular" { base * 1.3 } else { base * 0.6 }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_rows = 5_000;

    let output_path = "bank-additional-full.csv";
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .context("creating output file")?;

    writer.write_record([
        "age",
        "job",
        "marital",
        "education",
        "default",
        "housing",
        "loan",
        "contact",
        "month",
        "day_of_week",
        "duration",
        "campaign",
        "y",
    ])?;

    let mut accepted = 0usize;
    for _ in 0..n_rows {
        let age = rng.gauss(40.0, 11.0).round().clamp(17.0, 98.0) as u32;
        let job = if age >= 62 && rng.chance(0.7) {
            "retired"
        } else if age <= 23 && rng.chance(0.5) {
            "student"
        } else {
            rng.pick(JOBS)
        };
        let marital = if age < 26 && rng.chance(0.6) {
            "single"
        } else {
            rng.pick(MARITAL)
        };
        let contact = rng.pick(CONTACT);
        let duration = rng.gauss(250.0, 120.0).max(0.0).round() as u32;
        let campaign = 1 + (rng.next_u64() % 6) as u32;
        let y = if rng.chance(conversion_probability(age, contact)) {
            accepted += 1;
            "yes"
        } else {
            "no"
        };

        writer.write_record([
            age.to_string().as_str(),
            job,
            marital,
            rng.pick(EDUCATION),
            if rng.chance(0.8) { "no" } else { "unknown" },
            rng.pick(FLAGS),
            rng.pick(FLAGS),
            contact,
            rng.pick(MONTHS),
            rng.pick(DAYS),
            duration.to_string().as_str(),
            campaign.to_string().as_str(),
            y,
        ])?;
    }
    writer.flush().context("flushing output file")?;

    println!("Wrote {n_rows} customers ({accepted} accepted) to {output_path}");
    Ok(())
}
