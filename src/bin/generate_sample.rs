use std::path::Path;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

const HEADER: [&str; 9] = [
    "brand",
    "title",
    "type",
    "price",
    "priceWithCurrency",
    "available",
    "sold",
    "lastUpdated",
    "itemLocation",
];

const TYPES: [&str; 4] = ["Eau de Toilette", "Eau de Parfum", "Parfum", "Cologne"];
const LOCATIONS: [&str; 6] = [
    "Miami, Florida",
    "Dallas, Texas",
    "Brooklyn, New York",
    "Los Angeles, California",
    "Edison, New Jersey",
    "Atlanta, Georgia",
];

/// Render a price the way scraped listings show it, including the odd
/// unusable value.
fn noisy_price(rng: &mut SimpleRng, price: f64) -> String {
    match rng.below(10) {
        0 => "N/A".to_string(),
        1 => format!("US ${price:.2}/ea"),
        2 => format!("USD {price:.2}"),
        _ => format!("{price:.2}"),
    }
}

fn noisy_sold(rng: &mut SimpleRng) -> String {
    let sold = rng.below(3000);
    if sold >= 1000 {
        format!("{},{:03} sold", sold / 1000, sold % 1000)
    } else {
        format!("{sold} sold")
    }
}

fn write_catalog(
    path: &Path,
    brands: &[(&str, &[&str])],
    rows: usize,
    rng: &mut SimpleRng,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(HEADER)?;

    for _ in 0..rows {
        let (brand, lines) = brands[rng.below(brands.len())];
        let line = rng.pick(lines);
        let kind = rng.pick(&TYPES);
        let size = [1.0, 1.7, 3.4, 6.7][rng.below(4)];
        let price = 15.0 + rng.next_f64() * 185.0;
        let available = match rng.below(6) {
            0 => String::new(),
            1 => "0".to_string(),
            _ => rng.below(40).to_string(),
        };
        let day = 1 + rng.below(28);

        writer.write_record([
            brand.to_string(),
            format!("{brand} {line} {size} oz {kind}"),
            kind.to_string(),
            noisy_price(rng, price),
            format!("US ${price:.2}"),
            available,
            noisy_sold(rng),
            format!("2024-05-{day:02} 10:{:02}:00", rng.below(60)),
            rng.pick(&LOCATIONS).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let men: [(&str, &[&str]); 5] = [
        ("Dior", &["Sauvage", "Homme Intense", "Fahrenheit"]),
        ("Versace", &["Eros", "Dylan Blue", "Pour Homme"]),
        ("Azzaro", &["Wanted", "Chrome"]),
        ("Calvin Klein", &["Eternity", "Obsession", "CK One"]),
        ("Paco Rabanne", &["1 Million", "Invictus"]),
    ];
    let women: [(&str, &[&str]); 5] = [
        ("Chanel", &["No 5", "Coco Mademoiselle", "Chance"]),
        ("Lancome", &["La Vie Est Belle", "Idole"]),
        ("Dior", &["J'adore", "Miss Dior"]),
        ("Versace", &["Bright Crystal", "Dylan Purple"]),
        ("Marc Jacobs", &["Daisy", "Perfect"]),
    ];

    let men_path = Path::new("ebay_mens_perfume.csv");
    let women_path = Path::new("ebay_womens_perfume.csv");
    write_catalog(men_path, &men, 400, &mut rng)?;
    write_catalog(women_path, &women, 400, &mut rng)?;

    println!(
        "Wrote 400 listings each to {} and {}",
        men_path.display(),
        women_path.display()
    );
    Ok(())
}
