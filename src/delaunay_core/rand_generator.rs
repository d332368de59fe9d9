/// Number of draws after which the generator restarts from its original seed.
const PERIOD: u32 = 200;

const SEED_MODULUS: u64 = 1_000_000_000;
const MAX_STATE: f64 = 99_999.0;

/// A small middle-square pseudo random number generator.
///
/// This generator is used to pick sample vertices for point location. It is deterministic,
/// cheap and has a short period; it is not suited for anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandGenerator {
    original_seed: u64,
    current_seed: u64,
    range_min: i64,
    range_max: i64,
    num_iter: u32,
}

impl RandGenerator {
    /// Creates a generator drawing values in `range_min..=range_max`.
    pub fn new(seed: u64, range_min: i64, range_max: i64) -> Self {
        let seed = seed % SEED_MODULUS;
        RandGenerator {
            original_seed: seed,
            current_seed: seed,
            range_min,
            range_max,
            num_iter: 0,
        }
    }

    /// Derives a seed from a query position.
    pub fn seed_from_position(x: f64, y: f64) -> u64 {
        let hash = x * 10.0 + 4.0 * y;
        if hash.is_finite() {
            (hash as i64).unsigned_abs()
        } else {
            0
        }
    }

    /// Restarts the sequence from the original seed.
    pub fn reset(&mut self) {
        self.current_seed = self.original_seed;
        self.num_iter = 0;
    }

    /// Draws the next value in the configured range.
    pub fn next_in_range(&mut self) -> i64 {
        let square = self.current_seed * self.current_seed;
        // Take five digits from the middle of the zero padded square
        let num_digits = decimal_digits(square).max(8);
        self.current_seed = (square / 10u64.pow(num_digits - 6)) % 100_000;

        let span = (self.range_max - self.range_min) as f64;
        let result =
            (self.range_min as f64 + (self.current_seed as f64 / MAX_STATE) * span).round();

        if self.current_seed == 0 {
            self.current_seed = self.original_seed + u64::from(self.num_iter);
        }

        self.num_iter += 1;
        if self.num_iter == PERIOD {
            self.reset();
        }

        result as i64
    }
}

fn decimal_digits(mut value: u64) -> u32 {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}
