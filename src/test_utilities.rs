use crate::Point2;
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub const SEED: &[u8; 32] = b"wPYxAkIiHcEmSBAxQFoXFrpYToCe1B71";
pub const SEED2: &[u8; 32] = b"14LzG37Y9EHTcmLW8vBDqWwtYsCeVVyF";

/// Returns points uniformly distributed in `[-range, range]²`.
pub fn random_points_in_range(range: f64, size: usize, seed: &[u8; 32]) -> Vec<Point2> {
    let mut rng = rand::rngs::StdRng::from_seed(*seed);
    let range = Uniform::new(-range, range);
    let mut points = Vec::with_capacity(size);
    for _ in 0..size {
        let x = range.sample(&mut rng);
        let y = range.sample(&mut rng);
        points.push(Point2::new(x, y));
    }
    points
}

/// Returns points uniformly distributed in `[0, width] x [0, height]`.
pub fn random_points_in_domain(width: f64, height: f64, size: usize, seed: &[u8; 32]) -> Vec<Point2> {
    let mut rng = rand::rngs::StdRng::from_seed(*seed);
    let x_range = Uniform::new(0.0, width);
    let y_range = Uniform::new(0.0, height);
    (0..size)
        .map(|_| Point2::new(x_range.sample(&mut rng), y_range.sample(&mut rng)))
        .collect()
}

struct WarningCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Runs `f` and returns its result together with the number of warnings it logged.
pub fn count_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarningCounter(counter.clone()));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, counter.load(Ordering::SeqCst))
}
