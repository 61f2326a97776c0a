//! # Noise Field
//!
//! A seeded, deterministic 2D gradient noise generator.
//!
//! The permutation table is built once from the seed with a Fisher–Yates
//! shuffle and never changes afterwards, so a `NoiseField` can be shared
//! between threads and sampled concurrently.

use noise::NoiseFn;

/// Gradient set indexed by `hash & 15`. Only the X and Y components are used.
const GRADIENTS: [[f64; 3]; 16] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, -1.0],
];

/// Seeded 2D coherent noise with output in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct NoiseField {
    seed: u64,
    /// 256 shuffled values, repeated once so corner lookups never wrap.
    permutation: [u8; 512],
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn gradient(hash: u8, x: f64, y: f64) -> f64 {
    let g = GRADIENTS[(hash & 15) as usize];
    g[0] * x + g[1] * y
}

impl NoiseField {
    /// Builds the permutation table for `seed`.
    pub fn new(seed: u64) -> Self {
        let mut table: [u8; 256] = [0; 256];
        for (i, value) in table.iter_mut().enumerate() {
            *value = i as u8;
        }

        let mut rng = fastrand::Rng::with_seed(seed);
        for i in (1..table.len()).rev() {
            let j = rng.usize(..=i);
            table.swap(i, j);
        }

        let mut permutation = [0; 512];
        for (i, value) in permutation.iter_mut().enumerate() {
            *value = table[i & 255];
        }

        NoiseField { seed, permutation }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn perm(&self, index: usize) -> usize {
        self.permutation[index] as usize
    }

    /// Samples the field at `(x, y)`. The result always lies in `[0, 1]`.
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.5;
        }

        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = (x_floor as i64 & 255) as usize;
        let yi = (y_floor as i64 & 255) as usize;
        let xf = x - x_floor;
        let yf = y - y_floor;

        let u = fade(xf);
        let v = fade(yf);

        let aa = self.permutation[self.perm(xi) + yi];
        let ab = self.permutation[self.perm(xi) + yi + 1];
        let ba = self.permutation[self.perm(xi + 1) + yi];
        let bb = self.permutation[self.perm(xi + 1) + yi + 1];

        let bottom = lerp(gradient(aa, xf, yf), gradient(ba, xf - 1.0, yf), u);
        let top = lerp(
            gradient(ab, xf, yf - 1.0),
            gradient(bb, xf - 1.0, yf - 1.0),
            u,
        );
        let value = lerp(bottom, top, v);

        ((value + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.noise2d(point[0], point[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_holds_each_value_twice() {
        let field = NoiseField::new(42);
        let mut counts = [0u32; 256];
        for &value in field.permutation.iter() {
            counts[value as usize] += 1;
        }
        assert!(counts.iter().all(|&count| count == 2));
        assert_eq!(field.permutation[..256], field.permutation[256..]);
    }

    #[test]
    fn same_seed_same_output() {
        let a = NoiseField::new(1234);
        let b = NoiseField::new(1234);
        for i in 0..200 {
            let x = i as f64 * 0.731 - 40.0;
            let y = i as f64 * -0.417 + 13.0;
            assert_eq!(a.noise2d(x, y), b.noise2d(x, y));
            assert_eq!(a.noise2d(x, y), a.get([x, y]));
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..64).any(|i| {
            let p = i as f64 * 0.37 + 0.11;
            a.noise2d(p, p * 0.5) != b.noise2d(p, p * 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn output_stays_in_unit_range() {
        for seed in [0, 1, u64::MAX, 0xDEAD_BEEF] {
            let field = NoiseField::new(seed);
            for i in -300..300 {
                for j in -3..3 {
                    let value = field.noise2d(i as f64 * 0.173, j as f64 * 91.7 + 0.5);
                    assert!((0.0..=1.0).contains(&value), "{value}");
                }
            }
            assert!((0.0..=1.0).contains(&field.noise2d(1e12, -1e12)));
            assert_eq!(field.noise2d(f64::NAN, 0.0), 0.5);
        }
    }

    #[test]
    fn lattice_points_sit_at_the_midpoint() {
        let field = NoiseField::new(7);
        for i in -5..5 {
            assert_eq!(field.noise2d(i as f64, (i * 3) as f64), 0.5);
        }
    }
}
