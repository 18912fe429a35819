/// Gradient directions; 2D sampling reads only `x` and `y`.
const GRAD3: [[f64; 3]; 12] = [
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
];

/// Ken Perlin's reference permutation.
#[rustfmt::skip]
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225,
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148,
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32,
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122,
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54,
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169,
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64,
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213,
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9,
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104,
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241,
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93,
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// Seeded 2D coherent noise.
///
/// The seed's low byte scrambles odd permutation entries and its second byte
/// the even ones. Seeds below 256 are first copied into the second byte so
/// small seeds still touch every entry. Tables are doubled to 512 entries so
/// lookups never wrap.
#[derive(Debug, Clone)]
pub struct Noise {
    perm: [u8; 512],
    grad: [u8; 512],
}

impl Noise {
    pub fn new(seed: i64) -> Self {
        let mut noise = Self {
            perm: [0; 512],
            grad: [0; 512],
        };
        noise.reseed(seed);
        noise
    }

    /// Rebuild the permutation tables for `seed`.
    pub fn reseed(&mut self, seed: i64) {
        // Bit operations act on the low 32 bits, two's complement.
        let mut bits = seed as i32;
        if seed < 256 {
            bits |= bits.wrapping_shl(8);
        }
        let low = (bits & 255) as u8;
        let high = ((bits >> 8) & 255) as u8;

        for (i, p) in PERMUTATION.iter().enumerate() {
            let v = if i & 1 == 1 { p ^ low } else { p ^ high };
            self.perm[i] = v;
            self.perm[i + 256] = v;
            self.grad[i] = v % 12;
            self.grad[i + 256] = v % 12;
        }
    }

    fn dot2(&self, index: usize, x: f64, y: f64) -> f64 {
        let g = GRAD3[self.grad[index] as usize];
        g[0] * x + g[1] * y
    }

    fn perm(&self, index: usize) -> usize {
        self.perm[index] as usize
    }

    /// Smooth non-random sinusoid `(sin x + cos y) / 2`.
    pub fn wave2(&self, x: f64, y: f64) -> f64 {
        (x.sin() + y.cos()) / 2.0
    }

    /// 2D simplex noise, roughly in `[-1, 1]`.
    pub fn simplex2(&self, xin: f64, yin: f64) -> f64 {
        let sqrt3 = 3f64.sqrt();
        let f2 = 0.5 * (sqrt3 - 1.0);
        let g2 = (3.0 - sqrt3) / 6.0;

        let s = (xin + yin) * f2;
        let i = (xin + s).floor();
        let j = (yin + s).floor();
        let t = (i + j) * g2;
        let x0 = xin - i + t;
        let y0 = yin - j + t;

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + g2;
        let y1 = y0 - j1 as f64 + g2;
        let x2 = x0 - 1.0 + 2.0 * g2;
        let y2 = y0 - 1.0 + 2.0 * g2;

        let i = (i as i64 & 255) as usize;
        let j = (j as i64 & 255) as usize;
        let gi0 = i + self.perm(j);
        let gi1 = i + i1 + self.perm(j + j1);
        let gi2 = i + 1 + self.perm(j + 1);

        let corner = |gi: usize, x: f64, y: f64| {
            let t = 0.5 - x * x - y * y;
            if t < 0.0 {
                0.0
            } else {
                let t2 = t * t;
                t2 * t2 * self.dot2(gi, x, y)
            }
        };

        70.0 * (corner(gi0, x0, y0) + corner(gi1, x1, y1) + corner(gi2, x2, y2))
    }

    /// Classic 2D Perlin noise; zero on every integer lattice point.
    pub fn perlin2(&self, x: f64, y: f64) -> f64 {
        let cell_x = x.floor();
        let cell_y = y.floor();
        let x = x - cell_x;
        let y = y - cell_y;
        let cx = (cell_x as i64 & 255) as usize;
        let cy = (cell_y as i64 & 255) as usize;

        let n00 = self.dot2(cx + self.perm(cy), x, y);
        let n01 = self.dot2(cx + self.perm(cy + 1), x, y - 1.0);
        let n10 = self.dot2(cx + 1 + self.perm(cy), x - 1.0, y);
        let n11 = self.dot2(cx + 1 + self.perm(cy + 1), x - 1.0, y - 1.0);

        let u = fade(x);
        lerp(lerp(n00, n10, u), lerp(n01, n11, u), fade(y))
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_keeps_reference_permutation() {
        let n = Noise::new(0);
        assert_eq!(n.perm[0], 151);
        assert_eq!(n.perm[255], 180);
        assert_eq!(n.perm[256], 151);
    }

    #[test]
    fn small_seed_is_spread_to_both_bytes() {
        let small = Noise::new(1);
        let spread = Noise::new(257);
        assert_eq!(small.perm, spread.perm);
        assert_eq!(small.perm[0], 151 ^ 1);
        assert_eq!(small.perm[1], 160 ^ 1);
    }

    #[test]
    fn large_seed_uses_low_bytes() {
        let n = Noise::new(0x1234);
        assert_eq!(n.perm[0], 151 ^ 0x12);
        assert_eq!(n.perm[1], 160 ^ 0x34);
        assert_eq!(n.grad[0] as usize, (151 ^ 0x12) % 12);
    }

    #[test]
    fn reseed_matches_fresh_construction() {
        let mut n = Noise::new(5);
        n.reseed(12398123);
        assert_eq!(n.perm, Noise::new(12398123).perm);
    }

    #[test]
    fn wave_is_deterministic_sinusoid() {
        let n = Noise::new(99);
        assert_eq!(n.wave2(0.0, 0.0), 0.5);
        assert!((n.wave2(std::f64::consts::FRAC_PI_2, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perlin_vanishes_on_lattice() {
        let n = Noise::new(12398123);
        for (x, y) in [(0.0, 0.0), (3.0, 7.0), (-2.0, 5.0), (300.0, 1.0)] {
            assert_eq!(n.perlin2(x, y), 0.0);
        }
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let n = Noise::new(42);
        for step in 0..500 {
            let x = step as f64 * 0.137 - 20.0;
            let y = step as f64 * 0.071 + 3.0;
            assert!(n.simplex2(x, y).abs() <= 1.0);
            assert!(n.perlin2(x, y).abs() <= 1.0);
        }
    }

    #[test]
    fn noise_is_continuous() {
        let n = Noise::new(7);
        let a = n.perlin2(1.3, 2.7);
        let b = n.perlin2(1.3001, 2.7);
        assert!((a - b).abs() < 1e-2);
        let c = n.simplex2(1.3, 2.7);
        let d = n.simplex2(1.3001, 2.7);
        assert!((c - d).abs() < 1e-2);
    }

    #[test]
    fn different_seeds_differ() {
        let a = Noise::new(1);
        let b = Noise::new(2);
        let differs = (0..50).any(|k| {
            let x = k as f64 * 0.31 + 0.1;
            a.simplex2(x, 0.4) != b.simplex2(x, 0.4)
        });
        assert!(differs);
    }
}
