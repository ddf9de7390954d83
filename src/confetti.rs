// File: ./src/confetti.rs
//! Celebration particles. Coordinates are terminal cells; one `step` is one
//! animation frame.
use rand::Rng;

pub const PALETTE: [(u8, u8, u8); 8] = [
    (0xef, 0x44, 0x44),
    (0xf9, 0x73, 0x16),
    (0xfa, 0xcc, 0x15),
    (0x10, 0xb9, 0x81),
    (0x06, 0xb6, 0xd4),
    (0x3b, 0x82, 0xf6),
    (0x8b, 0x5c, 0xf6),
    (0xec, 0x48, 0x99),
];

pub const DEFAULT_BURST: usize = 80;

/// How far past the edges a particle may drift before it is dropped.
const EDGE_MARGIN: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub color: (u8, u8, u8),
    /// Degrees.
    pub rotation: f32,
    pub gravity: f32,
    pub life: u32,
}

impl Particle {
    pub fn advance(&mut self) {
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;
        self.rotation += self.vx * 4.0;
        self.life = self.life.saturating_sub(1);
    }

    /// A spinning piece of paper, seen from the side.
    pub fn glyph(&self) -> char {
        if self.size >= 2.0 {
            return '■';
        }
        match (self.rotation.rem_euclid(180.0) / 45.0) as u32 {
            0 => '-',
            1 => '/',
            2 => '|',
            _ => '\\',
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfettiField {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    burst_size: usize,
}

impl ConfettiField {
    pub fn new(burst_size: usize) -> Self {
        Self {
            particles: Vec::new(),
            width: 80.0,
            height: 24.0,
            burst_size,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width as f32;
        self.height = height as f32;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The frame loop only needs to run while this is true.
    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Throws one burst from around the middle of the viewport. Adds to any
    /// particles still in flight.
    pub fn burst<R: Rng>(&mut self, rng: &mut R) {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let spread_x = (self.width / 8.0).max(1.0);
        let spread_y = (self.height / 8.0).max(1.0);

        self.particles.reserve(self.burst_size);
        for _ in 0..self.burst_size {
            self.particles.push(Particle {
                x: cx + rng.gen_range(-spread_x..spread_x),
                y: cy + rng.gen_range(-spread_y..spread_y),
                vx: rng.gen_range(-1.0..1.0),
                vy: rng.gen_range(-1.0..-0.3),
                size: rng.gen_range(1.0..2.5),
                color: PALETTE[rng.gen_range(0..PALETTE.len())],
                rotation: rng.gen_range(0.0..360.0),
                gravity: rng.gen_range(0.03..0.045),
                life: rng.gen_range(80..120),
            });
        }
    }

    /// Advances every particle one frame and drops the finished ones.
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            p.advance();
            p.life > 0 && p.y <= h + EDGE_MARGIN && p.x >= -EDGE_MARGIN && p.x <= w + EDGE_MARGIN
        });
    }
}

impl Default for ConfettiField {
    fn default() -> Self {
        Self::new(DEFAULT_BURST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn particle() -> Particle {
        Particle {
            x: 10.0,
            y: 10.0,
            vx: 0.5,
            vy: -1.0,
            size: 1.0,
            color: PALETTE[0],
            rotation: 0.0,
            gravity: 0.25,
            life: 3,
        }
    }

    #[test]
    fn burst_spawns_fixed_count_with_bounded_values() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ConfettiField::new(80);
        field.resize(100, 40);
        field.burst(&mut rng);

        assert_eq!(field.particles().len(), 80);
        for p in field.particles() {
            assert!((80..120).contains(&p.life));
            assert!(p.vy < 0.0);
            assert!(PALETTE.contains(&p.color));
            assert!((37.5..62.5).contains(&p.x));
        }
    }

    #[test]
    fn bursts_accumulate() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = ConfettiField::new(5);
        field.burst(&mut rng);
        field.burst(&mut rng);
        assert_eq!(field.particles().len(), 10);
    }

    #[test]
    fn advance_applies_gravity_before_moving() {
        let mut p = particle();
        p.advance();
        assert_eq!(p.vy, -0.75);
        assert_eq!(p.y, 9.25);
        assert_eq!(p.x, 10.5);
        assert_eq!(p.rotation, 2.0);
        assert_eq!(p.life, 2);
    }

    #[test]
    fn expired_particles_are_removed() {
        let mut field = ConfettiField::new(0);
        field.resize(40, 40);
        field.particles.push(particle());
        field.step();
        field.step();
        assert!(field.is_active());
        field.step();
        assert!(!field.is_active());
    }

    #[test]
    fn particles_below_the_viewport_are_removed() {
        let mut field = ConfettiField::new(0);
        field.resize(40, 10);
        let mut p = particle();
        p.y = 12.9;
        p.vy = 0.5;
        p.life = 100;
        field.particles.push(p);
        field.step();
        assert!(!field.is_active());
    }

    #[test]
    fn particles_drifting_off_the_sides_are_removed() {
        let mut field = ConfettiField::new(0);
        field.resize(40, 40);
        let mut left = particle();
        left.x = 0.0;
        left.vx = -3.5;
        left.life = 100;
        let mut right = particle();
        right.x = 40.0;
        right.vx = 3.5;
        right.life = 100;
        let mut inside = particle();
        inside.x = 0.0;
        inside.vx = -2.5;
        inside.life = 100;
        field.particles.extend([left, right, inside]);

        field.step();
        assert_eq!(field.particles().len(), 1);
        assert_eq!(field.particles()[0].x, -2.5);
    }

    #[test]
    fn field_goes_idle_after_a_burst() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = ConfettiField::default();
        field.resize(120, 40);
        field.burst(&mut rng);
        for _ in 0..120 {
            field.step();
        }
        assert!(!field.is_active());
    }
}
