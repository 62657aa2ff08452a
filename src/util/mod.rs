mod stats;

pub use stats::Stats;

use crate::geometry::FloatType;

pub type Colour = rgb::RGB<FloatType>;

pub const BLACK: Colour = Colour {
    r: 0.0,
    g: 0.0,
    b: 0.0,
};
pub const WHITE: Colour = Colour {
    r: 1.0,
    g: 1.0,
    b: 1.0,
};

/// Componentwise product of two colours.
pub fn hadamard(a: Colour, b: Colour) -> Colour {
    Colour::new(a.r * b.r, a.g * b.g, a.b * b.b)
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::geometry::test::approx_eq;
    use assert2::assert;

    pub fn colour_approx_eq(a: Colour, b: Colour) -> bool {
        approx_eq(a.r, b.r) && approx_eq(a.g, b.g) && approx_eq(a.b, b.b)
    }

    #[test]
    fn multiplying_colours() {
        let c = hadamard(Colour::new(1.0, 0.2, 0.4), Colour::new(0.9, 1.0, 0.1));
        assert!(colour_approx_eq(c, Colour::new(0.9, 0.2, 0.04)));
    }

    #[test]
    fn colour_arithmetic() {
        let a = Colour::new(0.9, 0.6, 0.75);
        let b = Colour::new(0.7, 0.1, 0.25);
        assert!(colour_approx_eq(a + b, Colour::new(1.6, 0.7, 1.0)));
        assert!(colour_approx_eq(a - b, Colour::new(0.2, 0.5, 0.5)));
        assert!(colour_approx_eq(Colour::new(0.2, 0.3, 0.4) * 2.0, Colour::new(0.4, 0.6, 0.8)));
    }
}
