use std::fmt::Display;

/// Running min / max / average over a series of counts.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

impl Stats {
    pub fn new_single(v: usize) -> Self {
        Stats {
            count: 1,
            min: v,
            max: v,
            avg: v as f64,
        }
    }

    pub fn add_sample(&mut self, value: usize) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.avg += (value as f64 - self.avg) / (self.count as f64);
    }

    pub fn merge(&self, other: &Self) -> Self {
        let count = self.count + other.count;
        Stats {
            count,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            avg: if count > 0 {
                (self.avg * self.count as f64 + other.avg * other.count as f64) / count as f64
            } else {
                0.0
            },
        }
    }

    /// Adds a constant to every sample seen so far.
    pub fn offset(&self, by: usize) -> Self {
        if self.count == 0 {
            return self.clone();
        }
        Stats {
            count: self.count,
            min: self.min + by,
            max: self.max + by,
            avg: self.avg + by as f64,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            count: 0,
            min: usize::MAX,
            max: 0,
            avg: 0.0,
        }
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "no samples");
        }
        write!(
            f,
            "{} - {}; avg {:.1}; {} samples",
            self.min, self.max, self.avg, self.count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[test]
    fn add_samples() {
        let mut s = Stats::default();
        for v in [20, 10, 30] {
            s.add_sample(v);
        }
        assert!(s.count == 3);
        assert!(s.min == 10);
        assert!(s.max == 30);
        assert!((s.avg - 20.0).abs() < 1e-12);
    }

    #[test]
    fn merge_stats() {
        let a = Stats::new_single(10);
        let mut b = Stats::new_single(30);
        b.add_sample(50);
        let m = a.merge(&b);
        assert!(m.count == 3);
        assert!(m.min == 10);
        assert!(m.max == 50);
        assert!(m.avg == 30.0);
    }

    #[test]
    fn merge_with_default() {
        let s = Stats::new_single(5);
        assert!(Stats::default().merge(&s) == s);
        assert!(Stats::default().merge(&Stats::default()) == Stats::default());
    }

    #[test]
    fn offset_moves_every_sample() {
        let mut s = Stats::new_single(1);
        s.add_sample(3);
        let shifted = s.offset(2);
        assert!(shifted.min == 3);
        assert!(shifted.max == 5);
        assert!(shifted.avg == 4.0);
        assert!(Stats::default().offset(2) == Stats::default());
    }

    #[test]
    fn display_format() {
        let output = format!("{}", Stats::new_single(42));
        assert!(output.contains("42 - 42"));
        assert!(output.contains("avg 42.0"));
        assert!(output.contains("1 samples"));
        assert!(format!("{}", Stats::default()) == "no samples");
    }
}
