/// `n` evenly spaced samples over `[min, max]`. Both endpoints are
/// included and the last sample is exactly `max`.
#[derive(Clone, Debug)]
pub struct Linspace {
    min: f64,
    max: f64,
    step: f64,
    next: usize,
    n: usize,
}

impl Linspace {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let step = match n {
            0 | 1 => 0.,
            _ => (max - min) / (n - 1) as f64,
        };

        Linspace {
            min,
            max,
            step,
            next: 0,
            n,
        }
    }

    fn sample(&self, i: usize) -> f64 {
        if self.n > 1 && i == self.n - 1 {
            self.max
        } else {
            self.min + self.step * i as f64
        }
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.next >= self.n {
            return None;
        }

        let x = self.sample(self.next);

        self.next += 1;

        Some(x)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace() {
    let samples: Vec<_> = Linspace::new(0., 1., 5).collect();

    assert_eq!(samples, vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(2., 3., 1).collect::<Vec<_>>(), vec![2.]);
    assert_eq!(Linspace::new(0., 1., 0).next(), None);
    assert_eq!(Linspace::new(0., 0.3, 4).last(), Some(0.3));

    let mut grid = Linspace::new(0., 1., 101);

    assert_eq!(grid.len(), 101);
    grid.next();
    assert_eq!(grid.len(), 100);
}
