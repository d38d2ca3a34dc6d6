use num::Float;

/// Piecewise linear interpolation of `x` over `coords`, similar to
/// numpy.interp for a single point. `coords` must be sorted by x. Values
/// left of the first point or right of the last are clamped to the end
/// values; an empty set of coordinates yields zero.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        // Actual interpolation
        if x1 <= x && x <= x2 {
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    y_last
}

#[test]
fn test_interp() {
    let coords = [(1., 3.), (2., 2.), (3., 0.)];
    let x = [0., 1., 1.5, 2.72, 3.24];

    assert_eq!(
        x.iter().map(|x| interp(*x, &coords)).collect::<Vec<_>>(),
        vec![3., 3., 2.5, 0.5599999999999996, 0.]
    );

    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];
    let x = [2.5, -1., 7.5];

    assert_eq!(
        x.iter().map(|x| interp(*x, &coords)).collect::<Vec<_>>(),
        vec![4., 0., 2.]
    );
    assert_eq!(interp(0.5, &[] as &[(f64, f64)]), 0.);
}
