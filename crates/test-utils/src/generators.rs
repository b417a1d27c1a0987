//! Test data generators for concentration-like values.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// Value stored at `[t, z, y, x]` by the synthetic fixtures.
///
/// Each index contributes a distinct decimal place so a read from the wrong
/// window is easy to spot: `t * 1000 + z * 100 + y * 10 + x`.
pub fn concentration_value(t: usize, z: usize, y: usize, x: usize) -> f64 {
    (t * 1000 + z * 100 + y * 10 + x) as f64
}

/// Creates a 4D `[time, z, y, x]` buffer in row-major order.
///
/// # Example
///
/// ```
/// use test_utils::create_concentration_cube;
///
/// let cube = create_concentration_cube([2, 2, 3, 4]);
/// assert_eq!(cube.len(), 48);
/// assert_eq!(cube[0], 0.0);
/// assert_eq!(cube[1], 1.0);   // x = 1
/// assert_eq!(cube[4], 10.0);  // y = 1
/// assert_eq!(cube[12], 100.0); // z = 1
/// ```
pub fn create_concentration_cube(shape: [usize; 4]) -> Vec<f64> {
    let [nt, nz, ny, nx] = shape;
    let mut data = Vec::with_capacity(nt * nz * ny * nx);
    for t in 0..nt {
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    data.push(concentration_value(t, z, y, x));
                }
            }
        }
    }
    data
}

/// The `y × x` plane the cube holds at `(t, z)`, as nested rows.
pub fn expected_plane(t: usize, z: usize, rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|y| (0..cols).map(|x| concentration_value(t, z, y, x)).collect())
        .collect()
}

/// Creates a smooth plume-shaped grid in kg/m3 (values around 1e-9 to 5e-8).
///
/// Peak concentration sits at the grid center and decays with distance.
pub fn create_plume_grid(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    let cy = rows as f64 / 2.0;
    let cx = cols as f64 / 2.0;
    let sigma = (rows.max(cols) as f64 / 4.0).max(1.0);

    (0..rows)
        .map(|y| {
            (0..cols)
                .map(|x| {
                    let dy = y as f64 - cy;
                    let dx = x as f64 - cx;
                    let d2 = (dx * dx + dy * dy) / (2.0 * sigma * sigma);
                    1e-9 + 5e-8 * (-d2).exp()
                })
                .collect()
        })
        .collect()
}

/// Creates a grid where every cell holds `value`.
pub fn create_constant_grid(rows: usize, cols: usize, value: f64) -> Vec<Vec<f64>> {
    vec![vec![value; cols]; rows]
}
