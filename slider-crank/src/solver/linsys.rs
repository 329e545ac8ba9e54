/// Pivot magnitude below which the system is treated as singular.
const PIVOT_TOL: f64 = 1e-12;

/// Solve `a x = b` by Gaussian elimination with partial pivoting.
///
/// Return `None` if the matrix is singular.
pub(crate) fn solve3(mut a: [[f64; 3]; 3], mut b: [f64; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let pivot = (col..3).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < PIVOT_TOL {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..3 {
            let f = a[row][col] / a[col][col];
            for k in col..3 {
                a[row][k] -= f * a[col][k];
            }
            b[row] -= f * b[col];
        }
    }
    let mut x = [0.; 3];
    for row in (0..3).rev() {
        let sum = (row + 1..3).map(|k| a[row][k] * x[k]).sum::<f64>();
        x[row] = (b[row] - sum) / a[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[test]
fn gauss_elimination() {
    use approx::assert_abs_diff_eq;

    let a = [[2., 1., -1.], [-3., -1., 2.], [-2., 1., 2.]];
    let x = solve3(a, [8., -11., -3.]).unwrap();
    assert_abs_diff_eq!(x[0], 2., epsilon = 1e-12);
    assert_abs_diff_eq!(x[1], 3., epsilon = 1e-12);
    assert_abs_diff_eq!(x[2], -1., epsilon = 1e-12);
    let a = [[1., 2., 3.], [2., 4., 6.], [0., 0., 1.]];
    assert_eq!(solve3(a, [1., 2., 3.]), None);
}
