use ndarray::{arr1, Array1, ArrayView1, ArrayView2};

pub struct MatrixHelper;

impl MatrixHelper {
    pub fn determinant_2x2(matrix: ArrayView2<f64>) -> f64 {
        matrix[[0, 0]] * matrix[[1, 1]] - matrix[[0, 1]] * matrix[[1, 0]]
    }

    /// Solves `matrix * x = rhs` by Cramer's rule; `None` when the determinant is zero.
    pub fn solve_2x2(matrix: ArrayView2<f64>, rhs: ArrayView1<f64>) -> Option<Array1<f64>> {
        let det = Self::determinant_2x2(matrix);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let x = (rhs[0] * matrix[[1, 1]] - matrix[[0, 1]] * rhs[1]) / det;
        let y = (matrix[[0, 0]] * rhs[1] - rhs[0] * matrix[[1, 0]]) / det;
        Some(arr1(&[x, y]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn solves_well_conditioned_system() {
        let a = arr2(&[[2.0, 1.0], [1.0, 3.0]]);
        let b = arr1(&[3.0, 5.0]);
        let x = MatrixHelper::solve_2x2(a.view(), b.view()).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn singular_system_has_no_solution() {
        let a = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        let b = arr1(&[1.0, 2.0]);
        assert!(MatrixHelper::solve_2x2(a.view(), b.view()).is_none());
    }
}
