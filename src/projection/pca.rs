use super::{Point2, Projector};
use anyhow::{anyhow, Result};
use ndarray::{Array1, Array2, Axis};

const COMPONENTS: usize = 2;

/// Two-component principal component analysis.
///
/// The N x N Gram matrix of the centered data is fully eigen-decomposed with
/// Jacobi rotations and the eigenpairs are ranked by eigenvalue; the scores
/// are `sqrt(lambda) * u` for the two largest. Each component's sign is
/// chosen so that its largest-magnitude entry is positive.
pub struct Pca {
    max_sweeps: usize,
    /// Convergence bound on the off-diagonal mass relative to the whole matrix.
    tolerance: f64,
}

impl Default for Pca {
    fn default() -> Self {
        Self {
            max_sweeps: 100,
            tolerance: 1e-24,
        }
    }
}

impl Projector for Pca {
    fn reduce(&self, vectors: &[&[f32]]) -> Result<Vec<Point2>> {
        let Some(first) = vectors.first() else {
            return Ok(Vec::new());
        };
        let dim = first.len();
        if let Some(bad) = vectors.iter().position(|v| v.len() != dim) {
            return Err(anyhow!(
                "vector {} has dimension {}, expected {}",
                bad,
                vectors[bad].len(),
                dim
            ));
        }

        let data =
            Array2::from_shape_fn((vectors.len(), dim), |(i, j)| f64::from(vectors[i][j]));
        let scores = self.scores(data);
        debug!("pca reduced {} vectors of dimension {}", vectors.len(), dim);

        Ok(scores
            .rows()
            .into_iter()
            .map(|row| Point2 {
                x: row[0],
                y: row[1],
            })
            .collect())
    }
}

impl Pca {
    fn scores(&self, data: Array2<f64>) -> Array2<f64> {
        let n = data.nrows();
        let mut scores = Array2::zeros((n, COMPONENTS));
        let Some(mean) = data.mean_axis(Axis(0)) else {
            return scores;
        };
        let centered = &data - &mean;
        let gram = centered.dot(&centered.t());

        let floor = gram.diag().sum() * 1e-12;
        let (eigenvalues, eigenvectors) = self.symmetric_eigen(gram);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));

        for (component, &i) in order.iter().take(COMPONENTS).enumerate() {
            let lambda = eigenvalues[i];
            if lambda <= floor || lambda <= 0.0 {
                break;
            }
            let u = flip_sign(eigenvectors.column(i).to_owned());
            scores.column_mut(component).assign(&(&u * lambda.sqrt()));
        }
        scores
    }

    /// Cyclic Jacobi rotations. Returns the eigenvalues (unsorted) and the
    /// matching eigenvectors as columns.
    fn symmetric_eigen(&self, mut a: Array2<f64>) -> (Array1<f64>, Array2<f64>) {
        let n = a.nrows();
        let mut v = Array2::<f64>::eye(n);
        let scale: f64 = a.iter().map(|x| x * x).sum();
        if scale == 0.0 {
            return (Array1::zeros(n), v);
        }

        for _ in 0..self.max_sweeps {
            let mut off = 0.0;
            for p in 0..n {
                for q in (p + 1)..n {
                    off += a[[p, q]] * a[[p, q]];
                }
            }
            if off <= self.tolerance * scale {
                break;
            }

            for p in 0..n {
                for q in (p + 1)..n {
                    let apq = a[[p, q]];
                    if apq == 0.0 {
                        continue;
                    }
                    let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                    let c = 1.0 / (t * t + 1.0).sqrt();
                    let s = t * c;

                    for k in 0..n {
                        let (akp, akq) = (a[[k, p]], a[[k, q]]);
                        a[[k, p]] = c * akp - s * akq;
                        a[[k, q]] = s * akp + c * akq;
                    }
                    for k in 0..n {
                        let (apk, aqk) = (a[[p, k]], a[[q, k]]);
                        a[[p, k]] = c * apk - s * aqk;
                        a[[q, k]] = s * apk + c * aqk;
                    }
                    for k in 0..n {
                        let (vkp, vkq) = (v[[k, p]], v[[k, q]]);
                        v[[k, p]] = c * vkp - s * vkq;
                        v[[k, q]] = s * vkp + c * vkq;
                    }
                }
            }
        }

        (a.diag().to_owned(), v)
    }
}

fn flip_sign(u: Array1<f64>) -> Array1<f64> {
    let pivot = u
        .iter()
        .copied()
        .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        -u
    } else {
        u
    }
}
