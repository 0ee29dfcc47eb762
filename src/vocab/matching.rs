use std::cmp::Ordering;

#[derive(Copy, Clone, Debug)]
pub struct Matched {
    pub index: usize,
    pub similarity: f32,
}

impl PartialOrd for Matched {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Matched {
    fn cmp(&self, other: &Self) -> Ordering {
        self.similarity
            .partial_cmp(&other.similarity)
            .unwrap_or(Ordering::Equal)
            // lower row index wins ties so rankings are stable
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialEq for Matched {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Matched {}

/// Ranks `rows` against `vector` and keeps the `n` best, best first.
/// Rows are expected to be unit length already; `skip` excludes one row
/// (the query itself).
pub fn match_top_n(
    rows: &[Vec<f32>],
    vector: &[f32],
    n: usize,
    skip: Option<usize>,
) -> Vec<Matched> {
    let mut top_n: Vec<Matched> = Vec::with_capacity(n + 1);
    if n == 0 {
        return top_n;
    }

    for (index, row) in rows.iter().enumerate() {
        if Some(index) == skip {
            continue;
        }
        let matched = Matched {
            index,
            similarity: dot_product(vector, row),
        };

        if top_n.len() < n {
            top_n.push(matched);
            top_n.sort_unstable_by(|a, b| b.cmp(a));
        } else if let Some(last) = top_n.last() {
            if matched > *last {
                top_n.pop();
                top_n.push(matched);
                top_n.sort_unstable_by(|a, b| b.cmp(a));
            }
        }
    }
    debug!("top_n: {:?}", top_n);

    top_n
}

pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub fn magnitude(a: &[f32]) -> f32 {
    a.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scales `a` to unit length; zero vectors stay zero.
pub fn unit(a: &[f32]) -> Vec<f32> {
    let mag = magnitude(a);
    if mag == 0.0 {
        return a.to_vec();
    }
    a.iter().map(|x| x / mag).collect()
}
