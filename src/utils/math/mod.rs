use num::Float;

/// ドット積を計算する
///
/// # Arguments
/// * `a`, `b` - vectors of the same length
///
/// # Returns
/// * `N` - dot product
#[inline]
pub fn dot<N>(a: &[N], b: &[N]) -> N
where
    N: Float,
{
    debug_assert_eq!(
        a.len(),
        b.len(),
        "Vectors must be of the same length to compute dot product."
    );
    a.iter()
        .zip(b.iter())
        .fold(N::zero(), |acc, (&x, &y)| acc + x * y)
}

/// squared L2 norm
#[inline]
pub fn norm_sq<N>(a: &[N]) -> N
where
    N: Float,
{
    a.iter().fold(N::zero(), |acc, &x| acc + x * x)
}

/// `y += alpha * x`
#[inline]
pub fn axpy<N>(alpha: N, x: &[N], y: &mut [N])
where
    N: Float,
{
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi = *yi + alpha * xi;
    }
}

/// Index of the largest value, ties broken by the lowest index.
/// NaN never wins. `None` for an empty slice.
#[inline]
pub fn argmax<N>(values: &[N]) -> Option<usize>
where
    N: Float,
{
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some(b) if values[b] >= v => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Numerically stable log-sum-exp
#[inline]
pub fn log_sum_exp<N>(values: &[N]) -> N
where
    N: Float,
{
    let max = values.iter().copied().fold(N::neg_infinity(), N::max);
    if !max.is_finite() {
        return max;
    }
    let sum = values
        .iter()
        .fold(N::zero(), |acc, &v| acc + (v - max).exp());
    max + sum.ln()
}

/// Numerically stable softmax
/// The max is subtracted before exponentiating so large scores never overflow.
pub fn softmax<N>(values: &[N]) -> Vec<N>
where
    N: Float,
{
    if values.is_empty() {
        return Vec::new();
    }
    let max = values.iter().copied().fold(N::neg_infinity(), N::max);
    let exps: Vec<N> = values.iter().map(|&v| (v - max).exp()).collect();
    let sum = exps.iter().fold(N::zero(), |acc, &e| acc + e);
    exps.into_iter().map(|e| e / sum).collect()
}
