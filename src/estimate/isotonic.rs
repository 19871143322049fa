/// Weighted pooled-adjacent-violators regression under a non-decreasing
/// constraint. Returns the fitted values in input order.
pub fn pava_isotonic(values: &[f64], weights: &[f64]) -> Vec<f64> {
    // (mean, weight, run length) per merged block
    let mut blocks: Vec<(f64, f64, usize)> = Vec::with_capacity(values.len());
    for (&value, &weight) in values.iter().zip(weights.iter()) {
        blocks.push((value, weight.max(1e-12), 1));
        while blocks.len() > 1 {
            let last = blocks.len() - 1;
            if blocks[last - 1].0 <= blocks[last].0 {
                break;
            }
            let (v2, w2, c2) = blocks.pop().expect("block stack underflow");
            let (v1, w1, c1) = blocks.pop().expect("block stack underflow");
            let w = w1 + w2;
            blocks.push(((v1 * w1 + v2 * w2) / w, w, c1 + c2));
        }
    }
    blocks
        .iter()
        .flat_map(|&(v, _, c)| std::iter::repeat_n(v, c))
        .collect()
}
