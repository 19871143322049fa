//----------------------------------------
// Equivalent score computation
//----------------------------------------

/// Expected outcome score at a dose: sum over categories of probability
/// times severity/response weight.
pub fn equivalent_score(category_prob: &[f64], weight: &[f64]) -> f64 {
    category_prob
        .iter()
        .zip(weight.iter())
        .map(|(p, w)| p * w)
        .sum()
}

pub fn max_weight(weight: &[f64]) -> f64 {
    weight.iter().cloned().fold(f64::MIN, f64::max)
}

/// Equivalent score divided by the maximum attainable weight, landing on the
/// same [0, 1] scale as the decision boundaries (nETS / nEES).
pub fn normalized_equivalent_score(category_prob: &[f64], weight: &[f64]) -> f64 {
    equivalent_score(category_prob, weight) / max_weight(weight)
}

/// A single patient's normalized contribution given the drawn category.
pub fn patient_score(category: usize, weight: &[f64]) -> f64 {
    weight[category] / max_weight(weight)
}
