//! Edit distances and fuzzy tolerance rules

/// Edit budget derived from token length alone
///
/// Short tokens must match exactly, medium tokens tolerate one edit and
/// longer ones two.
pub fn auto_max_edits(token: &str) -> u32 {
    match token.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Effective edit budget for a query token
pub fn max_edits_for(token: &str, configured: u32) -> u32 {
    auto_max_edits(token).min(configured)
}

/// Similarity in `[0, 1]` of a term at `distance` edits from the query token
///
/// An exact match scores 1.0.
pub fn similarity(query: &str, term: &str, distance: usize) -> f32 {
    if distance == 0 {
        return 1.0;
    }
    let shorter = query.chars().count().min(term.chars().count());
    if shorter == 0 {
        return 0.0;
    }
    (1.0 - distance as f32 / shorter as f32).max(0.0)
}

/// Damerau distance if it is within `max_edits`, cheap length check first
pub fn bounded_distance(query: &str, term: &str, max_edits: u32) -> Option<usize> {
    let max = max_edits as usize;
    let len_q = query.chars().count();
    let len_t = term.chars().count();
    if len_q.abs_diff(len_t) > max {
        return None;
    }
    let distance = damerau_levenshtein_distance(query, term);
    (distance <= max).then_some(distance)
}

/// Calculate Damerau-Levenshtein distance (optimal string alignment)
///
/// Like Levenshtein, but an adjacent transposition counts as one edit.
pub fn damerau_levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);

            // Transposition
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                matrix[i][j] = matrix[i][j].min(matrix[i - 2][j - 2] + 1);
            }
        }
    }

    matrix[a.len()][b.len()]
}
