use strsim::levenshtein;

/// Return up to three candidates close to `target`, closest first.
///
/// Short names (three characters or fewer) allow one edit, longer names
/// two. Candidates at equal distance keep alphabetical order.
pub fn compute_suggestions<'c>(
    target: &str,
    candidates: impl IntoIterator<Item = &'c str>,
) -> Vec<String> {
    let max_distance = if target.chars().count() <= 3 { 1 } else { 2 };

    let mut close: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|candidate| *candidate != target)
        .map(|candidate| (levenshtein(target, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    close.sort_unstable();
    close.dedup();

    close
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
