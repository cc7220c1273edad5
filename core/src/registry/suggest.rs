//! "Did you mean" suggestions for mistyped runner names.

/// Find names similar to `query` (edit distance at most 3), closest first.
///
/// Returns at most three names.
pub fn find_similar<'a, I>(query: &str, names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    const DISTANCE_THRESHOLD: usize = 3;

    let mut matches: Vec<(String, usize)> = names
        .into_iter()
        .map(|name| (name.to_string(), levenshtein_distance(query, name)))
        .filter(|(_, dist)| *dist <= DISTANCE_THRESHOLD)
        .collect();

    // Stable, so ties keep registry order
    matches.sort_by_key(|(_, dist)| *dist);
    matches.into_iter().take(3).map(|(name, _)| name).collect()
}

/// Levenshtein distance between two strings, by character.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let chars1: Vec<char> = s1.chars().collect();
    let chars2: Vec<char> = s2.chars().collect();

    if chars1.is_empty() {
        return chars2.len();
    }
    if chars2.is_empty() {
        return chars1.len();
    }

    // Two rows are enough
    let mut prev: Vec<usize> = (0..=chars2.len()).collect();
    let mut curr = vec![0; chars2.len() + 1];

    for (i, c1) in chars1.iter().enumerate() {
        curr[0] = i + 1;
        for (j, c2) in chars2.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[chars2.len()]
}
