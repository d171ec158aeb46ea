use super::corpus::KnowledgeCorpus;

/// Lowercased whitespace-separated words of a query.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Corpus lines containing any query word as a case-insensitive substring,
/// in corpus order.
pub fn matching_lines<'a>(query: &str, corpus: &'a KnowledgeCorpus) -> Vec<&'a str> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    corpus
        .lines()
        .filter(|line| {
            let lowered = line.to_lowercase();
            terms.iter().any(|term| lowered.contains(term.as_str()))
        })
        .collect()
}

/// Facts used to ground a reply: the matching lines, or the whole corpus text
/// when no line matches.
pub fn retrieve(query: &str, corpus: &KnowledgeCorpus) -> String {
    let matched = matching_lines(query, corpus);
    if matched.is_empty() {
        corpus.text().to_string()
    } else {
        matched.join("\n")
    }
}
