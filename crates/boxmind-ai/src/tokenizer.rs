//! Retrieval tokenizer.
//!
//! Technical artifacts (CVE ids, IPs, `port/proto` pairs, paths, hashes,
//! hostnames) are extracted from the original text first so they survive as
//! atomic terms, then the text is tokenized generically. Technical tokens come
//! first in the output; duplicates keep their first position.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Technical-artifact extractors, applied in this order.
///
/// Word boundaries are ASCII-only: accented letters count as separators.
static TECHNICAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // CVE-2021-41773
        r"(?i)(?-u:\b)CVE-[0-9]{4}-[0-9]{4,}(?-u:\b)",
        // IPv4, optional CIDR suffix
        r"(?-u:\b)(?:[0-9]{1,3}\.){3}[0-9]{1,3}(?:/[0-9]{1,2})?(?-u:\b)",
        // 22/tcp, 161/udp
        r"(?i)(?-u:\b)[0-9]{1,5}/(?:tcp|udp)(?-u:\b)",
        // /etc/passwd, /var/www/html
        r"(?:/[A-Za-z0-9_.\-]+){2,}",
        // md5 .. sha256
        r"(?i)(?-u:\b)[a-f0-9]{32,64}(?-u:\b)",
        // hostnames
        r"(?i)(?-u:\b)[A-Za-z0-9_.\-]+\.(?:htb|local|internal|corp|com|net|org)(?-u:\b)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("technical token pattern is valid"))
    .collect()
});

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // en
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "do", "does", "did", "will", "would", "could", "should", "may", "might", "shall", "can",
        "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through",
        "during", "before", "after", "above", "below", "between", "out", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
        "each", "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
        "only", "own", "same", "so", "than", "too", "very", "just", "because", "but", "and", "or",
        "if", "while", "about", "up", "it", "its", "this", "that", "these", "those", "i", "me",
        "my", "we", "our", "you", "your", "he", "him", "his", "she", "her", "they", "them",
        "their", "what", "which", "who", "whom",
        // fr
        "le", "la", "les", "un", "une", "des", "du", "de", "et", "est", "en", "que", "qui",
        "dans", "pour", "pas", "sur", "ce", "il", "ne", "se", "au", "aux", "avec", "son", "sa",
        "ses", "ou", "mais", "par", "je", "tu", "nous", "vous", "ils", "elles", "fait", "comme",
        "tout", "plus", "aussi", "bien", "peut", "donc", "car", "ni", "si", "cette", "ces",
        "avoir",
    ]
    .into_iter()
    .collect()
});

const MIN_TOKEN_CHARS: usize = 2;

fn is_generic_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '/' | ':' | '-')
}

/// Technical artifacts found in `text`, lower-cased, in extractor order.
fn technical_tokens(text: &str) -> Vec<String> {
    TECHNICAL_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| t.len() >= MIN_TOKEN_CHARS)
        .collect()
}

/// Generic word tokens: lower-cased, punctuation outside `[a-z0-9._/:-]` split,
/// short words and stop words dropped.
fn generic_tokens(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_generic_token_char(c) { c } else { ' ' })
        .collect();

    normalized
        .split_whitespace()
        .filter(|w| w.len() >= MIN_TOKEN_CHARS && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Turn free text into an ordered list of unique lowercase tokens.
///
/// Total over any input, including the empty string.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    technical_tokens(text)
        .into_iter()
        .chain(generic_tokens(text))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_cve_kept_atomic_and_first() {
        let tokens = tokenize("Apache vulnerable to CVE-2021-41773 path traversal");
        assert_eq!(tokens[0], "cve-2021-41773");
        assert!(tokens.contains(&"apache".to_string()));
        assert!(tokens.contains(&"traversal".to_string()));
    }

    #[test]
    fn test_ip_with_cidr_and_ports() {
        let tokens = tokenize("Scan 10.10.11.0/24 found 22/tcp and 161/UDP open");
        assert!(tokens.contains(&"10.10.11.0/24".to_string()));
        assert!(tokens.contains(&"22/tcp".to_string()));
        assert!(tokens.contains(&"161/udp".to_string()));
    }

    #[test]
    fn test_paths_hashes_and_domains() {
        let hash = "5f4dcc3b5aa765d61d8327deb882cf99";
        let text = format!("Read /etc/passwd on dev.box.htb, hash {hash}");
        let tokens = tokenize(&text);
        assert!(tokens.contains(&"/etc/passwd".to_string()));
        assert!(tokens.contains(&"dev.box.htb".to_string()));
        assert!(tokens.contains(&hash.to_string()));
    }

    #[test]
    fn test_single_segment_path_is_not_technical() {
        let tokens = technical_tokens("cd /tmp");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_technical_tokens_precede_generic_tokens() {
        let tokens = tokenize("login admin at 10.0.0.1");
        assert_eq!(tokens, vec!["10.0.0.1", "login", "admin"]);
    }

    #[test]
    fn test_stop_words_and_short_words_dropped() {
        let tokens = tokenize("The user is in a shell and le shell est root x");
        assert_eq!(tokens, vec!["user", "shell", "root"]);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let tokens = tokenize("ssh SSH ssh openssh ssh");
        assert_eq!(tokens, vec!["ssh", "openssh"]);
    }

    #[test]
    fn test_non_ascii_and_binary_looking_input_is_total() {
        let tokens = tokenize("été résumé \u{0}\u{1b}[31m naïve ñ 漢字 \u{fffd}");
        assert!(tokens.iter().all(|t| t.len() >= 2));
        let _ = tokenize(&String::from_utf8_lossy(&[0xff, 0xfe, 0x00, 0x41, 0x42]));
    }

    #[test]
    fn test_french_stop_words_dropped() {
        let tokens = tokenize("il faut avoir le mot de passe");
        assert_eq!(tokens, vec!["faut", "mot", "passe"]);
    }

    #[test]
    fn test_accented_letters_are_boundaries() {
        assert_eq!(technical_tokens("ñdev.box.htb"), vec!["dev.box.htb"]);
        assert_eq!(technical_tokens("éCVE-2021-41773é"), vec!["cve-2021-41773"]);
        assert_eq!(technical_tokens("port 22/tcpé"), vec!["22/tcp"]);
    }

    #[test]
    fn test_punctuation_splits_generic_words() {
        let tokens = tokenize("user=admin;password=hunter2");
        assert_eq!(tokens, vec!["user", "admin", "password", "hunter2"]);
    }
}
