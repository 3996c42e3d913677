use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Fold text for matching: lowercase, decompose, drop combining marks.
/// `"Samaná"` and `"SAMANA"` both fold to `"samana"`. Lowercasing first
/// strips marks that lowercasing itself adds (`İ` becomes `i̇`).
pub fn fold(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Whitespace-separated folded tokens of a query. Empty query ⇒ no tokens.
pub fn query_tokens(query: &str) -> Vec<String> {
    fold(query).split_whitespace().map(str::to_string).collect()
}

/// Name comparison for display: accents and case are secondary differences,
/// so `"Ávila"` sorts next to `"avila"` rather than after `"Zona"`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Names as the workbook compares them: case-insensitive across Unicode
/// after NFKC normalization.
pub fn names_eq_case_insensitive(a: &str, b: &str) -> bool {
    a.nfkc()
        .flat_map(|c| c.to_uppercase())
        .eq(b.nfkc().flat_map(|c| c.to_uppercase()))
}

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.split('\t')
        .enumerate()
        .map(|(i, part)| {
            let w = UnicodeWidthStr::width(part);
            if i > 0 { w + 4 } else { w }
        })
        .sum()
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells <= 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = grapheme_display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Remove the last grapheme cluster (input-field backspace)
pub fn pop_grapheme(s: &mut String) {
    if let Some((idx, _)) = s.grapheme_indices(true).next_back() {
        s.truncate(idx);
    }
}

/// Display width of a grapheme cluster.
fn grapheme_display_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── fold / tokens ──────────────────────────────────────────────

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("Samaná"), "samana");
        assert_eq!(fold("PEÑA"), "pena");
        assert_eq!(fold("Cancelado"), "cancelado");
    }

    #[test]
    fn fold_dotted_capital_i() {
        assert_eq!(fold("İstanbul"), "istanbul");
        assert_eq!(fold("İSTANBUL 05.03"), fold("istanbul 05.03"));
    }

    #[test]
    fn fold_precomposed_and_combining_agree() {
        assert_eq!(fold("caf\u{e9}"), fold("cafe\u{0301}"));
    }

    #[test]
    fn tokens_split_on_whitespace() {
        assert_eq!(query_tokens("  Marzo   PUNTA cana "), vec!["marzo", "punta", "cana"]);
        assert!(query_tokens("   ").is_empty());
    }

    // ── comparisons ────────────────────────────────────────────────

    #[test]
    fn compare_names_ignores_accents_first() {
        assert_eq!(compare_names("Ávila", "Zona"), Ordering::Less);
        assert_eq!(compare_names("avila", "Ávila"), Ordering::Less);
        assert_eq!(compare_names("b", "B"), Ordering::Greater);
    }

    #[test]
    fn names_eq_unicode_case() {
        assert!(names_eq_case_insensitive("Tour 05.03", "TOUR 05.03"));
        assert!(names_eq_case_insensitive("straße", "STRASSE"));
        assert!(!names_eq_case_insensitive("Tour 1", "Tour 2"));
    }

    // ── display_width ──────────────────────────────────────────────

    #[test]
    fn display_width_mixed() {
        assert_eq!(display_width("hello你好"), 9);
    }

    #[test]
    fn display_width_combining() {
        assert_eq!(display_width("cafe\u{0301}"), 4);
    }

    #[test]
    fn display_width_tab() {
        assert_eq!(display_width("a\tb"), 6);
    }

    // ── truncate_to_width ──────────────────────────────────────────

    #[test]
    fn truncate_exact_fit() {
        assert_eq!(truncate_to_width("hello", 5), "hello");
    }

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("hello world", 8), "hello w\u{2026}");
    }

    #[test]
    fn truncate_tiny_budgets() {
        assert_eq!(truncate_to_width("hello", 0), "");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
    }

    // ── pop_grapheme ───────────────────────────────────────────────

    #[test]
    fn pop_grapheme_removes_whole_cluster() {
        let mut s = String::from("cafe\u{0301}");
        pop_grapheme(&mut s);
        assert_eq!(s, "caf");
        let mut empty = String::new();
        pop_grapheme(&mut empty);
        assert_eq!(empty, "");
    }
}
