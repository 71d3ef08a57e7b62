//! Algorithmic technique classification
//!
//! Pure text heuristics over the source snippet. Each test is independent and
//! contributes at most one label; labels keep test order.

use crate::config::Language;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

static DEFINITION: OnceLock<Regex> = OnceLock::new();
static SPLITTING: OnceLock<Regex> = OnceLock::new();
static MEMOIZATION: OnceLock<Regex> = OnceLock::new();
static MIDPOINT: OnceLock<Regex> = OnceLock::new();

/// `def name(...):`, `fn name(...) {`, `function name(...) {`
fn definition_pattern() -> &'static Regex {
    DEFINITION.get_or_init(|| {
        Regex::new(r"\b(?:def|fn|function)\s+(\w+)\s*\([^\n]*?\)[^\n:{]*[:{]").expect("valid regex")
    })
}

fn splitting_pattern() -> &'static Regex {
    SPLITTING.get_or_init(|| Regex::new(r"(?i)(divid|half|metade|middle|meio|split)").expect("valid regex"))
}

fn memoization_pattern() -> &'static Regex {
    MEMOIZATION.get_or_init(|| Regex::new(r"(?i)(memo|cache|dp|table|tabela)").expect("valid regex"))
}

fn midpoint_pattern() -> &'static Regex {
    MIDPOINT.get_or_init(|| {
        Regex::new(r"(?i)(mid|meio|target|busca_binaria|binary_search|binary search)").expect("valid regex")
    })
}

fn invocation_pattern(name: &str) -> Regex {
    Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).expect("escaped name is a valid regex")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    Recursive,
    DivideAndConquer,
    DynamicProgramming,
    Iterative,
    BinarySearch,
    BruteForce,
}

impl Technique {
    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::Pt => match self {
                Technique::Recursive => "Recursivo",
                Technique::DivideAndConquer => "Dividir para Conquistar",
                Technique::DynamicProgramming => "Programação Dinâmica",
                Technique::Iterative => "Iterativo",
                Technique::BinarySearch => "Busca Binária",
                Technique::BruteForce => "Força Bruta",
            },
            Language::En => match self {
                Technique::Recursive => "Recursive",
                Technique::DivideAndConquer => "Divide and Conquer",
                Technique::DynamicProgramming => "Dynamic Programming",
                Technique::Iterative => "Iterative",
                Technique::BinarySearch => "Binary Search",
                Technique::BruteForce => "Brute Force",
            },
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Language::default()))
    }
}

/// Ordered, duplicate-free technique labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TechniqueSet(Vec<Technique>);

impl TechniqueSet {
    fn insert(&mut self, technique: Technique) {
        if !self.0.contains(&technique) {
            self.0.push(technique);
        }
    }

    pub fn contains(&self, technique: Technique) -> bool {
        self.0.contains(&technique)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Technique> {
        self.0.iter()
    }

    /// Comma-separated labels, or the "not identified" label when empty
    pub fn render(&self, language: Language) -> String {
        if self.0.is_empty() {
            return match language {
                Language::Pt => "Não identificado",
                Language::En => "not identified",
            }
            .to_string();
        }
        self.0
            .iter()
            .map(|t| t.label(language))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Does some definition in `source` invoke itself in the text after its header?
pub fn is_recursive(source: &str) -> bool {
    definition_pattern().captures_iter(source).any(|caps| {
        let (Some(header), Some(name)) = (caps.get(0), caps.get(1)) else {
            return false;
        };
        invocation_pattern(name.as_str()).is_match(&source[header.end()..])
    })
}

/// Count textual occurrences of `name(`, definition headers included.
///
/// A function that calls itself once therefore scores 2.
pub fn count_self_invocations(source: &str, name: &str) -> usize {
    invocation_pattern(name).find_iter(source).count()
}

/// Label the algorithmic techniques visible in `source`
pub fn classify(source: &str) -> TechniqueSet {
    let mut set = TechniqueSet::default();
    let recursive = is_recursive(source);
    let memoized = memoization_pattern().is_match(source);

    if recursive {
        set.insert(Technique::Recursive);
    }
    if splitting_pattern().is_match(source) && source.contains("return") && recursive {
        set.insert(Technique::DivideAndConquer);
    }
    if memoized {
        set.insert(Technique::DynamicProgramming);
    }
    if source.contains("for") || source.contains("while") {
        set.insert(Technique::Iterative);
    }
    if midpoint_pattern().is_match(source) {
        set.insert(Technique::BinarySearch);
    }
    if recursive && !memoized {
        set.insert(Technique::BruteForce);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAIVE_FIB: &str = "def f(n):\n if n<=1: return n\n return f(n-1)+f(n-2)";

    #[test]
    fn test_naive_recursion_is_brute_force() {
        let set = classify(NAIVE_FIB);
        assert!(set.contains(Technique::Recursive));
        assert!(set.contains(Technique::BruteForce));
        assert!(!set.contains(Technique::DynamicProgramming));
        assert_eq!(set.render(Language::Pt), "Recursivo, Força Bruta");
    }

    #[test]
    fn test_cache_turns_recursion_into_dp() {
        let src = "cache = {}\ndef fib(n):\n    if n in cache:\n        return cache[n]\n    cache[n] = fib(n-1) + fib(n-2)\n    return cache[n]";
        let set = classify(src);
        assert!(set.contains(Technique::Recursive));
        assert!(set.contains(Technique::DynamicProgramming));
        assert!(!set.contains(Technique::BruteForce));
    }

    #[test]
    fn test_merge_sort_is_divide_and_conquer() {
        let src = "def merge_sort(arr):\n    middle = len(arr) // 2\n    left = merge_sort(arr[:middle])\n    right = merge_sort(arr[middle:])\n    return merge(left, right)";
        let set = classify(src);
        assert!(set.contains(Technique::DivideAndConquer));
        assert!(set.contains(Technique::BinarySearch));
    }

    #[test]
    fn test_loops_are_iterative() {
        let src = "def bubble(v):\n    for i in range(len(v)):\n        pass";
        let set = classify(src);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![Technique::Iterative]);
        assert!(!set.contains(Technique::Recursive));
    }

    #[test]
    fn test_nothing_matches() {
        let set = classify("x = 1 + 2");
        assert!(set.is_empty());
        assert_eq!(set.render(Language::Pt), "Não identificado");
        assert_eq!(set.render(Language::En), "not identified");
    }

    #[test]
    fn test_labels_follow_test_order() {
        let src = "def search(arr, target):\n    while True:\n        return search(arr, target)";
        let labels: Vec<_> = classify(src).iter().copied().collect();
        assert_eq!(
            labels,
            vec![
                Technique::Recursive,
                Technique::Iterative,
                Technique::BinarySearch,
                Technique::BruteForce
            ]
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        assert_eq!(classify(NAIVE_FIB), classify(NAIVE_FIB));
    }

    #[test]
    fn test_rust_and_js_definitions_are_recognized() {
        assert!(is_recursive("fn fact(n: u64) -> u64 {\n    if n == 0 { 1 } else { n * fact(n - 1) }\n}"));
        assert!(is_recursive("function walk(node) {\n  node.children.forEach(c => walk(c));\n}"));
    }

    #[test]
    fn test_one_line_definition() {
        assert!(is_recursive("def f(n): return 1 if n == 0 else f(n - 1)"));
    }

    #[test]
    fn test_name_must_be_whole_word() {
        assert!(!is_recursive("def f(n):\n    if(n): return 0\n    return g(n)"));
    }

    #[test]
    fn test_count_self_invocations_includes_header() {
        assert_eq!(count_self_invocations(NAIVE_FIB, "f"), 3);
        let fact = "def fatorial(n):\n    return n * fatorial(n - 1)";
        assert_eq!(count_self_invocations(fact, "fatorial"), 2);
        assert_eq!(count_self_invocations("def solo(n):\n    return n", "solo"), 1);
        assert_eq!(count_self_invocations(fact, "missing"), 0);
    }

    #[test]
    fn test_english_labels() {
        assert_eq!(classify(NAIVE_FIB).render(Language::En), "Recursive, Brute Force");
    }
}
