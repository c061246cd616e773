//! Rule-based query routing.
//!
//! Two independent decisions are made for every query: whether to consult
//! web search and whether to consult uploaded documents. Each decision walks
//! an ordered rule table and takes the verdict of the first rule that fires.

/// What a rule looks for in the normalized query.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// Any phrase appears as a substring.
    Phrase(&'static [&'static str]),
    /// Some word of the query starts with a keyword.
    Keyword(&'static [&'static str]),
    /// Documents exist and the query starts with one of the prefixes.
    PrefixWithDocuments(&'static [&'static str]),
    /// Documents exist and their count is within the small-corpus threshold.
    SmallCorpus,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub condition: Condition,
    pub verdict: bool,
}

const CONVERSATIONAL: &[&str] = &[
    "how are you",
    "what do you think",
    "can you help",
    "i feel",
    "i'm feeling",
    "i am feeling",
    "i need advice",
    "what should i do",
    "how do you feel",
    "tell me about yourself",
    "who are you",
];

const EXPLICIT_SEARCH: &[&str] = &[
    "search for",
    "look up",
    "find information",
    "search the web",
    "what's the latest",
    "current news",
    "recent updates",
];

const TIME_SENSITIVE: &[&str] = &[
    "today",
    "current",
    "latest",
    "recent",
    "now",
    "update",
    "news",
    "weather",
    "price",
    "stock",
    "bitcoin",
    "crypto",
    "happened",
    "trending",
    "score",
    "result",
    "happening",
];

const FACTUAL: &[&str] = &[
    "how many",
    "how much",
    "what is the population",
    "what is the distance",
    "how far",
    "how old",
    "when was",
    "where is",
    "who is the current",
];

const DOCUMENT_REFERENCE: &[&str] = &[
    "in the document",
    "from the pdf",
    "in the pdf",
    "document says",
    "check the document",
    "in the uploaded",
    "from the uploaded",
    "the document mentions",
    "in my document",
    "in my pdf",
    "what does the document say about",
    "find in document",
    "tell me about the document",
    "summarize the document",
    "what's in the pdf",
    "what is in the document",
    "analyze the pdf",
    "analyze the document",
];

const INFORMATION_PREFIXES: &[&str] = &[
    "what is",
    "how does",
    "tell me about",
    "explain",
    "summarize",
    "what are",
    "where is",
    "who is",
    "when did",
    "why did",
    "what was",
    "how many",
    "how much",
];

/// Web rules in precedence order. A query that matches none is not searched.
pub const WEB_RULES: &[Rule] = &[
    Rule {
        name: "conversational",
        condition: Condition::Phrase(CONVERSATIONAL),
        verdict: false,
    },
    Rule {
        name: "explicit_search",
        condition: Condition::Phrase(EXPLICIT_SEARCH),
        verdict: true,
    },
    Rule {
        name: "time_sensitive",
        condition: Condition::Keyword(TIME_SENSITIVE),
        verdict: true,
    },
    Rule {
        name: "factual",
        condition: Condition::Phrase(FACTUAL),
        verdict: true,
    },
];

/// Document rules in precedence order.
pub const DOC_RULES: &[Rule] = &[
    Rule {
        name: "document_reference",
        condition: Condition::Phrase(DOCUMENT_REFERENCE),
        verdict: true,
    },
    Rule {
        name: "information_prefix",
        condition: Condition::PrefixWithDocuments(INFORMATION_PREFIXES),
        verdict: true,
    },
    Rule {
        name: "small_corpus",
        condition: Condition::SmallCorpus,
        verdict: true,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteDecision {
    pub use_web: bool,
    pub use_docs: bool,
    /// Name of the web rule that fired, `None` for the default.
    pub web_reason: Option<&'static str>,
    pub docs_reason: Option<&'static str>,
}

struct Query<'a> {
    text: &'a str,
    words: Vec<&'a str>,
}

impl<'a> Query<'a> {
    fn new(text: &'a str) -> Self {
        let words = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|w| !w.is_empty())
            .collect();
        Self { text, words }
    }

    fn has_keyword(&self, keyword: &str) -> bool {
        self.words.iter().any(|word| word.starts_with(keyword))
    }
}

#[derive(Debug, Clone)]
pub struct QueryRouter {
    small_corpus_threshold: usize,
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new(3)
    }
}

impl QueryRouter {
    #[must_use]
    pub fn new(small_corpus_threshold: usize) -> Self {
        Self {
            small_corpus_threshold,
        }
    }

    #[must_use]
    pub fn route(&self, query: &str, has_documents: bool, document_count: usize) -> RouteDecision {
        let normalized = query.trim().to_lowercase().replace('\u{2019}', "'");
        let query = Query::new(&normalized);

        let (use_web, web_reason) = self.evaluate(WEB_RULES, &query, has_documents, document_count);
        let (use_docs, docs_reason) =
            self.evaluate(DOC_RULES, &query, has_documents, document_count);

        let decision = RouteDecision {
            use_web,
            use_docs,
            web_reason,
            docs_reason,
        };
        tracing::debug!(
            use_web,
            use_docs,
            web_rule = web_reason.unwrap_or("default"),
            docs_rule = docs_reason.unwrap_or("default"),
            "routed query"
        );
        decision
    }

    fn evaluate(
        &self,
        rules: &[Rule],
        query: &Query<'_>,
        has_documents: bool,
        document_count: usize,
    ) -> (bool, Option<&'static str>) {
        rules
            .iter()
            .find(|rule| self.matches(rule.condition, query, has_documents, document_count))
            .map_or((false, None), |rule| (rule.verdict, Some(rule.name)))
    }

    fn matches(
        &self,
        condition: Condition,
        query: &Query<'_>,
        has_documents: bool,
        document_count: usize,
    ) -> bool {
        match condition {
            Condition::Phrase(phrases) => phrases.iter().any(|p| query.text.contains(p)),
            Condition::Keyword(keywords) => keywords.iter().any(|k| query.has_keyword(k)),
            Condition::PrefixWithDocuments(prefixes) => {
                has_documents && prefixes.iter().any(|p| query.text.starts_with(p))
            }
            Condition::SmallCorpus => {
                has_documents && document_count <= self.small_corpus_threshold
            }
        }
    }
}
