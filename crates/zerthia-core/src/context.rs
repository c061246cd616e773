//! Prompt assembly for each response strategy.

use chrono::NaiveDate;
use zerthia_llm::Message;

/// Greeting placed at the top of every new session transcript.
pub const DEFAULT_GREETING: &str = "Hi, I'm Zea, your AI companion from Zerthia, where empathy \
meets intelligence. You can chat with me or upload your documents (PDF, DOCX, TXT, PPTX, PPT, CSV) \
for grounded answers. For more, visit www.syntheim.com";

/// Build the persona system prompt for `name`, pinned to `today`.
#[must_use]
pub fn persona_prompt(name: &str, today: NaiveDate) -> String {
    let date = today.format("%Y-%m-%d");
    format!(
        "You are {name}, an expert AI companion with emotional intelligence, web search and \
document analysis capabilities, created by SYNTHEIM.

Today's date is {date}.

Core capabilities:
1. Detect the user's emotional state and adapt your tone to it
2. Concise, accurate answers tailored to what the user needs
3. Real-time information retrieval through web search when necessary
4. Question answering over documents the user has uploaded

When responding:
- Use web search results or document results whenever they are provided and relevant
- Summarize retrieved information in your own words
- Cite web results as \"Source 1\", \"Source 2\" with their links, and documents by name
- Never claim you cannot access links, real-time data, or uploaded documents
- For questions about dates or current events, reference today's date: {date}
- If provided results are not relevant to the query, answer from your training instead
- If a document lacks the requested information, say so plainly

Most conversational queries need neither web search nor documents."
    )
}

/// System instructions that wrap document evidence.
#[must_use]
pub fn document_instructions(evidence: &str) -> String {
    format!(
        "IMPORTANT: You have access to information extracted from documents the user has \
uploaded.

Guidelines:
1. Use this document information to answer the user's query
2. Never say you cannot access document content; it is shown below
3. If the information does not answer the query, state \"The uploaded documents don't contain \
information about [specific topic]\"
4. Cite the specific document names you draw from
5. Be specific about which parts of the documents you are using
6. Present information clearly and concisely
7. Do not make up information that is not in the documents

Here is the document information:

{evidence}"
    )
}

/// System instructions that wrap web search evidence.
#[must_use]
pub fn search_instructions(evidence: &str) -> String {
    format!(
        "IMPORTANT: You have access to recent web search results about the user's query.

Guidelines:
1. Judge whether the search results are relevant to the query
2. If relevant, synthesize them into an accurate, up-to-date answer
3. If not relevant, ignore them and rely on your training
4. Cite sources as \"Source 1\", \"Source 2\" and include their links
5. Acknowledge conflicting information and present the differing views
6. Present information clearly and concisely
7. Never claim you cannot access real-time data or the internet

Here are the search results:

{evidence}"
    )
}

/// `[persona, instructions, query]` for an evidence-backed turn.
#[must_use]
pub fn evidence_messages(persona: &str, instructions: String, query: &str) -> Vec<Message> {
    vec![
        Message::system(persona),
        Message::system(instructions),
        Message::user(query),
    ]
}

/// `[persona] + transcript` for a base-knowledge turn.
#[must_use]
pub fn transcript_messages(persona: &str, transcript: &[Message]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    messages.push(Message::system(persona));
    messages.extend_from_slice(transcript);
    messages
}

#[cfg(test)]
mod tests {
    use zerthia_llm::Role;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    #[test]
    fn persona_names_assistant_and_date() {
        let prompt = persona_prompt("Zerthia", date());
        assert!(prompt.starts_with("You are Zerthia,"));
        assert!(prompt.contains("Today's date is 2025-03-20."));
    }

    #[test]
    fn persona_uses_configured_name() {
        assert!(persona_prompt("Zea", date()).starts_with("You are Zea,"));
    }

    #[test]
    fn document_instructions_end_with_evidence() {
        let text = document_instructions("Document 1: notes.txt\nContent: hi");
        assert!(text.ends_with("Here is the document information:\n\nDocument 1: notes.txt\nContent: hi"));
    }

    #[test]
    fn search_instructions_end_with_evidence() {
        let text = search_instructions("Source 1: Title");
        assert!(text.ends_with("Here are the search results:\n\nSource 1: Title"));
    }

    #[test]
    fn evidence_messages_shape() {
        let msgs = evidence_messages("persona", search_instructions("e"), "q");
        let roles: Vec<_> = msgs.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::System, Role::System, Role::User]);
        assert_eq!(msgs[2].content, "q");
    }

    #[test]
    fn transcript_messages_prepend_persona_only() {
        let transcript = vec![Message::assistant("hello"), Message::user("hi there")];
        let msgs = transcript_messages("persona", &transcript);
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0], Message::system("persona"));
        assert_eq!(&msgs[1..], transcript.as_slice());
    }
}
