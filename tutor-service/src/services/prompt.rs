use super::tutor::Query;

/// Render the tutoring prompt sent to the provider.
pub fn build_prompt(query: &Query) -> String {
    format!(
        r#"
You are an expert ICSE Class 10 tutor.

Subject: {subject}
Chapter: {chapter}

Student Question:
"""{question}"""

Explain step-by-step in simple language with ICSE-style solution.
"#,
        subject = query.subject,
        chapter = query.chapter,
        question = query.question,
    )
}
