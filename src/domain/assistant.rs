//! Rule-based farming assistant

/// Canned answers keyed by the keyword that triggers them, checked in order
const FAQ: &[(&str, &str)] = &[
    (
        "fertilizer",
        "For leafy crops, use nitrogen-rich fertilizers like urea. For fruiting crops, add potassium-based fertilizers.",
    ),
    (
        "pest",
        "Use neem oil spray or organic pesticides to control common pests.",
    ),
    (
        "irrigation",
        "Drip irrigation saves water and improves crop yield compared to flood irrigation.",
    ),
    (
        "wheat",
        "Wheat grows best in cool weather with well-drained loamy soil.",
    ),
    (
        "rice",
        "Rice requires standing water and clayey soil with proper drainage.",
    ),
];

/// Answers a farmer's question from the FAQ, or points them to an officer
pub fn reply_to(message: &str) -> String {
    let message = message.to_lowercase();

    FAQ.iter()
        .find(|(keyword, _)| message.contains(keyword))
        .map(|(_, answer)| answer.to_string())
        .unwrap_or_else(|| {
            format!(
                "I'm not sure about that. Please consult your local agriculture officer for: {}",
                message
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert!(reply_to("How do I handle PESTS?").starts_with("Use neem oil"));
    }

    #[test]
    fn test_first_keyword_wins() {
        assert!(reply_to("fertilizer for rice").starts_with("For leafy crops"));
    }

    #[test]
    fn test_fallback_echoes_message() {
        assert_eq!(
            reply_to("Best Mango variety"),
            "I'm not sure about that. Please consult your local agriculture officer for: best mango variety"
        );
    }
}
