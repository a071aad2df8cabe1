use std::sync::OnceLock;
use tiktoken_rs::{cl100k_base, CoreBPE};

// Global tokenizer for Claude (cl100k_base)
static TOKENIZER: OnceLock<CoreBPE> = OnceLock::new();

/// Get the global Claude tokenizer instance (cl100k_base)
fn get_tokenizer() -> &'static CoreBPE {
    TOKENIZER.get_or_init(|| {
        cl100k_base().expect("Failed to initialize Claude tokenizer")
    })
}

/// Count the number of tokens in a text using Claude's tokenizer
pub fn count_tokens(text: &str) -> usize {
    let tokenizer = get_tokenizer();
    tokenizer.encode_ordinary(text).len()
}

/// Format a token count in a human-readable way
pub fn format_token_count(count: usize) -> String {
    match count {
        0 => "0 tokens".to_string(),
        1 => "1 token".to_string(),
        _ => format!("{} tokens", count),
    }
}
