use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Characters that make up a word: ASCII alphanumerics, `&`, `#`, Arabic and
/// Cyrillic script, and the emoji / miscellaneous symbol blocks.
const WORD_CHARS: &str = r"&#a-zA-Z0-9\p{Arabic}\p{Cyrillic}\x{1F000}-\x{1FFFF}\x{2600}-\x{26FF}";

/// Punctuation kept by the character filter on top of `WORD_CHARS`.
const KEPT_PUNCTUATION: &str = r"\-.:/\\!,<>@_*?='";

/// Abbreviations whose trailing full stop does not end a sentence.
pub const HONORIFICS: [&str; 7] = ["Dr.", "Mrs.", "Ms.", "Prof.", "Rev.", "Sr.", "St."];

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
	compile(&format!("[^{WORD_CHARS}{KEPT_PUNCTUATION}]"))
});
static EXCLAMATIONS: LazyLock<Regex> = LazyLock::new(|| compile(r"!+"));
static QUESTIONS: LazyLock<Regex> = LazyLock::new(|| compile(r"\?+"));
static COMMAS: LazyLock<Regex> = LazyLock::new(|| compile(&format!("([{WORD_CHARS}]+),+")));
static FULL_STOPS: LazyLock<Regex> = LazyLock::new(|| {
	compile(&format!(r"([{WORD_CHARS}]+)\.(\s|$)"))
});

fn compile(pattern: &str) -> Regex {
	// Patterns are compile-time constants; a failure here is a programming error.
	Regex::new(pattern).unwrap_or_else(|e| panic!("invalid tokenizer pattern {pattern:?}: {e}"))
}

/// Returns `true` if `word` is one of the protected abbreviations.
pub fn is_honorific(word: &str) -> bool {
	HONORIFICS.contains(&word)
}

/// Splits raw text into normalized tokens.
///
/// Pipeline, in order:
/// 1. characters outside the allow-list become spaces
/// 2. runs of `!` become a single standalone `!`
/// 3. runs of `?` become a single standalone `?`
/// 4. commas trailing a word become a standalone `,`
/// 5. a full stop trailing a word (before whitespace or end of input) becomes
///    a standalone `.`, unless the word is an honorific such as `Dr.`
/// 6. whitespace split, empty tokens discarded
pub fn normalize(input: &str) -> Vec<String> {
	let text = DISALLOWED.replace_all(input, " ");
	let text = EXCLAMATIONS.replace_all(&text, " ! ");
	let text = QUESTIONS.replace_all(&text, " ? ");
	let text = COMMAS.replace_all(&text, "$1 , ");
	let text = FULL_STOPS.replace_all(&text, |caps: &Captures| {
		let word = &caps[1];
		if is_honorific(&format!("{word}.")) {
			caps[0].to_owned()
		} else {
			format!("{word} . {}", &caps[2])
		}
	});

	text.split_whitespace().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(input: &str) -> Vec<String> {
		normalize(input)
	}

	#[test]
	fn splits_sentence_stops() {
		assert_eq!(tokens("Cats run. Dogs jump."), vec!["Cats", "run", ".", "Dogs", "jump", "."]);
	}

	#[test]
	fn keeps_honorifics_intact() {
		assert_eq!(
			tokens("I saw Dr. Smith today."),
			vec!["I", "saw", "Dr.", "Smith", "today", "."]
		);
		assert_eq!(tokens("Ask Mrs. Jones"), vec!["Ask", "Mrs.", "Jones"]);
	}

	#[test]
	fn every_honorific_stays_one_token() {
		let honorifics = ["Dr.", "Mrs.", "Ms.", "Prof.", "Rev.", "Sr.", "St."];
		assert_eq!(HONORIFICS.len(), honorifics.len());
		for honorific in honorifics {
			assert!(is_honorific(honorific), "{honorific} is not protected");
			assert_eq!(tokens(&format!("Ask {honorific} Smith")), vec!["Ask", honorific, "Smith"]);
			assert_eq!(tokens(&format!("It was {honorific}")), vec!["It", "was", honorific]);
		}
		// Anything else before a space is a sentence stop.
		assert_eq!(tokens("Ask Mr. Smith"), vec!["Ask", "Mr", ".", "Smith"]);
	}

	#[test]
	fn collapses_exclamation_and_question_runs() {
		assert_eq!(tokens("wow!!! really???"), vec!["wow", "!", "really", "?"]);
		assert_eq!(tokens("Hello!"), vec!["Hello", "!"]);
	}

	#[test]
	fn isolates_commas() {
		assert_eq!(tokens("red, green,, blue"), vec!["red", ",", "green", ",", "blue"]);
	}

	#[test]
	fn replaces_disallowed_characters_with_spaces() {
		assert_eq!(tokens("tab\there;semi\"quote"), vec!["tab", "here", "semi", "quote"]);
		assert_eq!(tokens("(paren)"), vec!["paren"]);
	}

	#[test]
	fn keeps_allowed_scripts_and_symbols() {
		assert_eq!(tokens("привет мир"), vec!["привет", "мир"]);
		assert_eq!(tokens("مرحبا"), vec!["مرحبا"]);
		assert_eq!(tokens("nice 🎉 ☀"), vec!["nice", "🎉", "☀"]);
		assert_eq!(tokens("don't @me <3"), vec!["don't", "@me", "<3"]);
	}

	#[test]
	fn inner_dots_are_not_sentence_stops() {
		assert_eq!(tokens("visit example.com now"), vec!["visit", "example.com", "now"]);
	}

	#[test]
	fn punctuation_only_input_yields_bare_tokens() {
		assert_eq!(tokens("!!! ,"), vec!["!", ","]);
		assert!(tokens("   ").is_empty());
		assert!(tokens("%%%").is_empty());
	}
}
