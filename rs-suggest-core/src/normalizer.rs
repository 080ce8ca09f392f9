//! Text cleaning applied to every phrase before it is split into words.

/// Characters stripped in the second pass.
///
/// ASCII punctuation, the Arabic comma and semicolon, and the guillemets.
const PUNCTUATION: &[char] = &[
	':', ',', '"', '\'', '~', '.', '<', '>', '{', '}', '،', ';', '؛', '(', ')', '«', '»',
];

/// Arabic yeh (U+064A).
const ARABIC_YEH: char = 'ي';

/// Persian yeh (U+06CC).
const PERSIAN_YEH: char = 'ی';

/// Normalizes a phrase.
///
/// Applied in this order:
/// 1. ASCII digits are removed
/// 2. the `PUNCTUATION` set is removed
/// 3. Arabic yeh is rewritten to Persian yeh
///
/// No case folding and no whitespace collapsing is done.
pub fn normalize(text: &str) -> String {
	text.chars()
		.filter(|c| !c.is_ascii_digit())
		.filter(|c| !PUNCTUATION.contains(c))
		.map(|c| if c == ARABIC_YEH { PERSIAN_YEH } else { c })
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_digits_and_punctuation() {
		assert_eq!(normalize("این 123 یک: جمله!"), "این  یک جمله!");
	}

	#[test]
	fn maps_arabic_yeh_to_persian_yeh() {
		assert_eq!(normalize("علي"), "علی");
		assert_eq!(normalize("يک"), "یک");
	}

	#[test]
	fn removes_the_whole_punctuation_set() {
		assert_eq!(normalize(":,\"'~.<>{}،;؛()«»"), "");
		assert_eq!(normalize("«سلام»، (دنیا)"), "سلام دنیا");
	}

	#[test]
	fn keeps_case_and_whitespace() {
		assert_eq!(normalize("Hello  World\t2024"), "Hello  World\t");
	}

	#[test]
	fn non_ascii_digits_are_kept() {
		// Only 0-9 are removed
		assert_eq!(normalize("۱۲۳"), "۱۲۳");
	}
}
