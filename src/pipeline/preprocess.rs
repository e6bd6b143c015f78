//! Preprocessing: raw OCR text → prompt text.
//!
//! Line 0 is taken as the question and every later line as an answer
//! option. Nothing checks that the OCR engine actually segmented the
//! screenshot that way; a question that wraps onto two lines simply
//! contributes its second half as an "option", and the model copes.

use crate::config::OptionLabels;

/// Reassemble OCR text into `question\noption\noption…`.
///
/// With [`OptionLabels::None`] the options are copied through unchanged,
/// so the output equals the input for any text containing at least one
/// newline. Empty input yields `"\n"` (an empty question, no options).
///
/// With a labelling mode, blank option lines are dropped and each remaining
/// option gets its label prefix.
pub fn preprocess(raw: &str, labels: OptionLabels) -> String {
    let mut lines = raw.split('\n');
    let question = lines.next().unwrap_or_default();

    let options: Vec<String> = match labels {
        OptionLabels::None => lines.map(str::to_string).collect(),
        _ => lines
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| format!("{}{}", labels.label(i).unwrap_or_default(), line))
            .collect(),
    };

    format!("{}\n{}", question, options.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlabelled_is_pass_through() {
        let raw = "What is 2+2?\n3\n4\n5";
        assert_eq!(preprocess(raw, OptionLabels::None), raw);
    }

    #[test]
    fn empty_text_is_empty_question() {
        assert_eq!(preprocess("", OptionLabels::None), "\n");
    }

    #[test]
    fn question_only_gets_trailing_newline() {
        assert_eq!(preprocess("Just a question?", OptionLabels::None), "Just a question?\n");
    }

    #[test]
    fn trailing_blank_lines_survive_unlabelled() {
        let raw = "Q?\nA\nB\n\n";
        assert_eq!(preprocess(raw, OptionLabels::None), raw);
    }

    #[test]
    fn letters_label_non_blank_options() {
        let raw = "Capital of France?\nLondon\n\nParis\nBerlin\n";
        assert_eq!(
            preprocess(raw, OptionLabels::Letters),
            "Capital of France?\nA. London\nB. Paris\nC. Berlin"
        );
    }

    #[test]
    fn numbers_label_options() {
        assert_eq!(
            preprocess("What is 2+2?\n3\n4\n5", OptionLabels::Numbers),
            "What is 2+2?\n1. 3\n2. 4\n3. 5"
        );
    }

    #[test]
    fn labelled_empty_text() {
        assert_eq!(preprocess("", OptionLabels::Letters), "\n");
    }
}
