use crate::models::question::{Label, Options};
use rand::seq::SliceRandom;
use rand::Rng;

/// Redistributes the option texts over A-D uniformly at random and returns the
/// label now holding the text that `answer` pointed to.
///
/// Duplicate texts resolve to the earliest matching label.
pub fn shuffle_options<R: Rng + ?Sized>(
    options: &Options,
    answer: Label,
    rng: &mut R,
) -> (Options, Label) {
    let correct_text = options.get(answer).to_string();

    let mut texts = options.clone().into_texts();
    texts.shuffle(rng);
    let [a, b, c, d] = texts;
    let shuffled = Options::new(a, b, c, d);

    // The correct text is one of the four, so the lookup cannot miss.
    let new_answer = shuffled.label_of(&correct_text).unwrap_or(answer);
    (shuffled, new_answer)
}
