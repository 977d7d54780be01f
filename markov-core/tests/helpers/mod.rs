#![allow(dead_code)]

use markov_core::MarkovModel;
use markov_core::model::vocabulary::WordId;
use markov_core::model::word_chain::WordChain;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Build a model from several independent messages.
pub fn model_of(messages: &[&str]) -> MarkovModel {
	let model = MarkovModel::new();
	for message in messages {
		model.ingest(message).unwrap();
	}
	model
}

/// Deterministic random source for generation tests.
pub fn seeded(seed: u64) -> StdRng {
	StdRng::seed_from_u64(seed)
}

/// Start words of `chain` as sorted text.
pub fn start_texts(chain: &WordChain) -> Vec<String> {
	let mut words: Vec<String> = chain
		.start_words()
		.iter()
		.map(|id| text(chain, *id))
		.collect();
	words.sort();
	words
}

pub fn text(chain: &WordChain, id: WordId) -> String {
	chain.vocabulary().text_of(id).unwrap().to_owned()
}
