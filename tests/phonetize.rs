use std::collections::HashSet;
use std::path::PathBuf;

use dictphon::phonetization::dag::compose;
use dictphon::phonetization::{
    GuessError, MappingTable, PhonStatus, PhonToken, PhonetizationError, Phonetizer,
    PronunciationDictionary, Result, SubstringGuesser, UNKNOWN_STAMP,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/phonetization")
        .join(name)
}

fn english() -> Result<PronunciationDictionary> {
    PronunciationDictionary::load(&fixture_path("eng.dict"))
}

#[test]
fn dictionary_hits_and_misses_end_to_end() -> Result<()> {
    let dictionary = PronunciationDictionary::from_pronunciations([("hello", "h-ɛ-l-o")])?;
    let phonetizer = Phonetizer::builder(&dictionary).build();

    let tokens = phonetizer.phonetize_tokens(["hello", "xyz"], false);
    assert_eq!(
        tokens,
        vec![
            PhonToken::new("hello", "h-ɛ-l-o", PhonStatus::Ok),
            PhonToken::new("xyz", UNKNOWN_STAMP, PhonStatus::Error),
        ]
    );
    Ok(())
}

#[test]
fn every_dictionary_entry_is_an_ok_hit() -> Result<()> {
    let dictionary = english()?;
    let phonetizer = Phonetizer::builder(&dictionary).build();
    for entry in ["hello", "good", "bye", "the", "sun", "flower"] {
        let token = &phonetizer.phonetize_tokens([entry], false)[0];
        assert_eq!(token.status, PhonStatus::Ok, "{entry}");
        assert_ne!(token.phon, UNKNOWN_STAMP);
        assert_eq!(token.phon, phonetizer.phonetize_entry(entry));
    }
    Ok(())
}

#[test]
fn compound_words_recompose_their_parts() -> Result<()> {
    let dictionary =
        PronunciationDictionary::from_pronunciations([("good", "g-u-d"), ("bye", "b-ay")])?;
    let phonetizer = Phonetizer::builder(&dictionary).build();

    let token = &phonetizer.phonetize_tokens(["good-bye"], false)[0];
    assert_eq!(token.status, PhonStatus::Warning);
    assert_eq!(token.phon, "g-u-d-b-ay");
    Ok(())
}

#[test]
fn compound_expansion_is_capped_at_four_variants() -> Result<()> {
    let dictionary = PronunciationDictionary::from_pronunciations([("a", "a|A|@"), ("b", "b|B")])?;
    let phonetizer = Phonetizer::builder(&dictionary).build();

    let token = &phonetizer.phonetize_tokens(["a_b"], false)[0];
    assert_eq!(token.status, PhonStatus::Warning);
    assert_eq!(token.phon, "a-b|a-B|A-b|A-B");
    Ok(())
}

#[test]
fn misses_without_separators_are_errors_when_guessing_is_off() -> Result<()> {
    let dictionary = english()?;
    let phonetizer = Phonetizer::builder(&dictionary)
        .guesser(SubstringGuesser::new(&dictionary))
        .build();
    for entry in ["sunflower", "xyzzy", "Hello"] {
        let token = &phonetizer.phonetize_tokens([entry], false)[0];
        assert_eq!(token.status, PhonStatus::Error, "{entry}");
        assert_eq!(token.phon, UNKNOWN_STAMP);
    }
    Ok(())
}

#[test]
fn substring_guesser_resolves_unseen_words() -> Result<()> {
    let dictionary = english()?;
    let phonetizer = Phonetizer::builder(&dictionary)
        .guesser(SubstringGuesser::new(&dictionary))
        .build();

    let tokens = phonetizer.phonetize_tokens(["sunflower", "xyzzy"], true);
    assert_eq!(tokens[0].phon, "s-V-n-f-l-aU-@");
    assert_eq!(tokens[0].status, PhonStatus::Warning);
    assert_eq!(tokens[1].status, PhonStatus::Error);
    Ok(())
}

#[test]
fn empty_mapping_table_is_identity() -> Result<()> {
    let dictionary = english()?;
    let empty = MappingTable::new();
    let phonetizer = Phonetizer::builder(&dictionary).mapping(&empty).build();
    for phon in ["", "a", "h-E-l-o|h-@-l-o", "p-_-t", "x|y|z-z"] {
        assert_eq!(phonetizer.map_phonetization(phon), phon);
    }
    Ok(())
}

#[test]
fn longest_sequence_is_mapped_first() -> Result<()> {
    let dictionary = PronunciationDictionary::from_pronunciations([("pitk", "p-t-k")])?;
    let table = MappingTable::from_pairs([("p-t", "x"), ("p", "y")])?;
    let phonetizer = Phonetizer::builder(&dictionary).mapping(&table).build();

    let mapped = phonetizer.map_phonetization("p-t-k");
    let variants: HashSet<&str> = mapped.split('|').collect();
    assert_eq!(variants, HashSet::from(["p-t-k", "x-k"]));
    assert!(!variants.contains("y-t-k"));
    assert_eq!(phonetizer.phonetize_entry("pitk"), mapped);
    Ok(())
}

#[test]
fn mapping_is_stable_across_calls() -> Result<()> {
    let dictionary = english()?;
    let table = MappingTable::load(&fixture_path("eng-ipa.map"))?;
    let phonetizer = Phonetizer::builder(&dictionary).mapping(&table).build();

    let once = phonetizer.map_phonetization("h-E-l-o");
    let twice = phonetizer.map_phonetization("h-E-l-o");
    assert_eq!(once, twice);
    assert_eq!(once, "h-E-l-o|h-ɛ-l-o");
    assert_eq!(phonetizer.phonetize_entry("bye"), "b-aI|b-aɪ");
    Ok(())
}

#[test]
fn composer_matches_documented_examples() {
    let composed = compose("a|b c", 0);
    let variants: HashSet<&str> = composed.split('|').collect();
    assert_eq!(variants, HashSet::from(["a-c", "b-c"]));
    assert_eq!(compose("a|b c|d", 1).split('|').count(), 1);
}

#[test]
fn utterance_keeps_token_order_and_delimiter() -> Result<()> {
    let dictionary = english()?;
    let phonetizer = Phonetizer::builder(&dictionary).build();

    let phonetized = phonetizer.phonetize("good,xyz,bye,", false, ",")?;
    assert_eq!(phonetized, "g-U-d,UNK,b-aI");
    let phonetized = phonetizer.phonetize(" the  sun ", false, " ")?;
    assert_eq!(phonetized, "D-@|D-i:  s-V-n");
    Ok(())
}

#[test]
fn utterance_keeps_leading_empty_fields() -> Result<()> {
    let dictionary = english()?;
    let phonetizer = Phonetizer::builder(&dictionary).build();

    assert_eq!(phonetizer.phonetize("gpf_1,hello", false, ",")?, ",h-E-l-o|h-@-l-o");
    assert_eq!(phonetizer.phonetize(",hello", false, ",")?, ",h-E-l-o|h-@-l-o");
    assert_eq!(phonetizer.phonetize(",good,", false, ",")?, ",g-U-d");
    assert_eq!(phonetizer.phonetize("<>,bye, ", false, ",")?, ",b-aI");
    Ok(())
}

#[test]
fn utterance_rejects_multi_character_delimiters() -> Result<()> {
    let dictionary = english()?;
    let phonetizer = Phonetizer::builder(&dictionary).build();

    for delimiter in ["", "::"] {
        let err = phonetizer.phonetize("good bye", true, delimiter).unwrap_err();
        assert!(
            matches!(err, PhonetizationError::InvalidArgument(_)),
            "unexpected error: {err}"
        );
    }
    Ok(())
}

#[test]
fn phonemic_tokens_pass_through_verbatim() -> Result<()> {
    let dictionary = english()?;
    let phonetizer = Phonetizer::builder(&dictionary)
        .guesser(|_: &str| -> std::result::Result<String, GuessError> {
            Ok("never-used".to_string())
        })
        .build();

    let tokens = phonetizer.phonetize_tokens(["/h.aI/", "gpd_7", "ipu_2"], true);
    assert_eq!(tokens[0].phon, "h.aI");
    assert!(tokens.iter().all(|token| token.status == PhonStatus::Ok));
    assert_eq!(tokens[1].phon, "");
    assert_eq!(tokens[2].phon, "");
    Ok(())
}
