use super::*;

mod tokenize_tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits_punctuation() {
        assert_eq!(
            tokenize("The Cell, obviously."),
            vec!["the", "cell", ",", "obviously", "."]
        );
    }

    #[test]
    fn test_tokenize_splits_negative_contraction() {
        assert_eq!(tokenize("doesn't"), vec!["does", "n't"]);
        assert_eq!(tokenize("can't"), vec!["ca", "n't"]);
        assert_eq!(tokenize("Won't"), vec!["wo", "n't"]);
    }

    #[test]
    fn test_tokenize_splits_cannot() {
        assert_eq!(tokenize("It cannot"), vec!["it", "can", "not"]);
    }

    #[test]
    fn test_tokenize_splits_other_clitics() {
        assert_eq!(tokenize("it's"), vec!["it", "'s"]);
        assert_eq!(tokenize("they're"), vec!["they", "'re"]);
        assert_eq!(tokenize("we'll"), vec!["we", "'ll"]);
    }

    #[test]
    fn test_tokenize_curly_apostrophe() {
        assert_eq!(tokenize("isn\u{2019}t"), vec!["is", "n't"]);
    }

    #[test]
    fn test_tokenize_keeps_decimal_numbers() {
        assert_eq!(tokenize("pi is 3.14."), vec!["pi", "is", "3.14", "."]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_tokenize_brackets() {
        assert_eq!(tokenize("(energy)"), vec!["(", "energy", ")"]);
    }

    #[test]
    fn test_is_punctuation() {
        assert!(tokenize::is_punctuation("."));
        assert!(tokenize::is_punctuation("--"));
        assert!(!tokenize::is_punctuation("n't"));
        assert!(!tokenize::is_punctuation("100"));
    }
}

mod stopword_tests {
    use super::*;

    #[test]
    fn test_stopword_list_size() {
        assert_eq!(ENGLISH_STOPWORDS.len(), 179);
    }

    #[test]
    fn test_negations_are_stopwords() {
        assert!(is_stopword("not"));
        assert!(is_stopword("no"));
        assert!(is_stopword("nor"));
        assert!(!is_stopword("never"));
        assert!(!is_stopword("n't"));
    }

    #[test]
    fn test_content_words_are_not_stopwords() {
        assert!(!is_stopword("mitochondria"));
        assert!(!is_stopword("water"));
    }
}

mod lemma_tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        assert_eq!(lemmatize("degrees"), "degree");
        assert_eq!(lemmatize("boils"), "boil");
        assert_eq!(lemmatize("batteries"), "battery");
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("churches"), "church");
        assert_eq!(lemmatize("classes"), "class");
    }

    #[test]
    fn test_irregular_plurals() {
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("mitochondria"), "mitochondrion");
        assert_eq!(lemmatize("phenomena"), "phenomenon");
        assert_eq!(lemmatize("leaves"), "leaf");
    }

    #[test]
    fn test_base_forms_unchanged() {
        assert_eq!(lemmatize("process"), "process");
        assert_eq!(lemmatize("virus"), "virus");
        assert_eq!(lemmatize("analysis"), "analysis");
        assert_eq!(lemmatize("species"), "species");
        assert_eq!(lemmatize("cell"), "cell");
        assert_eq!(lemmatize("gas"), "gas");
    }

    #[test]
    fn test_non_alphabetic_tokens_unchanged() {
        assert_eq!(lemmatize("100"), "100");
        assert_eq!(lemmatize("n't"), "n't");
        assert_eq!(lemmatize("co2s"), "co2s");
    }

    #[test]
    fn test_men_suffix() {
        assert_eq!(lemmatize("firemen"), "fireman");
        assert_eq!(lemmatize("chairmen"), "chairman");
        assert_eq!(lemmatize("craftsmen"), "craftsman");
        assert_eq!(lemmatize("seamen"), "seaman");
        assert_eq!(lemmatize("abdomen"), "abdomen");
    }

    #[test]
    fn test_latin_men_singulars_unchanged() {
        for word in ["lumen", "foramen", "ramen", "specimen", "stamen", "bitumen"] {
            assert_eq!(lemmatize(word), word);
        }
    }

    #[test]
    fn test_ie_singulars_keep_ie() {
        assert_eq!(lemmatize("movies"), "movie");
        assert_eq!(lemmatize("cookies"), "cookie");
        assert_eq!(lemmatize("calories"), "calorie");
        assert_eq!(lemmatize("pies"), "pie");
        assert_eq!(lemmatize("bodies"), "body");
    }
}

mod normalize_tests {
    use super::*;

    #[test]
    fn test_normalize_sentence() {
        let normalized = normalize("The mitochondria is the powerhouse of the cell");
        assert_eq!(normalized.as_str(), "mitochondrion powerhouse cell");
    }

    #[test]
    fn test_normalize_drops_negation_words() {
        let plain = normalize("Water boils at 100 degrees");
        let negated = normalize("Water does not boil at 100 degrees");
        assert_eq!(plain.as_str(), "water boil 100 degree");
        assert_eq!(negated, plain);
    }

    #[test]
    fn test_normalize_keeps_contracted_negation_token() {
        let normalized = normalize("Water doesn't boil");
        assert_eq!(normalized.as_str(), "water n't boil");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("  ").is_empty());
    }

    #[test]
    fn test_normalize_only_stopwords() {
        let normalized = normalize("It is what it is.");
        assert!(normalized.is_empty());
        assert_eq!(normalized.tokens().count(), 0);
    }

    #[test]
    fn test_normalize_single_spaces_preserve_order() {
        let normalized = Normalizer::new().normalize("Enzymes   catalyse\nreactions quickly!");
        assert_eq!(normalized.as_str(), "enzyme catalyse reaction quickly");
        assert_eq!(
            normalized.tokens().collect::<Vec<_>>(),
            vec!["enzyme", "catalyse", "reaction", "quickly"]
        );
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let text = "Photosynthesis converts light energy into chemical energy.";
        assert_eq!(normalize(text), normalize(text));
    }

    #[test]
    fn test_normalized_text_display() {
        let normalized = normalize("Cells divide");
        assert_eq!(format!("{normalized}"), "cell divide");
    }
}

mod negation_tests {
    use super::*;

    #[test]
    fn test_detects_markers() {
        assert!(has_negation("The process is not reversible"));
        assert!(has_negation("It never happens"));
        assert!(has_negation("No energy is lost"));
        assert!(has_negation("None of them react"));
        assert!(has_negation("You cannot divide by zero"));
        assert!(has_negation("It doesn't boil"));
        assert!(has_negation("It isn\u{2019}t stable"));
    }

    #[test]
    fn test_plain_statements() {
        assert!(!has_negation("The process is reversible"));
        assert!(!has_negation("Nothing notable here; knot theory"));
        assert!(!has_negation(""));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(has_negation("NOT TRUE"));
        assert!(has_negation("Never"));
    }

    #[test]
    fn test_double_negation_still_counts() {
        assert!(has_negation("This is not uncommon"));
    }

    #[test]
    fn test_order_independent() {
        assert_eq!(has_negation("not a b"), has_negation("a b not"));
    }
}
