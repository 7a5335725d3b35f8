use super::*;
use crate::embedding::{
    CrossEncoder, CrossEncoderError, EmbeddingError, PairScorer, SentenceEmbedder, TextEmbedder,
};

fn stub_scorer() -> SimilarityScorer<SentenceEmbedder, CrossEncoder> {
    SimilarityScorer::new(SentenceEmbedder::stub(), CrossEncoder::stub())
}

/// Embeds every text to the same fixed vector.
struct ConstantEmbedder(Vec<f32>);

impl TextEmbedder for ConstantEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.0.clone())
    }
}

/// Returns a fixed logit.
struct ConstantLogit(f32);

impl PairScorer for ConstantLogit {
    fn cross_score(&self, _first: &str, _second: &str) -> Result<f32, CrossEncoderError> {
        Ok(self.0)
    }
}

/// Embeds "up" and "down" to opposite vectors.
struct OppositeEmbedder;

impl TextEmbedder for OppositeEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.contains("down") {
            Ok(vec![-1.0, 0.0])
        } else {
            Ok(vec![1.0, 0.0])
        }
    }
}

struct FailingEmbedder;

impl TextEmbedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::InferenceFailed {
            reason: "device lost".to_string(),
        })
    }
}

mod types_tests {
    use super::*;

    #[test]
    fn test_score_pair_clamps() {
        let pair = ScorePair::new(-5.0, 150.0);
        assert_eq!(pair.semantic, 0.0);
        assert_eq!(pair.contextual, 100.0);

        let nan = ScorePair::new(f64::NAN, 50.0);
        assert_eq!(nan.semantic, 0.0);
    }

    #[test]
    fn test_score_pair_scaled() {
        let pair = ScorePair::new(80.0, 60.0).scaled(0.5);
        assert_eq!(pair, ScorePair::new(40.0, 30.0));
    }

    #[test]
    fn test_grade_rounds_half_to_even() {
        assert_eq!(Grade::from_exact(2.5).rounded, 2.0);
        assert_eq!(Grade::from_exact(3.5).rounded, 4.0);
        assert_eq!(Grade::from_exact(7.49).rounded, 7.0);
        assert_eq!(Grade::from_exact(7.51).rounded, 8.0);
    }

    #[test]
    fn test_grade_keeps_exact_value() {
        let grade = Grade::from_exact(6.789);
        assert_eq!(grade.exact, 6.789);
        assert_eq!(grade.rounded, 7.0);
        assert!(format!("{grade}").contains("6.7890"));
    }
}

mod aggregate_tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = Weights::default();
        assert_eq!(weights.semantic, 0.4);
        assert_eq!(weights.contextual, 0.6);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_weights_validation() {
        assert!(Weights::new(0.5, 0.5).is_ok());
        assert!(Weights::new(0.3, 0.3).is_ok());
        assert!(Weights::new(1.0, 0.0).is_ok());
        assert!(Weights::new(0.7, 0.7).is_err());
        assert!(Weights::new(-0.1, 0.6).is_err());
        assert!(Weights::new(0.0, 0.0).is_err());
        assert!(Weights::new(f64::NAN, 0.5).is_err());
        assert!(matches!(
            Weights::new(2.0, 0.0),
            Err(ScoringError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_weighted_mean_formula() {
        let scores = ScorePair::new(80.0, 90.0);
        let grade = AggregationProfile::display().aggregate(scores);
        // 10 * (0.4 * 0.8 + 0.6 * 0.9) = 8.6
        assert!((grade.exact - 8.6).abs() < 1e-9);
        assert_eq!(grade.rounded, 9.0);
    }

    #[test]
    fn test_weighted_mean_custom_weights() {
        let profile = AggregationProfile::WeightedMean(Weights::new(0.5, 0.5).unwrap());
        let grade = profile.aggregate(ScorePair::new(40.0, 60.0));
        assert!((grade.exact - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_mean_scaled_formula() {
        let scores = ScorePair::new(80.0, 90.0);
        let grade = AggregationProfile::api().aggregate(scores);
        // (0.5 * 80 + 0.5 * 90) / 10 = 8.5
        assert!((grade.exact - 8.5).abs() < 1e-9);
        assert_eq!(grade.rounded, 8.0);
    }

    #[test]
    fn test_profiles_differ_for_same_input() {
        let scores = ScorePair::new(30.0, 90.0);
        let display = aggregate(scores, &AggregationProfile::display());
        let api = aggregate(scores, &AggregationProfile::api());
        assert!((display.exact - 6.6).abs() < 1e-9);
        assert!((api.exact - 6.0).abs() < 1e-9);
        assert_ne!(display.exact, api.exact);
    }

    #[test]
    fn test_bounds_under_both_profiles() {
        let extremes = [
            ScorePair::new(0.0, 0.0),
            ScorePair::new(100.0, 100.0),
            ScorePair::new(100.0, 0.0),
            ScorePair::new(0.0, 100.0),
        ];
        let profiles = [
            AggregationProfile::display(),
            AggregationProfile::api(),
            AggregationProfile::WeightedMean(Weights::new(0.3, 0.3).unwrap()),
        ];

        for scores in extremes {
            for profile in &profiles {
                let grade = profile.aggregate(scores);
                assert!((0.0..=10.0).contains(&grade.exact), "{profile}: {grade}");
                assert!((0.0..=10.0).contains(&grade.rounded));
            }
        }
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let scores = ScorePair::new(63.2, 71.9);
        let profile = AggregationProfile::display();
        assert_eq!(profile.aggregate(scores), profile.aggregate(scores));
    }

    #[test]
    fn test_profile_names_and_default() {
        assert_eq!(AggregationProfile::display().name(), "weighted_mean");
        assert_eq!(AggregationProfile::api().name(), "equal_mean_scaled");
        assert_eq!(AggregationProfile::default(), AggregationProfile::display());
        assert_eq!(format!("{}", AggregationProfile::api()), "equal_mean_scaled");
    }

    #[test]
    fn test_profile_serde_shape() {
        let json = serde_json::to_value(AggregationProfile::display()).unwrap();
        assert_eq!(json["profile"], "weighted_mean");
        assert_eq!(json["semantic"], 0.4);

        let parsed: AggregationProfile =
            serde_json::from_value(serde_json::json!({ "profile": "equal_mean_scaled" })).unwrap();
        assert_eq!(parsed, AggregationProfile::EqualMeanScaled);
    }
}

mod penalty_tests {
    use super::*;

    #[test]
    fn test_mismatch_halves_both_scores() {
        let scores = ScorePair::new(90.0, 80.0);
        let penalized = apply_penalty(scores, "The process is not reversible", "The process is reversible");
        assert_eq!(penalized.semantic, 45.0);
        assert_eq!(penalized.contextual, 40.0);
    }

    #[test]
    fn test_agreement_passes_through() {
        let scores = ScorePair::new(90.0, 80.0);
        assert_eq!(apply_penalty(scores, "It is stable", "It is very stable"), scores);
        assert_eq!(
            apply_penalty(scores, "It is not stable", "It never is stable"),
            scores
        );
    }

    #[test]
    fn test_penalty_is_symmetric() {
        let scores = ScorePair::new(77.0, 66.0);
        let pairs = [
            ("Water boils at 100 degrees", "Water does not boil at 100 degrees"),
            ("Cells divide", "Cells divide"),
            ("None react", "All react"),
        ];
        for (a, b) in pairs {
            assert_eq!(apply_penalty(scores, a, b), apply_penalty(scores, b, a));
            assert_eq!(polarity_mismatch(a, b), polarity_mismatch(b, a));
        }
    }

    #[test]
    fn test_double_negation_is_not_resolved() {
        assert!(polarity_mismatch("This is not uncommon", "This is common"));
    }
}

mod scorer_tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_sigmoid() {
        assert!((scorer::sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(scorer::sigmoid(10.0) > 0.9999);
        assert!(scorer::sigmoid(-10.0) < 0.0001);
    }

    #[test]
    fn test_identical_texts_score_high() {
        let scorer = stub_scorer();
        let text = "The mitochondria is the powerhouse of the cell";
        let scores = scorer.score(text, text).unwrap();

        assert!(scores.semantic > 99.9, "semantic = {}", scores.semantic);
        assert!(scores.contextual > 90.0, "contextual = {}", scores.contextual);
    }

    #[test]
    fn test_unrelated_texts_score_low() {
        let scorer = stub_scorer();
        let scores = scorer
            .score(
                "Photosynthesis happens in chloroplasts",
                "Newton's third law concerns action and reaction",
            )
            .unwrap();

        assert!(scores.semantic < 50.0);
        assert!(scores.contextual < 10.0);
    }

    #[test]
    fn test_empty_text_is_degenerate_not_error() {
        let scorer = stub_scorer();
        let scores = scorer.score("", "The mitochondria is the powerhouse of the cell").unwrap();
        assert_eq!(scores.semantic, 0.0);
        assert!(scores.contextual < 5.0);

        let both_empty = scorer.score("", "").unwrap();
        assert_eq!(both_empty.semantic, 0.0);
        assert!(both_empty.contextual < 5.0);
    }

    #[test]
    fn test_negative_cosine_clamped_to_zero() {
        let scorer = SimilarityScorer::new(OppositeEmbedder, ConstantLogit(0.0));
        let scores = scorer.score("prices go up", "prices go down").unwrap();
        assert_eq!(scores.semantic, 0.0);
        assert!((scores.contextual - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_scores_within_bounds_for_extreme_logits() {
        for logit in [-1000.0, -4.0, 0.0, 4.0, 1000.0] {
            let scorer = SimilarityScorer::new(ConstantEmbedder(vec![0.6, 0.8]), ConstantLogit(logit));
            let scores = scorer.score("a answer", "a reference").unwrap();
            assert!((0.0..=100.0).contains(&scores.semantic));
            assert!((0.0..=100.0).contains(&scores.contextual));
        }
    }

    #[test]
    fn test_score_is_deterministic() {
        let scorer = stub_scorer();
        let a = scorer.score("Enzymes speed up reactions", "Enzymes catalyse reactions").unwrap();
        let b = scorer.score("Enzymes speed up reactions", "Enzymes catalyse reactions").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let scorer = SimilarityScorer::new(FailingEmbedder, ConstantLogit(0.0));
        let err = scorer.score("a", "b").unwrap_err();
        assert!(matches!(err, ScoringError::Embedding(_)));
    }

    #[test]
    fn test_negation_scenario_end_to_end() {
        let scorer = stub_scorer();
        let teacher = "Water boils at 100 degrees";
        let student = "Water does not boil at 100 degrees";

        let raw = scorer.score(student, teacher).unwrap();
        let unpenalized = scorer.score(teacher, teacher).unwrap();
        // Normalization drops "does"/"not", so the raw pair matches the identical pairing.
        assert_eq!(raw, unpenalized);

        let penalized = apply_penalty(raw, student, teacher);
        assert!((penalized.semantic - raw.semantic / 2.0).abs() < 1e-9);
        assert!((penalized.contextual - raw.contextual / 2.0).abs() < 1e-9);

        let profile = AggregationProfile::display();
        let identical_total = profile.aggregate(unpenalized);
        let negated_total = profile.aggregate(penalized);
        assert_eq!(identical_total.rounded, 10.0);
        assert!(negated_total.exact < identical_total.exact - 4.0);
    }

    #[test]
    fn test_debug_reports_backends() {
        let debug = format!("{:?}", stub_scorer());
        assert!(debug.contains("embedder_stub: true"));
        assert!(debug.contains("cross_encoder_stub: true"));
    }
}
