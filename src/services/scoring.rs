use crate::services::catalog::Catalog;

/// Sums the chosen option scores. Unset slots, missing trailing slots and
/// indices the catalog does not know contribute nothing.
pub fn score_total(catalog: &Catalog, answers: &[Option<usize>]) -> i32 {
    catalog
        .questions()
        .iter()
        .zip(answers.iter())
        .filter_map(|(question, answer)| answer.and_then(|choice| question.option_score(choice)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questionnaire::Question;
    use crate::services::classifier::BandThresholds;

    fn three_by_three() -> Catalog {
        let questions = (0..3)
            .map(|i| {
                Question::new(format!("q{i}"), format!("Question {i}"))
                    .with_option("low", 0)
                    .with_option("mid", 1)
                    .with_option("high", 2)
            })
            .collect();
        Catalog::new(questions, BandThresholds::new(3, 5).unwrap()).unwrap()
    }

    #[test]
    fn all_unset_scores_zero() {
        let catalog = three_by_three();
        assert_eq!(score_total(&catalog, &[None, None, None]), 0);
        assert_eq!(score_total(&catalog, &[]), 0);
    }

    #[test]
    fn sums_selected_options() {
        let catalog = three_by_three();
        assert_eq!(score_total(&catalog, &[Some(2), Some(1), Some(0)]), 3);
        assert_eq!(score_total(&catalog, &[Some(2), None, Some(2)]), 4);
    }

    #[test]
    fn short_input_treats_missing_slots_as_unset() {
        let catalog = three_by_three();
        assert_eq!(score_total(&catalog, &[Some(2)]), 2);
    }

    #[test]
    fn unknown_option_index_scores_nothing() {
        let catalog = three_by_three();
        assert_eq!(score_total(&catalog, &[Some(9), Some(1), None]), 1);
    }

    #[test]
    fn fill_order_does_not_matter() {
        let catalog = three_by_three();

        let mut forwards = vec![None; 3];
        forwards[0] = Some(1);
        forwards[1] = Some(2);
        forwards[2] = Some(0);

        let mut backwards = vec![None; 3];
        backwards[2] = Some(0);
        backwards[1] = Some(2);
        backwards[0] = Some(1);

        assert_eq!(
            score_total(&catalog, &forwards),
            score_total(&catalog, &backwards)
        );
    }
}
