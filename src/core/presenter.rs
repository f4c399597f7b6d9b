use crate::config::SecondaryLimit;
use crate::domain::model::{
    format_confidence, IdentificationResponse, Match, MatchView, PresentationModel,
};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultPresenter {
    secondary_limit: SecondaryLimit,
}

impl ResultPresenter {
    pub fn new(secondary_limit: SecondaryLimit) -> Self {
        Self { secondary_limit }
    }

    /// Maps one call outcome onto a terminal presentation state.
    /// Results keep the order the API returned them in.
    pub fn interpret(&self, outcome: Result<IdentificationResponse>) -> PresentationModel {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                return PresentationModel::Failed { error: e.detail() };
            }
        };

        let mut results = response.results.iter();
        let Some(best) = results.next() else {
            return PresentationModel::NoMatch;
        };

        let remaining = response.results.len() - 1;
        let others = results
            .take(self.secondary_limit.cap(remaining))
            .enumerate()
            .map(|(i, m)| view(i + 2, m))
            .collect();

        PresentationModel::Success {
            best: view(1, best),
            others,
        }
    }
}

fn view(rank: usize, m: &Match) -> MatchView {
    MatchView {
        rank,
        scientific_name: m.species.scientific_name.clone(),
        common_name: m.common_name().to_string(),
        confidence: format_confidence(m.score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Species, UNKNOWN_COMMON_NAME};
    use crate::utils::error::IdentifyError;

    fn candidate(name: &str, common: &[&str], score: f64) -> Match {
        Match {
            species: Species {
                scientific_name: name.to_string(),
                scientific_name_without_author: None,
                common_names: common.iter().map(|c| c.to_string()).collect(),
            },
            score,
        }
    }

    fn response(results: Vec<Match>) -> IdentificationResponse {
        IdentificationResponse {
            results,
            ..IdentificationResponse::default()
        }
    }

    fn five_results() -> IdentificationResponse {
        response(vec![
            candidate("Bellis perennis L.", &["Common daisy"], 0.8734),
            candidate("Leucanthemum vulgare Lam.", &["Oxeye daisy"], 0.05),
            candidate("Anthemis arvensis L.", &[], 0.03),
            candidate("Tripleurospermum inodorum", &["Scentless mayweed"], 0.02),
            candidate("Erigeron annuus (L.) Pers.", &["Annual fleabane"], 0.01),
        ])
    }

    #[test]
    fn test_best_match_is_first_result() {
        let model = ResultPresenter::default().interpret(Ok(five_results()));

        match model {
            PresentationModel::Success { best, others } => {
                assert_eq!(best.rank, 1);
                assert_eq!(best.scientific_name, "Bellis perennis L.");
                assert_eq!(best.common_name, "Common daisy");
                assert_eq!(best.confidence, "87.34%");
                assert_eq!(others.len(), 3);
                assert_eq!(others[0].rank, 2);
                assert_eq!(others[0].scientific_name, "Leucanthemum vulgare Lam.");
                assert_eq!(others[1].common_name, UNKNOWN_COMMON_NAME);
                assert_eq!(others[2].confidence, "2.00%");
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_all_secondary_results_when_configured() {
        let model = ResultPresenter::new(SecondaryLimit::All).interpret(Ok(five_results()));

        match model {
            PresentationModel::Success { others, .. } => {
                assert_eq!(others.len(), 4);
                assert_eq!(others[3].rank, 5);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_first_result_not_reordered_by_score() {
        let results = response(vec![
            candidate("Acer campestre L.", &["Field maple"], 0.2),
            candidate("Acer platanoides L.", &["Norway maple"], 0.7),
        ]);

        match ResultPresenter::default().interpret(Ok(results)) {
            PresentationModel::Success { best, others } => {
                assert_eq!(best.scientific_name, "Acer campestre L.");
                assert_eq!(others.len(), 1);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_single_result_has_no_secondary() {
        let results = response(vec![candidate("Hedera helix L.", &[], 0.99)]);

        match ResultPresenter::default().interpret(Ok(results)) {
            PresentationModel::Success { best, others } => {
                assert_eq!(best.common_name, UNKNOWN_COMMON_NAME);
                assert!(others.is_empty());
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_results_is_no_match() {
        let model = ResultPresenter::default().interpret(Ok(response(vec![])));
        assert_eq!(model, PresentationModel::NoMatch);
    }

    #[test]
    fn test_error_becomes_failed_state() {
        let err = IdentifyError::Transport {
            status: Some(400),
            message: "HTTP status 400 Bad Request".to_string(),
            body: Some(r#"{"message":"Bad Request"}"#.to_string()),
        };

        match ResultPresenter::default().interpret(Err(err)) {
            PresentationModel::Failed { error } => {
                assert_eq!(error.http_status, Some(400));
                assert_eq!(
                    error.server_body.as_deref(),
                    Some(r#"{"message":"Bad Request"}"#)
                );
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
