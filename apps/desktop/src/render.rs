use client_core::{
    view::{confidence_bar, ResultView},
    SubmitOutcome,
};

const BAR_WIDTH: usize = 30;

pub fn outcome(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Succeeded(result) => {
            let view = ResultView::from(result);
            format!(
                "{}\n{}\n{}",
                view.headline,
                confidence_bar(view.fill, BAR_WIDTH),
                view.confidence_text
            )
        }
        SubmitOutcome::Failed(message) => format!("error: {message}"),
        SubmitOutcome::Skipped | SubmitOutcome::Superseded => String::new(),
    }
}
